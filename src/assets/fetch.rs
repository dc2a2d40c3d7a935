use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use base64::Engine as _;

/// Why a source could not be fetched. The acquisition stage attaches the image index.
#[derive(thiserror::Error, Debug)]
pub enum FetchFailure {
    /// Remote answered with a non-success status.
    #[error("source responded with status {0}")]
    Status(u16),

    /// Nothing exists at the locator.
    #[error("source not found")]
    NotFound,

    /// This fetcher cannot handle the locator's scheme.
    #[error("unsupported source locator")]
    Unsupported,

    /// Network, IO, or payload decoding failure.
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// Byte-fetch capability injected by the caller.
///
/// Implementations must be safe to call from many worker threads at once and must not keep
/// per-job state.
pub trait ImageFetcher: Send + Sync {
    /// Return the raw encoded bytes behind `uri`.
    fn fetch(&self, uri: &str) -> Result<Vec<u8>, FetchFailure>;
}

impl<T: ImageFetcher + ?Sized> ImageFetcher for &T {
    fn fetch(&self, uri: &str) -> Result<Vec<u8>, FetchFailure> {
        (**self).fetch(uri)
    }
}

impl<T: ImageFetcher + ?Sized> ImageFetcher for Arc<T> {
    fn fetch(&self, uri: &str) -> Result<Vec<u8>, FetchFailure> {
        (**self).fetch(uri)
    }
}

impl<T: ImageFetcher + ?Sized> ImageFetcher for Box<T> {
    fn fetch(&self, uri: &str) -> Result<Vec<u8>, FetchFailure> {
        (**self).fetch(uri)
    }
}

/// Decode an RFC 2397 `data:` URI with a base64 payload.
///
/// Returns `None` when `uri` is not a data URI at all.
pub fn decode_data_uri(uri: &str) -> Option<Result<Vec<u8>, FetchFailure>> {
    let rest = uri.strip_prefix("data:")?;
    let Some((meta, payload)) = rest.split_once(',') else {
        return Some(Err(FetchFailure::Transport(anyhow::anyhow!(
            "data uri is missing ','"
        ))));
    };
    if !meta.split(';').any(|p| p.eq_ignore_ascii_case("base64")) {
        return Some(Err(FetchFailure::Unsupported));
    }
    Some(
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .context("decode base64 data uri payload")
            .map_err(FetchFailure::from),
    )
}

/// Reads local files: plain paths and `file://` URIs.
///
/// Relative paths resolve against `root` when one is set.
#[derive(Clone, Debug, Default)]
pub struct FileFetcher {
    root: Option<PathBuf>,
}

impl FileFetcher {
    /// Resolve relative paths against the process working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root`.
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, uri: &str) -> Result<PathBuf, FetchFailure> {
        let raw = uri.strip_prefix("file://").unwrap_or(uri);
        if raw.contains("://") {
            return Err(FetchFailure::Unsupported);
        }
        let path = Path::new(raw);
        Ok(match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        })
    }
}

impl ImageFetcher for FileFetcher {
    fn fetch(&self, uri: &str) -> Result<Vec<u8>, FetchFailure> {
        if let Some(inline) = decode_data_uri(uri) {
            return inline;
        }
        let path = self.resolve(uri)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(FetchFailure::NotFound),
            Err(e) => Err(FetchFailure::Transport(
                anyhow::Error::new(e).context(format!("read image bytes from '{}'", path.display())),
            )),
        }
    }
}

/// Serves bytes from memory. Useful for pre-fetched jobs and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryFetcher {
    entries: HashMap<String, Arc<Vec<u8>>>,
}

impl MemoryFetcher {
    /// Empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `uri`, replacing any previous entry.
    pub fn insert(&mut self, uri: impl Into<String>, bytes: Vec<u8>) -> &mut Self {
        self.entries.insert(uri.into(), Arc::new(bytes));
        self
    }

    /// Builder-style [`MemoryFetcher::insert`].
    pub fn with(mut self, uri: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(uri, bytes);
        self
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ImageFetcher for MemoryFetcher {
    fn fetch(&self, uri: &str) -> Result<Vec<u8>, FetchFailure> {
        if let Some(bytes) = self.entries.get(uri) {
            return Ok(bytes.as_ref().clone());
        }
        decode_data_uri(uri).unwrap_or(Err(FetchFailure::NotFound))
    }
}

#[cfg(feature = "http")]
pub use http::{HttpFetcher, HttpFetcherConfig, RoutingFetcher};

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use anyhow::Context;

    use super::{FetchFailure, FileFetcher, ImageFetcher, decode_data_uri};

    #[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
    #[serde(default)]
    /// HTTP client settings.
    pub struct HttpFetcherConfig {
        /// Whole-request timeout.
        pub timeout_secs: u64,
        /// `User-Agent` header value.
        pub user_agent: String,
    }

    impl Default for HttpFetcherConfig {
        fn default() -> Self {
            Self {
                timeout_secs: 30,
                user_agent: concat!("printboard/", env!("CARGO_PKG_VERSION")).to_string(),
            }
        }
    }

    /// Fetches `http://` and `https://` locators with a blocking client.
    ///
    /// Calls block the worker thread they run on; the acquisition stage runs them on its own
    /// pool.
    #[derive(Clone, Debug)]
    pub struct HttpFetcher {
        client: reqwest::blocking::Client,
    }

    impl HttpFetcher {
        /// Build a client from `cfg`.
        pub fn new(cfg: &HttpFetcherConfig) -> anyhow::Result<Self> {
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(cfg.timeout_secs.max(1)))
                .user_agent(cfg.user_agent.clone())
                .build()
                .context("build http client")?;
            Ok(Self { client })
        }
    }

    impl ImageFetcher for HttpFetcher {
        #[tracing::instrument(skip(self), level = "debug")]
        fn fetch(&self, uri: &str) -> Result<Vec<u8>, FetchFailure> {
            if let Some(inline) = decode_data_uri(uri) {
                return inline;
            }
            if !(uri.starts_with("http://") || uri.starts_with("https://")) {
                return Err(FetchFailure::Unsupported);
            }

            let resp = self
                .client
                .get(uri)
                .send()
                .with_context(|| format!("GET {uri}"))?;
            let status = resp.status();
            if !status.is_success() {
                tracing::debug!(status = status.as_u16(), "image source returned non-success");
                return Err(FetchFailure::Status(status.as_u16()));
            }
            let bytes = resp.bytes().context("read response body")?;
            Ok(bytes.to_vec())
        }
    }

    /// Sends `http(s)://` locators to an [`HttpFetcher`] and everything else to a
    /// [`FileFetcher`].
    #[derive(Clone, Debug)]
    pub struct RoutingFetcher {
        http: HttpFetcher,
        files: FileFetcher,
    }

    impl RoutingFetcher {
        /// Combine the two fetchers.
        pub fn new(http: HttpFetcher, files: FileFetcher) -> Self {
            Self { http, files }
        }
    }

    impl ImageFetcher for RoutingFetcher {
        fn fetch(&self, uri: &str) -> Result<Vec<u8>, FetchFailure> {
            if uri.starts_with("http://") || uri.starts_with("https://") {
                self.http.fetch(uri)
            } else {
                self.files.fetch(uri)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
