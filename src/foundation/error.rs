/// Convenience result type used across printboard.
pub type PrintResult<T> = Result<T, PrintError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every failure aborts the whole job; there is no partial output.
#[derive(thiserror::Error, Debug)]
pub enum PrintError {
    /// Request shape problems: empty image list, bad print size, spacing that collapses a cell.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A source image could not be retrieved.
    #[error("fetch error: image {index} ({uri}): {detail}")]
    Fetch {
        /// Position of the image in the request.
        index: usize,
        /// Source locator as given by the caller.
        uri: String,
        /// Underlying failure.
        detail: String,
    },

    /// Source bytes were fetched but are not a decodable image.
    #[error("decode error: image {index} ({uri}): {detail}")]
    Decode {
        /// Position of the image in the request.
        index: usize,
        /// Source locator as given by the caller.
        uri: String,
        /// Underlying failure.
        detail: String,
    },

    /// The compositor could not produce the required output format.
    #[error("encode error: {0}")]
    Encode(String),

    /// Broken engine invariant.
    #[error("internal error: {0}")]
    Internal(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PrintError {
    /// Build a [`PrintError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`PrintError::Fetch`] value.
    pub fn fetch(index: usize, uri: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Fetch {
            index,
            uri: uri.into(),
            detail: detail.into(),
        }
    }

    /// Build a [`PrintError::Decode`] value.
    pub fn decode(index: usize, uri: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Decode {
            index,
            uri: uri.into(),
            detail: detail.into(),
        }
    }

    /// Build a [`PrintError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`PrintError::Internal`] value.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Short machine-readable category.
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Fetch { .. } => "fetch_error",
            Self::Decode { .. } => "decode_error",
            Self::Encode(_) => "encode_error",
            Self::Internal(_) | Self::Other(_) => "internal_error",
        }
    }

    /// Whether the caller, not the engine, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// HTTP-style status a boundary layer would map this error to.
    pub fn status_hint(&self) -> u16 {
        if self.is_client_error() { 400 } else { 500 }
    }

    /// Caller-facing report. Wrapped dependency chains are not exposed.
    pub fn report(&self) -> ErrorReport {
        let detail = match self {
            Self::Other(_) => "unexpected engine failure".to_string(),
            other => other.to_string(),
        };
        ErrorReport {
            category: self.category().to_string(),
            detail,
        }
    }
}

/// Structured error handed to untrusted callers.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorReport {
    /// Value of [`PrintError::category`].
    pub category: String,
    /// Human-readable detail.
    pub detail: String,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
