/// Source image decoding.
pub mod decode;
/// Byte-fetch capability and shipped fetchers.
pub mod fetch;
