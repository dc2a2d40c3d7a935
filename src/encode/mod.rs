/// JPEG artifacts.
pub mod jpeg;
