//! Thumbnail pipeline stages.
//!
//! - **decode**: Read bounds, pick a sample size, decode reduced
//! - **crop**: Center-crop to a square
//! - **encode**: JPEG compression
//! - **thumbnail**: Runs the three stages for one file
//! - **hash**: Cache keys for stored thumbnails
//! - **discovery**: Find image files in directories

pub mod crop;
pub mod decode;
pub mod discovery;
pub mod encode;
pub mod hash;
pub mod thumbnail;

// Re-exports for convenient access
pub use crop::crop_center;
pub use decode::{sample_size, DecodedImage, ImageBounds, ImageDecoder};
pub use discovery::FileDiscovery;
pub use encode::encode_jpeg;
pub use hash::{cache_file_name, cache_key};
pub use thumbnail::{Thumbnail, ThumbnailGenerator};
