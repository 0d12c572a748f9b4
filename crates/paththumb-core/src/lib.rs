//! paththumb core - square JPEG thumbnails for local image paths.
//!
//! The library plugs into an image-loading cache as a set of download
//! strategies. Inputs given as bare filesystem paths are thumbnailed;
//! `file://` URLs are passed through untouched.
//!
//! ```text
//! path → read bounds → sampled decode → center crop → JPEG → callback → completion
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use paththumb_core::{spawn_download, Config, DownloaderSet};
//!
//! let config = Config::load()?;
//! let downloaders = DownloaderSet::local(&config.thumbnail);
//! if let Some(downloader) = downloaders.select("/photos/cat.jpg") {
//!     spawn_download(downloader, "/photos/cat.jpg", cache_path, callback, || {
//!         tracing::debug!("done");
//!     });
//! }
//! ```

// Module declarations
pub mod config;
pub mod downloader;
pub mod error;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use downloader::{
    spawn_download, DownloadCallback, DownloadOutcome, DownloaderSet, FilePathThumbnailer,
    FileUrlDownloader, UrlDownloader,
};
pub use error::{ConfigError, PipelineError, PipelineResult, Result, ThumbError};
pub use pipeline::{Thumbnail, ThumbnailGenerator};
pub use types::DownloadReport;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
