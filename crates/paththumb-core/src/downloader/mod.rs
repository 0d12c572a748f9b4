//! Pluggable download strategies.
//!
//! A cache front end holds a [`DownloaderSet`] and asks it which strategy
//! can serve a given URL. The chosen [`UrlDownloader`] produces bytes and
//! hands them to a [`DownloadCallback`]; [`spawn_download`] runs that on the
//! tokio runtime and signals completion afterwards.

mod file_url;
mod thumbnailer;

pub use file_url::FileUrlDownloader;
pub use thumbnailer::FilePathThumbnailer;

use async_trait::async_trait;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::ThumbnailConfig;

/// Whether a download delivered its result.
///
/// Failures are logged by the downloader and never reach the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The result callback was invoked
    Delivered,
    /// Nothing was delivered
    Failed,
}

impl DownloadOutcome {
    /// True when the callback received data.
    pub fn is_delivered(self) -> bool {
        self == DownloadOutcome::Delivered
    }
}

/// Receives the output of a successful download.
pub trait DownloadCallback: Send + Sync {
    /// Called once with the produced bytes.
    ///
    /// `downloader` is the name of the strategy that produced them.
    /// `filename` is set when the bytes also exist as a local file.
    fn on_download_complete(
        &self,
        downloader: &str,
        data: Cursor<Vec<u8>>,
        filename: Option<&Path>,
    );
}

/// A strategy for turning a URL (or path) into image bytes.
///
/// Uses `async_trait` so strategies can live behind `Arc<dyn UrlDownloader>`.
#[async_trait]
pub trait UrlDownloader: Send + Sync {
    /// Strategy name, passed to callbacks and used in logs.
    fn name(&self) -> &str;

    /// Whether the cache may keep this strategy's output.
    fn allow_cache(&self) -> bool;

    /// Whether this strategy handles `url`.
    fn can_download_url(&self, url: &str) -> bool;

    /// Produce the bytes for `url` and pass them to `callback`.
    ///
    /// `filename` is the cache location the front end would store the
    /// result under. Errors are logged and reported as
    /// [`DownloadOutcome::Failed`]; the callback is not invoked then.
    async fn download(
        &self,
        url: &str,
        filename: &Path,
        callback: Arc<dyn DownloadCallback>,
    ) -> DownloadOutcome;
}

/// Run `downloader` for `url` on the tokio runtime.
///
/// `completion` runs after the download finishes, whether or not it
/// delivered, so the callback always fires before it. The returned handle
/// may be dropped for fire-and-forget use.
pub fn spawn_download<F>(
    downloader: Arc<dyn UrlDownloader>,
    url: impl Into<String>,
    filename: impl Into<PathBuf>,
    callback: Arc<dyn DownloadCallback>,
    completion: F,
) -> JoinHandle<DownloadOutcome>
where
    F: FnOnce() + Send + 'static,
{
    let url = url.into();
    let filename = filename.into();
    tokio::spawn(async move {
        let outcome = downloader.download(&url, &filename, callback).await;
        completion();
        outcome
    })
}

/// An ordered list of strategies; the first that accepts a URL serves it.
#[derive(Clone, Default)]
pub struct DownloaderSet {
    downloaders: Vec<Arc<dyn UrlDownloader>>,
}

impl DownloaderSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Strategies for local sources: `file://` URLs first, then bare paths.
    pub fn local(config: &ThumbnailConfig) -> Self {
        Self::new()
            .with(Arc::new(FileUrlDownloader::new()))
            .with(Arc::new(FilePathThumbnailer::new(config.clone())))
    }

    /// Append a strategy.
    pub fn with(mut self, downloader: Arc<dyn UrlDownloader>) -> Self {
        self.downloaders.push(downloader);
        self
    }

    /// The first strategy that can serve `url`.
    pub fn select(&self, url: &str) -> Option<Arc<dyn UrlDownloader>> {
        self.downloaders
            .iter()
            .find(|d| d.can_download_url(url))
            .cloned()
    }

    /// Number of registered strategies.
    pub fn len(&self) -> usize {
        self.downloaders.len()
    }

    /// True when no strategy is registered.
    pub fn is_empty(&self) -> bool {
        self.downloaders.is_empty()
    }
}

impl std::fmt::Debug for DownloaderSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.downloaders.iter().map(|d| d.name()))
            .finish()
    }
}
