//! Square thumbnails for bare local paths.

use async_trait::async_trait;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::ThumbnailConfig;
use crate::error::PipelineError;
use crate::pipeline::ThumbnailGenerator;

use super::{DownloadCallback, DownloadOutcome, UrlDownloader};

/// Serves inputs given as plain filesystem paths (no `:/` scheme marker)
/// by delivering a center-cropped JPEG thumbnail of the image.
///
/// Paths rather than `file://` URLs mark the large local images that should
/// be thumbnailed, so a mixed list of web URLs, small local URLs and paths
/// can share one cache.
#[derive(Debug, Clone)]
pub struct FilePathThumbnailer {
    generator: ThumbnailGenerator,
}

impl FilePathThumbnailer {
    /// Name reported to callbacks.
    pub const NAME: &'static str = "file-path-thumbnailer";

    /// Create a thumbnailer with the given output settings.
    pub fn new(config: ThumbnailConfig) -> Self {
        Self {
            generator: ThumbnailGenerator::new(config),
        }
    }
}

impl Default for FilePathThumbnailer {
    fn default() -> Self {
        Self::new(ThumbnailConfig::default())
    }
}

#[async_trait]
impl UrlDownloader for FilePathThumbnailer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn allow_cache(&self) -> bool {
        true
    }

    fn can_download_url(&self, url: &str) -> bool {
        !url.contains(":/")
    }

    async fn download(
        &self,
        url: &str,
        _filename: &Path,
        callback: Arc<dyn DownloadCallback>,
    ) -> DownloadOutcome {
        let generator = self.generator.clone();
        let path = PathBuf::from(url);
        let task_path = path.clone();

        // Decode and encode are CPU-bound; the callback fires on the worker.
        let joined = tokio::task::spawn_blocking(move || {
            let thumbnail = generator.generate(&task_path)?;
            callback.on_download_complete(
                FilePathThumbnailer::NAME,
                Cursor::new(thumbnail.bytes),
                None,
            );
            Ok::<_, PipelineError>(())
        })
        .await;

        let result = joined.unwrap_or_else(|e| {
            Err(PipelineError::Task {
                path: path.clone(),
                message: e.to_string(),
            })
        });

        match result {
            Ok(()) => DownloadOutcome::Delivered,
            Err(e) => {
                tracing::warn!("Thumbnail skipped: {e}");
                DownloadOutcome::Failed
            }
        }
    }
}
