//! Raw bytes for `file://` URLs.

use async_trait::async_trait;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

use crate::error::PipelineError;

use super::{DownloadCallback, DownloadOutcome, UrlDownloader};

/// Serves `file:` URLs by reading the referenced file unchanged.
///
/// The file already lives on disk, so its output is not cached and the
/// local path is reported to the callback alongside the bytes.
#[derive(Debug, Clone, Default)]
pub struct FileUrlDownloader;

impl FileUrlDownloader {
    /// Name reported to callbacks.
    pub const NAME: &'static str = "file-url-downloader";

    pub fn new() -> Self {
        Self
    }
}

/// Local path named by a `file:` URL.
///
/// Accepts `file:/path`, `file:///path` and `file://localhost/path`, and
/// decodes percent-escapes. Other hosts are not local and yield `None`.
pub fn file_url_to_path(url: &str) -> Option<PathBuf> {
    let parsed = Url::parse(url).ok()?;
    if parsed.scheme() != "file" {
        return None;
    }
    parsed.to_file_path().ok()
}

#[async_trait]
impl UrlDownloader for FileUrlDownloader {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn allow_cache(&self) -> bool {
        false
    }

    fn can_download_url(&self, url: &str) -> bool {
        url.starts_with("file:/")
    }

    async fn download(
        &self,
        url: &str,
        _filename: &Path,
        callback: Arc<dyn DownloadCallback>,
    ) -> DownloadOutcome {
        let Some(path) = file_url_to_path(url) else {
            tracing::warn!("Not a local file URL: {url}");
            return DownloadOutcome::Failed;
        };
        let task_path = path.clone();

        let joined = tokio::task::spawn_blocking(move || {
            let bytes = std::fs::read(&task_path).map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => PipelineError::FileNotFound(task_path.clone()),
                _ => PipelineError::Decode {
                    path: task_path.clone(),
                    message: format!("Cannot read file: {}", e),
                },
            })?;
            tracing::debug!("Read {} bytes from {:?}", bytes.len(), task_path);
            callback.on_download_complete(
                FileUrlDownloader::NAME,
                Cursor::new(bytes),
                Some(task_path.as_path()),
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
                tracing::warn!("File URL skipped: {e}");
                DownloadOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_url_to_path() {
        assert_eq!(
            file_url_to_path("file:///tmp/a.jpg"),
            Some(PathBuf::from("/tmp/a.jpg"))
        );
        assert_eq!(
            file_url_to_path("file:/tmp/a.jpg"),
            Some(PathBuf::from("/tmp/a.jpg"))
        );
        assert_eq!(
            file_url_to_path("file://localhost/tmp/a.jpg"),
            Some(PathBuf::from("/tmp/a.jpg"))
        );
        assert_eq!(file_url_to_path("file://fileserver/tmp/a.jpg"), None);
        assert_eq!(file_url_to_path("http://example.com/a.jpg"), None);
    }

    #[test]
    fn test_file_url_decodes_percent_escapes() {
        assert_eq!(
            file_url_to_path("file:///tmp/My%20Photo.jpg"),
            Some(PathBuf::from("/tmp/My Photo.jpg"))
        );
    }

    #[tokio::test]
    async fn test_download_reads_escaped_path() {
        struct Count(std::sync::Mutex<usize>);
        impl DownloadCallback for Count {
            fn on_download_complete(
                &self,
                _downloader: &str,
                data: Cursor<Vec<u8>>,
                _filename: Option<&Path>,
            ) {
                *self.0.lock().unwrap() = data.into_inner().len();
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("My Photo.jpg");
        std::fs::write(&path, b"jpeg bytes").unwrap();
        let url = Url::from_file_path(&path).unwrap().to_string();
        assert!(url.contains("%20"));

        let count = Arc::new(Count(std::sync::Mutex::new(0)));
        let outcome = FileUrlDownloader::new()
            .download(&url, &path, count.clone())
            .await;
        assert!(outcome.is_delivered());
        assert_eq!(*count.0.lock().unwrap(), 10);
    }

    #[test]
    fn test_capabilities() {
        let downloader = FileUrlDownloader::new();
        assert!(!downloader.allow_cache());
        assert!(downloader.can_download_url("file:///tmp/a.jpg"));
        assert!(!downloader.can_download_url("/tmp/a.jpg"));
        assert!(!downloader.can_download_url("https://example.com/a.jpg"));
    }
}
