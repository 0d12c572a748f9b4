//! The `paththumb generate` command.

use clap::Args;
use paththumb_core::pipeline::{cache_file_name, FileDiscovery};
use paththumb_core::{spawn_download, Config, DownloadCallback, DownloadReport, DownloaderSet};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Arguments for the `generate` command.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Image paths, directories or file:// URLs
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Directory to store thumbnails in (defaults to output.dir from config)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Target edge length in pixels
    #[arg(long)]
    pub size: Option<u32>,

    /// JPEG quality
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Number of thumbnails generated concurrently
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// Print one JSON object per input instead of a summary
    #[arg(long)]
    pub json: bool,
}

/// Execute the generate command.
pub async fn execute(args: GenerateArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(size) = args.size {
        anyhow::ensure!(size > 0, "--size must be > 0");
        config.thumbnail.size = size;
    }
    if let Some(quality) = args.quality {
        config.thumbnail.quality = quality;
    }
    if let Some(parallel) = args.parallel {
        anyhow::ensure!(parallel > 0, "--parallel must be > 0");
        config.processing.parallel_workers = parallel;
    }

    let output_dir = args.output_dir.unwrap_or_else(|| config.output_dir());
    std::fs::create_dir_all(&output_dir)?;

    let discovery = FileDiscovery::new(&config.processing);
    let sources = expand_inputs(&args.inputs, &discovery);
    tracing::info!(
        "Generating thumbnails for {} input(s) into {}",
        sources.len(),
        output_dir.display()
    );

    let downloaders = DownloaderSet::local(&config.thumbnail);
    let parallel = config.processing.parallel_workers;
    let reports = run(&downloaders, sources, &output_dir, parallel).await?;

    let failed = reports.iter().filter(|r| !r.delivered).count();
    if args.json {
        for report in &reports {
            println!("{}", serde_json::to_string(report)?);
        }
    } else {
        for report in &reports {
            println!("{}", summary_line(report));
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} input(s) produced no output", failed, reports.len());
    }
    Ok(())
}

/// Dispatch every source and collect reports in input order.
async fn run(
    downloaders: &DownloaderSet,
    sources: Vec<String>,
    output_dir: &Path,
    parallel: usize,
) -> anyhow::Result<Vec<DownloadReport>> {
    let semaphore = Arc::new(Semaphore::new(parallel));
    let mut pending = Vec::with_capacity(sources.len());

    for source in sources {
        let Some(downloader) = downloaders.select(&source) else {
            tracing::warn!("No downloader accepts {source}");
            pending.push(Pending::Unhandled(source));
            continue;
        };

        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let target = output_dir.join(cache_file_name(&source));
        let sink = Arc::new(CacheSink::new(
            downloader.allow_cache().then(|| target.clone()),
        ));

        let handle = spawn_download(
            Arc::clone(&downloader),
            source.clone(),
            target,
            sink.clone(),
            move || drop(permit),
        );

        pending.push(Pending::Spawned {
            source,
            downloader: downloader.name().to_string(),
            cacheable: downloader.allow_cache(),
            sink,
            handle,
        });
    }

    let mut reports = Vec::with_capacity(pending.len());
    for entry in pending {
        let report = match entry {
            Pending::Unhandled(source) => DownloadReport::unhandled(source),
            Pending::Spawned {
                source,
                downloader,
                cacheable,
                sink,
                handle,
            } => {
                let outcome = handle.await?;
                let stored = sink.stored();
                DownloadReport {
                    source,
                    downloader: Some(downloader),
                    delivered: outcome.is_delivered() && stored.error.is_none(),
                    bytes: stored.bytes,
                    cacheable,
                    output: stored.output,
                }
            }
        };
        reports.push(report);
    }

    Ok(reports)
}

enum Pending {
    Unhandled(String),
    Spawned {
        source: String,
        downloader: String,
        cacheable: bool,
        sink: Arc<CacheSink>,
        handle: tokio::task::JoinHandle<paththumb_core::DownloadOutcome>,
    },
}

/// Turn CLI inputs into download sources.
///
/// URLs pass through, directories expand to the images beneath them and
/// anything else is treated as a single path.
fn expand_inputs(inputs: &[String], discovery: &FileDiscovery) -> Vec<String> {
    let mut sources = Vec::new();
    for input in inputs {
        let path = Path::new(input);
        if !input.contains(":/") && path.is_dir() {
            let found = discovery.discover(path);
            if found.is_empty() {
                tracing::warn!("No images found in {}", path.display());
            }
            sources.extend(found.into_iter().map(|p| p.to_string_lossy().into_owned()));
        } else {
            sources.push(input.clone());
        }
    }
    sources
}

fn summary_line(report: &DownloadReport) -> String {
    match (&report.downloader, report.delivered, &report.output) {
        (None, _, _) => format!("skipped  {} (unsupported input)", report.source),
        (Some(_), false, _) => format!("failed   {}", report.source),
        (Some(_), true, Some(output)) => {
            format!("stored   {} -> {} ({} bytes)", report.source, output.display(), report.bytes)
        }
        (Some(name), true, None) => {
            format!("read     {} via {} ({} bytes, not cached)", report.source, name, report.bytes)
        }
    }
}

/// What a [`CacheSink`] did with its delivery.
#[derive(Debug, Default, Clone)]
struct Stored {
    bytes: usize,
    output: Option<PathBuf>,
    error: Option<String>,
}

/// Result callback that writes cacheable deliveries to disk.
struct CacheSink {
    target: Option<PathBuf>,
    stored: Mutex<Stored>,
}

impl CacheSink {
    fn new(target: Option<PathBuf>) -> Self {
        Self {
            target,
            stored: Mutex::new(Stored::default()),
        }
    }

    fn stored(&self) -> Stored {
        self.stored
            .lock()
            .map(|s| s.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }
}

impl DownloadCallback for CacheSink {
    fn on_download_complete(
        &self,
        downloader: &str,
        data: Cursor<Vec<u8>>,
        filename: Option<&Path>,
    ) {
        let bytes = data.into_inner();
        let mut stored = Stored {
            bytes: bytes.len(),
            ..Stored::default()
        };

        if let Some(target) = &self.target {
            match std::fs::write(target, &bytes) {
                Ok(()) => stored.output = Some(target.clone()),
                Err(e) => {
                    tracing::warn!("Cannot write {}: {e}", target.display());
                    stored.error = Some(e.to_string());
                }
            }
        } else {
            tracing::debug!(
                "{downloader} delivered {} bytes for {:?}; not cached",
                bytes.len(),
                filename
            );
        }

        *self.stored.lock().unwrap_or_else(|e| e.into_inner()) = stored;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;

    #[test]
    fn test_expand_inputs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"").unwrap();
        std::fs::write(dir.path().join("b.txt"), b"").unwrap();

        let discovery = FileDiscovery::new(&Config::default().processing);
        let inputs = vec![
            dir.path().to_string_lossy().into_owned(),
            "file:///tmp/x.png".to_string(),
            "/does/not/exist.jpg".to_string(),
        ];

        let sources = expand_inputs(&inputs, &discovery);
        assert_eq!(
            sources,
            vec![
                dir.path().join("a.jpg").to_string_lossy().into_owned(),
                "file:///tmp/x.png".to_string(),
                "/does/not/exist.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn test_sink_writes_cacheable_output() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("thumb.jpg");
        let sink = CacheSink::new(Some(target.clone()));

        sink.on_download_complete("test", Cursor::new(vec![1, 2, 3]), None);

        let stored = sink.stored();
        assert_eq!(stored.bytes, 3);
        assert_eq!(stored.output, Some(target.clone()));
        assert_eq!(std::fs::read(&target).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_sink_skips_uncacheable_output() {
        let sink = CacheSink::new(None);
        sink.on_download_complete("test", Cursor::new(vec![0; 10]), Some(Path::new("/x")));

        let stored = sink.stored();
        assert_eq!(stored.bytes, 10);
        assert!(stored.output.is_none());
    }

    #[test]
    fn test_stored_survives_poisoned_lock() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("thumb.jpg");
        let sink = Arc::new(CacheSink::new(Some(target.clone())));
        sink.on_download_complete("test", Cursor::new(vec![7; 5]), None);

        let poisoner = Arc::clone(&sink);
        let joined = std::thread::spawn(move || {
            let _guard = poisoner.stored.lock().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(joined.is_err());
        assert!(sink.stored.is_poisoned());

        let stored = sink.stored();
        assert_eq!(stored.bytes, 5);
        assert_eq!(stored.output, Some(target));
    }

    #[tokio::test]
    async fn test_run_reports_in_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("photo.png");
        DynamicImage::new_rgb8(80, 60).save(&image).unwrap();
        let out = dir.path().join("thumbs");
        std::fs::create_dir(&out).unwrap();

        let sources = vec![
            image.to_string_lossy().into_owned(),
            "https://example.com/remote.jpg".to_string(),
            dir.path().join("missing.png").to_string_lossy().into_owned(),
        ];
        let set = DownloaderSet::local(&Config::default().thumbnail);
        let reports = run(&set, sources, &out, 2).await.unwrap();

        assert_eq!(reports.len(), 3);
        assert!(reports[0].delivered);
        assert!(reports[0].cacheable);
        let stored = reports[0].output.as_ref().unwrap();
        assert!(stored.starts_with(&out));
        assert!(stored.exists());

        assert!(reports[1].downloader.is_none());
        assert!(!reports[2].delivered);
        assert!(reports[2].output.is_none());
    }
}
