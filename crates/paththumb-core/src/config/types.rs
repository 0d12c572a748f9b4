//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// Default cap on memory for one full-resolution decode, in megabytes.
pub const DEFAULT_MAX_DECODE_ALLOC_MB: u64 = 2048;

/// Thumbnail generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Target size in pixels; the larger source edge is sampled down toward it
    pub size: u32,

    /// JPEG quality, 1-100
    pub quality: u8,

    /// Memory cap for decoding the source before sampling, in megabytes
    pub max_decode_alloc_mb: u64,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            size: 750,
            quality: 100,
            max_decode_alloc_mb: DEFAULT_MAX_DECODE_ALLOC_MB,
        }
    }
}

/// Processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Number of downloads allowed in flight at once
    pub parallel_workers: usize,

    /// File extensions picked up when a directory is given as input
    pub supported_formats: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            parallel_workers: 4,
            supported_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "webp".to_string(),
                "gif".to_string(),
                "bmp".to_string(),
                "tiff".to_string(),
            ],
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory thumbnails are written to (supports ~)
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "~/.paththumb/thumbnails".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
