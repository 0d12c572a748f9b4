//! Square JPEG thumbnail generation.

use std::path::Path;

use crate::config::ThumbnailConfig;
use crate::error::{PipelineError, PipelineResult};

use super::crop::crop_center;
use super::decode::ImageDecoder;
use super::encode::encode_jpeg;

/// An encoded square thumbnail.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    /// JPEG bytes
    pub bytes: Vec<u8>,
    /// Edge length of the square output
    pub side: u32,
    /// Width of the source image
    pub source_width: u32,
    /// Height of the source image
    pub source_height: u32,
    /// Integer factor the source was reduced by before cropping
    pub sample_size: u32,
}

/// Generates thumbnails from image files.
#[derive(Debug, Clone)]
pub struct ThumbnailGenerator {
    config: ThumbnailConfig,
    decoder: ImageDecoder,
}

impl ThumbnailGenerator {
    /// Create a new thumbnail generator with the given configuration.
    pub fn new(config: ThumbnailConfig) -> Self {
        let decoder =
            ImageDecoder::new(config.size).with_max_alloc_mb(config.max_decode_alloc_mb);
        Self { config, decoder }
    }

    /// Decode, sample, center-crop and JPEG-encode the image at `path`.
    ///
    /// Blocking; callers on an async runtime should run it on the blocking pool.
    pub fn generate(&self, path: &Path) -> PipelineResult<Thumbnail> {
        let start = std::time::Instant::now();

        let decoded = self.decoder.decode(path)?;
        let square = crop_center(decoded.image);
        let side = square.width();

        let bytes =
            encode_jpeg(&square, self.config.quality).map_err(|e| PipelineError::Encode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        tracing::debug!(
            "Thumbnail for {:?}: {}x{} -> {}px square, {} bytes in {:?}",
            path,
            decoded.source_width,
            decoded.source_height,
            side,
            bytes.len(),
            start.elapsed()
        );

        Ok(Thumbnail {
            bytes,
            side,
            source_width: decoded.source_width,
            source_height: decoded.source_height,
            sample_size: decoded.sample_size,
        })
    }
}
