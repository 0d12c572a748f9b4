//! Bounded-size image decoding.
//!
//! The header is read first to learn the dimensions, an integer sample size
//! is derived from them, and the full decode is then reduced by that factor
//! before any further processing.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader, Limits};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::config::DEFAULT_MAX_DECODE_ALLOC_MB;
use crate::error::{PipelineError, PipelineResult};

/// Dimensions and format read from an image header, without decoding pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageBounds {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Format detected from content, falling back to the extension
    pub format: ImageFormat,
}

/// Result of a sampled decode.
pub struct DecodedImage {
    /// Pixel data after sampling
    pub image: DynamicImage,
    /// Detected image format
    pub format: ImageFormat,
    /// Width after sampling
    pub width: u32,
    /// Height after sampling
    pub height: u32,
    /// Width of the source image
    pub source_width: u32,
    /// Height of the source image
    pub source_height: u32,
    /// Integer factor the source was reduced by
    pub sample_size: u32,
}

/// Image decoder that keeps the decoded size near a target edge length.
#[derive(Debug, Clone)]
pub struct ImageDecoder {
    target_size: u32,
    max_alloc_mb: u64,
}

impl ImageDecoder {
    /// Create a decoder that samples down toward `target_size` pixels.
    pub fn new(target_size: u32) -> Self {
        Self {
            target_size: target_size.max(1),
            max_alloc_mb: DEFAULT_MAX_DECODE_ALLOC_MB,
        }
    }

    /// Cap the memory a single full-resolution decode may allocate.
    pub fn with_max_alloc_mb(mut self, max_alloc_mb: u64) -> Self {
        self.max_alloc_mb = max_alloc_mb.max(1);
        self
    }

    /// Decoder limits; replaces the `image` crate's 512 MiB default so
    /// large sources can still be sampled down.
    fn limits(&self) -> Limits {
        let mut limits = Limits::default();
        limits.max_alloc = Some(self.max_alloc_mb.saturating_mul(1024 * 1024));
        limits
    }

    /// Read only the image header to get its dimensions.
    pub fn read_bounds(&self, path: &Path) -> PipelineResult<ImageBounds> {
        let reader = open_reader(path)?;
        let format = resolve_format(&reader, path)?;
        let (width, height) = reader.into_dimensions().map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read image dimensions: {}", e),
        })?;

        Ok(ImageBounds {
            width,
            height,
            format,
        })
    }

    /// Decode the image at `path`, reduced by the sample size its bounds call for.
    pub fn decode(&self, path: &Path) -> PipelineResult<DecodedImage> {
        let bounds = self.read_bounds(path)?;
        let sample_size = sample_size(bounds.width, bounds.height, self.target_size);

        let mut reader = open_reader(path)?;
        reader.limits(self.limits());
        let image = reader.decode().map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let (source_width, source_height) = image.dimensions();
        let image = downsample(image, sample_size);
        let (width, height) = image.dimensions();

        tracing::trace!(
            "Decoded {:?}: {}x{} sampled by {} to {}x{}",
            path,
            source_width,
            source_height,
            sample_size,
            width,
            height
        );

        Ok(DecodedImage {
            image,
            format: bounds.format,
            width,
            height,
            source_width,
            source_height,
            sample_size,
        })
    }
}

/// Integer sample size that brings the larger edge close to `target`.
///
/// Returns 1 when both edges already fit. Otherwise each edge's ratio to the
/// target is rounded half-up and the larger of the two wins.
pub fn sample_size(width: u32, height: u32, target: u32) -> u32 {
    let target = target.max(1);
    if width <= target && height <= target {
        return 1;
    }
    let height_ratio = rounded_ratio(height, target);
    let width_ratio = rounded_ratio(width, target);
    height_ratio.max(width_ratio).max(1)
}

fn rounded_ratio(dimension: u32, target: u32) -> u32 {
    let dimension = u64::from(dimension);
    let target = u64::from(target);
    ((2 * dimension + target) / (2 * target)) as u32
}

/// Shrink each edge by `sample_size`, keeping at least one pixel.
fn downsample(image: DynamicImage, sample_size: u32) -> DynamicImage {
    if sample_size <= 1 {
        return image;
    }
    let (width, height) = image.dimensions();
    let width = (width / sample_size).max(1);
    let height = (height / sample_size).max(1);
    image.resize_exact(width, height, FilterType::Triangle)
}

fn open_reader(path: &Path) -> PipelineResult<ImageReader<BufReader<File>>> {
    if !path.exists() {
        return Err(PipelineError::FileNotFound(path.to_path_buf()));
    }
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot open image: {}", e),
        })
}

fn resolve_format(
    reader: &ImageReader<BufReader<File>>,
    path: &Path,
) -> PipelineResult<ImageFormat> {
    match reader.format() {
        Some(format) => Ok(format),
        None => ImageFormat::from_path(path).map_err(|_| PipelineError::UnsupportedFormat {
            path: path.to_path_buf(),
            format: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        DynamicImage::new_rgb8(width, height).save(&path).unwrap();
        path
    }

    #[test]
    fn test_sample_size_small_images_are_not_sampled() {
        assert_eq!(sample_size(750, 750, 750), 1);
        assert_eq!(sample_size(100, 40, 750), 1);
        assert_eq!(sample_size(750, 10, 750), 1);
    }

    #[test]
    fn test_sample_size_rounds_larger_dimension() {
        assert_eq!(sample_size(1500, 1000, 750), 2);
        assert_eq!(sample_size(3000, 2000, 750), 4);
        // 800 / 750 rounds down to 1
        assert_eq!(sample_size(800, 600, 750), 1);
        // 1125 / 750 = 1.5 rounds half-up to 2
        assert_eq!(sample_size(1125, 200, 750), 2);
    }

    #[test]
    fn test_sample_size_uses_portrait_height() {
        assert_eq!(sample_size(100, 2000, 750), 3);
        assert_eq!(sample_size(2000, 100, 750), 3);
    }

    #[test]
    fn test_read_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "wide.png", 64, 32);

        let bounds = ImageDecoder::new(750).read_bounds(&path).unwrap();
        assert_eq!(bounds.width, 64);
        assert_eq!(bounds.height, 32);
        assert_eq!(bounds.format, ImageFormat::Png);
    }

    #[test]
    fn test_format_detected_by_content() {
        let dir = tempfile::tempdir().unwrap();
        let png = write_png(dir.path(), "real.png", 8, 8);
        let misnamed = dir.path().join("misnamed.jpg");
        std::fs::copy(&png, &misnamed).unwrap();

        let bounds = ImageDecoder::new(750).read_bounds(&misnamed).unwrap();
        assert_eq!(bounds.format, ImageFormat::Png);
    }

    #[test]
    fn test_decode_samples_large_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "large.png", 1600, 900);

        let decoded = ImageDecoder::new(750).decode(&path).unwrap();
        assert_eq!(decoded.sample_size, 2);
        assert_eq!((decoded.source_width, decoded.source_height), (1600, 900));
        assert_eq!((decoded.width, decoded.height), (800, 450));
    }

    #[test]
    fn test_decode_keeps_small_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "small.png", 120, 80);

        let decoded = ImageDecoder::new(750).decode(&path).unwrap();
        assert_eq!(decoded.sample_size, 1);
        assert_eq!((decoded.width, decoded.height), (120, 80));
    }

    #[test]
    fn test_decode_respects_alloc_cap() {
        let dir = tempfile::tempdir().unwrap();
        // 2000x2000 RGB decodes to ~11.4 MiB
        let path = write_png(dir.path(), "capped.png", 2000, 2000);

        let tight = ImageDecoder::new(750).with_max_alloc_mb(4);
        assert!(matches!(
            tight.decode(&path),
            Err(PipelineError::Decode { .. })
        ));

        let roomy = ImageDecoder::new(750).with_max_alloc_mb(64);
        let decoded = roomy.decode(&path).unwrap();
        assert_eq!(decoded.sample_size, 3);
    }

    #[test]
    fn test_missing_file() {
        let err = ImageDecoder::new(750)
            .read_bounds(Path::new("/nonexistent/photo.jpg"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::FileNotFound(_)));
    }

    #[test]
    fn test_corrupt_file_fails_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.jpg");
        std::fs::write(&path, b"\xFF\xD8\xFF\xE0 definitely not a jpeg").unwrap();

        assert!(ImageDecoder::new(750).decode(&path).is_err());
    }
}
