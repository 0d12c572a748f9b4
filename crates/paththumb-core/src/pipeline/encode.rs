//! JPEG compression.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageResult};

/// Compress `image` to JPEG at the given quality (1-100).
///
/// JPEG has no alpha channel, so anything other than 8-bit RGB or grayscale
/// is converted to RGB first and the alpha channel is dropped.
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> ImageResult<Vec<u8>> {
    let converted;
    let source = match image {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_) => image,
        other => {
            converted = DynamicImage::ImageRgb8(other.to_rgb8());
            &converted
        }
    };

    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    source.write_with_encoder(encoder)?;
    Ok(buffer)
}
