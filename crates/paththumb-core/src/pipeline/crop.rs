//! Center cropping to a square.

use image::{DynamicImage, GenericImageView};

/// Crop `image` to a square whose side is the shorter edge, centred on the
/// middle of the image. Square inputs are returned untouched.
pub fn crop_center(image: DynamicImage) -> DynamicImage {
    let (width, height) = image.dimensions();
    if width == height {
        return image;
    }
    let side = width.min(height);
    let x = (width - side) / 2;
    let y = (height - side) / 2;
    image.crop_imm(x, y, side, side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_square_is_unchanged() {
        let img = DynamicImage::new_rgb8(40, 40);
        let cropped = crop_center(img);
        assert_eq!(cropped.dimensions(), (40, 40));
    }

    #[test]
    fn test_landscape_crops_to_height() {
        let cropped = crop_center(DynamicImage::new_rgb8(300, 200));
        assert_eq!(cropped.dimensions(), (200, 200));
    }

    #[test]
    fn test_portrait_crops_to_width() {
        let cropped = crop_center(DynamicImage::new_rgb8(90, 160));
        assert_eq!(cropped.dimensions(), (90, 90));
    }

    #[test]
    fn test_crop_is_anchored_at_center() {
        // 6x2 image: only columns 2 and 3 are white
        let mut img = RgbImage::new(6, 2);
        for y in 0..2 {
            img.put_pixel(2, y, Rgb([255, 255, 255]));
            img.put_pixel(3, y, Rgb([255, 255, 255]));
        }

        let cropped = crop_center(DynamicImage::ImageRgb8(img)).to_rgb8();
        assert_eq!(cropped.dimensions(), (2, 2));
        assert!(cropped.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn test_odd_difference_rounds_offset_down() {
        // 5x2: offset is (5 - 2) / 2 = 1, so column 1 lands at x = 0
        let mut img = RgbImage::new(5, 2);
        img.put_pixel(1, 0, Rgb([255, 0, 0]));

        let cropped = crop_center(DynamicImage::ImageRgb8(img)).to_rgb8();
        assert_eq!(*cropped.get_pixel(0, 0), Rgb([255, 0, 0]));
    }
}
