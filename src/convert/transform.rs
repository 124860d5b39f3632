/// Geometry and exposure transforms
///
/// The crop runs before the exposure lift so the adjustment only pays for
/// the pixels that survive.

use image::DynamicImage;

/// Crop to the largest `aspect_ratio` (width / height) rectangle that fits
/// inside the image, centered on the relative focus point and clamped to
/// the image bounds.
pub fn crop_portrait(
    img: &DynamicImage,
    aspect_ratio: f32,
    focus_x: f32,
    focus_y: f32,
) -> DynamicImage {
    let width = img.width();
    let height = img.height();

    let (crop_w, crop_h) = if width as f32 > height as f32 * aspect_ratio {
        // Wide image: full height, trim the sides
        ((height as f32 * aspect_ratio).round() as u32, height)
    } else {
        // Tall image: full width, trim top and bottom
        (width, (width as f32 / aspect_ratio).round() as u32)
    };
    let crop_w = crop_w.clamp(1, width);
    let crop_h = crop_h.clamp(1, height);

    let center_x = (width as f32 * focus_x).round() as i64;
    let center_y = (height as f32 * focus_y).round() as i64;
    let x = (center_x - crop_w as i64 / 2).clamp(0, (width - crop_w) as i64) as u32;
    let y = (center_y - crop_h as i64 / 2).clamp(0, (height - crop_h) as i64) as u32;

    img.crop_imm(x, y, crop_w, crop_h)
}

/// Brighten the image for better detail in the face.
/// Brightness and contrast are percentages; gamma above 1.0 lifts midtones.
pub fn adjust(img: DynamicImage, brightness: f32, contrast: f32, gamma: f32) -> DynamicImage {
    let mut adjusted = img;

    if brightness != 0.0 {
        adjusted = adjusted.brighten((255.0 * brightness / 100.0).round() as i32);
    }
    if contrast != 0.0 {
        adjusted = adjusted.adjust_contrast(contrast);
    }
    if gamma != 1.0 {
        adjusted = apply_gamma(adjusted, gamma);
    }

    adjusted
}

/// Standard gamma correction on the RGB channels, alpha untouched
fn apply_gamma(img: DynamicImage, gamma: f32) -> DynamicImage {
    let inverse = 1.0 / gamma.max(f32::EPSILON);
    let lut: [u8; 256] =
        std::array::from_fn(|i| ((i as f32 / 255.0).powf(inverse) * 255.0).round() as u8);

    let mut rgba = img.into_rgba8();
    for pixel in rgba.pixels_mut() {
        pixel[0] = lut[pixel[0] as usize];
        pixel[1] = lut[pixel[1] as usize];
        pixel[2] = lut[pixel[2] as usize];
    }

    DynamicImage::ImageRgba8(rgba)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};

    fn gray(width: u32, height: u32, level: u8) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([level, level, level, 255]),
        ))
    }

    #[test]
    fn test_crop_square_image_to_portrait() {
        let cropped = crop_portrait(&gray(400, 400, 128), 0.75, 0.5, 0.4);
        assert_eq!((cropped.width(), cropped.height()), (300, 400));
    }

    #[test]
    fn test_crop_wide_image_keeps_full_height() {
        let cropped = crop_portrait(&gray(800, 400, 128), 0.75, 0.5, 0.4);
        assert_eq!((cropped.width(), cropped.height()), (300, 400));
    }

    #[test]
    fn test_crop_tall_image_keeps_full_width() {
        let cropped = crop_portrait(&gray(300, 1000, 128), 0.75, 0.5, 0.4);
        assert_eq!((cropped.width(), cropped.height()), (300, 400));
    }

    #[test]
    fn test_crop_already_portrait_image_is_unchanged() {
        let cropped = crop_portrait(&gray(300, 400, 128), 0.75, 0.5, 0.4);
        assert_eq!((cropped.width(), cropped.height()), (300, 400));
    }

    #[test]
    fn test_crop_focus_is_clamped_to_bounds() {
        // Focus in the top-left corner: the window cannot leave the image
        let img = gray(800, 400, 128);
        let cropped = crop_portrait(&img, 0.75, 0.0, 0.0);
        assert_eq!((cropped.width(), cropped.height()), (300, 400));

        // Focus in the bottom-right corner
        let cropped = crop_portrait(&img, 0.75, 1.0, 1.0);
        assert_eq!((cropped.width(), cropped.height()), (300, 400));
    }

    #[test]
    fn test_crop_window_follows_the_focus_point() {
        // 4x2 checker-ish strip: only the rightmost column is white
        let mut img = RgbaImage::from_pixel(4, 2, Rgba([0, 0, 0, 255]));
        img.put_pixel(3, 0, Rgba([255, 255, 255, 255]));
        img.put_pixel(3, 1, Rgba([255, 255, 255, 255]));
        let img = DynamicImage::ImageRgba8(img);

        // aspect 1.0 on a 4x2 strip crops a 2x2 window
        let left = crop_portrait(&img, 1.0, 0.0, 0.5);
        assert_eq!(left.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(left.get_pixel(1, 0), Rgba([0, 0, 0, 255]));

        let right = crop_portrait(&img, 1.0, 1.0, 0.5);
        assert_eq!(right.get_pixel(1, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_adjust_identity_leaves_pixels_unchanged() {
        let img = gray(4, 4, 100);
        let adjusted = adjust(img, 0.0, 0.0, 1.0);
        assert_eq!(adjusted.get_pixel(0, 0), Rgba([100, 100, 100, 255]));
    }

    #[test]
    fn test_gamma_lifts_midtones() {
        let adjusted = adjust(gray(2, 2, 64), 0.0, 0.0, 2.0);
        // (64/255)^(1/2) * 255 rounds to 128
        assert_eq!(adjusted.get_pixel(0, 0), Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn test_gamma_leaves_alpha_and_extremes_alone() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 200]));
        img.put_pixel(1, 0, Rgba([255, 255, 255, 200]));

        let adjusted = adjust(DynamicImage::ImageRgba8(img), 0.0, 0.0, 1.4);
        assert_eq!(adjusted.get_pixel(0, 0), Rgba([0, 0, 0, 200]));
        assert_eq!(adjusted.get_pixel(1, 0), Rgba([255, 255, 255, 200]));
    }

    #[test]
    fn test_brightness_is_a_percentage() {
        // +10% of full scale adds 26 levels
        let adjusted = adjust(gray(2, 2, 100), 10.0, 0.0, 1.0);
        assert_eq!(adjusted.get_pixel(0, 0), Rgba([126, 126, 126, 255]));
    }
}
