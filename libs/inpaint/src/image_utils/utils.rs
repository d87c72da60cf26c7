use anyhow::{Context, Result};
use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::map::map_colors;
use std::io::Cursor;

/// Mask pixels strictly above this value are treated as "to be filled".
pub const MASK_THRESHOLD: u8 = 127;

pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage> {
    let image = image::load_from_memory(bytes).context("Failed to decode image")?;
    Ok(image.to_rgb8())
}

/// Grayscale with ITU-R 601 luma weights (299/587/114), rounded the way
/// PIL's `L` mode is, so coloured masks split at the threshold identically.
pub fn decode_luma(bytes: &[u8]) -> Result<GrayImage> {
    let image = image::load_from_memory(bytes).context("Failed to decode mask")?;
    match image {
        DynamicImage::ImageLuma8(gray) => Ok(gray),
        other => Ok(map_colors(&other.to_rgb8(), rec601_luma)),
    }
}

fn rec601_luma(Rgb([r, g, b]): Rgb<u8>) -> Luma<u8> {
    let weighted = 19595 * r as u32 + 38470 * g as u32 + 7471 * b as u32 + 0x8000;
    Luma([(weighted >> 16) as u8])
}

/// Every pixel becomes 0 or 255.
pub fn binarize_mask(mask: &GrayImage) -> GrayImage {
    threshold(mask, MASK_THRESHOLD, ThresholdType::Binary)
}

pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .context("Failed to encode PNG")?;
    Ok(buffer)
}

pub fn images_differ_rgb(img1: &RgbImage, img2: &RgbImage, tolerance: f32) -> bool {
    if img1.dimensions() != img2.dimensions() {
        return true;
    }

    let diff_percentage = calculate_image_difference_rgb(img1, img2);
    diff_percentage > tolerance
}

/// Fraction of pixels where any channel differs by more than 10.
pub fn calculate_image_difference_rgb(rgb1: &RgbImage, rgb2: &RgbImage) -> f32 {
    if rgb1.dimensions() != rgb2.dimensions() {
        return 1.0;
    }

    let total_pixels = (rgb1.width() as u64) * (rgb1.height() as u64);
    if total_pixels == 0 {
        return 0.0;
    }
    let mut different_pixels = 0u64;

    for (p1, p2) in rgb1.pixels().zip(rgb2.pixels()) {
        if (p1[0].abs_diff(p2[0]) > 10) ||
           (p1[1].abs_diff(p2[1]) > 10) ||
           (p1[2].abs_diff(p2[2]) > 10) {
            different_pixels += 1;
        }
    }

    different_pixels as f32 / total_pixels as f32
}
