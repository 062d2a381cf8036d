// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan enhancement: optional Otsu binarization followed by sharpening,
// preparing a rectified page for OCR and export. `ScanPipeline::enhance`
// chains the two.

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Pixel};
use tracing::{debug, info, instrument};

/// The 3x3 sharpening kernel, row-major.
pub const SHARPEN_KERNEL: [[i32; 3]; 3] = [[0, -1, 0], [-1, 5, -1], [0, -1, 0]];

// -- Binarization -------------------------------------------------------------

/// Global Otsu binarization.
///
/// Pixels strictly above the computed cutoff become 255, the rest 0. The
/// result is always `Luma8`.
#[instrument(skip_all, fields(width = raster.width(), height = raster.height()))]
pub fn binarize(raster: &DynamicImage) -> DynamicImage {
    let gray = raster.to_luma8();
    let threshold = otsu_threshold(&gray);
    debug!(threshold, "Otsu threshold computed");

    let mut output = GrayImage::new(gray.width(), gray.height());
    for (src, dst) in gray.pixels().zip(output.pixels_mut()) {
        *dst = Luma([if src.0[0] > threshold { 255 } else { 0 }]);
    }

    info!(threshold, "Binarization complete");
    DynamicImage::ImageLuma8(output)
}

/// Cutoff maximizing the between-class variance of the intensity histogram.
///
/// The background class holds values `<= cutoff`. A uniform image yields 0.
pub fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total_pixels = gray.width() as u64 * gray.height() as u64;
    if total_pixels == 0 {
        return 0;
    }

    let sum_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut sum_background = 0.0f64;
    let mut weight_background = 0u64;
    let mut max_variance = 0.0f64;
    let mut best_threshold = 0u8;

    for (t, &count) in histogram.iter().enumerate() {
        weight_background += count;
        if weight_background == 0 {
            continue;
        }
        let weight_foreground = total_pixels - weight_background;
        if weight_foreground == 0 {
            break;
        }

        sum_background += t as f64 * count as f64;
        let mean_background = sum_background / weight_background as f64;
        let mean_foreground = (sum_total - sum_background) / weight_foreground as f64;

        let between_variance = weight_background as f64
            * weight_foreground as f64
            * (mean_background - mean_foreground).powi(2);

        if between_variance > max_variance {
            max_variance = between_variance;
            best_threshold = t as u8;
        }
    }

    best_threshold
}

// -- Sharpening ---------------------------------------------------------------

/// Apply [`SHARPEN_KERNEL`] to every channel.
///
/// Borders are extended by reflection without repeating the edge pixel
/// (`dcb|abcd|cba`). Output keeps the input's size and colour type; inputs
/// other than `Luma8` and `Rgb8` are converted to `Rgb8` first.
#[instrument(skip_all, fields(width = raster.width(), height = raster.height()))]
pub fn sharpen(raster: &DynamicImage) -> DynamicImage {
    let sharpened = match raster {
        DynamicImage::ImageLuma8(gray) => DynamicImage::ImageLuma8(sharpen_buffer(gray)),
        DynamicImage::ImageRgb8(rgb) => DynamicImage::ImageRgb8(sharpen_buffer(rgb)),
        other => DynamicImage::ImageRgb8(sharpen_buffer(&other.to_rgb8())),
    };
    debug!("Sharpening complete");
    sharpened
}

fn sharpen_buffer<P>(src: &ImageBuffer<P, Vec<u8>>) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = src.dimensions();
    let channels = P::CHANNEL_COUNT as usize;
    let mut out: ImageBuffer<P, Vec<u8>> = ImageBuffer::new(width, height);
    if width == 0 || height == 0 {
        return out;
    }

    let input: &[u8] = src;
    let output: &mut [u8] = &mut out;
    let offset = |x: u32, y: u32| (y as usize * width as usize + x as usize) * channels;

    for y in 0..height {
        let ys = [reflect_101(y as i64 - 1, height), y, reflect_101(y as i64 + 1, height)];
        for x in 0..width {
            let xs = [reflect_101(x as i64 - 1, width), x, reflect_101(x as i64 + 1, width)];
            let dst = offset(x, y);
            for c in 0..channels {
                let mut acc = 0i32;
                for (ky, &sy) in ys.iter().enumerate() {
                    for (kx, &sx) in xs.iter().enumerate() {
                        let weight = SHARPEN_KERNEL[ky][kx];
                        if weight != 0 {
                            acc += weight * input[offset(sx, sy) + c] as i32;
                        }
                    }
                }
                output[dst + c] = acc.clamp(0, 255) as u8;
            }
        }
    }
    out
}

/// Map an out-of-range index back inside `0..len` by mirroring about the edge pixel.
fn reflect_101(i: i64, len: u32) -> u32 {
    let len = len as i64;
    if len == 1 {
        return 0;
    }
    let reflected = if i < 0 {
        -i
    } else if i >= len {
        2 * len - 2 - i
    } else {
        i
    };
    reflected as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn two_tone(w: u32, h: u32, dark: u8, light: u8) -> GrayImage {
        GrayImage::from_fn(w, h, |x, _| Luma([if x < w / 2 { dark } else { light }]))
    }

    #[test]
    fn otsu_splits_two_tones() {
        let gray = two_tone(40, 10, 30, 200);
        let t = otsu_threshold(&gray);
        assert!((30..200).contains(&t), "threshold {t}");
    }

    #[test]
    fn binarized_output_is_pure_black_and_white() {
        let gray = GrayImage::from_fn(64, 64, |x, y| Luma([((x * 3 + y * 2) % 256) as u8]));
        let out = binarize(&DynamicImage::ImageLuma8(gray));
        let luma = out.as_luma8().expect("luma output");
        assert!(luma.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        assert!(luma.pixels().any(|p| p.0[0] == 0));
        assert!(luma.pixels().any(|p| p.0[0] == 255));
    }

    #[test]
    fn binarize_converts_colour_to_gray() {
        let rgb = RgbImage::from_fn(10, 10, |x, _| if x < 5 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) });
        let out = binarize(&DynamicImage::ImageRgb8(rgb)).to_luma8();
        assert_eq!(out.get_pixel(0, 0).0, [0]);
        assert_eq!(out.get_pixel(9, 0).0, [255]);
    }

    #[test]
    fn sharpen_leaves_uniform_image_alone() {
        let rgb = RgbImage::from_pixel(17, 9, Rgb([12, 130, 250]));
        let out = sharpen(&DynamicImage::ImageRgb8(rgb.clone()));
        assert_eq!(out.as_rgb8(), Some(&rgb));
    }

    #[test]
    fn sharpen_preserves_dimensions_and_type() {
        let gray = DynamicImage::ImageLuma8(two_tone(33, 21, 50, 180));
        let out = sharpen(&gray);
        assert_eq!((out.width(), out.height()), (33, 21));
        assert!(out.as_luma8().is_some());
    }

    #[test]
    fn sharpen_boosts_edge_contrast() {
        let gray = two_tone(10, 3, 100, 150);
        let out = sharpen(&DynamicImage::ImageLuma8(gray)).to_luma8();
        // Dark side of the step darkens, light side brightens.
        assert_eq!(out.get_pixel(4, 1).0, [50]);
        assert_eq!(out.get_pixel(5, 1).0, [200]);
        assert_eq!(out.get_pixel(0, 1).0, [100]);
    }

    #[test]
    fn sharpen_clamps_to_byte_range() {
        let mut gray = GrayImage::from_pixel(5, 5, Luma([0]));
        gray.put_pixel(2, 2, Luma([255]));
        let out = sharpen(&DynamicImage::ImageLuma8(gray)).to_luma8();
        assert_eq!(out.get_pixel(2, 2).0, [255]);
        assert_eq!(out.get_pixel(2, 1).0, [0]);
    }

    #[test]
    fn reflect_101_mirrors_without_repeating_edge() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(2, 5), 2);
        assert_eq!(reflect_101(-1, 1), 0);
    }

    #[test]
    fn single_pixel_image_is_sharpened_in_place() {
        let gray = GrayImage::from_pixel(1, 1, Luma([77]));
        let out = sharpen(&DynamicImage::ImageLuma8(gray)).to_luma8();
        assert_eq!(out.get_pixel(0, 0).0, [77]);
    }
}
