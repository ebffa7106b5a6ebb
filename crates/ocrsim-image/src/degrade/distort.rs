// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometric/tonal distortion — ink dropout gaps and per-pixel tonal noise.
//
// Pixels are classified against the untouched source canvas and all writes go
// to a separate output buffer. Traversal is column-major, so a gap erased
// above a text pixel only ever overwrites pixels of the same column that have
// already been visited.

use image::{Rgb, RgbImage};
use ocrsim_core::DistortionParams;
use rand::Rng;

/// Channel value below which a pixel counts as ink (all three channels).
pub const TEXT_THRESHOLD: u8 = 100;

const ERASED: Rgb<u8> = Rgb([255, 255, 255]);

/// Whether `pixel` is classified as text.
pub fn is_text_pixel(pixel: &Rgb<u8>) -> bool {
    pixel.0.iter().all(|&channel| channel < TEXT_THRESHOLD)
}

/// Distort `source` and return the degraded copy.
pub fn distort<R: Rng + ?Sized>(
    source: &RgbImage,
    params: &DistortionParams,
    rng: &mut R,
) -> RgbImage {
    let (width, height) = source.dimensions();
    let mut output = source.clone();

    for x in 0..width {
        for y in 0..height {
            let original = source.get_pixel(x, y);

            if is_text_pixel(original) {
                if rng.gen_bool(params.incomplete_prob) {
                    let (min, max) = params.gap_range;
                    let gap = rng.gen_range(min..=max);
                    for erase_y in y.saturating_sub(gap)..y {
                        output.put_pixel(x, erase_y, ERASED);
                    }
                }
                let (min, max) = params.text_noise_range;
                let noise = rng.gen_range(min..=max);
                output.put_pixel(x, y, shift(original, noise));
            } else if rng.gen_bool(params.bg_noise_prob) {
                let (min, max) = params.bg_noise_range;
                let noise = rng.gen_range(min..=max);
                output.put_pixel(x, y, shift(original, noise));
            }
        }
    }

    output
}

/// Add `noise` to every channel, clamping to the valid range.
fn shift(pixel: &Rgb<u8>, noise: i32) -> Rgb<u8> {
    Rgb(pixel
        .0
        .map(|channel| (i32::from(channel) + noise).clamp(0, 255) as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn quiet_params() -> DistortionParams {
        DistortionParams {
            incomplete_prob: 0.0,
            text_noise_range: (0, 0),
            bg_noise_prob: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn classification_uses_all_channels() {
        assert!(is_text_pixel(&Rgb([99, 99, 99])));
        assert!(!is_text_pixel(&Rgb([99, 100, 0])));
        assert!(!is_text_pixel(&Rgb([255, 255, 255])));
    }

    #[test]
    fn zero_noise_and_probabilities_is_identity() {
        let canvas = RgbImage::from_fn(16, 16, |x, _| {
            if x % 3 == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        });
        let out = distort(&canvas, &quiet_params(), &mut StdRng::seed_from_u64(1));
        assert_eq!(out, canvas);
    }

    #[test]
    fn extreme_noise_stays_clamped() {
        let canvas = RgbImage::from_fn(40, 40, |x, y| {
            let v = ((x * 7 + y * 13) % 256) as u8;
            Rgb([v, v / 2, 255 - v])
        });
        let params = DistortionParams {
            incomplete_prob: 0.5,
            gap_range: (0, 50),
            text_noise_range: (-1000, 1000),
            bg_noise_prob: 1.0,
            bg_noise_range: (-1000, 1000),
            ..Default::default()
        };
        let out = distort(&canvas, &params, &mut StdRng::seed_from_u64(8));
        assert_eq!(out.dimensions(), canvas.dimensions());
        // Values are u8 by construction; check clamping actually saturates.
        assert!(out.pixels().any(|p| p.0.contains(&0)));
        assert!(out.pixels().any(|p| p.0.contains(&255)));
    }

    #[test]
    fn shift_clamps_both_ends() {
        assert_eq!(shift(&Rgb([10, 128, 250]), 20), Rgb([30, 148, 255]));
        assert_eq!(shift(&Rgb([10, 128, 250]), -20), Rgb([0, 108, 230]));
    }

    #[test]
    fn certain_dropout_erases_pixels_above_ink() {
        // A single ink pixel at the bottom of a column of mid-grey background.
        let mut canvas = RgbImage::from_pixel(1, 6, Rgb([180, 180, 180]));
        canvas.put_pixel(0, 5, Rgb([0, 0, 0]));
        let params = DistortionParams {
            incomplete_prob: 1.0,
            gap_range: (3, 3),
            ..quiet_params()
        };
        let out = distort(&canvas, &params, &mut StdRng::seed_from_u64(4));

        assert_eq!(*out.get_pixel(0, 0), Rgb([180, 180, 180]));
        assert_eq!(*out.get_pixel(0, 1), Rgb([180, 180, 180]));
        for y in 2..5 {
            assert_eq!(*out.get_pixel(0, y), ERASED);
        }
        assert_eq!(*out.get_pixel(0, 5), Rgb([0, 0, 0]));
    }

    #[test]
    fn gap_at_top_row_is_clipped() {
        let mut canvas = RgbImage::from_pixel(1, 3, Rgb([255, 255, 255]));
        canvas.put_pixel(0, 0, Rgb([0, 0, 0]));
        let params = DistortionParams {
            incomplete_prob: 1.0,
            gap_range: (5, 5),
            ..quiet_params()
        };
        let out = distort(&canvas, &params, &mut StdRng::seed_from_u64(4));
        assert_eq!(*out.get_pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn erased_pixels_do_not_change_classification_below() {
        // Two stacked ink pixels: erasing above the lower one must not stop
        // the upper one from being treated as ink (it was already visited)
        // and the lower one still reads its original value.
        let mut canvas = RgbImage::from_pixel(1, 4, Rgb([255, 255, 255]));
        canvas.put_pixel(0, 2, Rgb([0, 0, 0]));
        canvas.put_pixel(0, 3, Rgb([0, 0, 0]));
        let params = DistortionParams {
            incomplete_prob: 1.0,
            gap_range: (1, 1),
            text_noise_range: (10, 10),
            ..quiet_params()
        };
        let out = distort(&canvas, &params, &mut StdRng::seed_from_u64(2));
        // Row 2 was noised, then erased by the gap above row 3.
        assert_eq!(*out.get_pixel(0, 2), ERASED);
        // Row 3 keeps its noised ink value.
        assert_eq!(*out.get_pixel(0, 3), Rgb([10, 10, 10]));
        // Row 1 erased by the gap above row 2.
        assert_eq!(*out.get_pixel(0, 1), ERASED);
    }
}
