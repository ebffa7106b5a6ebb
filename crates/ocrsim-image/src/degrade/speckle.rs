// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Speckle noise — independent black dots scattered uniformly over the canvas.

use image::{Rgb, RgbImage};
use rand::Rng;

const DOT: Rgb<u8> = Rgb([0, 0, 0]);

/// Number of dots drawn for a canvas of the given size.
pub fn speckle_dot_count(width: u32, height: u32, dot_density: f64) -> u64 {
    let area = u64::from(width) * u64::from(height);
    (area as f64 * dot_density).round().max(0.0) as u64
}

/// Scatter black dots over `canvas` and return how many were drawn.
///
/// Coordinates are drawn with replacement, so repeated positions simply
/// reassert black. A dot count covering the whole area blackens every pixel.
pub fn apply_speckle<R: Rng + ?Sized>(canvas: &mut RgbImage, dot_density: f64, rng: &mut R) -> u64 {
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return 0;
    }

    let dots = speckle_dot_count(width, height, dot_density);
    if dots >= u64::from(width) * u64::from(height) {
        canvas.pixels_mut().for_each(|pixel| *pixel = DOT);
        return dots;
    }

    for _ in 0..dots {
        let x = rng.gen_range(0..width);
        let y = rng.gen_range(0..height);
        canvas.put_pixel(x, y, DOT);
    }
    dots
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn white(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))
    }

    fn black_pixels(canvas: &RgbImage) -> usize {
        canvas.pixels().filter(|p| **p == DOT).count()
    }

    #[test]
    fn dot_count_is_rounded_area_fraction() {
        assert_eq!(speckle_dot_count(100, 100, 0.01), 100);
        assert_eq!(speckle_dot_count(100, 100, 0.0), 0);
        assert_eq!(speckle_dot_count(100, 10, 0.015), 15);
        assert_eq!(speckle_dot_count(3, 3, 0.3), 3);
    }

    #[test]
    fn hundred_draws_blacken_at_most_hundred_pixels() {
        let mut canvas = white(100, 100);
        let dots = apply_speckle(&mut canvas, 0.01, &mut StdRng::seed_from_u64(21));
        assert_eq!(dots, 100);
        let black = black_pixels(&canvas);
        assert!(black > 0 && black <= 100, "got {black} black pixels");
    }

    #[test]
    fn zero_density_changes_nothing() {
        let mut canvas = white(50, 40);
        let dots = apply_speckle(&mut canvas, 0.0, &mut StdRng::seed_from_u64(21));
        assert_eq!(dots, 0);
        assert_eq!(canvas, white(50, 40));
    }

    #[test]
    fn full_density_blackens_everything() {
        let mut canvas = white(37, 23);
        apply_speckle(&mut canvas, 1.0, &mut StdRng::seed_from_u64(21));
        assert_eq!(black_pixels(&canvas), 37 * 23);
    }

    #[test]
    fn existing_ink_is_kept() {
        let mut canvas = white(10, 10);
        canvas.put_pixel(3, 3, Rgb([0, 0, 0]));
        apply_speckle(&mut canvas, 0.05, &mut StdRng::seed_from_u64(2));
        assert_eq!(*canvas.get_pixel(3, 3), DOT);
        assert!(canvas.pixels().all(|p| p.0 == [0, 0, 0] || p.0 == [255, 255, 255]));
    }
}
