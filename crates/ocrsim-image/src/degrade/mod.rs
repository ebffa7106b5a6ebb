// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Degradation pipeline — condition-specific pixel transforms applied to a
// rendered canvas.
//
// Every stochastic step draws from the caller's RNG, so a seeded generator
// reproduces the same output bit for bit.

pub mod distort;
pub mod speckle;

use image::RgbImage;
use ocrsim_core::Degradation;
use rand::Rng;
use tracing::{debug, instrument};

pub use distort::distort;
pub use speckle::{apply_speckle, speckle_dot_count};

/// Apply `degradation` to `canvas` and return the result.
///
/// `None` and typeface substitution leave pixels untouched (the latter acts at
/// render time). Parameters are assumed validated; no branch fails.
#[instrument(skip_all, fields(
    condition = %degradation.kind(),
    width = canvas.width(),
    height = canvas.height(),
))]
pub fn degrade<R: Rng + ?Sized>(
    canvas: RgbImage,
    degradation: &Degradation,
    rng: &mut R,
) -> RgbImage {
    match degradation {
        Degradation::None | Degradation::TypefaceSubstitution(_) => canvas,
        Degradation::GeometricTonalDistortion(params) => distort(&canvas, params, rng),
        Degradation::SpeckleNoise(params) => {
            let mut canvas = canvas;
            let dots = apply_speckle(&mut canvas, params.dot_density, rng);
            debug!(dots, "Speckle noise applied");
            canvas
        }
    }
}
