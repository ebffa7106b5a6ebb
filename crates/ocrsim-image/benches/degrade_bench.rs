// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for rendering and the per-pixel degradation passes.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use ocrsim_core::{ConditionKind, Degradation, RenderConfig};
use ocrsim_image::{Renderer, SimFont, degrade};

const SAMPLE: &str = "The quick brown fox jumps over the lazy dog. \
                      Pack my box with five dozen liquor jugs.";

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Render the sample paragraph with the built-in face at default settings.
fn bench_render(c: &mut Criterion) {
    let config = RenderConfig::default();
    let degradation = Degradation::default();
    let font = SimFont::builtin(config.font_size_px(1.0));
    let renderer = Renderer::with_font(font, &config, &degradation);

    c.bench_function("render (default config)", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| black_box(renderer.render(black_box(SAMPLE), &mut rng)));
    });
}

/// Distortion and speckle over the same rendered canvas.
fn bench_degrade(c: &mut Criterion) {
    let config = RenderConfig::default();
    let font = SimFont::builtin(config.font_size_px(1.0));
    let renderer = Renderer::with_font(font, &config, &Degradation::default());
    let canvas = renderer.render(SAMPLE, &mut StdRng::seed_from_u64(7));

    for kind in [
        ConditionKind::GeometricTonalDistortion,
        ConditionKind::SpeckleNoise,
    ] {
        let degradation = kind.default_degradation();
        c.bench_function(&format!("degrade ({kind})"), |b| {
            let mut rng = StdRng::seed_from_u64(11);
            b.iter(|| black_box(degrade(black_box(canvas.clone()), &degradation, &mut rng)));
        });
    }
}

criterion_group!(benches, bench_render, bench_degrade);
criterion_main!(benches);
