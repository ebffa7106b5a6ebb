// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Renderer — draws wrapped text onto a fresh canvas.
//
// Canvas size is either fixed by configuration (text centred, possibly
// overflowing) or derived from the measured text block plus margins. Under
// geometric distortion the derived size is inflated and every line receives a
// horizontal offset proportional to its distance from the top, as a rotated
// page would.

use std::path::Path;

use image::{Rgb, RgbImage};
use ocrsim_core::{Degradation, RenderConfig};
use rand::Rng;
use tracing::{debug, instrument};

use crate::font::SimFont;
use crate::layout::{self, TextBlock};

/// Extra room reserved for skewed lines.
const SKEW_INFLATION: f64 = 1.2;

/// Turns text into an undegraded canvas.
///
/// Owns its font handle; build one renderer per worker thread.
#[derive(Debug)]
pub struct Renderer {
    font: SimFont,
    font_size_px: u32,
    margin_px: u32,
    max_width_px: u32,
    fixed_width: Option<u32>,
    fixed_height: Option<u32>,
    background: Rgb<u8>,
    text_color: Rgb<u8>,
    skew_range: Option<(f64, f64)>,
}

impl Renderer {
    // -- Construction ---------------------------------------------------------

    /// Build a renderer, loading `font_path` (or the built-in face if it fails).
    ///
    /// The font pixel size includes the degradation's size multiplier.
    pub fn new(config: &RenderConfig, font_path: Option<&Path>, degradation: &Degradation) -> Self {
        let font_size_px = config.font_size_px(degradation.font_size_multiplier());
        let font = SimFont::load_or_builtin(font_path, font_size_px);
        Self::with_font(font, config, degradation)
    }

    /// Build a renderer around an already-loaded font.
    pub fn with_font(font: SimFont, config: &RenderConfig, degradation: &Degradation) -> Self {
        Self {
            font,
            font_size_px: config.font_size_px(degradation.font_size_multiplier()),
            margin_px: config.margin_px(),
            max_width_px: config.max_width_px(),
            fixed_width: config.image_width,
            fixed_height: config.image_height,
            background: Rgb(config.background.0),
            text_color: Rgb(config.text_color.0),
            skew_range: degradation.skew_range(),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn font(&self) -> &SimFont {
        &self.font
    }

    pub fn font_size_px(&self) -> u32 {
        self.font_size_px
    }

    // -- Rendering ------------------------------------------------------------

    /// Wrap `text` to the configured line width.
    pub fn wrap(&self, text: &str) -> Vec<String> {
        layout::wrap(text, self.max_width_px, self.font_size_px)
    }

    /// Wrap and draw `text`.
    #[instrument(skip_all, fields(text_len = text.len()))]
    pub fn render<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> RgbImage {
        let lines = self.wrap(text);
        self.render_lines(&lines, rng)
    }

    /// Draw pre-wrapped `lines`, top to bottom.
    pub fn render_lines<R: Rng + ?Sized>(&self, lines: &[String], rng: &mut R) -> RgbImage {
        let block = TextBlock::measure(lines, &self.font);
        let (width, height) = self.canvas_size(block.width, block.height);
        debug!(
            lines = lines.len(),
            text_width = block.width,
            text_height = block.height,
            width,
            height,
            "Rendering text block"
        );

        let mut canvas = RgbImage::from_pixel(width, height, self.background);

        let (x_offset, y_offset) = if self.fixed_width.is_some() || self.fixed_height.is_some() {
            (
                centred_offset(width, block.width),
                centred_offset(height, block.height),
            )
        } else {
            (self.margin_px as i64, self.margin_px as i64)
        };

        let mut y = y_offset;
        for (line, line_box) in lines.iter().zip(&block.lines) {
            let mut x = x_offset;
            if let Some((min, max)) = self.skew_range {
                let skew = rng.gen_range(min..=max);
                x += (skew * y as f64).round() as i64;
            }
            self.font
                .draw_line(&mut canvas, clamp_i32(x), clamp_i32(y), line, self.text_color);
            y += i64::from(line_box.height());
        }

        canvas
    }

    /// Canvas dimensions for a text block of the given size.
    pub fn canvas_size(&self, text_width: u32, text_height: u32) -> (u32, u32) {
        let width = self
            .fixed_width
            .unwrap_or_else(|| self.derived_dimension(text_width));
        let height = self
            .fixed_height
            .unwrap_or_else(|| self.derived_dimension(text_height));
        (width, height)
    }

    fn derived_dimension(&self, text: u32) -> u32 {
        let mut size = u64::from(text) + 2 * u64::from(self.margin_px);
        if self.skew_range.is_some() {
            size = (size as f64 * SKEW_INFLATION) as u64;
        }
        size.clamp(1, u64::from(u32::MAX)) as u32
    }
}

/// Floor-divided offset that centres `inner` inside `outer`; negative when
/// the text is larger than the canvas.
fn centred_offset(outer: u32, inner: u32) -> i64 {
    (i64::from(outer) - i64::from(inner)).div_euclid(2)
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
