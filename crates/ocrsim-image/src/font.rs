// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font handles — outline fonts rasterised with `ab_glyph`, plus a built-in
// 8x8 bitmap face used whenever a font file cannot be loaded.
//
// A `SimFont` is owned by a single renderer. Parallel workers load their own.

use std::path::Path;

use ab_glyph::{Font, FontVec, GlyphId, OutlinedGlyph, PxScale, ScaleFont, point};
use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::pixelops::interpolate;
use imageproc::rect::Rect;
use ocrsim_core::error::{Result, SimError};
use tracing::{debug, warn};

/// Rows and columns of a built-in glyph cell.
const BITMAP_CELL: u32 = 8;

/// Ink extent of one rendered line, relative to the point it is drawn at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineBox {
    /// Right edge of the rightmost glyph.
    pub right: i32,
    /// Top of the tallest glyph.
    pub top: i32,
    /// Bottom of the lowest glyph.
    pub bottom: i32,
}

impl LineBox {
    pub fn width(&self) -> u32 {
        self.right.max(0) as u32
    }

    /// Vertical ink extent (ascent + descent of the glyphs actually present).
    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }
}

/// A font loaded at a fixed pixel size.
pub enum SimFont {
    /// A TrueType/OpenType outline font.
    Outline { font: FontVec, scale: PxScale },
    /// The built-in bitmap face; `dot` is the edge length of one bitmap pixel.
    Builtin { dot: u32 },
}

impl std::fmt::Debug for SimFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outline { scale, .. } => f
                .debug_struct("Outline")
                .field("scale", &scale.y)
                .finish_non_exhaustive(),
            Self::Builtin { dot } => f.debug_struct("Builtin").field("dot", dot).finish(),
        }
    }
}

impl SimFont {
    /// Load the outline font at `path` sized so that one em is `size_px` pixels.
    pub fn try_load(path: impl AsRef<Path>, size_px: u32) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|err| {
            SimError::FontLoad(format!("failed to read {}: {}", path.display(), err))
        })?;
        let font = FontVec::try_from_vec(data).map_err(|err| {
            SimError::FontLoad(format!("failed to parse {}: {}", path.display(), err))
        })?;
        let scale = em_scale(&font, size_px.max(1) as f32);
        debug!(path = %path.display(), size_px, "Outline font loaded");
        Ok(Self::Outline { font, scale })
    }

    /// Load `path`, or fall back to the built-in face with a warning.
    ///
    /// Never fails: a missing or corrupt font must not stop a render.
    pub fn load_or_builtin(path: Option<&Path>, size_px: u32) -> Self {
        match path {
            Some(path) => Self::try_load(path, size_px).unwrap_or_else(|err| {
                warn!(error = %err, "Using built-in fallback font");
                Self::builtin(size_px)
            }),
            None => Self::builtin(size_px),
        }
    }

    /// The built-in bitmap face scaled as close to `size_px` as whole pixels allow.
    pub fn builtin(size_px: u32) -> Self {
        Self::Builtin {
            dot: (size_px / BITMAP_CELL).max(1),
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin { .. })
    }

    /// Ink bounds of `text` drawn with its top-left anchor at the origin.
    pub fn line_box(&self, text: &str) -> LineBox {
        match self {
            Self::Outline { font, scale } => {
                let glyphs = outline_glyphs(font, *scale, text);
                let mut bounds: Option<LineBox> = None;
                for glyph in &glyphs {
                    let px = glyph.px_bounds();
                    let glyph_box = LineBox {
                        right: px.max.x.ceil() as i32,
                        top: px.min.y.floor() as i32,
                        bottom: px.max.y.ceil() as i32,
                    };
                    bounds = Some(match bounds {
                        Some(acc) => LineBox {
                            right: acc.right.max(glyph_box.right),
                            top: acc.top.min(glyph_box.top),
                            bottom: acc.bottom.max(glyph_box.bottom),
                        },
                        None => glyph_box,
                    });
                }
                bounds.unwrap_or_default()
            }
            Self::Builtin { dot } => {
                let count = text.chars().count() as i32;
                if count == 0 {
                    return LineBox::default();
                }
                let cell = (BITMAP_CELL * dot) as i32;
                LineBox {
                    right: count * cell,
                    top: 0,
                    bottom: cell,
                }
            }
        }
    }

    /// Draw `text` with its top-left anchor at `(x, y)`. Glyphs falling outside
    /// the canvas are clipped, not an error.
    pub fn draw_line(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        match self {
            Self::Outline { font, scale } => {
                let (width, height) = canvas.dimensions();
                for glyph in outline_glyphs(font, *scale, text) {
                    let bounds = glyph.px_bounds();
                    let origin_x = x + bounds.min.x as i32;
                    let origin_y = y + bounds.min.y as i32;
                    glyph.draw(|gx, gy, coverage| {
                        let px = origin_x + gx as i32;
                        let py = origin_y + gy as i32;
                        if px < 0 || py < 0 || px >= width as i32 || py >= height as i32 {
                            return;
                        }
                        let (px, py) = (px as u32, py as u32);
                        let background = *canvas.get_pixel(px, py);
                        let blended = interpolate(color, background, coverage.clamp(0.0, 1.0));
                        canvas.put_pixel(px, py, blended);
                    });
                }
            }
            Self::Builtin { dot } => {
                let dot = *dot;
                let cell = (BITMAP_CELL * dot) as i32;
                for (index, ch) in text.chars().enumerate() {
                    let cell_x = x + index as i32 * cell;
                    for (row, bits) in bitmap_glyph(ch).iter().enumerate() {
                        for column in 0..BITMAP_CELL {
                            if bits & (1 << column) == 0 {
                                continue;
                            }
                            let rect = Rect::at(
                                cell_x + (column * dot) as i32,
                                y + row as i32 * dot as i32,
                            )
                            .of_size(dot, dot);
                            draw_filled_rect_mut(canvas, rect, color);
                        }
                    }
                }
            }
        }
    }
}

/// `PxScale` sets the ascent-to-descent height, not the em. Convert so one em
/// spans `size` pixels.
fn em_scale(font: &FontVec, size: f32) -> PxScale {
    font.units_per_em()
        .map(|units| PxScale::from(size * font.height_unscaled() / units))
        .unwrap_or(PxScale::from(size))
}

/// Lay out `text` on a single line and return the glyphs that have outlines.
///
/// Glyphs are positioned with the baseline at `ascent`, so y = 0 is the top
/// of the line.
fn outline_glyphs(font: &FontVec, scale: PxScale, text: &str) -> Vec<OutlinedGlyph> {
    let scaled = font.as_scaled(scale);
    let mut caret = 0.0f32;
    let mut previous: Option<GlyphId> = None;
    let mut outlined = Vec::with_capacity(text.len());

    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, scaled.ascent()));
        caret += scaled.h_advance(id);
        previous = Some(id);

        if let Some(outline) = font.outline_glyph(glyph) {
            outlined.push(outline);
        }
    }

    outlined
}

/// Bitmap rows for `ch`; bit 0 is the leftmost column. Unknown characters
/// render as `?`.
fn bitmap_glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_falls_back_to_builtin() {
        let font = SimFont::load_or_builtin(Some(Path::new("/nonexistent/font.ttf")), 40);
        assert!(font.is_builtin());
    }

    #[test]
    fn try_load_reports_resource_error() {
        let err = SimFont::try_load("/nonexistent/font.ttf", 40).unwrap_err();
        assert_eq!(err.class(), ocrsim_core::ErrorClass::ResourceLoad);
    }

    #[test]
    fn corrupt_font_falls_back_to_builtin() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font").expect("write");
        let font = SimFont::load_or_builtin(Some(&path), 40);
        assert!(font.is_builtin());
    }

    #[test]
    fn builtin_line_box_scales_with_length() {
        let font = SimFont::builtin(16);
        let one = font.line_box("a");
        let five = font.line_box("hello");
        assert_eq!(one.width(), 16);
        assert_eq!(five.width(), 80);
        assert_eq!(five.height(), 16);
        assert_eq!(font.line_box(""), LineBox::default());
    }

    #[test]
    fn builtin_draws_ink_and_clips_overflow() {
        let font = SimFont::builtin(8);
        let mut canvas = RgbImage::from_pixel(20, 10, Rgb([255, 255, 255]));
        // Starts left of the canvas and runs past the right edge.
        font.draw_line(&mut canvas, -4, 1, "HHHH", Rgb([0, 0, 0]));
        assert!(canvas.pixels().any(|p| p.0 == [0, 0, 0]));
        assert_eq!(canvas.dimensions(), (20, 10));
    }

    /// The serif face installed on most Linux systems. Tests using it pass
    /// trivially (with a note) where it is absent.
    fn system_serif(size_px: u32) -> Option<SimFont> {
        let path = ocrsim_core::language::resolve("eng").default_font;
        match SimFont::try_load(path, size_px) {
            Ok(font) => Some(font),
            Err(err) => {
                eprintln!("skipping outline font test: {err}");
                None
            }
        }
    }

    #[test]
    fn outline_scale_is_pixels_per_em() {
        let Some(font) = system_serif(100) else { return };
        let SimFont::Outline { font, scale } = &font else {
            panic!("expected an outline font");
        };
        let units = font.units_per_em().expect("units per em");
        let px_per_em = scale.y * units / font.height_unscaled();
        assert!((px_per_em - 100.0).abs() < 0.01, "got {px_per_em} px/em");
    }

    #[test]
    fn outline_capital_height_fits_the_em() {
        let Some(font) = system_serif(100) else { return };
        // Capitals are roughly three quarters of an em in a serif face.
        let cap = font.line_box("M").height();
        assert!((60..=85).contains(&cap), "cap height {cap}");
    }

    #[test]
    fn outline_line_box_grows_with_ascenders_and_descenders() {
        let Some(font) = system_serif(40) else { return };
        let low = font.line_box("ace");
        let tall = font.line_box("Agy");
        assert!(tall.height() > low.height());
        assert!(tall.top < low.top);
        assert!(tall.bottom > low.bottom);
        assert!(font.line_box("ace ace").width() > low.width());
    }

    #[test]
    fn outline_ink_stays_inside_line_box() {
        let Some(font) = system_serif(40) else { return };
        let text = "Agy fj";
        let bounds = font.line_box(text);
        let (x, y) = (10, 10);
        let mut canvas = RgbImage::from_pixel(
            bounds.width() + 2 * x as u32,
            bounds.bottom.max(0) as u32 + 2 * y as u32,
            Rgb([255, 255, 255]),
        );
        font.draw_line(&mut canvas, x, y, text, Rgb([0, 0, 0]));

        let mut inked = 0;
        for (px, py, pixel) in canvas.enumerate_pixels() {
            if pixel.0 == [255, 255, 255] {
                continue;
            }
            inked += 1;
            let (px, py) = (px as i32, py as i32);
            assert!(px >= x - 1 && px < x + bounds.right, "ink at x = {px}");
            assert!(py >= y + bounds.top && py < y + bounds.bottom, "ink at y = {py}");
        }
        assert!(inked > 0);
    }

    #[test]
    fn unknown_characters_use_placeholder() {
        assert_eq!(bitmap_glyph('\u{4e2d}'), bitmap_glyph('?'));
        assert_ne!(bitmap_glyph('A'), [0; 8]);
        assert_ne!(bitmap_glyph('ë'), [0; 8]);
    }
}
