// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recognition adapters — the boundary to external OCR engines.
//
// The simulator only needs "canvas in, text out". Two adapters are provided:
// the `tesseract` executable, and (behind the `ocr` feature) the pure-Rust
// `ocrs` engine.

pub mod tesseract;

#[cfg(feature = "ocr")]
pub mod engine;

use image::RgbImage;
use ocrsim_core::error::Result;

pub use tesseract::TesseractRecognizer;

#[cfg(feature = "ocr")]
pub use engine::{OcrsRecognizer, model_cache_dir};

/// An OCR engine treated as a black box.
///
/// Implementations must be shareable across batch worker threads.
pub trait Recognizer: Send + Sync {
    /// Recognize the text on `canvas`. `language_tag` comes from the
    /// language registry; engines without language selection may ignore it.
    fn recognize(&self, canvas: &RgbImage, language_tag: &str) -> Result<String>;

    /// Short engine name for logs.
    fn name(&self) -> &'static str;
}

impl<R: Recognizer + ?Sized> Recognizer for Box<R> {
    fn recognize(&self, canvas: &RgbImage, language_tag: &str) -> Result<String> {
        (**self).recognize(canvas, language_tag)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Collapse every run of line breaks into a single space and trim.
pub fn normalize_text(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    let mut in_break = false;
    for ch in raw.chars() {
        if ch == '\n' || ch == '\r' {
            if !in_break {
                normalized.push(' ');
                in_break = true;
            }
        } else {
            normalized.push(ch);
            in_break = false;
        }
    }
    normalized.trim().to_string()
}
