// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ocrsim-image — the raster side of the OCR simulator.
//
// Renders wrapped text onto an RGB canvas, applies condition-specific
// degradations, persists canvases as PNG with DPI metadata, and adapts
// external OCR engines behind the `Recognizer` trait.

pub mod degrade;
pub mod font;
pub mod layout;
pub mod ocr;
pub mod persist;
pub mod render;

pub use degrade::degrade;
pub use font::SimFont;
pub use ocr::{Recognizer, TesseractRecognizer, normalize_text};
pub use persist::{encode_png, save_png};
pub use render::Renderer;

#[cfg(feature = "ocr")]
pub use ocr::{OcrsRecognizer, model_cache_dir};
