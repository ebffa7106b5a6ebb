// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recognizer backed by the `tesseract` command-line tool.
//
// Each call writes the canvas to a private temporary PNG and runs
// `tesseract <png> stdout --oem N --psm N -l LANG`. No state is shared between
// calls, so one instance serves every batch worker.

use std::path::PathBuf;
use std::process::Command;

use image::RgbImage;
use ocrsim_core::RecognizerConfig;
use ocrsim_core::error::{Result, SimError};
use tracing::{debug, instrument};

use super::Recognizer;
use crate::persist;

/// Resolution written into the temporary image; tesseract uses it to size
/// its expectations of glyph height.
const DEFAULT_DPI: u32 = 300;

/// Runs the external `tesseract` binary.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    binary: PathBuf,
    config: RecognizerConfig,
    dpi: u32,
}

impl TesseractRecognizer {
    /// Use `tesseract` from `PATH`.
    pub fn new(config: RecognizerConfig) -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            config,
            dpi: DEFAULT_DPI,
        }
    }

    /// Use a specific executable.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Resolution recorded in the image handed to tesseract.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Arguments following the image path.
    fn arguments(&self, language_tag: &str) -> Vec<String> {
        vec![
            "stdout".to_string(),
            "--oem".to_string(),
            self.config.engine_mode.to_string(),
            "--psm".to_string(),
            self.config.page_segmentation_mode.to_string(),
            "-l".to_string(),
            language_tag.to_string(),
        ]
    }

    /// Whether the executable can be started at all.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }
}

impl Recognizer for TesseractRecognizer {
    #[instrument(skip(self, canvas), fields(width = canvas.width(), height = canvas.height()))]
    fn recognize(&self, canvas: &RgbImage, language_tag: &str) -> Result<String> {
        let image_file = tempfile::Builder::new()
            .prefix("ocrsim-")
            .suffix(".png")
            .tempfile()
            .map_err(|err| SimError::OcrError(format!("failed to create temporary image: {}", err)))?;
        let bytes = persist::encode_png(canvas, self.dpi)?;
        std::fs::write(image_file.path(), bytes)
            .map_err(|err| SimError::OcrError(format!("failed to write temporary image: {}", err)))?;

        let output = Command::new(&self.binary)
            .arg(image_file.path())
            .args(self.arguments(language_tag))
            .output()
            .map_err(|err| {
                SimError::OcrError(format!(
                    "failed to run {}: {}",
                    self.binary.display(),
                    err
                ))
            })?;

        if !output.status.success() {
            return Err(SimError::OcrError(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(chars = text.len(), "tesseract finished");
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "tesseract"
    }
}
