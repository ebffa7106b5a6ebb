// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-process recognizer built on the `ocrs` engine.
//
// Only compiled with the `ocr` feature. The engine needs two model files:
//
// - **Detection model** (`text-detection.rten`) locates text regions.
// - **Recognition model** (`text-recognition.rten`) decodes characters.
//
// Running `ocrs-cli` once downloads both into `$XDG_CACHE_HOME/ocrs`
// (typically `~/.cache/ocrs`), which `with_defaults` reads.
//
// The models are language-agnostic Latin recognizers, so the language tag
// passed by the simulator is ignored.

use std::path::{Path, PathBuf};

use image::RgbImage;
use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
use ocrsim_core::error::{Result, SimError};
use rten::Model;
use tracing::{debug, info, instrument};

use super::Recognizer;

/// Model files expected in a model directory: (role, file name).
const MODEL_FILES: [(&str, &str); 2] = [
    ("detection", "text-detection.rten"),
    ("recognition", "text-recognition.rten"),
];

/// Where `ocrs-cli` caches its downloads.
pub fn model_cache_dir() -> PathBuf {
    std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache")))
        .unwrap_or_default()
        .join("ocrs")
}

/// Recognizer running the `ocrs` neural engine in-process.
///
/// Loading the models dominates start-up; one instance serves every worker.
pub struct OcrsRecognizer {
    engine: OcrEngine,
}

impl std::fmt::Debug for OcrsRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OcrsRecognizer").finish_non_exhaustive()
    }
}

impl OcrsRecognizer {
    /// Build the engine from the two model files in `dir`.
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn from_model_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let [detection, recognition] =
            MODEL_FILES.map(|(role, file)| load_model(role, &dir.join(file)));
        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection?),
            recognition_model: Some(recognition?),
            ..Default::default()
        })
        .map_err(|err| SimError::OcrError(format!("ocrs engine rejected the models: {err}")))?;

        info!("ocrs ready");
        Ok(Self { engine })
    }

    /// Build the engine from [`model_cache_dir`].
    pub fn with_defaults() -> Result<Self> {
        Self::from_model_dir(model_cache_dir())
    }
}

fn load_model(role: &str, path: &Path) -> Result<Model> {
    if !path.is_file() {
        return Err(SimError::OcrError(format!(
            "no {role} model at {}; `ocrs-cli` downloads it on first run",
            path.display()
        )));
    }
    debug!(role, path = %path.display(), "Loading ocrs model");
    Model::load_file(path).map_err(|err| {
        SimError::OcrError(format!("unreadable {role} model {}: {err}", path.display()))
    })
}

impl Recognizer for OcrsRecognizer {
    #[instrument(skip(self, canvas), fields(width = canvas.width(), height = canvas.height()))]
    fn recognize(&self, canvas: &RgbImage, language_tag: &str) -> Result<String> {
        debug!(language_tag, "ocrs ignores the language tag");
        let (width, height) = canvas.dimensions();

        let source = ImageSource::from_bytes(canvas.as_raw(), (width, height)).map_err(|err| {
            SimError::OcrError(format!(
                "failed to create image source ({}x{}): {}",
                width, height, err
            ))
        })?;
        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| SimError::OcrError(format!("OCR preprocessing failed: {}", err)))?;
        let text = self
            .engine
            .get_text(&input)
            .map_err(|err| SimError::OcrError(format!("OCR text recognition failed: {}", err)))?;

        debug!(line_count = text.lines().count(), "ocrs finished");
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "ocrs"
    }
}
