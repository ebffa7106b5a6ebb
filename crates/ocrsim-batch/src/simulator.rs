// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Simulator — one configured render/degrade/recognize pipeline.
//
// Construction resolves everything that can fail up front (parameter ranges,
// language, font, output directory). After that the simulator is immutable
// and can be shared by reference across worker threads.

use std::path::{Path, PathBuf};

use image::RgbImage;
use ocrsim_core::error::Result;
use ocrsim_core::language::{self, LanguageEntry};
use ocrsim_core::{ConditionKind, SimulatorConfig, TextResult};
use ocrsim_image::{Recognizer, Renderer, SimFont, TesseractRecognizer};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, instrument, warn};

/// Odd constant spreading consecutive item indices across the seed space.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// A configured simulator instance.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulatorConfig,
    language: &'static LanguageEntry,
    font_path: PathBuf,
}

impl Simulator {
    // -- Construction ---------------------------------------------------------

    /// Validate `config` and resolve language, font and output directory.
    ///
    /// An unusable font is not an error here: it is reported once and every
    /// renderer falls back to the built-in face.
    #[instrument(skip_all, fields(condition = %config.degradation.kind(), language = %config.language))]
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        config.validate()?;

        let language = language::resolve(&config.language);
        let font_path = match &config.render.font_path {
            Some(path) => path.clone(),
            None if config.degradation.kind() == ConditionKind::TypefaceSubstitution => {
                PathBuf::from(language.blackletter_font)
            }
            None => PathBuf::from(language.default_font),
        };

        if let Some(dir) = &config.output_dir {
            std::fs::create_dir_all(dir)?;
        }

        let font_size_px = config
            .render
            .font_size_px(config.degradation.font_size_multiplier());
        if let Err(err) = SimFont::try_load(&font_path, font_size_px) {
            warn!(error = %err, "configured font unavailable; the built-in face will be used");
        }

        info!(
            font = %font_path.display(),
            font_size_px,
            seed = ?config.seed,
            "Simulator ready"
        );
        Ok(Self {
            config,
            language,
            font_path,
        })
    }

    // -- Accessors ------------------------------------------------------------

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn language(&self) -> &'static LanguageEntry {
        self.language
    }

    pub fn font_path(&self) -> &Path {
        &self.font_path
    }

    /// `{condition}_{language}`, e.g. `noisy_deu`.
    pub fn default_image_prefix(&self) -> String {
        format!(
            "{}_{}",
            self.config.degradation.kind().short_name(),
            self.language.code
        )
    }

    /// Where an image named `file_name` is saved, or `None` when images are
    /// not being kept.
    pub fn image_path(&self, file_name: &str) -> Option<PathBuf> {
        match &self.config.output_dir {
            Some(dir) if self.config.save_images => Some(dir.join(file_name)),
            _ => None,
        }
    }

    /// The `tesseract` recognizer configured for this simulator.
    pub fn default_recognizer(&self) -> TesseractRecognizer {
        TesseractRecognizer::new(self.config.recognizer).with_dpi(self.config.render.dpi)
    }

    // -- Pipeline -------------------------------------------------------------

    /// A render handle owning its own font. Build one per worker thread.
    pub fn renderer(&self) -> Renderer {
        Renderer::new(
            &self.config.render,
            Some(&self.font_path),
            &self.config.degradation,
        )
    }

    /// Generator for item `index`: seeded from (seed, index) when a seed is
    /// configured, from entropy otherwise.
    pub fn item_rng(&self, index: u64) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ index.wrapping_mul(SEED_STRIDE)),
            None => StdRng::from_entropy(),
        }
    }

    /// Wrap, render and degrade `text`.
    pub fn text_to_image<R: rand::Rng + ?Sized>(&self, text: &str, rng: &mut R) -> RgbImage {
        self.render_with(&self.renderer(), text, rng)
    }

    /// [`text_to_image`](Self::text_to_image), saving the result to `path`
    /// when images are being kept.
    pub fn text_to_image_saved<R: rand::Rng + ?Sized>(
        &self,
        text: &str,
        path: Option<&Path>,
        rng: &mut R,
    ) -> Result<RgbImage> {
        self.render_saved_with(&self.renderer(), text, path, rng)
    }

    /// Recognize `canvas` in the simulator's language and normalize the text.
    pub fn image_to_text<Rec: Recognizer + ?Sized>(
        &self,
        canvas: &RgbImage,
        recognizer: &Rec,
    ) -> Result<String> {
        let raw = recognizer.recognize(canvas, self.language.recognizer_tag)?;
        Ok(ocrsim_image::normalize_text(&raw))
    }

    /// Full round trip for one text, using the generator of item 0.
    pub fn process_text<Rec: Recognizer + ?Sized>(
        &self,
        text: &str,
        recognizer: &Rec,
        image_path: Option<&Path>,
    ) -> Result<TextResult> {
        let mut rng = self.item_rng(0);
        self.process_with(&self.renderer(), text, recognizer, image_path, &mut rng)
    }

    // -- Worker-level helpers -------------------------------------------------

    pub(crate) fn render_with<R: rand::Rng + ?Sized>(
        &self,
        renderer: &Renderer,
        text: &str,
        rng: &mut R,
    ) -> RgbImage {
        let canvas = renderer.render(text, rng);
        ocrsim_image::degrade(canvas, &self.config.degradation, rng)
    }

    pub(crate) fn render_saved_with<R: rand::Rng + ?Sized>(
        &self,
        renderer: &Renderer,
        text: &str,
        path: Option<&Path>,
        rng: &mut R,
    ) -> Result<RgbImage> {
        let canvas = self.render_with(renderer, text, rng);
        if let Some(path) = path.filter(|_| self.config.save_images) {
            ocrsim_image::save_png(&canvas, path, self.config.render.dpi)?;
            debug!(path = %path.display(), "Image kept");
        }
        Ok(canvas)
    }

    pub(crate) fn process_with<Rec: Recognizer + ?Sized, R: rand::Rng + ?Sized>(
        &self,
        renderer: &Renderer,
        text: &str,
        recognizer: &Rec,
        image_path: Option<&Path>,
        rng: &mut R,
    ) -> Result<TextResult> {
        let canvas = self.render_saved_with(renderer, text, image_path, rng)?;
        let ocr_text = self.image_to_text(&canvas, recognizer)?;
        Ok(TextResult {
            original_text: text.to_string(),
            ocr_text,
        })
    }
}
