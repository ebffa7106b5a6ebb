// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Simulator configuration.
//
// Built once per simulator, validated, and read-only afterwards. Workers that
// process items in parallel each hold their own clone.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::degradation::Degradation;
use crate::error::{Result, SimError};
use crate::types::Color;

/// Points per inch.
const POINTS_PER_INCH: f64 = 72.0;
/// Width of a US-letter page in inches, the default text column width.
const PAGE_WIDTH_INCHES: f64 = 8.5;

/// How text is laid out and drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Explicit font file; overrides the language registry.
    pub font_path: Option<PathBuf>,
    /// Font size in points.
    pub font_size: u32,
    /// Output resolution.
    pub dpi: u32,
    /// Margin as a fraction of the DPI (0.5 = half an inch).
    pub margin: f64,
    /// Fixed canvas width in pixels.
    pub image_width: Option<u32>,
    /// Fixed canvas height in pixels.
    pub image_height: Option<u32>,
    pub background: Color,
    pub text_color: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            font_size: 10,
            dpi: 300,
            margin: 0.5,
            image_width: None,
            image_height: None,
            background: Color::WHITE,
            text_color: Color::BLACK,
        }
    }
}

impl RenderConfig {
    /// Font size in pixels at the configured DPI, scaled by `multiplier`.
    pub fn font_size_px(&self, multiplier: f64) -> u32 {
        let base = (f64::from(self.font_size) * f64::from(self.dpi) / POINTS_PER_INCH).trunc();
        ((base * multiplier) as u32).max(1)
    }

    /// Margin in pixels.
    pub fn margin_px(&self) -> u32 {
        (self.margin * f64::from(self.dpi)) as u32
    }

    /// Maximum width of a text line in pixels.
    ///
    /// The fixed canvas width when set, otherwise a US-letter column minus
    /// both margins.
    pub fn max_width_px(&self) -> u32 {
        match self.image_width {
            Some(width) => width,
            None => {
                let page = (PAGE_WIDTH_INCHES * f64::from(self.dpi)) as i64;
                (page - 2 * i64::from(self.margin_px())).max(1) as u32
            }
        }
    }

    /// Whether either canvas dimension is fixed.
    pub fn has_fixed_size(&self) -> bool {
        self.image_width.is_some() || self.image_height.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        if self.font_size == 0 {
            return Err(SimError::Config("font_size must be positive".into()));
        }
        if self.dpi == 0 {
            return Err(SimError::Config("dpi must be positive".into()));
        }
        if !(self.margin.is_finite() && self.margin >= 0.0) {
            return Err(SimError::Config(format!(
                "margin must be a non-negative number, got {}",
                self.margin
            )));
        }
        if self.image_width == Some(0) || self.image_height == Some(0) {
            return Err(SimError::Config(
                "fixed image dimensions must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Options forwarded verbatim to the external recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// OCR engine mode (tesseract `--oem`).
    pub engine_mode: u8,
    /// Page segmentation mode (tesseract `--psm`).
    pub page_segmentation_mode: u8,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            engine_mode: 3,
            page_segmentation_mode: 6,
        }
    }
}

/// Complete configuration of one simulator instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub degradation: Degradation,
    /// Language code looked up in the language registry.
    pub language: String,
    pub render: RenderConfig,
    /// Seed for all stochastic steps; entropy when unset.
    pub seed: Option<u64>,
    /// Persist every rendered image into `output_dir`.
    pub save_images: bool,
    pub output_dir: Option<PathBuf>,
    /// Worker threads for batch processing (0 = one per core).
    pub jobs: usize,
    pub recognizer: RecognizerConfig,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            degradation: Degradation::None,
            language: crate::language::FALLBACK_LANGUAGE.to_string(),
            render: RenderConfig::default(),
            seed: None,
            save_images: false,
            output_dir: None,
            jobs: 0,
            recognizer: RecognizerConfig::default(),
        }
    }
}

impl SimulatorConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.degradation.validate()?;
        self.render.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::degradation::{ConditionKind, SpeckleParams};

    #[test]
    fn pixel_metrics_follow_dpi() {
        let config = RenderConfig::default();
        // 10pt at 300 DPI.
        assert_eq!(config.font_size_px(1.0), 41);
        assert_eq!(config.font_size_px(1.2), 49);
        assert_eq!(config.margin_px(), 150);
        // 8.5in * 300 - 2 * 150.
        assert_eq!(config.max_width_px(), 2250);
    }

    #[test]
    fn fixed_width_overrides_line_width() {
        let config = RenderConfig {
            image_width: Some(640),
            ..Default::default()
        };
        assert_eq!(config.max_width_px(), 640);
        assert!(config.has_fixed_size());
    }

    #[test]
    fn rejects_zero_dimensions() {
        let config = RenderConfig {
            image_height: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RenderConfig {
            dpi: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn simulator_config_from_partial_json() {
        let config = SimulatorConfig::from_json_str(
            r#"{
                "degradation": {"condition": "speckle-noise", "dot_density": 0.01},
                "language": "deu",
                "seed": 7,
                "render": {"dpi": 150}
            }"#,
        )
        .expect("valid config");

        assert_eq!(
            config.degradation,
            crate::degradation::Degradation::SpeckleNoise(SpeckleParams { dot_density: 0.01 })
        );
        assert_eq!(config.degradation.kind(), ConditionKind::SpeckleNoise);
        assert_eq!(config.language, "deu");
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.render.dpi, 150);
        assert_eq!(config.render.font_size, 10);
        assert_eq!(config.recognizer, RecognizerConfig::default());
        config.validate().expect("config validates");
    }

    #[test]
    fn config_survives_a_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sim.json");
        let config = SimulatorConfig {
            degradation: ConditionKind::GeometricTonalDistortion.default_degradation(),
            seed: Some(42),
            ..Default::default()
        };
        std::fs::write(&path, config.to_json_pretty().expect("serialize")).expect("write");

        let loaded = SimulatorConfig::from_json_file(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn invalid_degradation_fails_validation() {
        let config = SimulatorConfig {
            degradation: crate::degradation::Degradation::SpeckleNoise(SpeckleParams {
                dot_density: 2.0,
            }),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
