// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Degradation conditions and their parameter sets.
//
// A simulator is configured for exactly one condition. Each condition carries
// its own parameter struct, so an unknown condition or a parameter that does
// not belong to the chosen condition cannot be expressed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// The name of a degradation condition, without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionKind {
    /// Clean rendering.
    None,
    /// Archaic (blackletter) typeface at an enlarged size.
    TypefaceSubstitution,
    /// Per-line skew, ink dropout and tonal noise.
    GeometricTonalDistortion,
    /// Random black dots.
    SpeckleNoise,
}

impl ConditionKind {
    pub const ALL: [ConditionKind; 4] = [
        ConditionKind::None,
        ConditionKind::TypefaceSubstitution,
        ConditionKind::GeometricTonalDistortion,
        ConditionKind::SpeckleNoise,
    ];

    /// Canonical kebab-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::TypefaceSubstitution => "typeface-substitution",
            Self::GeometricTonalDistortion => "geometric-tonal-distortion",
            Self::SpeckleNoise => "speckle-noise",
        }
    }

    /// Short legacy name, used for image file prefixes.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::None => "simple",
            Self::TypefaceSubstitution => "blackletter",
            Self::GeometricTonalDistortion => "distorted",
            Self::SpeckleNoise => "noisy",
        }
    }

    /// The condition with its default parameters.
    pub fn default_degradation(&self) -> Degradation {
        match self {
            Self::None => Degradation::None,
            Self::TypefaceSubstitution => {
                Degradation::TypefaceSubstitution(TypefaceParams::default())
            }
            Self::GeometricTonalDistortion => {
                Degradation::GeometricTonalDistortion(DistortionParams::default())
            }
            Self::SpeckleNoise => Degradation::SpeckleNoise(SpeckleParams::default()),
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionKind {
    type Err = SimError;

    /// Case-insensitive; spaces, hyphens and underscores are ignored, and the
    /// legacy names (`simple`, `blackletter`, `distorted`, `noisy`) are accepted.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "none" | "simple" | "clean" => Ok(Self::None),
            "typefacesubstitution" | "blackletter" => Ok(Self::TypefaceSubstitution),
            "geometrictonaldistortion" | "distorted" | "distortion" => {
                Ok(Self::GeometricTonalDistortion)
            }
            "specklenoise" | "noisy" | "speckle" | "saltandpepper" => Ok(Self::SpeckleNoise),
            _ => Err(SimError::UnknownCondition(s.to_string())),
        }
    }
}

/// Parameters for the typeface-substitution condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypefaceParams {
    /// Factor applied to the font pixel size before layout.
    pub size_multiplier: f64,
}

impl Default for TypefaceParams {
    fn default() -> Self {
        Self {
            size_multiplier: 1.2,
        }
    }
}

/// Parameters for the geometric/tonal distortion condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistortionParams {
    /// Per-line horizontal slope, drawn uniformly from `[min, max]`.
    pub skew_range: (f64, f64),
    /// Chance that a text pixel erases a vertical gap above itself.
    pub incomplete_prob: f64,
    /// Height in pixels of an erased gap.
    pub gap_range: (u32, u32),
    /// Offset added to every channel of a text pixel.
    pub text_noise_range: (i32, i32),
    /// Chance that a background pixel receives noise.
    pub bg_noise_prob: f64,
    /// Offset added to every channel of a noisy background pixel.
    pub bg_noise_range: (i32, i32),
}

impl Default for DistortionParams {
    fn default() -> Self {
        Self {
            skew_range: (-0.06, 0.06),
            incomplete_prob: 0.15,
            gap_range: (1, 3),
            text_noise_range: (-30, 30),
            bg_noise_prob: 0.05,
            bg_noise_range: (-10, 10),
        }
    }
}

/// Parameters for the speckle-noise condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeckleParams {
    /// Fraction of the canvas area drawn as black dots.
    pub dot_density: f64,
}

impl Default for SpeckleParams {
    fn default() -> Self {
        Self {
            dot_density: 0.0045,
        }
    }
}

/// A degradation condition together with its parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "condition", rename_all = "kebab-case")]
pub enum Degradation {
    #[default]
    None,
    TypefaceSubstitution(TypefaceParams),
    GeometricTonalDistortion(DistortionParams),
    SpeckleNoise(SpeckleParams),
}

impl Degradation {
    pub fn kind(&self) -> ConditionKind {
        match self {
            Self::None => ConditionKind::None,
            Self::TypefaceSubstitution(_) => ConditionKind::TypefaceSubstitution,
            Self::GeometricTonalDistortion(_) => ConditionKind::GeometricTonalDistortion,
            Self::SpeckleNoise(_) => ConditionKind::SpeckleNoise,
        }
    }

    /// Font size factor applied at render time (1.0 unless substituting typeface).
    pub fn font_size_multiplier(&self) -> f64 {
        match self {
            Self::TypefaceSubstitution(params) => params.size_multiplier,
            _ => 1.0,
        }
    }

    /// Skew range used when drawing lines, if the condition skews at all.
    pub fn skew_range(&self) -> Option<(f64, f64)> {
        match self {
            Self::GeometricTonalDistortion(params) => Some(params.skew_range),
            _ => None,
        }
    }

    /// Reject out-of-range parameters.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::None => Ok(()),
            Self::TypefaceSubstitution(params) => {
                if !(params.size_multiplier.is_finite() && params.size_multiplier > 0.0) {
                    return Err(SimError::Config(format!(
                        "size_multiplier must be a positive number, got {}",
                        params.size_multiplier
                    )));
                }
                Ok(())
            }
            Self::GeometricTonalDistortion(params) => {
                check_float_range("skew_range", params.skew_range)?;
                check_probability("incomplete_prob", params.incomplete_prob)?;
                check_ordered("gap_range", params.gap_range)?;
                check_ordered("text_noise_range", params.text_noise_range)?;
                check_probability("bg_noise_prob", params.bg_noise_prob)?;
                check_ordered("bg_noise_range", params.bg_noise_range)
            }
            Self::SpeckleNoise(params) => check_probability("dot_density", params.dot_density),
        }
    }
}

impl From<ConditionKind> for Degradation {
    fn from(kind: ConditionKind) -> Self {
        kind.default_degradation()
    }
}

fn check_probability(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::Config(format!(
            "{name} must lie in [0, 1], got {value}"
        )))
    }
}

fn check_float_range(name: &str, (min, max): (f64, f64)) -> Result<()> {
    if min.is_finite() && max.is_finite() && min <= max && (max - min).is_finite() {
        Ok(())
    } else {
        Err(SimError::Config(format!(
            "{name} must be a finite range with min <= max, got ({min}, {max})"
        )))
    }
}

fn check_ordered<T: PartialOrd + fmt::Display>(name: &str, (min, max): (T, T)) -> Result<()> {
    if min <= max {
        Ok(())
    } else {
        Err(SimError::Config(format!(
            "{name} is empty: ({min}, {max})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_and_legacy_names() {
        assert_eq!("none".parse::<ConditionKind>().unwrap(), ConditionKind::None);
        assert_eq!("simple".parse::<ConditionKind>().unwrap(), ConditionKind::None);
        assert_eq!(
            "BlackLetter".parse::<ConditionKind>().unwrap(),
            ConditionKind::TypefaceSubstitution
        );
        assert_eq!(
            "geometric_tonal_distortion".parse::<ConditionKind>().unwrap(),
            ConditionKind::GeometricTonalDistortion
        );
        assert_eq!(
            "Speckle Noise".parse::<ConditionKind>().unwrap(),
            ConditionKind::SpeckleNoise
        );
        assert!("Minimal Noise".parse::<ConditionKind>().is_err());
    }

    #[test]
    fn defaults_match_reference_table() {
        let distortion = DistortionParams::default();
        assert_eq!(distortion.skew_range, (-0.06, 0.06));
        assert_eq!(distortion.incomplete_prob, 0.15);
        assert_eq!(distortion.gap_range, (1, 3));
        assert_eq!(distortion.text_noise_range, (-30, 30));
        assert_eq!(distortion.bg_noise_prob, 0.05);
        assert_eq!(distortion.bg_noise_range, (-10, 10));
        assert_eq!(TypefaceParams::default().size_multiplier, 1.2);
        assert_eq!(SpeckleParams::default().dot_density, 0.0045);
    }

    #[test]
    fn all_defaults_validate() {
        for kind in ConditionKind::ALL {
            kind.default_degradation()
                .validate()
                .expect("default parameters are valid");
        }
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let degradation = Degradation::SpeckleNoise(SpeckleParams { dot_density: 1.5 });
        assert!(degradation.validate().is_err());

        let degradation = Degradation::GeometricTonalDistortion(DistortionParams {
            bg_noise_prob: -0.1,
            ..Default::default()
        });
        assert!(degradation.validate().is_err());
    }

    #[test]
    fn rejects_overflowing_skew_range() {
        let degradation = Degradation::GeometricTonalDistortion(DistortionParams {
            skew_range: (-f64::MAX, f64::MAX),
            ..Default::default()
        });
        assert!(degradation.validate().is_err());

        let degradation = Degradation::GeometricTonalDistortion(DistortionParams {
            skew_range: (-1e300, 1e300),
            ..Default::default()
        });
        assert!(degradation.validate().is_ok());
    }

    #[test]
    fn rejects_empty_ranges() {
        let degradation = Degradation::GeometricTonalDistortion(DistortionParams {
            gap_range: (4, 2),
            ..Default::default()
        });
        assert!(degradation.validate().is_err());

        let degradation = Degradation::GeometricTonalDistortion(DistortionParams {
            skew_range: (0.1, f64::NAN),
            ..Default::default()
        });
        assert!(degradation.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_multiplier() {
        let degradation = Degradation::TypefaceSubstitution(TypefaceParams {
            size_multiplier: 0.0,
        });
        assert!(degradation.validate().is_err());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let json = r#"{"condition": "geometric-tonal-distortion", "incomplete_prob": 0.5}"#;
        let degradation: Degradation = serde_json::from_str(json).expect("valid json");
        match degradation {
            Degradation::GeometricTonalDistortion(params) => {
                assert_eq!(params.incomplete_prob, 0.5);
                assert_eq!(params.gap_range, (1, 3));
            }
            other => panic!("unexpected condition {other:?}"),
        }

        let none: Degradation =
            serde_json::from_str(r#"{"condition": "none"}"#).expect("valid json");
        assert_eq!(none, Degradation::None);
    }

    #[test]
    fn multiplier_only_applies_to_typeface_substitution() {
        assert_eq!(Degradation::None.font_size_multiplier(), 1.0);
        assert_eq!(
            ConditionKind::TypefaceSubstitution
                .default_degradation()
                .font_size_multiplier(),
            1.2
        );
        assert!(Degradation::None.skew_range().is_none());
    }
}
