// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ocrsim — Core types, degradation parameters, language registry and error
// definitions shared across all crates.

pub mod config;
pub mod degradation;
pub mod error;
pub mod language;
pub mod types;

pub use config::{RecognizerConfig, RenderConfig, SimulatorConfig};
pub use degradation::{ConditionKind, Degradation, DistortionParams, SpeckleParams, TypefaceParams};
pub use error::{ErrorClass, Result, SimError};
pub use language::LanguageEntry;
pub use types::*;
