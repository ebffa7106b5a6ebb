// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ocrsim-batch — the simulator pipeline and its batch drivers.
//
// `Simulator` ties configuration, rendering, degradation and recognition
// together. Tables (CSV), lists of texts and folders of text files are
// processed in parallel with per-item reproducible randomness.

pub mod batch;
pub mod folder;
pub mod input;
pub mod simulator;
pub mod table;

pub use batch::BatchOptions;
pub use input::{InputSource, ProcessOutput};
pub use simulator::Simulator;
pub use table::Table;
