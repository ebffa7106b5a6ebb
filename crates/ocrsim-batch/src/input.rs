// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input sources accepted by `Simulator::process_input`, and what comes back.

use std::path::{Path, PathBuf};

use ocrsim_core::{FileResult, TextResult};

use crate::folder::DEFAULT_PATTERN;
use crate::table::Table;

/// Something to push through the simulator.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    /// A single text.
    Text(String),
    /// Independent texts, one result each.
    Texts(Vec<String>),
    /// A CSV file read into a [`Table`].
    CsvFile(PathBuf),
    /// An in-memory table.
    Table(Table),
    /// Text files in a directory.
    Folder {
        path: PathBuf,
        pattern: String,
        recursive: bool,
    },
}

impl InputSource {
    /// Classify a command-line argument: an existing `.csv` file, an existing
    /// directory, or otherwise literal text.
    pub fn sniff(raw: &str) -> Self {
        let path = Path::new(raw);
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            Self::CsvFile(path.to_path_buf())
        } else if path.is_dir() {
            Self::Folder {
                path: path.to_path_buf(),
                pattern: DEFAULT_PATTERN.to_string(),
                recursive: false,
            }
        } else {
            Self::Text(raw.to_string())
        }
    }
}

/// Result of [`Simulator::process_input`](crate::Simulator::process_input),
/// shaped after the input.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutput {
    Text(TextResult),
    Texts(Vec<TextResult>),
    Table(Table),
    Files(Vec<FileResult>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniff_distinguishes_files_folders_and_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        let csv = dir.path().join("input.csv");
        std::fs::write(&csv, "a\nx\n").expect("write");
        let txt = dir.path().join("input.txt");
        std::fs::write(&txt, "x").expect("write");

        let as_str = |p: &Path| p.to_str().expect("utf-8 path").to_string();

        assert_eq!(InputSource::sniff(&as_str(csv.as_path())), InputSource::CsvFile(csv.clone()));
        assert_eq!(
            InputSource::sniff(&as_str(dir.path())),
            InputSource::Folder {
                path: dir.path().to_path_buf(),
                pattern: "*.txt".into(),
                recursive: false,
            }
        );
        // Existing non-CSV files and missing CSV paths are literal text.
        assert_eq!(InputSource::sniff(&as_str(txt.as_path())), InputSource::Text(as_str(txt.as_path())));
        assert_eq!(
            InputSource::sniff("/nonexistent/data.csv"),
            InputSource::Text("/nonexistent/data.csv".into())
        );
        assert_eq!(
            InputSource::sniff("Hello World"),
            InputSource::Text("Hello World".into())
        );
    }
}
