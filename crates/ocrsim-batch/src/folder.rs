// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folder scanning — text files selected by a file-name glob.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use ocrsim_core::error::{Result, SimError};
use tracing::debug;

/// Pattern used when none is given.
pub const DEFAULT_PATTERN: &str = "*.txt";

/// Files under `dir` whose name matches `pattern`, sorted by path.
///
/// The pattern applies to the file name only. With `recursive`, every
/// subdirectory is searched as well.
pub fn collect_files(dir: &Path, pattern: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let matcher = compile(pattern)?;
    let mut files = Vec::new();
    walk(dir, &matcher, recursive, &mut files)?;
    files.sort();
    debug!(dir = %dir.display(), pattern, count = files.len(), "Files collected");
    Ok(files)
}

fn compile(pattern: &str) -> Result<GlobMatcher> {
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|err| SimError::Pattern(format!("invalid file pattern {:?}: {}", pattern, err)))
}

fn walk(dir: &Path, matcher: &GlobMatcher, recursive: bool, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        // Symlinked directories are not followed.
        if entry.file_type()?.is_dir() {
            if recursive {
                walk(&path, matcher, recursive, files)?;
            }
        } else if path
            .file_name()
            .is_some_and(|name| matcher.is_match(Path::new(name)))
        {
            files.push(path);
        }
    }
    Ok(())
}
