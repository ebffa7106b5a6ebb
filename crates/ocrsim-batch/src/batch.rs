// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch execution — many independent items over a rayon worker pool.
//
// Every item is a full text -> canvas -> degraded canvas -> text round trip
// with its own generator seeded from (seed, item index), so output does not
// depend on scheduling. Each worker builds its own renderer (and therefore its
// own font handle) once via `map_init`.
//
// Failure policy: an I/O error (for example an unwritable output directory)
// aborts the batch; any other per-item failure is logged and recorded as an
// empty result.

use std::path::{Path, PathBuf};

use ocrsim_core::error::{Result, SimError};
use ocrsim_core::{FileResult, TextResult};
use ocrsim_image::Recognizer;
use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::folder;
use crate::input::{InputSource, ProcessOutput};
use crate::simulator::Simulator;
use crate::table::{self, Table};

/// Options shared by the batch entry points.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Image name prefix; defaults to `{condition}_{language}`.
    pub image_prefix: Option<String>,
    /// Also write the results to this CSV file.
    pub output_csv: Option<PathBuf>,
}

/// One table cell queued for processing.
struct Cell<'a> {
    row: usize,
    column: &'a str,
    text: &'a str,
}

impl Simulator {
    // -- Entry points ---------------------------------------------------------

    /// Round-trip every cell of `table` and return a table of the same shape
    /// holding the recognized text.
    #[instrument(skip_all, fields(rows = table.rows.len(), columns = table.columns.len()))]
    pub fn process_table<Rec: Recognizer + ?Sized>(
        &self,
        table: &Table,
        recognizer: &Rec,
        options: &BatchOptions,
    ) -> Result<Table> {
        let prefix = self.image_prefix(options);
        let cells: Vec<Cell<'_>> = table
            .rows
            .iter()
            .enumerate()
            .flat_map(|(row, values)| {
                table
                    .columns
                    .iter()
                    .zip(values)
                    .map(move |(column, text)| Cell {
                        row,
                        column: column.as_str(),
                        text: text.as_str(),
                    })
            })
            .collect();

        let texts = self.run_parallel(&cells, |renderer, index, cell| {
            let image_name = format!("{}_{}_{}.png", prefix, cell.row, file_safe(cell.column));
            let result = self.process_item(renderer, recognizer, index, cell.text, &image_name);
            self.settle(result, || format!("row {}, column {}", cell.row, cell.column))
                .map(|result| result.map(|r| r.ocr_text).unwrap_or_default())
        })?;

        let width = table.columns.len();
        let rows = if width == 0 {
            vec![Vec::new(); table.rows.len()]
        } else {
            texts.chunks(width).map(<[String]>::to_vec).collect()
        };
        let output = Table::from_records(table.columns.clone(), rows)?;

        if let Some(path) = &options.output_csv {
            output.write_csv(path)?;
        }
        info!(cells = cells.len(), "Table processed");
        Ok(output)
    }

    /// Round-trip independent texts; failed items keep an empty `ocr_text`.
    #[instrument(skip_all, fields(count = texts.len()))]
    pub fn process_texts<Rec: Recognizer + ?Sized>(
        &self,
        texts: &[String],
        recognizer: &Rec,
        options: &BatchOptions,
    ) -> Result<Vec<TextResult>> {
        let prefix = self.image_prefix(options);
        let results = self.run_parallel(texts, |renderer, index, text| {
            let image_name = format!("{}_{}.png", prefix, index);
            let result = self.process_item(renderer, recognizer, index, text, &image_name);
            self.settle(result, || format!("text {}", index)).map(|result| {
                result.unwrap_or_else(|| TextResult {
                    original_text: text.clone(),
                    ocr_text: String::new(),
                })
            })
        })?;

        if let Some(path) = &options.output_csv {
            table::write_records(&results, path)?;
        }
        info!(count = results.len(), "Texts processed");
        Ok(results)
    }

    /// Round-trip every text file under `dir` matching `pattern`.
    ///
    /// Files are visited in path order. Contents are read as UTF-8 and
    /// trimmed; the image is named after the file stem. Files that cannot be
    /// read or processed are logged and left out of the result.
    #[instrument(skip_all, fields(dir = %dir.display(), pattern, recursive))]
    pub fn process_folder<Rec: Recognizer + ?Sized>(
        &self,
        dir: &Path,
        pattern: &str,
        recursive: bool,
        recognizer: &Rec,
        options: &BatchOptions,
    ) -> Result<Vec<FileResult>> {
        let files = folder::collect_files(dir, pattern, recursive)?;

        let results = self.run_parallel(&files, |renderer, index, path| {
            let text = match std::fs::read_to_string(path) {
                Ok(text) => text.trim().to_string(),
                Err(err) => {
                    warn!(file = %path.display(), error = %err, "Skipping unreadable file");
                    return Ok(None);
                }
            };
            let stem = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| format!("file_{}", index));
            let result = self.process_item(renderer, recognizer, index, &text, &format!("{}.png", stem));
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.settle(result, || path.display().to_string()).map(|result| {
                result.map(|r| FileResult {
                    filename,
                    original_text: r.original_text,
                    ocr_text: r.ocr_text,
                })
            })
        })?;
        let results: Vec<FileResult> = results.into_iter().flatten().collect();

        if let Some(path) = &options.output_csv {
            table::write_records(&results, path)?;
        }
        info!(files = files.len(), processed = results.len(), "Folder processed");
        Ok(results)
    }

    /// Dispatch on the kind of input.
    pub fn process_input<Rec: Recognizer + ?Sized>(
        &self,
        source: InputSource,
        recognizer: &Rec,
        options: &BatchOptions,
    ) -> Result<ProcessOutput> {
        match source {
            InputSource::Text(text) => {
                let name = format!("{}_text.png", self.image_prefix(options));
                let path = self.image_path(&name);
                self.process_text(&text, recognizer, path.as_deref())
                    .map(ProcessOutput::Text)
            }
            InputSource::Texts(texts) => self
                .process_texts(&texts, recognizer, options)
                .map(ProcessOutput::Texts),
            InputSource::CsvFile(path) => {
                let table = Table::read_csv(&path)?;
                self.process_table(&table, recognizer, options)
                    .map(ProcessOutput::Table)
            }
            InputSource::Table(table) => self
                .process_table(&table, recognizer, options)
                .map(ProcessOutput::Table),
            InputSource::Folder {
                path,
                pattern,
                recursive,
            } => self
                .process_folder(&path, &pattern, recursive, recognizer, options)
                .map(ProcessOutput::Files),
        }
    }

    // -- Internals ------------------------------------------------------------

    fn image_prefix(&self, options: &BatchOptions) -> String {
        options
            .image_prefix
            .clone()
            .unwrap_or_else(|| self.default_image_prefix())
    }

    /// Map `items` in parallel, preserving order. Each worker owns a
    /// renderer; `work` receives it along with the item index.
    fn run_parallel<T, U, F>(&self, items: &[T], work: F) -> Result<Vec<U>>
    where
        T: Sync,
        U: Send,
        F: Fn(&mut ocrsim_image::Renderer, usize, &T) -> Result<U> + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config().jobs)
            .build()
            .map_err(|err| SimError::Config(format!("failed to start worker pool: {}", err)))?;

        pool.install(|| {
            items
                .par_iter()
                .enumerate()
                .map_init(|| self.renderer(), |renderer, (index, item)| work(renderer, index, item))
                .collect()
        })
    }

    fn process_item<Rec: Recognizer + ?Sized>(
        &self,
        renderer: &ocrsim_image::Renderer,
        recognizer: &Rec,
        index: usize,
        text: &str,
        image_name: &str,
    ) -> Result<TextResult> {
        let mut rng = self.item_rng(index as u64);
        let image_path = self.image_path(image_name);
        self.process_with(renderer, text, recognizer, image_path.as_deref(), &mut rng)
    }

    /// Apply the failure policy: errors that would repeat for every item
    /// propagate, item-local ones are logged and become `None`.
    fn settle<T>(&self, result: Result<T>, item: impl FnOnce() -> String) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if !err.is_item_local() => Err(err),
            Err(err) => {
                warn!(item = %item(), error = %err, "Item failed; recording empty result");
                Ok(None)
            }
        }
    }
}

/// Column names become part of file names.
fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect()
}
