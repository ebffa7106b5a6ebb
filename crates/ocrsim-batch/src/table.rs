// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tables of text — CSV in, CSV out.

use std::path::Path;

use ocrsim_core::error::{Result, SimError};
use serde::Serialize;
use tracing::{debug, instrument};

/// A rectangular table of text cells with named columns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, checking that every row has one cell per column.
    pub fn from_records(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(SimError::Csv(format!(
                "row {} has {} cells, expected {}",
                index,
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    /// Read a CSV file whose first record holds the column names.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path.as_ref()).map_err(csv_error)?;
        let columns = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(str::to_string)
            .collect();
        let rows = reader
            .records()
            .map(|record| {
                record
                    .map(|record| record.iter().map(str::to_string).collect())
                    .map_err(csv_error)
            })
            .collect::<Result<Vec<Vec<String>>>>()?;

        let table = Self::from_records(columns, rows)?;
        debug!(rows = table.rows.len(), columns = table.columns.len(), "CSV read");
        Ok(table)
    }

    /// Write the table, header first.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = csv::Writer::from_path(path.as_ref()).map_err(csv_error)?;
        writer.write_record(&self.columns).map_err(csv_error)?;
        for row in &self.rows {
            writer.write_record(row).map_err(csv_error)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// (rows, columns).
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Render as CSV text.
    pub fn to_csv_string(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns).map_err(csv_error)?;
        for row in &self.rows {
            writer.write_record(row).map_err(csv_error)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| SimError::Csv(format!("failed to finish CSV: {}", err)))?;
        String::from_utf8(bytes).map_err(|err| SimError::Csv(err.to_string()))
    }
}

/// Write serializable records (one per row, header from field names).
pub fn write_records<T: Serialize>(records: &[T], path: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref()).map_err(csv_error)?;
    for record in records {
        writer.serialize(record).map_err(csv_error)?;
    }
    writer.flush()?;
    debug!(records = records.len(), path = %path.as_ref().display(), "CSV written");
    Ok(())
}

/// I/O failures keep their class; everything else is a CSV format error.
fn csv_error(err: csv::Error) -> SimError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io) => SimError::Io(io),
        _ => SimError::Csv(message),
    }
}
