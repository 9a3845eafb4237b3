//! Input reader for the city list.
//!
//! The input is a CSV file with a header row. State and city values are read
//! from the columns named in [`InputColumns`], trimmed, and rows missing either
//! value are skipped.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info};

use crate::config::InputColumns;
use crate::error::{Error, Result};

/// A (state, city) pair taken from one input row, values trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    pub state: String,
    pub city: String,
}

impl Record {
    pub fn new(state: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            city: city.into(),
        }
    }
}

/// Read records from the input file at `path`.
pub fn read_records(path: impl AsRef<Path>, columns: &InputColumns) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let records = read_records_from_reader(file, columns)?;
    info!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Read records from CSV content with a header row.
///
/// Fails only when the header lacks one of the configured columns. Rows that
/// are too short, unreadable, or blank in either column are skipped.
pub fn read_records_from_reader<R: Read>(
    reader: R,
    columns: &InputColumns,
) -> Result<Vec<Record>> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column_index = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| Error::MissingColumn {
                column: name.to_string(),
            })
    };
    let state_idx = column_index(&columns.state)?;
    let city_idx = column_index(&columns.city)?;

    let mut records = Vec::new();
    for (i, row) in csv_reader.records().enumerate() {
        let line = i + 2;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                debug!("Skipping unreadable row on line {}: {}", line, e);
                continue;
            }
        };

        let (Some(state), Some(city)) = (row.get(state_idx), row.get(city_idx)) else {
            debug!("Line {} has fewer columns than required", line);
            continue;
        };

        let (state, city) = (state.trim(), city.trim());
        if state.is_empty() || city.is_empty() {
            debug!("Line {} has a blank state or city, skipping", line);
            continue;
        }

        records.push(Record::new(state, city));
    }

    Ok(records)
}
