//! Append-only line-delimited JSON files.
//!
//! Used for the session log and the archive index. Lines are written once
//! and never rewritten.

use crate::error::{PctxError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Appends `record` as one compact JSON line.
///
/// Creates the file if it doesn't exist.
pub(crate) fn append<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let line =
        serde_json::to_string(record).map_err(|e| PctxError::Serialization(e.to_string()))?;

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)?;
    file.sync_all()?;

    Ok(())
}

/// Reads every record from `path`.
///
/// A missing file reads as empty. Blank lines are skipped; any other line
/// that fails to parse is reported as `CorruptData` with its line number.
pub(crate) fn read_all<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(fs::File::open(path)?);
    let mut records = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| PctxError::CorruptData {
            path: path.to_path_buf(),
            reason: format!("line {}: {}", i + 1, e),
        })?;
        records.push(record);
    }

    Ok(records)
}
