//! Persisting the project table.
//!
//! Saving converts the in-memory ISO date strings back to the native Date
//! dtype and rewrites the whole store file through a temp file + rename, so
//! the caller never observes a partially written table.

use std::fs::{self, File};
use std::path::Path;

use chrono::NaiveDate;
use polars::prelude::*;

use ledger_common::any_to_string;
use ledger_model::schema::columns;

use crate::error::{Result, StoreError};
use crate::load::parse_date;

/// Writes the full table to the store file, replacing its prior content.
pub fn save_table(path: &Path, table: &DataFrame) -> Result<()> {
    let mut out = table.clone();
    restore_native_dates(&mut out)?;

    let temp_path = path.with_extension("csv.tmp");

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| StoreError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(&temp_path).map_err(|e| StoreError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut out)
        .map_err(|e| StoreError::CsvWrite {
            path: temp_path.clone(),
            message: e.to_string(),
        })?;

    file.sync_all().map_err(|e| StoreError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|e| StoreError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(rows = out.height(), "saved project table to {}", path.display());
    Ok(())
}

/// Replaces the ISO string date column with a native Date column.
fn restore_native_dates(df: &mut DataFrame) -> Result<()> {
    let date_col = df.column(columns::DATE)?.clone();
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    let mut days: Vec<Option<i32>> = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = date_col.get(idx).unwrap_or(AnyValue::Null);
        let raw = any_to_string(value);
        days.push(parse_date(&raw).map(|d| (d - epoch).num_days() as i32));
    }
    let native = Series::new(columns::DATE.into(), days).cast(&DataType::Date)?;
    df.with_column(native)?;
    Ok(())
}
