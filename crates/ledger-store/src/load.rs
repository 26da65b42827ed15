//! Loading and normalizing the project table.
//!
//! The on-disk table comes back from CSV inference with whatever dtypes the
//! file contents suggest, so loading always ends with a normalization pass
//! that produces the canonical in-memory schema: string key and text columns,
//! Float64 numerics, ISO `YYYY-MM-DD` date strings, and a Boolean validity
//! column (backfilled for stores written before it existed).

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

use ledger_common::{any_to_bool, any_to_f64, any_to_string};
use ledger_model::Collaborator;
use ledger_model::schema::{COLUMN_ORDER, columns, numeric_columns, text_columns};

use crate::error::{Result, StoreError};

/// Date layouts accepted when normalizing the stored date column. Anything
/// else becomes null, never an error.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Builds the empty table used when the store file does not exist yet.
pub fn empty_table() -> Result<DataFrame> {
    let mut cols: Vec<Column> = Vec::with_capacity(COLUMN_ORDER.len());
    for name in COLUMN_ORDER {
        cols.push(Series::new_empty(name.into(), &column_dtype(name)).into_column());
    }
    Ok(DataFrame::new(cols)?)
}

/// Canonical in-memory dtype for a schema column.
fn column_dtype(name: &str) -> DataType {
    if name == columns::TOTAL_CONTRIBUTION_CORRECT {
        DataType::Boolean
    } else if numeric_columns().contains(&name) {
        DataType::Float64
    } else {
        // Key, text, and the ISO date string column.
        DataType::String
    }
}

/// Loads the store file and normalizes it to the canonical schema.
///
/// A missing file is the initialization path and yields the empty table.
/// Any other I/O or parse failure is fatal.
pub fn load_table(path: &Path) -> Result<DataFrame> {
    match fs::metadata(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("store file {} not found, starting empty", path.display());
            return empty_table();
        }
        Err(e) => {
            return Err(StoreError::Io {
                operation: "stat",
                path: path.to_path_buf(),
                source: e,
            });
        }
        Ok(_) => {}
    }

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .with_schema_overwrite(string_column_overrides(path)?)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| StoreError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| StoreError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    normalize_table(&mut df)?;
    tracing::debug!(rows = df.height(), "loaded project table from {}", path.display());
    Ok(df)
}

/// Pins the key, text, and date columns present in the file to String.
///
/// Inference must never type the `Number` column: a store whose first
/// hundred numbers happen to look numeric would otherwise fail to load as
/// soon as an alphanumeric key appears past the inference window. Only
/// columns actually present in the header are pinned, so legacy layouts
/// still read.
fn string_column_overrides(path: &Path) -> Result<Option<SchemaRef>> {
    let Some(header) = read_header_line(path)? else {
        return Ok(None);
    };
    let mut string_cols = text_columns();
    string_cols.push(columns::DATE);

    let fields: Vec<Field> = parse_csv_line(&header)
        .into_iter()
        .filter(|name| string_cols.contains(&name.as_str()))
        .map(|name| Field::new(name.as_str().into(), DataType::String))
        .collect();
    if fields.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Arc::new(Schema::from_iter(fields))))
    }
}

/// First line of the store file, BOM stripped; `None` for an empty file.
fn read_header_line(path: &Path) -> Result<Option<String>> {
    let file = fs::File::open(path).map_err(|e| StoreError::Io {
        operation: "open",
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut reader = BufReader::new(file);
    let mut line = String::new();
    let read = reader.read_line(&mut line).map_err(|e| StoreError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;
    if read == 0 {
        return Ok(None);
    }
    let line = line.trim_end_matches(['\r', '\n']);
    Ok(Some(
        line.strip_prefix('\u{feff}').unwrap_or(line).to_string(),
    ))
}

/// Splits a CSV header line into field names, handling quoted values.
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if !in_quotes => in_quotes = true,
            '"' if in_quotes => {
                // Escaped quote ("")
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Applies the canonical schema to a freshly read frame in place.
fn normalize_table(df: &mut DataFrame) -> Result<()> {
    for name in text_columns() {
        let casted = df.column(name)?.cast(&DataType::String)?;
        df.with_column(casted)?;
    }
    for name in numeric_columns() {
        let casted = df.column(name)?.cast(&DataType::Float64)?;
        df.with_column(casted)?;
    }
    normalize_dates(df)?;
    normalize_validity(df)?;

    // Fixed column order regardless of how the file was laid out.
    *df = df.select(COLUMN_ORDER)?;
    Ok(())
}

/// Re-renders the date column as ISO `YYYY-MM-DD` strings.
fn normalize_dates(df: &mut DataFrame) -> Result<()> {
    let date_col = df.column(columns::DATE)?.clone();
    let mut values: Vec<Option<String>> = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = date_col.get(idx).unwrap_or(AnyValue::Null);
        values.push(to_iso_date(value));
    }
    df.with_column(Column::new(columns::DATE.into(), values))?;
    Ok(())
}

fn to_iso_date(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::Date(days) => {
            let date = NaiveDate::from_ymd_opt(1970, 1, 1)? + chrono::Duration::days(i64::from(days));
            Some(date.format("%Y-%m-%d").to_string())
        }
        other => {
            let raw = any_to_string(other);
            parse_date(&raw).map(|d| d.format("%Y-%m-%d").to_string())
        }
    }
}

/// Best-effort date parsing for stored values; returns `None` when no known
/// layout matches.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Ensures the `Total Contribution Correct` column is present and Boolean,
/// computing it from the contribution percentages when a legacy store lacks
/// it.
fn normalize_validity(df: &mut DataFrame) -> Result<()> {
    let values: Vec<Option<bool>> = if let Ok(existing) = df.column(columns::TOTAL_CONTRIBUTION_CORRECT) {
        let existing = existing.clone();
        (0..df.height())
            .map(|idx| any_to_bool(existing.get(idx).unwrap_or(AnyValue::Null)))
            .collect()
    } else {
        tracing::debug!("backfilling {} column", columns::TOTAL_CONTRIBUTION_CORRECT);
        let contribs: Vec<Column> = Collaborator::ALL
            .iter()
            .map(|c| df.column(c.contribution_column()).cloned())
            .collect::<PolarsResult<_>>()?;
        (0..df.height())
            .map(|idx| {
                let total: f64 = contribs
                    .iter()
                    .map(|col| {
                        any_to_f64(col.get(idx).unwrap_or(AnyValue::Null)).unwrap_or(f64::NAN)
                    })
                    .sum();
                Some(total == 100.0)
            })
            .collect()
    };
    df.with_column(Column::new(columns::TOTAL_CONTRIBUTION_CORRECT.into(), values))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn missing_store_yields_empty_schema() {
        let dir = tempdir().unwrap();
        let df = load_table(&dir.path().join("projects.csv")).unwrap();

        assert_eq!(df.height(), 0);
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, COLUMN_ORDER.to_vec());
    }

    #[test]
    fn parse_date_accepts_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_date("2024-03-15"), Some(expected));
        assert_eq!(parse_date("2024-03-15 00:00:00"), Some(expected));
        assert_eq!(parse_date("03/15/2024"), Some(expected));
        assert_eq!(parse_date("15.03.2024"), Some(expected));
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn legacy_store_gets_validity_backfilled() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("projects.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        // Legacy layout: no "Total Contribution Correct" column.
        writeln!(
            file,
            "Number,Client Name,Business Name,Date,Services,Payment Got (%),Quote,Amount Total,\
             Transfer Method,Meet's Contribution (%),Meet's Part,Spandan's Contribution (%),\
             Spandan's Part,Srey's Contribution (%),Srey's Part"
        )
        .unwrap();
        writeln!(
            file,
            "P-1,Acme,Acme Bakery,2024-03-15,Web Development,50,1200,1000,Account,40,200,30,150,30,150"
        )
        .unwrap();
        writeln!(
            file,
            "P-2,Beta,Beta Cafe,2024-04-01,Business cards/flyer,100,300,300,Cash,40,120,30,90,29.99,89.97"
        )
        .unwrap();

        let df = load_table(&path).unwrap();
        let validity = df.column(columns::TOTAL_CONTRIBUTION_CORRECT).unwrap();
        assert_eq!(validity.get(0).unwrap(), AnyValue::Boolean(true));
        assert_eq!(validity.get(1).unwrap(), AnyValue::Boolean(false));
    }

    #[test]
    fn numeric_looking_keys_stay_strings_past_inference_window() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("projects.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "Number,Client Name,Business Name,Date,Services,Payment Got (%),Quote,Amount Total,\
             Transfer Method,Meet's Contribution (%),Meet's Part,Spandan's Contribution (%),\
             Spandan's Part,Srey's Contribution (%),Srey's Part,Total Contribution Correct"
        )
        .unwrap();
        // Well past the schema inference window before the first
        // alphanumeric key shows up.
        for i in 0..120 {
            writeln!(
                file,
                "{i},Client {i},Biz {i},2024-03-15,Web Development,50,100,100,Account,40,20,30,15,30,15,true"
            )
            .unwrap();
        }
        writeln!(
            file,
            "ABC-1,Acme,Acme Bakery,2024-03-15,Web Development,50,100,100,Account,40,20,30,15,30,15,true"
        )
        .unwrap();

        let df = load_table(&path).unwrap();
        assert_eq!(df.height(), 121);

        let numbers = df.column(columns::NUMBER).unwrap();
        assert_eq!(any_to_string(numbers.get(0).unwrap()), "0");
        assert_eq!(any_to_string(numbers.get(120).unwrap()), "ABC-1");
    }

    #[test]
    fn header_line_parsing_handles_quoted_fields() {
        let fields = parse_csv_line("Number,\"Client, Name\",\"He said \"\"hi\"\"\"");
        assert_eq!(fields, vec!["Number", "Client, Name", "He said \"hi\""]);
    }

    #[test]
    fn unparsable_dates_become_null() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("projects.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "Number,Client Name,Business Name,Date,Services,Payment Got (%),Quote,Amount Total,\
             Transfer Method,Meet's Contribution (%),Meet's Part,Spandan's Contribution (%),\
             Spandan's Part,Srey's Contribution (%),Srey's Part,Total Contribution Correct"
        )
        .unwrap();
        writeln!(
            file,
            "P-1,Acme,Acme Bakery,someday,Web Development,50,1200,1000,Account,40,200,30,150,30,150,true"
        )
        .unwrap();

        let df = load_table(&path).unwrap();
        let date = df.column(columns::DATE).unwrap();
        assert_eq!(date.get(0).unwrap(), AnyValue::Null);
    }
}
