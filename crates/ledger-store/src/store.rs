//! The project store: one table file, whole-table read/rewrite per mutation.

use std::path::{Path, PathBuf};

use polars::prelude::*;

use ledger_common::{any_to_bool, any_to_f64, any_to_string};
use ledger_model::schema::{COLUMN_ORDER, columns};
use ledger_model::{Collaborator, ProjectDraft, ProjectRecord, ThreeWaySplit};

use crate::error::Result;
use crate::load::load_table;
use crate::save::save_table;

/// Owns the store file and the upsert-and-persist logic.
///
/// Every mutation is a synchronous load, in-memory edit, and full rewrite of
/// the file. The file carries no lock: two processes running concurrent
/// load-mutate-save cycles can silently overwrite each other's changes. That
/// is an accepted limitation of this store, not something it defends against.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    path: PathBuf,
}

impl ProjectStore {
    /// Default store file name, relative to the process working directory.
    pub const DEFAULT_FILE_NAME: &'static str = "projects.csv";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by [`Self::DEFAULT_FILE_NAME`] in the working directory.
    pub fn with_default_path() -> Self {
        Self::new(Self::DEFAULT_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the table, normalized to the canonical schema. A missing store
    /// file yields an empty table with the full column set.
    pub fn load(&self) -> Result<DataFrame> {
        load_table(&self.path)
    }

    /// Alias for [`Self::load`]; the name the presentation layer uses.
    pub fn list_all(&self) -> Result<DataFrame> {
        self.load()
    }

    /// Writes the whole table, replacing the prior store content. The write
    /// goes through a temp file and rename, so no partial table is ever
    /// observable at the store path.
    pub fn save(&self, table: &DataFrame) -> Result<()> {
        save_table(&self.path, table)
    }

    /// Inserts or replaces the row keyed by the draft's project number.
    ///
    /// Derived fields (part amounts, contribution validity) are computed
    /// here; the caller supplies raw form fields only. When the number
    /// already exists the stored date wins over the draft's date - an edit
    /// never changes the recorded project date - and the replacement row is
    /// appended at the end of the table rather than staying in place.
    /// Re-submitting identical data is not an error.
    pub fn upsert(&self, draft: &ProjectDraft) -> Result<()> {
        draft.validate()?;
        let mut record = ProjectRecord::from_draft(draft);

        let table = self.load()?;
        let table = match find_row_index(&table, &record.number)? {
            Some(idx) => {
                // Edit: keep the originally recorded date.
                record.date = date_at(&table, idx)?;
                tracing::debug!(number = %record.number, "replacing existing project row");
                remove_by_number(&table, &record.number)?
            }
            None => {
                tracing::debug!(number = %record.number, "appending new project row");
                table
            }
        };

        let row = record_to_frame(&record)?;
        let updated = table.vstack(&row)?;
        self.save(&updated)
    }

    /// Looks up a single record by project number.
    pub fn find_by_number(&self, number: &str) -> Result<Option<ProjectRecord>> {
        let table = self.load()?;
        match find_row_index(&table, number)? {
            Some(idx) => Ok(Some(row_to_record(&table, idx)?)),
            None => Ok(None),
        }
    }

    /// Read-side filter over the loaded table.
    ///
    /// The predicate is a Polars expression, e.g.
    /// `col("Payment Got (%)").neq(lit(100.0))` for the outstanding-payments
    /// view.
    pub fn filter_where(&self, predicate: Expr) -> Result<DataFrame> {
        let table = self.load()?;
        Ok(table.lazy().filter(predicate).collect()?)
    }
}

/// Index of the row carrying `number`, if any.
fn find_row_index(table: &DataFrame, number: &str) -> Result<Option<usize>> {
    let numbers = table.column(columns::NUMBER)?;
    for idx in 0..table.height() {
        if any_to_string(numbers.get(idx).unwrap_or(AnyValue::Null)) == number {
            return Ok(Some(idx));
        }
    }
    Ok(None)
}

/// Stored ISO date of the row at `idx`, null-aware.
fn date_at(table: &DataFrame, idx: usize) -> Result<Option<String>> {
    let dates = table.column(columns::DATE)?;
    let value = dates.get(idx).unwrap_or(AnyValue::Null);
    Ok(match value {
        AnyValue::Null => None,
        other => Some(any_to_string(other)),
    })
}

/// Drops exactly the row keyed by `number`.
///
/// Comparing a null `Number` cell with the key yields null, which `filter`
/// would drop along with the matched row; rows with a null key (possible in
/// hand-edited stores) must survive, so nulls are kept explicitly.
fn remove_by_number(table: &DataFrame, number: &str) -> Result<DataFrame> {
    Ok(table
        .clone()
        .lazy()
        .filter(
            col(columns::NUMBER)
                .neq(lit(number.to_string()))
                .fill_null(lit(true)),
        )
        .collect()?)
}

/// Builds a single-row frame matching the canonical schema.
fn record_to_frame(record: &ProjectRecord) -> Result<DataFrame> {
    let mut cols: Vec<Column> = Vec::with_capacity(COLUMN_ORDER.len());
    cols.push(Column::new(
        columns::NUMBER.into(),
        vec![record.number.clone()],
    ));
    cols.push(Column::new(
        columns::CLIENT_NAME.into(),
        vec![record.client_name.clone()],
    ));
    cols.push(Column::new(
        columns::BUSINESS_NAME.into(),
        vec![record.business_name.clone()],
    ));
    cols.push(Column::new(columns::DATE.into(), vec![record.date.clone()]));
    cols.push(Column::new(
        columns::SERVICES.into(),
        vec![record.services.as_str()],
    ));
    cols.push(Column::new(
        columns::PAYMENT_GOT_PERCENT.into(),
        vec![record.payment_got_percent],
    ));
    cols.push(Column::new(columns::QUOTE.into(), vec![record.quote]));
    cols.push(Column::new(
        columns::AMOUNT_TOTAL.into(),
        vec![record.amount_total],
    ));
    cols.push(Column::new(
        columns::TRANSFER_METHOD.into(),
        vec![record.transfer_method.as_str()],
    ));
    for collaborator in Collaborator::ALL {
        cols.push(Column::new(
            collaborator.contribution_column().into(),
            vec![record.contributions.get(collaborator)],
        ));
        cols.push(Column::new(
            collaborator.part_column().into(),
            vec![record.parts.get(collaborator)],
        ));
    }
    cols.push(Column::new(
        columns::TOTAL_CONTRIBUTION_CORRECT.into(),
        vec![record.contribution_valid],
    ));
    Ok(DataFrame::new(cols)?)
}

/// Materializes the row at `idx` into a [`ProjectRecord`].
fn row_to_record(table: &DataFrame, idx: usize) -> Result<ProjectRecord> {
    let text = |name: &str| -> Result<String> {
        let col = table.column(name)?;
        Ok(any_to_string(col.get(idx).unwrap_or(AnyValue::Null)))
    };
    let number = |name: &str| -> Result<f64> {
        let col = table.column(name)?;
        Ok(any_to_f64(col.get(idx).unwrap_or(AnyValue::Null)).unwrap_or(0.0))
    };

    let contributions = ThreeWaySplit::new(
        number(Collaborator::Meet.contribution_column())?,
        number(Collaborator::Spandan.contribution_column())?,
        number(Collaborator::Srey.contribution_column())?,
    );
    let parts = ThreeWaySplit::new(
        number(Collaborator::Meet.part_column())?,
        number(Collaborator::Spandan.part_column())?,
        number(Collaborator::Srey.part_column())?,
    );

    let validity_col = table.column(columns::TOTAL_CONTRIBUTION_CORRECT)?;
    let contribution_valid =
        any_to_bool(validity_col.get(idx).unwrap_or(AnyValue::Null)).unwrap_or(false);

    Ok(ProjectRecord {
        number: text(columns::NUMBER)?,
        client_name: text(columns::CLIENT_NAME)?,
        business_name: text(columns::BUSINESS_NAME)?,
        date: date_at(table, idx)?,
        services: text(columns::SERVICES)?.parse()?,
        payment_got_percent: number(columns::PAYMENT_GOT_PERCENT)?,
        quote: number(columns::QUOTE)?,
        amount_total: number(columns::AMOUNT_TOTAL)?,
        transfer_method: text(columns::TRANSFER_METHOD)?.parse()?,
        contributions,
        parts,
        contribution_valid,
    })
}
