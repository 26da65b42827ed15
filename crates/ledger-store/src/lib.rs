//! Persistent storage for the Project Ledger table.
//!
//! This crate is the data core behind the dashboard: it owns the single
//! store file holding all project rows and the upsert operation with its
//! derived-field invariants. There is no command-line or network surface;
//! the presentation layer calls straight into [`ProjectStore`].
//!
//! # Operation model
//!
//! Every mutation is one synchronous load-mutate-save cycle over the whole
//! table. Rows are keyed by the `Number` column; an upsert on an existing
//! number replaces the row (keeping its originally recorded date) and moves
//! it to the end of the table. No delete operation is exposed.
//!
//! # Failure semantics
//!
//! A missing store file is the initialization path: `load` returns an empty
//! table with the fixed column set. Malformed stored dates are coerced to
//! null during load. Everything else - permissions, disk, corruption - is a
//! [`StoreError`] the caller must handle; the store never retries and never
//! swallows a fatal error.
//!
//! # Example
//!
//! ```no_run
//! use ledger_model::{ProjectDraft, Service, ThreeWaySplit, TransferMethod};
//! use ledger_store::ProjectStore;
//!
//! # fn main() -> Result<(), ledger_store::StoreError> {
//! let store = ProjectStore::new("projects.csv");
//! store.upsert(&ProjectDraft {
//!     number: "P-001".into(),
//!     client_name: "Acme".into(),
//!     business_name: "Acme Bakery".into(),
//!     date: chrono::NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
//!     services: Service::WebDevelopment,
//!     payment_got_percent: 50.0,
//!     quote: 1200.0,
//!     amount_total: 1000.0,
//!     transfer_method: TransferMethod::Account,
//!     contributions: ThreeWaySplit::new(40.0, 30.0, 30.0),
//! })?;
//!
//! let record = store.find_by_number("P-001")?.expect("just inserted");
//! assert_eq!(record.parts.meet, 200.0);
//! # Ok(())
//! # }
//! ```

mod error;
mod load;
mod save;
mod store;

pub use error::{Result, StoreError};
pub use load::{empty_table, load_table};
pub use save::save_table;
pub use store::ProjectStore;
