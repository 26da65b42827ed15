//! Domain types for Project Ledger.
//!
//! This crate defines the project record as the rest of the workspace sees
//! it: the user-entered draft, the fully materialized row with derived
//! fields, the fixed collaborator roles, and the table schema.

pub mod collaborator;
pub mod enums;
pub mod error;
pub mod record;
pub mod schema;

pub use collaborator::Collaborator;
pub use enums::{Service, TransferMethod};
pub use error::{ModelError, Result};
pub use record::{ProjectDraft, ProjectRecord, ThreeWaySplit};
