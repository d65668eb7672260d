//! Shared types for the Edison vote-count audit.
//!
//! Holds the snapshot model, the error taxonomy, CLI settings and the small
//! parsing/formatting helpers used by the data and runtime crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod timestamps;

pub use error::{AuditError, Result};
pub use models::{Candidate, Snapshot};
