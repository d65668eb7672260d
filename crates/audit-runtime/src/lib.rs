//! Runtime layer for the Edison vote-count audit.
//!
//! Runs one analysis pipeline per region concurrently and collects the
//! per-region outcomes without letting one failure abort the batch.

pub mod batch;

pub use audit_core as core;
pub use audit_data as data;
