//! Ingestion and analysis pipeline for the Edison vote-count audit.
//!
//! Reads region files, orders each series chronologically, compares every
//! adjacent pair of snapshots and reduces the comparisons into a report.

pub mod aggregator;
pub mod analysis;
pub mod analyzer;
pub mod normalizer;
pub mod reader;

pub use audit_core as core;
