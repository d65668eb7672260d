//! Per-region analysis pipeline.
//!
//! Runs normalize → compare → aggregate over one region's snapshots and
//! returns a [`RegionAnalysis`] ready for the report renderer.

use std::path::Path;
use std::time::Instant;

use audit_core::error::{AuditError, Result};
use audit_core::models::{Candidate, Snapshot};
use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::aggregator::{AggregateReport, Aggregator};
use crate::analyzer::{ComparativeAnalyzer, ComparisonRecord};
use crate::normalizer::TimeSeriesNormalizer;
use crate::reader::{load_region, RegionData};

// ── Public types ──────────────────────────────────────────────────────────────

/// Knobs for a single region's pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisOptions {
    /// Reject duplicate timestamps instead of keeping input order.
    pub strict_timestamps: bool,
}

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    pub snapshots_processed: usize,
    pub comparisons_created: usize,
    /// Wall-clock seconds spent in normalize + compare + aggregate.
    pub analysis_time_seconds: f64,
}

/// The complete output of [`analyze_region`].
#[derive(Debug, Clone, Serialize)]
pub struct RegionAnalysis {
    /// Upper-cased region name.
    pub region: String,
    /// Snapshots in chronological order.
    pub snapshots: Vec<Snapshot>,
    /// One record per adjacent pair of `snapshots`.
    pub records: Vec<ComparisonRecord>,
    pub report: AggregateReport,
    pub metadata: AnalysisMetadata,
}

impl RegionAnalysis {
    /// The most recent snapshot.
    pub fn latest(&self) -> &Snapshot {
        // Construction guarantees at least two snapshots.
        &self.snapshots[self.snapshots.len() - 1]
    }

    pub fn current_total_votes(&self) -> u64 {
        self.latest().total_votes
    }

    /// The candidate's share at the latest snapshot. Backed by the same
    /// value as the time-series shares.
    pub fn current_share(&self, candidate: Candidate) -> f64 {
        self.latest().share(candidate)
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full pipeline over one region's (possibly unordered) snapshots.
///
/// Fails with [`AuditError::InsufficientData`] when fewer than two snapshots
/// are supplied, or [`AuditError::OrderingAmbiguity`] in strict mode.
pub fn analyze_region(
    region: impl Into<String>,
    snapshots: Vec<Snapshot>,
    options: AnalysisOptions,
) -> Result<RegionAnalysis> {
    let region = region.into();
    let start = Instant::now();

    if snapshots.len() < 2 {
        return Err(AuditError::InsufficientData {
            count: snapshots.len(),
        });
    }

    let snapshots = TimeSeriesNormalizer::new(options.strict_timestamps).normalize(snapshots)?;
    let records = ComparativeAnalyzer::compare(&snapshots)?;
    let last = snapshots
        .last()
        .ok_or(AuditError::InsufficientData { count: 0 })?;
    let report = Aggregator::aggregate(&records, last);

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        snapshots_processed: snapshots.len(),
        comparisons_created: records.len(),
        analysis_time_seconds: start.elapsed().as_secs_f64(),
    };

    debug!(
        "region {}: {} lead switches, {} vote drops, total drop {}",
        region,
        report.lead_switch_events.len(),
        report.vote_drop_events.len(),
        report.total_vote_count_drop
    );

    Ok(RegionAnalysis {
        region,
        snapshots,
        records,
        report,
        metadata,
    })
}

/// Load a region file and analyse it.
pub fn analyze_file(path: &Path, options: AnalysisOptions) -> Result<RegionAnalysis> {
    let RegionData { name, snapshots } = load_region(path)?;
    analyze_region(name, snapshots, options)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
