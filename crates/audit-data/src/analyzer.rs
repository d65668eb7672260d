//! Pairwise comparison of consecutive snapshots.
//!
//! Produces one [`ComparisonRecord`] per adjacent pair of a chronologically
//! ordered series, flagging lead switches, drops in the total count and the
//! change in each candidate's implied vote total.

use audit_core::error::{AuditError, Result};
use audit_core::models::{Candidate, Snapshot};
use serde::Serialize;
use tracing::debug;

// ── ComparisonRecord ──────────────────────────────────────────────────────────

/// The derived comparison of one `(previous, current)` snapshot pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonRecord {
    /// New leader, present only when the leader changed between the two snapshots.
    pub lead_switched: Option<Candidate>,
    /// `current.total_votes - previous.total_votes` when negative, else `0`.
    pub amount_dropped: i64,
    /// Change in Trump's implied vote total. Signed, never clamped.
    pub trump_drop: f64,
    /// Change in Biden's implied vote total. Signed, never clamped.
    pub biden_drop: f64,
    pub previous: Snapshot,
    pub current: Snapshot,
}

impl ComparisonRecord {
    /// Signed change in `candidate`'s implied total across this interval.
    pub fn drop_for(&self, candidate: Candidate) -> f64 {
        match candidate {
            Candidate::Trump => self.trump_drop,
            Candidate::Biden => self.biden_drop,
        }
    }

    /// The change in `candidate`'s implied total, only when it decreased.
    pub fn candidate_decrease(&self, candidate: Candidate) -> Option<f64> {
        let delta = self.drop_for(candidate);
        (delta < 0.0).then_some(delta)
    }

    /// `true` when the total count fell across this interval.
    pub fn is_vote_drop(&self) -> bool {
        self.amount_dropped != 0
    }
}

// ── ComparativeAnalyzer ───────────────────────────────────────────────────────

/// Stateless helper that compares adjacent snapshots.
pub struct ComparativeAnalyzer;

impl ComparativeAnalyzer {
    /// Compare every adjacent pair of an already-normalized series.
    ///
    /// Returns `n - 1` records in chronological order, or
    /// [`AuditError::InsufficientData`] when fewer than two snapshots exist.
    pub fn compare(snapshots: &[Snapshot]) -> Result<Vec<ComparisonRecord>> {
        if snapshots.len() < 2 {
            return Err(AuditError::InsufficientData {
                count: snapshots.len(),
            });
        }

        let records: Vec<ComparisonRecord> = snapshots
            .windows(2)
            .map(|pair| Self::compare_pair(&pair[0], &pair[1]))
            .collect();

        debug!(
            "ComparativeAnalyzer: {} records from {} snapshots",
            records.len(),
            snapshots.len()
        );
        Ok(records)
    }

    /// Derive the [`ComparisonRecord`] for a single pair.
    pub fn compare_pair(previous: &Snapshot, current: &Snapshot) -> ComparisonRecord {
        let current_lead = current.leader();
        let lead_switched = (current_lead != previous.leader()).then_some(current_lead);

        let amount_dropped = match previous.total_votes.checked_sub(current.total_votes) {
            Some(fall) if fall > 0 => i64::try_from(fall).map_or(i64::MIN, |f| -f),
            _ => 0,
        };

        let implied_change = |candidate: Candidate| {
            current.implied_total(candidate) - previous.implied_total(candidate)
        };

        ComparisonRecord {
            lead_switched,
            amount_dropped,
            trump_drop: implied_change(Candidate::Trump),
            biden_drop: implied_change(Candidate::Biden),
            previous: *previous,
            current: *current,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
