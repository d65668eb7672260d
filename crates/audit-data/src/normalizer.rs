//! Chronological ordering of a region's snapshots.

use audit_core::error::{AuditError, Result};
use audit_core::models::Snapshot;
use tracing::{debug, warn};

/// Sorts snapshots ascending by timestamp.
///
/// The sort is stable, so snapshots sharing a timestamp keep their input
/// order. With `strict` set, such a duplicate is rejected instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeSeriesNormalizer {
    strict: bool,
}

impl TimeSeriesNormalizer {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn normalize(&self, mut snapshots: Vec<Snapshot>) -> Result<Vec<Snapshot>> {
        if snapshots.is_empty() {
            return Err(AuditError::InsufficientData { count: 0 });
        }

        snapshots.sort_by_key(|s| s.timestamp);

        if let Some(pair) = snapshots
            .windows(2)
            .find(|w| w[0].timestamp == w[1].timestamp)
        {
            let ts = pair[0].timestamp;
            if self.strict {
                return Err(AuditError::OrderingAmbiguity(ts));
            }
            warn!("duplicate snapshot timestamp {}; keeping input order", ts);
        }

        debug!("normalized {} snapshots", snapshots.len());
        Ok(snapshots)
    }
}
