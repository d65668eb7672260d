use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};

/// A candidate tracked by the audit.
///
/// Declaration order matters: on an exact share tie the later candidate
/// (Biden) is treated as the leader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Candidate {
    Trump,
    Biden,
}

impl Candidate {
    /// Every tracked candidate, in declaration order.
    pub const ALL: [Candidate; 2] = [Candidate::Trump, Candidate::Biden];

    /// Key used for this candidate inside the Edison `vote_shares` object.
    pub fn source_key(self) -> &'static str {
        match self {
            Candidate::Trump => "trumpd",
            Candidate::Biden => "bidenj",
        }
    }

    /// Capitalised display name, e.g. `"Biden"`.
    pub fn display_name(self) -> &'static str {
        match self {
            Candidate::Trump => "Trump",
            Candidate::Biden => "Biden",
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One timestamped observation of a region's running tally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Reporting instant (UTC).
    pub timestamp: DateTime<Utc>,
    /// Total votes counted in the region as of `timestamp`.
    pub total_votes: u64,
    /// Trump's fraction of `total_votes`, in `[0, 1]`.
    pub vote_share_trump: f64,
    /// Biden's fraction of `total_votes`, in `[0, 1]`.
    pub vote_share_biden: f64,
}

impl Snapshot {
    /// Build a snapshot, rejecting shares that are not finite or fall
    /// outside `[0, 1]` and totals that do not fit in an `i64`.
    pub fn new(
        timestamp: DateTime<Utc>,
        total_votes: u64,
        vote_share_trump: f64,
        vote_share_biden: f64,
    ) -> Result<Self> {
        if i64::try_from(total_votes).is_err() {
            return Err(AuditError::Schema(format!(
                "total votes at {} out of range: {}",
                timestamp, total_votes
            )));
        }

        for (candidate, share) in [
            (Candidate::Trump, vote_share_trump),
            (Candidate::Biden, vote_share_biden),
        ] {
            if !share.is_finite() || !(0.0..=1.0).contains(&share) {
                return Err(AuditError::Schema(format!(
                    "vote share for {} at {} is outside [0, 1]: {}",
                    candidate, timestamp, share
                )));
            }
        }

        Ok(Self {
            timestamp,
            total_votes,
            vote_share_trump,
            vote_share_biden,
        })
    }

    /// The candidate's fraction of the total at this instant.
    pub fn share(&self, candidate: Candidate) -> f64 {
        match candidate {
            Candidate::Trump => self.vote_share_trump,
            Candidate::Biden => self.vote_share_biden,
        }
    }

    /// `share * total_votes`: the candidate's vote count implied by this snapshot.
    pub fn implied_total(&self, candidate: Candidate) -> f64 {
        self.share(candidate) * self.total_votes as f64
    }

    /// Strict-majority leader. Trump leads only with a strictly greater
    /// share; a tie goes to Biden.
    pub fn leader(&self) -> Candidate {
        if self.vote_share_trump > self.vote_share_biden {
            Candidate::Trump
        } else {
            Candidate::Biden
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 11, 4, 3, 0, 0).unwrap()
    }

    #[test]
    fn test_leader_strictly_greater_is_trump() {
        let s = Snapshot::new(ts(), 100, 0.51, 0.49).unwrap();
        assert_eq!(s.leader(), Candidate::Trump);
    }

    #[test]
    fn test_leader_tie_goes_to_biden() {
        let s = Snapshot::new(ts(), 100, 0.5, 0.5).unwrap();
        assert_eq!(s.leader(), Candidate::Biden);
    }

    #[test]
    fn test_leader_lower_trump_share_is_biden() {
        let s = Snapshot::new(ts(), 100, 0.3, 0.6).unwrap();
        assert_eq!(s.leader(), Candidate::Biden);
    }

    #[test]
    fn test_implied_total() {
        let s = Snapshot::new(ts(), 1000, 0.55, 0.45).unwrap();
        assert!((s.implied_total(Candidate::Trump) - 550.0).abs() < 1e-9);
        assert!((s.implied_total(Candidate::Biden) - 450.0).abs() < 1e-9);
    }

    #[test]
    fn test_shares_need_not_sum_to_one() {
        assert!(Snapshot::new(ts(), 10, 0.4, 0.4).is_ok());
    }

    #[test]
    fn test_new_rejects_share_above_one() {
        let err = Snapshot::new(ts(), 10, 1.2, 0.1).unwrap_err();
        assert!(matches!(err, AuditError::Schema(_)));
    }

    #[test]
    fn test_new_rejects_total_beyond_i64() {
        let err = Snapshot::new(ts(), u64::MAX, 0.5, 0.5).unwrap_err();
        assert!(matches!(err, AuditError::Schema(_)));
        assert!(Snapshot::new(ts(), i64::MAX as u64, 0.5, 0.5).is_ok());
    }

    #[test]
    fn test_new_rejects_nan_share() {
        assert!(Snapshot::new(ts(), 10, 0.1, f64::NAN).is_err());
    }

    #[test]
    fn test_candidate_keys_and_serde() {
        assert_eq!(Candidate::Trump.source_key(), "trumpd");
        assert_eq!(Candidate::Biden.source_key(), "bidenj");
        assert_eq!(serde_json::to_string(&Candidate::Biden).unwrap(), "\"biden\"");
        assert_eq!(Candidate::Trump.to_string(), "Trump");
    }
}
