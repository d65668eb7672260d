//! Reduction of a region's comparison records into an [`AggregateReport`].

use std::collections::BTreeMap;

use audit_core::models::{Candidate, Snapshot};
use serde::Serialize;

use crate::analyzer::ComparisonRecord;

// ── AggregateReport ───────────────────────────────────────────────────────────

/// Region-level totals and filtered event lists.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    /// Leader of the final snapshot.
    pub winner: Candidate,
    /// Sum of `amount_dropped` over every record. Never positive.
    pub total_vote_count_drop: i64,
    /// Per candidate, the sum of implied-total changes over `vote_drop_events` only.
    pub candidate_vote_drop_total: BTreeMap<Candidate, f64>,
    /// Records where the leader changed, in chronological order.
    pub lead_switch_events: Vec<ComparisonRecord>,
    /// Records where the total count fell, in chronological order.
    pub vote_drop_events: Vec<ComparisonRecord>,
}

impl AggregateReport {
    pub fn did_total_vote_count_drop(&self) -> bool {
        self.total_vote_count_drop < 0
    }

    /// `candidate_vote_drop_total` for one candidate (`0.0` if absent).
    pub fn candidate_drop_total(&self, candidate: Candidate) -> f64 {
        self.candidate_vote_drop_total
            .get(&candidate)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn did_candidate_vote_count_drop(&self, candidate: Candidate) -> bool {
        self.candidate_drop_total(candidate) < 0.0
    }

    /// `true` when `a` lost more implied votes than `b` during drop intervals
    /// (more negative total means a larger drop).
    pub fn candidate_dropped_more_than(&self, a: Candidate, b: Candidate) -> bool {
        self.candidate_drop_total(a) < self.candidate_drop_total(b)
    }
}

// ── Aggregator ────────────────────────────────────────────────────────────────

/// Stateless helper that folds comparison records into a report.
pub struct Aggregator;

impl Aggregator {
    /// Build the report for one region.
    ///
    /// `last` is the final snapshot of the normalized series and decides
    /// the winner. An empty `records` slice yields zero totals and empty
    /// event lists.
    pub fn aggregate(records: &[ComparisonRecord], last: &Snapshot) -> AggregateReport {
        let total_vote_count_drop = records
            .iter()
            .fold(0i64, |acc, r| acc.saturating_add(r.amount_dropped));

        let vote_drop_events: Vec<ComparisonRecord> =
            records.iter().filter(|r| r.is_vote_drop()).copied().collect();

        let lead_switch_events: Vec<ComparisonRecord> = records
            .iter()
            .filter(|r| r.lead_switched.is_some())
            .copied()
            .collect();

        // Candidate drops are only counted while the total count was also falling.
        let candidate_vote_drop_total: BTreeMap<Candidate, f64> = Candidate::ALL
            .into_iter()
            .map(|c| (c, vote_drop_events.iter().map(|r| r.drop_for(c)).sum::<f64>()))
            .collect();

        AggregateReport {
            winner: last.leader(),
            total_vote_count_drop,
            candidate_vote_drop_total,
            lead_switch_events,
            vote_drop_events,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::ComparativeAnalyzer;
    use chrono::{TimeZone, Utc};

    fn snap(hour: u32, votes: u64, trump: f64, biden: f64) -> Snapshot {
        let ts = Utc.with_ymd_and_hms(2020, 11, 4, hour, 0, 0).unwrap();
        Snapshot::new(ts, votes, trump, biden).unwrap()
    }

    fn report_for(series: &[Snapshot]) -> (Vec<ComparisonRecord>, AggregateReport) {
        let records = ComparativeAnalyzer::compare(series).unwrap();
        let report = Aggregator::aggregate(&records, series.last().unwrap());
        (records, report)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_single_drop_and_switch() {
        let (_, report) = report_for(&[snap(1, 1000, 0.55, 0.45), snap(2, 900, 0.50, 0.50)]);

        assert_eq!(report.winner, Candidate::Biden);
        assert_eq!(report.total_vote_count_drop, -100);
        assert!(report.did_total_vote_count_drop());
        assert_eq!(report.vote_drop_events.len(), 1);
        assert_eq!(report.lead_switch_events.len(), 1);
        assert!(approx(report.candidate_drop_total(Candidate::Trump), -100.0));
        assert!(approx(report.candidate_drop_total(Candidate::Biden), 0.0));
        assert!(report.did_candidate_vote_count_drop(Candidate::Trump));
        assert!(!report.did_candidate_vote_count_drop(Candidate::Biden));
        assert!(report.candidate_dropped_more_than(Candidate::Trump, Candidate::Biden));
        assert!(!report.candidate_dropped_more_than(Candidate::Biden, Candidate::Trump));
    }

    #[test]
    fn test_monotonic_series_has_no_events() {
        let (_, report) = report_for(&[
            snap(1, 100, 0.6, 0.4),
            snap(2, 200, 0.58, 0.41),
            snap(3, 300, 0.57, 0.42),
        ]);

        assert_eq!(report.winner, Candidate::Trump);
        assert_eq!(report.total_vote_count_drop, 0);
        assert!(!report.did_total_vote_count_drop());
        assert!(report.lead_switch_events.is_empty());
        assert!(report.vote_drop_events.is_empty());
        assert_eq!(report.candidate_drop_total(Candidate::Trump), 0.0);
        assert_eq!(report.candidate_drop_total(Candidate::Biden), 0.0);
        assert_eq!(report.candidate_vote_drop_total.len(), 2);
    }

    #[test]
    fn test_candidate_totals_ignore_intervals_without_total_drop() {
        // Interval 1->2: total rises but Trump's implied total falls (-100).
        // Interval 2->3: total drops by 100, Trump -60, Biden -40.
        let (records, report) = report_for(&[
            snap(1, 1000, 0.60, 0.40),
            snap(2, 1100, 0.4545454545454545, 0.5454545454545454),
            snap(3, 1000, 0.44, 0.56),
        ]);

        assert!(records[0].trump_drop < 0.0);
        assert_eq!(records[0].amount_dropped, 0);

        let expected_trump: f64 = report.vote_drop_events.iter().map(|r| r.trump_drop).sum();
        let expected_biden: f64 = report.vote_drop_events.iter().map(|r| r.biden_drop).sum();
        assert_eq!(report.candidate_drop_total(Candidate::Trump), expected_trump);
        assert_eq!(report.candidate_drop_total(Candidate::Biden), expected_biden);

        let unfiltered_trump: f64 = records.iter().map(|r| r.trump_drop).sum();
        assert!(!approx(report.candidate_drop_total(Candidate::Trump), unfiltered_trump));
        assert!(approx(report.candidate_drop_total(Candidate::Trump), -60.0));
        assert!(approx(report.candidate_drop_total(Candidate::Biden), -40.0));
    }

    #[test]
    fn test_total_drop_is_sum_of_amount_dropped() {
        let (records, report) = report_for(&[
            snap(1, 500, 0.5, 0.4),
            snap(2, 450, 0.5, 0.4),
            snap(3, 800, 0.5, 0.4),
            snap(4, 780, 0.5, 0.4),
            snap(5, 100, 0.5, 0.4),
        ]);
        let sum: i64 = records.iter().map(|r| r.amount_dropped).sum();
        assert_eq!(report.total_vote_count_drop, sum);
        assert_eq!(report.total_vote_count_drop, -50 - 20 - 680);
        assert_eq!(report.vote_drop_events.len(), 3);
    }

    #[test]
    fn test_total_drop_saturates_instead_of_overflowing() {
        let top = i64::MAX as u64;
        let (records, report) = report_for(&[
            snap(1, top, 0.5, 0.4),
            snap(2, 0, 0.5, 0.4),
            snap(3, top, 0.5, 0.4),
            snap(4, 0, 0.5, 0.4),
        ]);
        assert_eq!(records[0].amount_dropped, -i64::MAX);
        assert_eq!(records[2].amount_dropped, -i64::MAX);
        assert_eq!(report.total_vote_count_drop, i64::MIN);
        assert_eq!(report.vote_drop_events.len(), 2);
    }

    #[test]
    fn test_event_lists_preserve_order() {
        let (_, report) = report_for(&[
            snap(1, 100, 0.6, 0.4),
            snap(2, 90, 0.4, 0.6),
            snap(3, 95, 0.6, 0.4),
            snap(4, 80, 0.6, 0.4),
        ]);
        let switch_times: Vec<_> = report
            .lead_switch_events
            .iter()
            .map(|r| r.current.timestamp)
            .collect();
        assert!(switch_times.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(report.lead_switch_events.len(), 2);
        assert_eq!(
            report.lead_switch_events[0].lead_switched,
            Some(Candidate::Biden)
        );
        assert_eq!(
            report.lead_switch_events[1].lead_switched,
            Some(Candidate::Trump)
        );
        let drop_amounts: Vec<i64> = report
            .vote_drop_events
            .iter()
            .map(|r| r.amount_dropped)
            .collect();
        assert_eq!(drop_amounts, vec![-10, -15]);
    }

    #[test]
    fn test_winner_is_leader_of_last_snapshot() {
        let series = [snap(1, 100, 0.2, 0.7), snap(2, 200, 0.5, 0.5)];
        let (_, report) = report_for(&series);
        assert_eq!(report.winner, series[1].leader());
        assert_eq!(report.winner, Candidate::Biden);
    }

    #[test]
    fn test_empty_records_give_degenerate_report() {
        let last = snap(1, 100, 0.6, 0.3);
        let report = Aggregator::aggregate(&[], &last);
        assert_eq!(report.total_vote_count_drop, 0);
        assert!(report.vote_drop_events.is_empty());
        assert!(report.lead_switch_events.is_empty());
        assert_eq!(report.candidate_drop_total(Candidate::Biden), 0.0);
    }

    #[test]
    fn test_report_serializes_candidate_keys() {
        let (_, report) = report_for(&[snap(1, 1000, 0.55, 0.45), snap(2, 900, 0.50, 0.50)]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["winner"], "biden");
        assert_eq!(json["total_vote_count_drop"], -100);
        assert!(json["candidate_vote_drop_total"].get("trump").is_some());
        assert_eq!(json["vote_drop_events"][0]["lead_switched"], "biden");
    }
}
