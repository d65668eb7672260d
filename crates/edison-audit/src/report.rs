//! Text and JSON rendering of audit results.

use std::fmt::{self, Write};

use audit_core::formatting::{format_number, format_share, format_votes};
use audit_core::models::Candidate;
use audit_data::analysis::RegionAnalysis;
use audit_runtime::batch::RegionOutcome;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

const SPACER: &str = "------------------------------------------";

fn ts(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn lead_line(switched: Option<Candidate>) -> String {
    match switched {
        Some(c) => format!("The lead switched in {}'s favor", c),
        None => "The lead did not switch".to_string(),
    }
}

fn section_header(out: &mut impl Write, title: &str) -> fmt::Result {
    writeln!(out, "{}", SPACER)?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", SPACER)
}

fn section_footer(out: &mut impl Write) -> fmt::Result {
    writeln!(out, "{}", SPACER)?;
    writeln!(out)?;
    writeln!(out)
}

// ── Text ──────────────────────────────────────────────────────────────────────

/// Render the full text report for one region.
pub fn render_text(analysis: &RegionAnalysis) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_region(&mut out, analysis);
    out
}

fn write_region(out: &mut impl Write, a: &RegionAnalysis) -> fmt::Result {
    let region = &a.region;
    let report = &a.report;

    writeln!(out, "EVALUATING {}", region)?;
    writeln!(
        out,
        "Current count: {} votes, Trump {}, Biden {} (winner: {})",
        format_votes(i64::try_from(a.current_total_votes()).unwrap_or(i64::MAX)),
        format_share(a.current_share(Candidate::Trump)),
        format_share(a.current_share(Candidate::Biden)),
        report.winner
    )?;
    writeln!(out)?;

    section_header(out, &format!("TIMES LEAD SWITCHED IN {}", region))?;
    for r in &report.lead_switch_events {
        let counts = if r.amount_dropped == 0 {
            "did not drop".to_string()
        } else {
            format!("dropped by {}", format_votes(r.amount_dropped))
        };
        writeln!(out, "{} at {}", lead_line(r.lead_switched), ts(r.current.timestamp))?;
        writeln!(out, "Total vote counts {}", counts)?;
        writeln!(out)?;
    }
    writeln!(
        out,
        "TOTAL DROP FOR STATE WAS {}",
        format_votes(report.total_vote_count_drop)
    )?;
    section_footer(out)?;

    section_header(out, &format!("TIMES TOTAL COUNT DROPPED IN {}", region))?;
    for r in &report.vote_drop_events {
        writeln!(out, "total count dropped by {}", format_votes(r.amount_dropped))?;
        writeln!(
            out,
            "between {} and {}",
            ts(r.previous.timestamp),
            ts(r.current.timestamp)
        )?;
        writeln!(out, "{}", lead_line(r.lead_switched))?;
        writeln!(out)?;
    }
    writeln!(
        out,
        "TOTAL DROP FOR STATE WAS {}",
        format_votes(report.total_vote_count_drop)
    )?;
    section_footer(out)?;

    for candidate in Candidate::ALL {
        write_candidate_section(out, a, candidate)?;
    }

    writeln!(out, "SUMMARY FOR {}", region)?;
    writeln!(
        out,
        "total vote count dropped: {}",
        yes_no(report.did_total_vote_count_drop())
    )?;
    for candidate in Candidate::ALL {
        writeln!(
            out,
            "{} implied total dropped during count drops: {} ({})",
            candidate,
            yes_no(report.did_candidate_vote_count_drop(candidate)),
            format_number(report.candidate_drop_total(candidate), 2)
        )?;
    }
    writeln!(
        out,
        "Biden dropped more than Trump: {}",
        yes_no(report.candidate_dropped_more_than(Candidate::Biden, Candidate::Trump))
    )?;
    writeln!(out)
}

/// Every interval where the candidate's implied total fell, regardless of
/// whether the overall count fell with it.
fn write_candidate_section(
    out: &mut impl Write,
    a: &RegionAnalysis,
    candidate: Candidate,
) -> fmt::Result {
    section_header(
        out,
        &format!(
            "TIMES {}'s TOTAL DROPPED IN {}",
            candidate.display_name().to_uppercase(),
            a.region
        ),
    )?;

    let mut total_drop = 0.0;
    for r in &a.records {
        let Some(decrease) = r.candidate_decrease(candidate) else {
            continue;
        };
        writeln!(
            out,
            "AT {}, {}'s total dropped by {}",
            ts(r.current.timestamp),
            candidate,
            format_number(decrease, 2)
        )?;
        writeln!(
            out,
            "Total drop for timeframe was {}",
            format_votes(r.amount_dropped)
        )?;
        writeln!(out, "{}", lead_line(r.lead_switched))?;
        writeln!(out)?;
        total_drop += decrease;
    }

    writeln!(
        out,
        "TOTAL DROP FOR {} WAS {}",
        candidate.display_name().to_uppercase(),
        format_number(total_drop, 2)
    )?;
    section_footer(out)
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

// ── JSON ──────────────────────────────────────────────────────────────────────

/// Render all outcomes as one JSON array; failed regions carry an `error`.
pub fn render_json(outcomes: &[RegionOutcome]) -> Value {
    let regions: Vec<Value> = outcomes
        .iter()
        .map(|o| match &o.result {
            Ok(analysis) => json!({
                "region": o.region,
                "path": o.path.display().to_string(),
                "analysis": analysis,
            }),
            Err(e) => json!({
                "region": o.region,
                "path": o.path.display().to_string(),
                "error": e.to_string(),
            }),
        })
        .collect();
    Value::Array(regions)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
