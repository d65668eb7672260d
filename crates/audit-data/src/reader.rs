//! Region file discovery and loading.
//!
//! Each region (state) is one Edison JSON document whose series lives at
//! `data.races[0].timeseries`. This module turns such a document into
//! [`Snapshot`]s; ordering is left to the normalizer.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use audit_core::error::{AuditError, Result};
use audit_core::models::{Candidate, Snapshot};
use audit_core::timestamps::parse_timestamp;
use serde::Deserialize;
use tracing::{debug, warn};

// ── Raw document shape ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct EdisonDocument {
    data: Option<EdisonData>,
}

#[derive(Debug, Deserialize)]
struct EdisonData {
    #[serde(default)]
    races: Vec<EdisonRace>,
}

#[derive(Debug, Deserialize)]
struct EdisonRace {
    timeseries: Option<Vec<RawSnapshot>>,
}

/// One series entry as it appears on disk. Feeds use the plural
/// `vote_shares` key, the singular `vote_share` key, or both; the plural
/// one wins when both are present.
#[derive(Debug, Deserialize)]
struct RawSnapshot {
    timestamp: Option<String>,
    votes: Option<i64>,
    vote_shares: Option<HashMap<String, f64>>,
    vote_share: Option<HashMap<String, f64>>,
}

// ── RegionData ────────────────────────────────────────────────────────────────

/// The snapshots of a single region, in file order.
#[derive(Debug, Clone)]
pub struct RegionData {
    /// Upper-cased region name, e.g. `"PENNSYLVANIA"`.
    pub name: String,
    /// Snapshots exactly as listed in the source (not yet sorted).
    pub snapshots: Vec<Snapshot>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Region name derived from a file path: the upper-cased file stem.
pub fn region_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_uppercase())
        .unwrap_or_default()
}

/// Find all `.json` files recursively under `dir`, sorted by path.
pub fn find_json_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "json")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Expand CLI inputs into the list of region files to audit.
///
/// Files are kept as given; directories are scanned with
/// [`find_json_files`]. Order follows `inputs`.
pub fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if !input.exists() {
            return Err(AuditError::DataPathNotFound(input.clone()));
        }
        if input.is_dir() {
            let found = find_json_files(input);
            if found.is_empty() {
                return Err(AuditError::NoDataFiles(input.clone()));
            }
            debug!("found {} region files in {}", found.len(), input.display());
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

/// Read and parse one region file.
pub fn load_region(path: &Path) -> Result<RegionData> {
    let content = std::fs::read_to_string(path).map_err(|source| AuditError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_region(region_name(path), &content)
}

/// Parse an Edison document already held in memory.
pub fn parse_region(name: impl Into<String>, json: &str) -> Result<RegionData> {
    let name = name.into();
    let doc: EdisonDocument = serde_json::from_str(json)?;

    let race = doc
        .data
        .ok_or_else(|| AuditError::Schema("missing `data` object".to_string()))?
        .races
        .into_iter()
        .next()
        .ok_or_else(|| AuditError::Schema("missing `data.races[0]`".to_string()))?;

    let raw = race
        .timeseries
        .ok_or_else(|| AuditError::Schema("missing `data.races[0].timeseries`".to_string()))?;

    let snapshots = raw
        .into_iter()
        .enumerate()
        .map(|(index, entry)| to_snapshot(index, entry))
        .collect::<Result<Vec<_>>>()?;

    if snapshots.is_empty() {
        warn!("region {} has an empty time series", name);
    }
    debug!("parsed {} snapshots for region {}", snapshots.len(), name);

    Ok(RegionData { name, snapshots })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn to_snapshot(index: usize, raw: RawSnapshot) -> Result<Snapshot> {
    let missing = |field: &str| AuditError::Schema(format!("entry {}: missing `{}`", index, field));

    let timestamp = parse_timestamp(&raw.timestamp.ok_or_else(|| missing("timestamp"))?)?;

    let votes = raw.votes.ok_or_else(|| missing("votes"))?;
    let total_votes = u64::try_from(votes).map_err(|_| {
        AuditError::Schema(format!("entry {}: negative vote total {}", index, votes))
    })?;

    let shares = raw
        .vote_shares
        .or(raw.vote_share)
        .ok_or_else(|| missing("vote_shares"))?;
    let share = |candidate: Candidate| {
        shares
            .get(candidate.source_key())
            .copied()
            .ok_or_else(|| missing(&format!("vote_shares.{}", candidate.source_key())))
    };

    Snapshot::new(
        timestamp,
        total_votes,
        share(Candidate::Trump)?,
        share(Candidate::Biden)?,
    )
    .map_err(|e| match e {
        AuditError::Schema(msg) => AuditError::Schema(format!("entry {}: {}", index, msg)),
        other => other,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
