//! Concurrent multi-region batch runner.
//!
//! Each region file is analysed on tokio's blocking pool, bounded by a
//! [`Semaphore`]. Regions share nothing, so a failure is recorded in that
//! region's [`RegionOutcome`] and the remaining regions carry on.

use std::path::PathBuf;
use std::sync::Arc;

use audit_core::error::{AuditError, Result};
use audit_data::analysis::{analyze_file, AnalysisOptions, RegionAnalysis};
use audit_data::reader::region_name;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

// ── Public types ──────────────────────────────────────────────────────────────

/// The result of auditing a single region file.
#[derive(Debug)]
pub struct RegionOutcome {
    /// Region file that was analysed.
    pub path: PathBuf,
    /// Upper-cased region name derived from `path`.
    pub region: String,
    pub result: Result<RegionAnalysis>,
}

impl RegionOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

// ── BatchAuditor ──────────────────────────────────────────────────────────────

/// Runs the per-region pipeline over many files at once.
pub struct BatchAuditor {
    /// Maximum number of regions analysed at the same time.
    max_concurrency: usize,
    options: AnalysisOptions,
}

impl BatchAuditor {
    /// Create a new auditor. A `max_concurrency` of zero is treated as one.
    pub fn new(max_concurrency: u32, options: AnalysisOptions) -> Self {
        Self {
            max_concurrency: max_concurrency.max(1) as usize,
            options,
        }
    }

    /// Audit every file in `paths`.
    ///
    /// Outcomes are returned in the same order as `paths`, one per file.
    pub async fn run(&self, paths: Vec<PathBuf>) -> Vec<RegionOutcome> {
        let total = paths.len();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for (index, path) in paths.iter().cloned().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let options = self.options;

            tasks.spawn(async move {
                // The semaphore is never closed, so acquisition only fails on shutdown.
                let _permit = semaphore.acquire_owned().await.ok();
                let task_path = path.clone();
                let result = tokio::task::spawn_blocking(move || analyze_file(&task_path, options))
                    .await
                    .map_err(|e| {
                        AuditError::Other(anyhow::anyhow!("region task did not complete: {}", e))
                    })
                    .and_then(|r| r);
                (index, path, result)
            });
        }

        let mut outcomes: Vec<(usize, RegionOutcome)> = Vec::with_capacity(total);
        let mut aborted: Option<String> = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, path, result)) => {
                    let region = region_name(&path);
                    match &result {
                        Ok(analysis) => tracing::debug!(
                            "region {} analysed: {} comparisons",
                            region,
                            analysis.records.len()
                        ),
                        Err(e) => tracing::warn!("region {} failed: {}", region, e),
                    }
                    outcomes.push((
                        index,
                        RegionOutcome {
                            path,
                            region,
                            result,
                        },
                    ));
                }
                Err(e) => {
                    tracing::error!("region task aborted: {}", e);
                    aborted = Some(e.to_string());
                }
            }
        }

        if let Some(reason) = aborted {
            fill_aborted(&paths, &mut outcomes, &reason);
        }
        outcomes.sort_by_key(|(index, _)| *index);

        let failed = outcomes.iter().filter(|(_, o)| !o.is_ok()).count();
        tracing::info!(
            "batch complete: {} regions, {} failed",
            outcomes.len(),
            failed
        );

        outcomes.into_iter().map(|(_, outcome)| outcome).collect()
    }
}

/// Add a failed outcome for every path whose task never reported back.
///
/// A panicking or cancelled task loses its `(index, path)` along with its
/// result, so the missing indices are recovered from `paths`.
fn fill_aborted(paths: &[PathBuf], outcomes: &mut Vec<(usize, RegionOutcome)>, reason: &str) {
    let mut reported = vec![false; paths.len()];
    for (index, _) in outcomes.iter() {
        reported[*index] = true;
    }
    for (index, path) in paths.iter().enumerate() {
        if reported[index] {
            continue;
        }
        outcomes.push((
            index,
            RegionOutcome {
                region: region_name(path),
                path: path.clone(),
                result: Err(AuditError::Other(anyhow::anyhow!(
                    "region task aborted: {}",
                    reason
                ))),
            },
        ));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
