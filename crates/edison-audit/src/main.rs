mod bootstrap;
mod report;

use anyhow::Result;
use audit_core::settings::Settings;
use audit_data::analysis::AnalysisOptions;
use audit_data::reader::expand_inputs;
use audit_runtime::batch::BatchAuditor;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("edison-audit v{} starting", env!("CARGO_PKG_VERSION"));

    let files = expand_inputs(&settings.inputs)?;
    tracing::info!(
        "auditing {} region file(s) with up to {} concurrent job(s)",
        files.len(),
        settings.jobs
    );

    let auditor = BatchAuditor::new(
        settings.jobs,
        AnalysisOptions {
            strict_timestamps: settings.strict_timestamps,
        },
    );
    let outcomes = auditor.run(files).await;

    if settings.wants_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&report::render_json(&outcomes))?
        );
    } else {
        for outcome in &outcomes {
            match &outcome.result {
                Ok(analysis) => print!("{}", report::render_text(analysis)),
                Err(e) => eprintln!("SKIPPING {}: {}", outcome.region, e),
            }
        }
    }

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} regions could not be audited", failed, outcomes.len());
    }

    Ok(())
}
