use std::path::PathBuf;

use clap::Parser;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Audit Edison vote-count time series for total-count drops and lead switches
#[derive(Parser, Debug, Clone)]
#[command(
    name = "edison-audit",
    about = "Audit Edison vote-count time series for total-count drops and lead switches",
    version
)]
pub struct Settings {
    /// Region files (one JSON document per state) or directories to scan
    #[arg(value_name = "PATH", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Report output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Maximum number of regions analysed concurrently (1-64)
    #[arg(
        long,
        env = "EDISON_AUDIT_JOBS",
        default_value = "4",
        value_parser = clap::value_parser!(u32).range(1..=64)
    )]
    pub jobs: u32,

    /// Reject a region whose series contains two identical timestamps
    #[arg(long)]
    pub strict_timestamps: bool,

    /// Logging level
    #[arg(
        long,
        env = "EDISON_AUDIT_LOG",
        default_value = "INFO",
        value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"]
    )]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and apply derived overrides.
    pub fn load() -> Self {
        Self::resolve(Self::parse())
    }

    /// Same as [`Settings::load`] but over an explicit argument list.
    pub fn try_load_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args).map(Self::resolve)
    }

    /// `true` when the JSON renderer was selected.
    pub fn wants_json(&self) -> bool {
        self.format == "json"
    }

    /// `--debug` overrides the log level.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}
