use crate::config::toml_config::{AppConfig, LogFormat};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "small-library")]
#[command(about = "Catalog, membership and lending records for a small library")]
pub struct CliArgs {
    /// Path to a TOML configuration file (defaults to ./library.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding books.txt and members.txt
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Treat this date (YYYY-MM-DD) as today for loans and fines
    #[arg(long)]
    pub today: Option<NaiveDate>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Write logs as JSON")]
    pub json_logs: bool,
}

impl CliArgs {
    /// Command-line flags win over the configuration file.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(data_dir) = &self.data_dir {
            config.storage.data_dir = data_dir.clone();
        }
        if self.json_logs {
            config.logging.format = LogFormat::Json;
        }
    }
}
