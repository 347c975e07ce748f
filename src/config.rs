//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

use crate::store::JsonFileStore;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "accessibly")]
#[command(about = "Accessibility display presets and a focus timer for your editor")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Focus session length in minutes (1-59, shown as MM:SS)
    #[arg(
        short = 'm',
        long,
        default_value = "25",
        value_parser = clap::value_parser!(u64).range(1..60)
    )]
    pub focus_minutes: u64,

    /// Directory holding settings.json and state.json
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Keep settings and snapshots in memory only
    #[arg(long, conflicts_with = "data_dir")]
    pub ephemeral: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn focus_seconds(&self) -> u64 {
        self.focus_minutes * 60
    }

    /// Directory for the file stores: `--data-dir`, else the platform data dir
    pub fn resolve_data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(JsonFileStore::default_dir)
    }
}
