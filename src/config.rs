//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "focusdesk")]
#[command(about = "A state-managed HTTP server for a personal productivity dashboard")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "8090")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Initial focus phase length in minutes
    #[arg(long, default_value = "25")]
    pub focus_minutes: u64,

    /// Initial break phase length in minutes
    #[arg(long, default_value = "5")]
    pub break_minutes: u64,

    /// Initial number of focus cycles per session
    #[arg(long, default_value = "4")]
    pub cycles: u64,

    /// Playback length of the alarm sound in seconds
    #[arg(long, default_value = "8")]
    pub alarm_seconds: u64,

    /// Directory holding the expense log store
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

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
}
