//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "on-air-countdown")]
#[command(about = "A broadcast countdown-timer server for on-air events")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// JSON file holding the event catalog
    #[arg(short, long, default_value = "events.json")]
    pub events_file: PathBuf,

    /// Initial start time (HH:MM:SS), overriding the selected event's default
    #[arg(long)]
    pub start: Option<String>,

    /// Initial end time (HH:MM:SS), overriding the selected event's default
    #[arg(long)]
    pub end: Option<String>,

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
