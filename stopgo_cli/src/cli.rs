//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "stopgo", version, about = "Stop/go trace classification CLI")]
pub struct Cli {
    /// Path to config TOML; the documented defaults apply when omitted
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit stable JSON lines to stdout instead of human output (logs go to stderr)
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a position trace into stops and trips
    Classify {
        /// Trace CSV with headers ts,x,y or ts,x,y,motion_score
        #[arg(long, value_name = "FILE")]
        trace: PathBuf,

        /// Print only the stop intervals
        #[arg(long, action = ArgAction::SetTrue)]
        stops_only: bool,
    },
    /// Parse and validate the config file, then exit
    ValidateConfig,
}
