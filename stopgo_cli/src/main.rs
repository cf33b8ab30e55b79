#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! CLI entrypoint for the stop/go classification tools.
//!
//! Responsibilities:
//! - Parse config/flags and assemble the classifier
//! - Initialize tracing and manage log sinks
//! - Offer `--json` mode emitting stable JSONL lines to stdout (logs to stderr)
//! - Map domain error classes to stable exit codes

mod classify;
mod cli;
mod error_fmt;
mod tracing_setup;

use std::fs;

use clap::Parser;
use eyre::WrapErr;
use serde_json::json;
use stopgo_config::Config;

use cli::{Cli, Commands, JSON_MODE};
use error_fmt::{exit_code_for_error, format_error_json, humanize};
use tracing_setup::init_tracing;

fn main() -> eyre::Result<()> {
    // Initialize pretty error reports early
    let _ = color_eyre::install();

    if let Err(e) = real_main() {
        let json = *JSON_MODE.get().unwrap_or(&false);
        let code = exit_code_for_error(&e);
        if json {
            println!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(code);
    }
    Ok(())
}

fn real_main() -> eyre::Result<()> {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    // 1) Load typed config from TOML (documented defaults when omitted)
    let cfg: Config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .wrap_err_with(|| format!("read config {}", path.display()))?;
            toml::from_str(&text).wrap_err_with(|| format!("parse config {}", path.display()))?
        }
        None => Config::default(),
    };

    // Validate configuration with clear errors
    cfg.validate().wrap_err("invalid configuration")?;

    init_tracing(
        cli.json,
        &cli.log_level,
        cfg.logging.file.as_deref(),
        cfg.logging.rotation.as_deref(),
    );

    match cli.cmd {
        Commands::Classify { trace, stops_only } => {
            classify::run(&cfg, &trace, cli.json, stops_only)
        }
        Commands::ValidateConfig => {
            if cli.json {
                println!("{}", json!({"event": "config", "valid": true}));
            } else {
                println!("configuration ok");
            }
            Ok(())
        }
    }
}
