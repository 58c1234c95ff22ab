// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![allow(unknown_lints, renamed_and_removed_lints, max_lines_per_file)]
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

use centy_compact::logging::{
    default_log_dir, init_logging, parse_rotation, LogConfig, LOG_FILENAME,
};
use centy_compact::user_config::{load_user_config, UserConfig};
use centy_compact::{run_compact, CompactMode, CompactOptions, LocalFeatureStore};
use clap::Parser;
use color_eyre::eyre::Result;
use std::path::PathBuf;
use tracing::warn;

/// Centy Compact - fold finished issues into the project's features summary
///
/// Without flags, prints the compaction context to hand to an LLM. Save the
/// LLM's reply and pass it back with --apply.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// List uncompacted issues instead of building the context
    #[arg(long, env = "CENTY_COMPACT_LIST")]
    list: bool,

    /// Print the --list inventory as JSON
    #[arg(long, env = "CENTY_COMPACT_JSON")]
    json: bool,

    /// Write the context to this file instead of stdout
    #[arg(short, long, env = "CENTY_COMPACT_OUTPUT")]
    output: Option<PathBuf>,

    /// Apply an LLM reply read from this file ("-" reads stdin)
    #[arg(short, long, env = "CENTY_COMPACT_APPLY")]
    apply: Option<PathBuf>,

    /// Project directory (default: current directory)
    #[arg(short, long, env = "CENTY_PROJECT", default_value = ".")]
    project: PathBuf,

    /// Enable JSON log format
    #[arg(long, env = "CENTY_LOG_JSON")]
    log_json: bool,

    /// Log rotation period: daily, hourly, or never
    #[arg(long, env = "CENTY_LOG_ROTATION")]
    log_rotation: Option<String>,

    /// Custom log directory (default: ~/.centy/logs)
    #[arg(long, env = "CENTY_LOG_DIR")]
    log_dir: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Install color-eyre error hooks for colored error output
    color_eyre::install()?;

    let args = Args::parse();

    // Load user-level config (~/.centy/config.toml) first; it supplies
    // logging defaults. A broken file is reported once logging is up.
    let (user_cfg, user_cfg_error) = match load_user_config() {
        Ok(cfg) => (cfg, None),
        Err(e) => (UserConfig::default(), Some(e)),
    };

    let log_dir = args
        .log_dir
        .or_else(|| user_cfg.logging.dir.clone())
        .map_or_else(default_log_dir, PathBuf::from);
    let rotation = args
        .log_rotation
        .as_deref()
        .unwrap_or(&user_cfg.logging.rotation);

    let log_config = LogConfig {
        log_dir: log_dir.clone(),
        json_format: args.log_json || user_cfg.logging.json,
        rotation: parse_rotation(rotation),
        ..Default::default()
    };

    if let Err(e) = init_logging(log_config) {
        eprintln!();
        eprintln!("Error: Failed to initialize logging: {e}");
        eprintln!("Logs: {}", log_dir.join(LOG_FILENAME).display());
        eprintln!();
        return Err(e);
    }

    if let Some(e) = user_cfg_error {
        warn!("Failed to load user config, using defaults: {e}");
    }

    let mode = CompactMode::select(&CompactOptions {
        apply: args.apply,
        list: args.list,
        json: args.json,
        output: args.output,
    });

    let store = LocalFeatureStore::new();
    let mut stdout = std::io::stdout();
    run_compact(&store, &args.project, &mode, &mut stdout).await?;
    Ok(())
}
