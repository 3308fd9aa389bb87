use anyhow::{Result, bail};
use clap::Parser;
use hotfeed_common::observability::{LogConfig, LogFormat, init_logging};
use hotfeed_config::{HotfeedConfig, HotfeedConfigLoader, LoggingConfig};
use std::path::PathBuf;
use tether::{Tether, build_from_config};
mod tether;

/// Fetch trending feeds once and print them as JSON.
#[derive(Debug, Parser)]
#[command(name = "hotfeed", version)]
struct Cli {
    /// YAML config; skipped when missing.
    #[arg(short, long, env = "HOTFEED_CONFIG", default_value = "hotfeed.yaml")]
    config: PathBuf,
    /// Only run the source with this id.
    #[arg(short, long)]
    source: Option<String>,
    #[arg(long)]
    pretty: bool,
}

fn log_config(cfg: &LoggingConfig) -> LogConfig {
    LogConfig {
        app_name: "hotfeed",
        log_dir: cfg.dir.clone(),
        emit_stderr: cfg.emit_stderr,
        format: match cfg.format {
            hotfeed_config::LogFormat::Text => LogFormat::Text,
            hotfeed_config::LogFormat::Json => LogFormat::Json,
        },
        default_filter: cfg.filter.clone(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // env wins over the file
    let cfg: HotfeedConfig = HotfeedConfigLoader::new()
        .with_optional_file(&cli.config)
        .load()?;

    let log_path = init_logging(log_config(&cfg.logging))?;
    tracing::info!(
        config = %cli.config.display(),
        log = %log_path.display(),
        "hotfeed.start"
    );

    let mut tether = Tether::new();
    build_from_config(&mut tether, &cfg, cli.source.as_deref())?;

    let report = tether.run().await;
    let out = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{out}");

    if report.all_failed() {
        bail!("every selected source failed");
    }
    Ok(())
}
