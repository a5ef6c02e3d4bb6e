use anyhow::{Context, Result};
use chrono::Local;
use product_eda::ReportPipeline;
use product_eda::config::ReportConfig;
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

struct CliArgs {
    config_path: Option<PathBuf>,
    dataset_path: Option<PathBuf>,
    no_display: bool,
}

fn parse_args() -> Result<CliArgs> {
    let mut args = CliArgs {
        config_path: None,
        dataset_path: None,
        no_display: false,
    };

    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let value = iter.next().context("--config expects a file path")?;
                args.config_path = Some(PathBuf::from(value));
            }
            "--dataset" | "-d" => {
                let value = iter.next().context("--dataset expects a file path")?;
                args.dataset_path = Some(PathBuf::from(value));
            }
            "--no-display" => args.no_display = true,
            other => warn!("Ignoring unrecognised argument: {}", other),
        }
    }

    Ok(args)
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let args = parse_args()?;

    let mut config = ReportConfig::load(args.config_path.as_deref())
        .context("Failed to load report configuration")?;
    config.apply_env_overrides();
    if let Some(path) = args.dataset_path {
        config.dataset.path = path;
    }
    if args.no_display {
        config.display.show = false;
    }

    info!(
        "🚀 Starting product catalog report at {} for {}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        config.dataset_path().display()
    );

    let pipeline = ReportPipeline::new();
    let output = pipeline.run(&config)?;

    println!("{}", serde_json::to_string_pretty(&output.summary)?);

    if config.display.show {
        output.report.show();
    } else {
        info!("Display disabled; {} charts were built and not shown", output.report.len());
    }

    info!("🎉 Report complete");

    Ok(())
}
