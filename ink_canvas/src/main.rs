//! ink_canvas: interactive entry point.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ink_canvas::app::run;
use ink_canvas::config::{AppConfig, SourceKind};

const TRACKER_HINT: &str = "Please make sure the hand tracker is connected and try again.";

/// Command-line arguments for ink_canvas
#[derive(Parser, Debug)]
#[command(name = "ink_canvas")]
#[command(version, about = "Draw on a canvas with your fingertip", long_about = None)]
pub struct Args {
    /// Configuration file path (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Point source
    #[arg(short, long, value_enum)]
    pub source: Option<SourceKind>,

    /// Minimum fingertip movement in pixels before ink is laid down
    #[arg(short, long)]
    pub threshold: Option<f32>,

    /// Canvas width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log format (json|pretty|compact)
    #[arg(long, default_value = "pretty")]
    pub log_format: String,
}

fn main() {
    let args = Args::parse();
    init_logging(&args);

    let cfg = match load_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    info!("ink_canvas v{}", env!("CARGO_PKG_VERSION"));
    #[cfg(not(feature = "leap"))]
    info!("LeapMotion support not built (use --features leap for hardware)");
    debug!(?cfg, "configuration");

    if let Err(e) = run(cfg) {
        eprintln!("Error: {}", e);
        eprintln!("{}", TRACKER_HINT);
        std::process::exit(1);
    }
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let config = config.with_overrides(args.source, args.threshold, args.width, args.height);
    config.validate()?;
    Ok(config)
}

fn init_logging(args: &Args) {
    let log_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "ink_canvas={level},fingertip_ink={level},warn",
            level = log_level
        ))
    });

    match args.log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        "compact" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().compact())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
