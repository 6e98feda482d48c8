//! # Asset Optimizer - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Caricamento della configurazione e override da CLI
//! - Collegamento di Ctrl-C alla cancellazione cooperativa
//! - Exit code: 0 se nessun file è fallito, 1 altrimenti
//!
//! ## Esempio di utilizzo:
//! ```bash
//! asset-optimizer                          # processa public/images con i default
//! asset-optimizer ./static/img --json      # eventi JSON per l'admin UI
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use asset_optimizer::{
    json_output::{JsonMessage, JsonObserver},
    Config, ConsoleObserver, ConversionJob, ConversionObserver, DEFAULT_ASSET_ROOT,
};

#[derive(Parser)]
#[command(name = "asset-optimizer")]
#[command(about = "Convert large PNGs to WebP and recompress large JPEGs in an asset tree")]
struct Args {
    /// Asset root directory
    #[arg(default_value = DEFAULT_ASSET_ROOT)]
    asset_directory: PathBuf,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Size threshold in bytes (files strictly larger are optimized)
    #[arg(short, long)]
    threshold: Option<u64>,

    /// Maximum width for WebP conversions
    #[arg(long)]
    max_width: Option<u32>,

    /// JPEG quality (1-100)
    #[arg(long)]
    jpeg_quality: Option<u8>,

    /// WebP quality (1-100)
    #[arg(long)]
    webp_quality: Option<u8>,

    /// Output progress and log as JSON lines on stdout
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging (stderr, così stdout resta pulito in modalità JSON)
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match args.config {
        Some(ref path) => Config::from_file(path).await?,
        None => Config::default(),
    };
    if let Some(threshold) = args.threshold {
        config.large_threshold_bytes = threshold;
    }
    if let Some(max_width) = args.max_width {
        config.max_width = max_width;
    }
    if let Some(quality) = args.jpeg_quality {
        config.jpeg_quality = quality;
    }
    if let Some(quality) = args.webp_quality {
        config.webp_quality = quality;
    }
    config.json_output = args.json;
    config.validate()?;

    let (stop_sender, stop_receiver) = ConversionJob::create_cancellation_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current file");
            let _ = stop_sender.send(());
        }
    });

    let mut job = ConversionJob::new(&args.asset_directory, config.clone())?.with_cancellation(stop_receiver);
    let mut observer: Box<dyn ConversionObserver + Send> = if config.json_output {
        Box::new(JsonObserver::new(config.clone()))
    } else {
        println!("🖼️  Optimizing images in {}", job.root().display());
        Box::new(ConsoleObserver::new())
    };

    let report = match job.run(observer.as_mut()).await {
        Ok(report) => report,
        Err(e) => {
            if config.json_output {
                JsonMessage::error(
                    format!("Failed to scan {}", job.root().display()),
                    Some(e.to_string()),
                )
                .emit();
            }
            return Err(e.into());
        }
    };

    if !config.json_output {
        if report.aborted {
            println!("⏹️  Optimization cancelled: {}", report.stats.format_summary());
        } else {
            println!("✅ Optimization complete: {}", report.stats.format_summary());
        }
    }

    if report.has_failures() {
        info!("{} file(s) failed, exiting with status 1", report.stats.failed);
        std::process::exit(1);
    }

    Ok(())
}
