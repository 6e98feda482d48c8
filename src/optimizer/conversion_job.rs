//! # Conversion Job
//!
//! Orchestratore del run: walk → classificazione → transcodifica → progresso/log.
//!
//! ## Macchina a stati
//! `Idle → Running → Completed { aborted }`. Il totale viene fissato dopo aver
//! materializzato il walk e non cambia durante il run.
//!
//! ## Esecuzione
//! Strettamente sequenziale: un file viene letto, transcodificato e scritto
//! prima di passare al successivo, quindi progresso e log seguono l'ordine del
//! walk. Gli errori per-file diventano outcome `Failed`; un errore del walk è
//! fatale e nessun `ProgressState` viene prodotto.
//!
//! ## Cancellazione
//! Con `with_cancellation` il canale di stop viene controllato tra un file e
//! l'altro; il run termina con `aborted = true` e i risultati parziali.

use crate::{
    asset::{AssetFile, ConversionAction, ConversionResult},
    classifier::PathClassifier,
    config::Config,
    conversion_log::ConversionLogger,
    error::OptimizeError,
    file_manager::FileManager,
    image_processor::ImageProcessor,
    observer::{ConversionEvent, ConversionObserver, RunSummary},
    optimizer::{path_resolver::PathResolver, progress_tracker::ProgressTracker},
    progress::RunStats,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Running,
    Completed { aborted: bool },
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct ConversionReport {
    /// One entry per processed file, in walk order
    pub results: Vec<ConversionResult>,
    pub stats: RunStats,
    pub log: ConversionLogger,
    pub aborted: bool,
    pub duration_seconds: f64,
}

impl ConversionReport {
    pub fn has_failures(&self) -> bool {
        self.stats.failed > 0
    }
}

pub struct ConversionJob {
    config: Config,
    root: PathBuf,
    processor: ImageProcessor,
    state: JobState,
    stop_receiver: Option<broadcast::Receiver<()>>,
}

impl ConversionJob {
    pub fn new(root: &Path, config: Config) -> Result<Self, OptimizeError> {
        config
            .validate()
            .map_err(|e| OptimizeError::Validation(e.to_string()))?;

        Ok(Self {
            processor: ImageProcessor::new(config.clone()),
            config,
            root: root.to_path_buf(),
            state: JobState::Idle,
            stop_receiver: None,
        })
    }

    /// Stop between files when a message arrives on `stop_receiver`
    pub fn with_cancellation(mut self, stop_receiver: broadcast::Receiver<()>) -> Self {
        self.stop_receiver = Some(stop_receiver);
        self
    }

    /// Crea un canale di cancellazione per il job
    pub fn create_cancellation_channel() -> (broadcast::Sender<()>, broadcast::Receiver<()>) {
        broadcast::channel(1)
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Execute the whole run, reporting to `observer`
    pub async fn run(
        &mut self,
        observer: &mut (dyn ConversionObserver + Send),
    ) -> Result<ConversionReport, OptimizeError> {
        let start_time = Instant::now();
        self.state = JobState::Running;

        let files = match FileManager::find_assets(&self.root) {
            Ok(files) => files,
            Err(e) => {
                self.state = JobState::Idle;
                return Err(e);
            }
        };

        let total = u32::try_from(files.len()).map_err(|_| {
            OptimizeError::Validation(format!("Too many files in {}", self.root.display()))
        })?;
        info!("Found {} candidate images in {}", total, self.root.display());
        observer.on_event(&ConversionEvent::Started {
            root: self.root.clone(),
            total,
        });

        let mut tracker = ProgressTracker::new(self.root.clone(), total);
        let mut results = Vec::with_capacity(files.len());
        let mut aborted = false;

        for file in files {
            if self.should_stop() {
                warn!(
                    "Run cancelled after {}/{} files",
                    tracker.stats().files_processed,
                    tracker.total_files()
                );
                aborted = true;
                break;
            }

            let result = self.process_file(&file).await;
            tracker.handle_file_completion(&result, observer);
            results.push(result);
        }

        let (stats, log) = tracker.into_parts();
        let duration_seconds = start_time.elapsed().as_secs_f64();
        self.log_summary(&stats, duration_seconds);

        observer.on_event(&ConversionEvent::Finished(RunSummary {
            stats: stats.clone(),
            aborted,
            duration_seconds,
        }));
        self.state = JobState::Completed { aborted };

        Ok(ConversionReport {
            results,
            stats,
            log,
            aborted,
            duration_seconds,
        })
    }

    /// Classify and transcode one file. Never fails past this boundary.
    async fn process_file(&self, file: &AssetFile) -> ConversionResult {
        let action = match PathClassifier::classify(file, &self.config) {
            Ok(action) => action,
            Err(e) => {
                warn!("Failed to classify {}: {}", file.path.display(), e);
                return ConversionResult::failed(file.clone(), ConversionAction::Skip, e.kind(), e.to_string());
            }
        };

        if action == ConversionAction::Skip {
            debug!("Skipping {}", file.path.display());
            return ConversionResult::skipped(file.clone());
        }

        let output_path = PathResolver::get_output_path(&file.path, &self.config.output_suffix);
        self.processor.transcode(file, action, &output_path).await
    }

    /// Controlla se è stato ricevuto un segnale di stop
    fn should_stop(&mut self) -> bool {
        if let Some(ref mut receiver) = self.stop_receiver {
            match receiver.try_recv() {
                Ok(_) => {
                    debug!("Stop signal received, cancelling conversion run");
                    return true;
                }
                Err(broadcast::error::TryRecvError::Empty) => return false,
                Err(broadcast::error::TryRecvError::Lagged(_)) => {
                    debug!("Stop signal was lagged, cancelling conversion run");
                    return true;
                }
                Err(broadcast::error::TryRecvError::Closed) => return false,
            }
        }
        false
    }

    fn log_summary(&self, stats: &RunStats, duration: f64) {
        info!("=== Optimization Complete ===");
        info!("Files processed: {}", stats.files_processed);
        info!("Files converted: {}", stats.succeeded);
        info!("Files skipped: {}", stats.skipped);
        info!("Files failed: {}", stats.failed);
        info!("Bytes saved: {} ({:.1}%)", stats.bytes_saved(), stats.overall_savings_percent());
        info!("Duration: {:.2}s", duration);
    }
}
