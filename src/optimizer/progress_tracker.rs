//! # Progress Tracking Module
//!
//! Unico punto in cui il completamento di un file diventa stato osservabile:
//! avanza il `ProgressReporter`, aggiorna le statistiche, appende al log e
//! notifica l'observer. Posseduto esclusivamente dall'orchestratore, quindi
//! nessun lock.

use crate::{
    asset::ConversionResult,
    conversion_log::{ConversionLogger, LogEntry},
    observer::{ConversionEvent, ConversionObserver},
    optimizer::path_resolver::PathResolver,
    progress::{ProgressReporter, ProgressState, RunStats},
};
use std::path::PathBuf;
use tracing::debug;

pub struct ProgressTracker {
    root: PathBuf,
    reporter: ProgressReporter,
    stats: RunStats,
    logger: ConversionLogger,
}

impl ProgressTracker {
    pub fn new(root: PathBuf, total_files: u32) -> Self {
        Self {
            root,
            reporter: ProgressReporter::new(total_files),
            stats: RunStats::new(),
            logger: ConversionLogger::new(),
        }
    }

    pub fn total_files(&self) -> u32 {
        self.reporter.total()
    }

    /// Record one finished file: progress first, then the log line (if any)
    pub fn handle_file_completion(
        &mut self,
        result: &ConversionResult,
        observer: &mut (dyn ConversionObserver + Send),
    ) -> ProgressState {
        let relative = PathResolver::relative_display(&result.file.path, &self.root);

        self.stats.record(result);
        let state = self.reporter.advance(&relative);
        debug!("Progress {}/{} ({}%) {}", state.current, state.total, state.percentage, relative);
        observer.on_event(&ConversionEvent::Progress(state.clone()));

        if let Some(entry) = LogEntry::for_result(result, &relative) {
            observer.on_event(&ConversionEvent::Log(entry.clone()));
            self.logger.push(entry);
        }

        state
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn into_parts(self) -> (RunStats, ConversionLogger) {
        (self.stats, self.logger)
    }
}
