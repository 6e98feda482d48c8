//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progresso del run e le statistiche aggregate.
//!
//! ## Componenti principali:
//! - `ProgressState`: snapshot (current, total, percentage, file corrente)
//! - `ProgressReporter`: unico scrittore dello stato, avanza di 1 per file
//! - `RunStats`: contatori succeeded / skipped / failed e byte risparmiati
//! - `ProgressManager`: progress bar visuale con `indicatif`
//!
//! ## Invarianti:
//! - `current` non decresce mai e non supera `total`
//! - `percentage = floor(current / total * 100)`
//! - `total` è fissato all'inizio del run
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:00:12] [========================>---------------] 12/20 (60%) hero.png
//! ```

use crate::asset::{ConversionOutcome, ConversionResult};
use crate::file_manager::FileManager;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Snapshot pushed to observers after each completed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub current: u32,
    pub total: u32,
    pub percentage: u32,
    pub current_file_name: String,
}

/// Owns the progress counter for one run
#[derive(Debug)]
pub struct ProgressReporter {
    current: u32,
    total: u32,
}

impl ProgressReporter {
    pub fn new(total: u32) -> Self {
        Self { current: 0, total }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Record one completed file (success, skip or failure) and return the new state
    pub fn advance(&mut self, current_file_name: &str) -> ProgressState {
        debug_assert!(self.current < self.total, "more completions than discovered files");
        self.current = (self.current + 1).min(self.total);

        ProgressState {
            current: self.current,
            total: self.total,
            percentage: Self::percentage(self.current, self.total),
            current_file_name: current_file_name.to_string(),
        }
    }

    /// Floor of `current / total * 100`
    pub fn percentage(current: u32, total: u32) -> u32 {
        if total == 0 {
            return 100;
        }
        ((current as u64 * 100) / total as u64) as u32
    }
}

/// Aggregate counts for a run
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub files_processed: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Input bytes of successfully converted files
    pub total_input_bytes: u64,
    /// Output bytes of successfully converted files
    pub total_output_bytes: u64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &ConversionResult) {
        self.files_processed += 1;
        match result.outcome {
            ConversionOutcome::Success => {
                self.succeeded += 1;
                self.total_input_bytes += result.file.size_bytes;
                self.total_output_bytes += result.output_size_bytes.unwrap_or(0);
            }
            ConversionOutcome::Skipped => self.skipped += 1,
            ConversionOutcome::Failed { .. } => self.failed += 1,
        }
    }

    pub fn bytes_saved(&self) -> i64 {
        self.total_input_bytes as i64 - self.total_output_bytes as i64
    }

    pub fn overall_savings_percent(&self) -> f64 {
        crate::asset::savings_percent(self.total_input_bytes, self.total_output_bytes)
    }

    pub fn format_summary(&self) -> String {
        let saved = self.bytes_saved();
        let saved_display = if saved >= 0 {
            FileManager::format_size(saved as u64)
        } else {
            format!("-{}", FileManager::format_size(saved.unsigned_abs()))
        };

        format!(
            "Processed: {} files | Converted: {} | Skipped: {} | Failed: {} | Total saved: {} ({:.1}%)",
            self.files_processed,
            self.succeeded,
            self.skipped,
            self.failed,
            saved_display,
            self.overall_savings_percent()
        )
    }
}

/// Manages the terminal progress bar
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Mirror a progress snapshot onto the bar
    pub fn update(&self, state: &ProgressState) {
        self.bar.set_position(state.current as u64);
        self.bar.set_message(state.current_file_name.clone());
    }

    /// Print a line above the bar
    pub fn println(&self, line: &str) {
        self.bar.println(line);
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}
