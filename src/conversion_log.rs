//! # Conversion Log
//!
//! Sequenza append-only di righe leggibili, una per file convertito o fallito.
//! Ogni riga è classificabile solo dal carattere marker iniziale:
//! `✓` successo, `✗` errore. I file saltati non producono righe.

use crate::asset::{ConversionOutcome, ConversionResult};
use crate::file_manager::FileManager;
use serde::{Deserialize, Serialize};

pub const SUCCESS_MARKER: char = '✓';
pub const ERROR_MARKER: char = '✗';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub text: String,
    pub is_success: bool,
    pub is_error: bool,
}

impl LogEntry {
    /// Build an entry, deriving the flags from the marker character
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            is_success: text.starts_with(SUCCESS_MARKER),
            is_error: text.starts_with(ERROR_MARKER),
            text,
        }
    }

    /// Log line for a finished file; `None` for skips
    pub fn for_result(result: &ConversionResult, relative_path: &str) -> Option<Self> {
        match &result.outcome {
            ConversionOutcome::Success => {
                let new_size = result.output_size_bytes.unwrap_or(0);
                let savings = result.savings_percent.unwrap_or(0.0);
                // Un output più grande è un dato misurato, non un errore
                let delta = if savings < 0.0 {
                    format!("+{:.1}%", -savings)
                } else {
                    format!("-{:.1}%", savings)
                };
                Some(Self::new(format!(
                    "{} {}: {} → {} ({})",
                    SUCCESS_MARKER,
                    relative_path,
                    FileManager::format_size(result.file.size_bytes),
                    FileManager::format_size(new_size),
                    delta
                )))
            }
            ConversionOutcome::Failed { reason, .. } => {
                Some(Self::new(format!("{} {}: {}", ERROR_MARKER, relative_path, reason)))
            }
            ConversionOutcome::Skipped => None,
        }
    }
}

/// Ordered log of a whole run
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ConversionLogger {
    entries: Vec<LogEntry>,
}

impl ConversionLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
