//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per l'interfaccia admin.
//!
//! ## Responsabilità:
//! - Emette un messaggio JSON per riga su stdout per ogni evento del run
//! - Fornisce un'interfaccia stabile per la progress bar e il log scorrevole della UI
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio del run (radice, totale file, configurazione)
//! - `progress`: Progresso dopo ogni file completato
//! - `log`: Riga di log (`✓` / `✗`)
//! - `complete`: Fine del run con statistiche finali
//! - `error`: Errore fatale (es. walk fallito)

use crate::config::Config;
use crate::observer::{ConversionEvent, ConversionObserver};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum JsonMessage {
    /// Inizio del run
    #[serde(rename = "start")]
    Start {
        input_dir: PathBuf,
        total_files: u32,
        config: JsonConfig,
    },

    /// Progresso corrente
    #[serde(rename = "progress")]
    Progress {
        current: u32,
        total: u32,
        percentage: u32,
        current_file_name: String,
    },

    /// Riga di log
    #[serde(rename = "log")]
    Log {
        text: String,
        is_success: bool,
        is_error: bool,
    },

    /// Run completato
    #[serde(rename = "complete")]
    Complete {
        files_processed: usize,
        succeeded: usize,
        skipped: usize,
        failed: usize,
        total_bytes_saved: i64,
        average_reduction: f64,
        duration_seconds: f64,
        aborted: bool,
    },

    /// Errore fatale
    #[serde(rename = "error")]
    Error {
        message: String,
        details: Option<String>,
    },
}

/// Configurazione per output JSON
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct JsonConfig {
    pub large_threshold_bytes: u64,
    pub webp_quality: u8,
    pub webp_effort: u8,
    pub jpeg_quality: u8,
    pub max_width: u32,
}

impl From<&Config> for JsonConfig {
    fn from(config: &Config) -> Self {
        Self {
            large_threshold_bytes: config.large_threshold_bytes,
            webp_quality: config.webp_quality,
            webp_effort: config.webp_effort,
            jpeg_quality: config.jpeg_quality,
            max_width: config.max_width,
        }
    }
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    /// Crea un messaggio di errore
    pub fn error(message: String, details: Option<String>) -> Self {
        Self::Error { message, details }
    }

    /// Traduce un evento del run nel messaggio corrispondente
    pub fn from_event(event: &ConversionEvent, config: &Config) -> Self {
        match event {
            ConversionEvent::Started { root, total } => Self::Start {
                input_dir: root.clone(),
                total_files: *total,
                config: JsonConfig::from(config),
            },
            ConversionEvent::Progress(state) => Self::Progress {
                current: state.current,
                total: state.total,
                percentage: state.percentage,
                current_file_name: state.current_file_name.clone(),
            },
            ConversionEvent::Log(entry) => Self::Log {
                text: entry.text.clone(),
                is_success: entry.is_success,
                is_error: entry.is_error,
            },
            ConversionEvent::Finished(summary) => Self::Complete {
                files_processed: summary.stats.files_processed,
                succeeded: summary.stats.succeeded,
                skipped: summary.stats.skipped,
                failed: summary.stats.failed,
                total_bytes_saved: summary.stats.bytes_saved(),
                average_reduction: summary.stats.overall_savings_percent(),
                duration_seconds: summary.duration_seconds,
                aborted: summary.aborted,
            },
        }
    }
}

/// Observer che scrive un messaggio JSON per evento su stdout
pub struct JsonObserver {
    config: Config,
}

impl JsonObserver {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConversionObserver for JsonObserver {
    fn on_event(&mut self, event: &ConversionEvent) {
        JsonMessage::from_event(event, &self.config).emit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion_log::LogEntry;

    #[test]
    fn test_log_event_message() {
        let event = ConversionEvent::Log(LogEntry::new("✗ broken.jpg: Decode error"));
        let message = JsonMessage::from_event(&event, &Config::default());
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "log");
        assert_eq!(json["is_error"], true);
        assert_eq!(json["is_success"], false);
    }

    #[test]
    fn test_start_message_carries_config() {
        let event = ConversionEvent::Started {
            root: PathBuf::from("public/images"),
            total: 4,
        };
        let message = JsonMessage::from_event(&event, &Config::default());
        match message {
            JsonMessage::Start { total_files, config, .. } => {
                assert_eq!(total_files, 4);
                assert_eq!(config.max_width, 1920);
            }
            other => panic!("unexpected message {:?}", other),
        }
    }
}
