//! # Observer Module
//!
//! Interfaccia iniettabile per ricevere progresso e log del run, al posto
//! dell'output globale su console. L'orchestratore è l'unico produttore e
//! consegna gli eventi nell'ordine del walk.
//!
//! ## Implementazioni:
//! - `Vec<ConversionEvent>`: raccoglie gli eventi in memoria (test, embedding)
//! - `ConsoleObserver`: progress bar `indicatif` + righe di log sopra la barra
//! - `JsonObserver` (in `json_output`): un oggetto JSON per evento su stdout

use crate::conversion_log::LogEntry;
use crate::progress::{ProgressManager, ProgressState, RunStats};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Final aggregate of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub stats: RunStats,
    pub aborted: bool,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversionEvent {
    Started { root: PathBuf, total: u32 },
    Progress(ProgressState),
    Log(LogEntry),
    Finished(RunSummary),
}

/// Sink for run events
pub trait ConversionObserver {
    fn on_event(&mut self, event: &ConversionEvent);
}

impl ConversionObserver for Vec<ConversionEvent> {
    fn on_event(&mut self, event: &ConversionEvent) {
        self.push(event.clone());
    }
}

impl<T: ConversionObserver + ?Sized> ConversionObserver for Box<T> {
    fn on_event(&mut self, event: &ConversionEvent) {
        (**self).on_event(event);
    }
}

/// Terminal progress bar with the log scrolling above it
#[derive(Default)]
pub struct ConsoleObserver {
    progress: Option<ProgressManager>,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversionObserver for ConsoleObserver {
    fn on_event(&mut self, event: &ConversionEvent) {
        match event {
            ConversionEvent::Started { total, .. } => {
                self.progress = Some(ProgressManager::new(*total as u64));
            }
            ConversionEvent::Progress(state) => {
                if let Some(ref progress) = self.progress {
                    progress.update(state);
                }
            }
            ConversionEvent::Log(entry) => match self.progress {
                Some(ref progress) => progress.println(&entry.text),
                None => println!("{}", entry.text),
            },
            ConversionEvent::Finished(summary) => {
                if let Some(progress) = self.progress.take() {
                    progress.finish(&summary.stats.format_summary());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_collects_in_order() {
        let mut events: Vec<ConversionEvent> = Vec::new();
        events.on_event(&ConversionEvent::Started {
            root: PathBuf::from("r"),
            total: 1,
        });
        events.on_event(&ConversionEvent::Log(LogEntry::new("✓ a")));
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], ConversionEvent::Log(ref e) if e.is_success));
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = ConversionEvent::Progress(ProgressState {
            current: 1,
            total: 2,
            percentage: 50,
            current_file_name: "a.png".to_string(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "progress");
        assert_eq!(json["percentage"], 50);
        assert_eq!(json["current_file_name"], "a.png");
    }
}
