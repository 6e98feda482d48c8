//! # Optimizer Module
//!
//! Modulo che separa le responsabilità dell'orchestrazione in sottomoduli:
//! - `conversion_job`: Orchestratore principale del run
//! - `progress_tracker`: Progresso, statistiche e log per ogni file completato
//! - `path_resolver`: Logica di calcolo path centralizzata

pub mod conversion_job;
pub mod path_resolver;
pub mod progress_tracker;

pub use conversion_job::{ConversionJob, ConversionReport, JobState};
pub use path_resolver::PathResolver;
pub use progress_tracker::ProgressTracker;
