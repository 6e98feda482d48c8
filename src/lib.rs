//! # Asset Optimizer Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare della pipeline di ottimizzazione immagini
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per l'admin UI
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore custom e categorie di fallimento per-file
//! - `asset`: Modello dati (AssetFile, ConversionAction, ConversionResult)
//! - `file_manager`: Walk lazy della directory e discovery dei candidati
//! - `classifier`: Decisione dell'azione per dimensione ed estensione
//! - `image_processor`: Transcodifica (PNG → WebP, JPEG progressivo)
//! - `optimizer`: Orchestratore del run
//! - `progress`: Stato di progresso e statistiche
//! - `conversion_log`: Log testuale `✓` / `✗` del run
//! - `observer`: Sink iniettabili per progresso e log
//! - `json_output`: Eventi JSON per consumatori programmatici
//!
//! ## Utilizzo:
//! ```rust,no_run
//! use asset_optimizer::{Config, ConversionEvent, ConversionJob};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), asset_optimizer::OptimizeError> {
//! let mut job = ConversionJob::new(Path::new("public/images"), Config::default())?;
//! let mut events: Vec<ConversionEvent> = Vec::new();
//! let report = job.run(&mut events).await?;
//! println!("{}", report.stats.format_summary());
//! # Ok(())
//! # }
//! ```

pub mod asset;
pub mod classifier;
pub mod config;
pub mod conversion_log;
pub mod error;
pub mod file_manager;
pub mod image_processor;
pub mod json_output;
pub mod observer;
pub mod optimizer;
pub mod progress;

pub use asset::{AssetFile, ConversionAction, ConversionOutcome, ConversionResult, ImageKind};
pub use config::Config;
pub use conversion_log::{ConversionLogger, LogEntry};
pub use error::{FailureKind, OptimizeError};
pub use observer::{ConsoleObserver, ConversionEvent, ConversionObserver, RunSummary};
pub use optimizer::{ConversionJob, ConversionReport, JobState};
pub use progress::{ProgressState, RunStats};

/// Asset root processed when no directory is given
pub const DEFAULT_ASSET_ROOT: &str = "public/images";
