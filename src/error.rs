//! # Error Types Module
//!
//! Questo modulo definisce i tipi di errore della pipeline di ottimizzazione.
//!
//! ## Responsabilità:
//! - Definisce `OptimizeError` per categorizzare tutti gli errori possibili
//! - Converte gli errori della crate `image` nella categoria corretta
//! - Espone `FailureKind`, la forma "clonabile" di un errore per-file
//!
//! ## Categorie di errori:
//! - `Io`: Errori di filesystem (lettura sorgente, scrittura destinazione, walk)
//! - `Decode`: Immagine sorgente corrotta o non del tipo dichiarato
//! - `Encode`: Il backend di codifica rifiuta i parametri o fallisce
//! - `Metadata`: Impossibile leggere le dimensioni della sorgente
//! - `Validation`: Configurazione non valida
//!
//! ## Politica di propagazione:
//! Gli errori per-file diventano un outcome `Failed` e non interrompono il batch.
//! Gli errori di enumerazione directory sono fatali per l'intero run.

use image::ImageError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Custom error types for asset optimization
#[derive(thiserror::Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ImageError> for OptimizeError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::IoError(e) => Self::Io(e),
            ImageError::Decoding(_) | ImageError::Unsupported(_) => Self::Decode(err.to_string()),
            ImageError::Encoding(_) | ImageError::Parameter(_) | ImageError::Limits(_) => {
                Self::Encode(err.to_string())
            }
        }
    }
}

impl From<walkdir::Error> for OptimizeError {
    fn from(err: walkdir::Error) -> Self {
        let message = err.to_string();
        match err.into_io_error() {
            Some(io) => Self::Io(std::io::Error::new(io.kind(), message)),
            // Loop di symlink: nessun io::Error sottostante
            None => Self::Io(std::io::Error::new(std::io::ErrorKind::Other, message)),
        }
    }
}

impl OptimizeError {
    /// Category reported in a `Failed` outcome
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Io(_) => FailureKind::Io,
            Self::Decode(_) => FailureKind::Decode,
            Self::Encode(_) => FailureKind::Encode,
            Self::Metadata(_) => FailureKind::Metadata,
            // Config errors never reach a single file, treat them as encoder rejections
            Self::Validation(_) => FailureKind::Encode,
        }
    }
}

/// Per-file failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    Io,
    Decode,
    Encode,
    Metadata,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Io => "IOError",
            Self::Decode => "DecodeError",
            Self::Encode => "EncodeError",
            Self::Metadata => "MetadataError",
        };
        f.write_str(name)
    }
}
