//! # Path Classifier
//!
//! Decide, da estensione e dimensione, quale azione applicare a un asset.
//!
//! | Tipo | Dimensione | Azione |
//! |------|------------|--------|
//! | PNG  | > soglia   | `ConvertToWebP { min(larghezza nativa, max_width) }` |
//! | JPEG | > soglia   | `RecompressJpeg { jpeg_quality }` |
//! | altro / sotto soglia | - | `Skip` |
//!
//! Per i PNG la larghezza nativa viene letta dall'header (probe dei metadati),
//! l'immagine non viene decodificata. I file generati da un run precedente
//! vengono saltati: solo i JPEG possono rientrare tra i candidati, e solo se
//! accanto esiste la sorgente da cui il nome è derivato.

use crate::asset::{AssetFile, ConversionAction, ImageKind};
use crate::config::Config;
use crate::error::OptimizeError;
use crate::optimizer::path_resolver::PathResolver;
use std::path::Path;
use tracing::debug;

pub struct PathClassifier;

impl PathClassifier {
    /// Decide the action for one file. Only a PNG over threshold touches the disk.
    pub fn classify(file: &AssetFile, config: &Config) -> Result<ConversionAction, OptimizeError> {
        if Self::is_previous_output(file, config) {
            debug!("Output of a previous run, skipping: {}", file.path.display());
            return Ok(ConversionAction::Skip);
        }

        if file.size_bytes <= config.large_threshold_bytes {
            return Ok(ConversionAction::Skip);
        }

        let action = match file.kind {
            ImageKind::Png => {
                let (native_width, _) = Self::probe_dimensions(&file.path)?;
                ConversionAction::ConvertToWebP {
                    target_width: native_width.min(config.max_width),
                }
            }
            ImageKind::Jpeg => ConversionAction::RecompressJpeg {
                quality: config.jpeg_quality,
            },
            ImageKind::Other => ConversionAction::Skip,
        };

        debug!("Classified {} as {:?}", file.path.display(), action);
        Ok(action)
    }

    /// Only JPEG outputs keep a candidate extension; PNGs always become `.webp`
    fn is_previous_output(file: &AssetFile, config: &Config) -> bool {
        file.kind == ImageKind::Jpeg
            && PathResolver::generated_from(&file.path, &config.output_suffix)
                .map(|source| source.is_file())
                .unwrap_or(false)
    }

    /// Read width and height from the image header
    pub fn probe_dimensions(path: &Path) -> Result<(u32, u32), OptimizeError> {
        image::image_dimensions(path)
            .map_err(|e| OptimizeError::Metadata(format!("{}: {}", path.display(), e)))
    }
}
