//! # Path Resolution Module
//!
//! Centralizza la logica di calcolo dei path di output.
//! Il chiamante inserisce il suffisso prima dell'estensione, il transcoder
//! riscrive poi l'estensione in `.webp` per le conversioni WebP.

use std::path::{Path, PathBuf};

/// Utility per calcolare i path di output in modo centralizzato
pub struct PathResolver;

impl PathResolver {
    /// `dir/photo.jpg` -> `dir/photo<suffix>.jpg`
    pub fn get_output_path(input_path: &Path, suffix: &str) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default().to_string_lossy();
        let filename = match input_path.extension() {
            Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
            None => format!("{}{}", stem, suffix),
        };
        input_path.with_file_name(filename)
    }

    /// Replace the extension with `.webp`
    pub fn webp_path(path: &Path) -> PathBuf {
        path.with_extension("webp")
    }

    /// Source a file would have been generated from: `photo-optimized.jpg` -> `photo.jpg`.
    /// `None` when the stem does not carry the suffix.
    pub fn generated_from(path: &Path, suffix: &str) -> Option<PathBuf> {
        let stem = path.file_stem()?.to_string_lossy();
        let source_stem = stem.strip_suffix(suffix).filter(|s| !s.is_empty())?;
        let filename = match path.extension() {
            Some(ext) => format!("{}.{}", source_stem, ext.to_string_lossy()),
            None => source_stem.to_string(),
        };
        Some(path.with_file_name(filename))
    }

    /// Path shown in log lines, relative to the asset root when possible
    pub fn relative_display(path: &Path, root: &Path) -> String {
        path.strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string()
    }
}
