//! # File Management Module
//!
//! Questo modulo gestisce la discovery degli asset e le utilità sui file.
//!
//! ## Responsabilità:
//! - Walk ricorsivo, lazy e depth-first (pre-order) di una directory radice
//! - Filtro dei candidati per estensione (PNG, JPG, JPEG, case-insensitive)
//! - Formattazione human-readable delle dimensioni
//!
//! ## Politica sugli errori:
//! Il walk è fail-fast: se la radice non esiste o una sottodirectory non è
//! leggibile, l'iteratore restituisce `OptimizeError::Io` e il run si ferma.
//! Il traversal usa lo stack esplicito di `walkdir`, niente ricorsione.
//!
//! ## Esempio:
//! ```rust,no_run
//! use asset_optimizer::file_manager::FileManager;
//! use std::path::Path;
//!
//! for asset in FileManager::walk_assets(Path::new("public/images")).unwrap() {
//!     let asset = asset.unwrap();
//!     println!("{} ({} bytes)", asset.path.display(), asset.size_bytes);
//! }
//! ```

use crate::asset::AssetFile;
use crate::error::OptimizeError;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Manages file operations and discovery
pub struct FileManager;

/// Lazy iterator over candidate assets, in filesystem listing order
pub struct AssetWalker {
    inner: walkdir::IntoIter,
}

impl Iterator for AssetWalker {
    type Item = Result<AssetFile, OptimizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };

            if !entry.file_type().is_file() || !FileManager::is_supported_format(entry.path()) {
                continue;
            }

            let size = match entry.metadata() {
                Ok(metadata) => metadata.len(),
                Err(e) => return Some(Err(e.into())),
            };

            debug!("Discovered candidate: {} ({})", entry.path().display(), FileManager::format_size(size));
            return Some(Ok(AssetFile::new(entry.into_path(), size)));
        }
    }
}

impl FileManager {
    /// Start a lazy walk of `root`. Fails immediately if the root is missing or unreadable.
    pub fn walk_assets(root: &Path) -> Result<AssetWalker, OptimizeError> {
        let metadata = std::fs::metadata(root)?;
        if !metadata.is_dir() {
            return Err(OptimizeError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Asset root is not a directory: {}", root.display()),
            )));
        }
        // Apertura anticipata: una radice non leggibile deve fallire qui
        std::fs::read_dir(root)?;

        Ok(AssetWalker {
            inner: WalkDir::new(root).into_iter(),
        })
    }

    /// Materialize the whole walk so the run total is known up front
    pub fn find_assets(root: &Path) -> Result<Vec<AssetFile>, OptimizeError> {
        Self::walk_assets(root)?.collect()
    }

    /// Check if a file format is a candidate for optimization
    pub fn is_supported_format(path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            matches!(ext_lower.as_str(), "jpg" | "jpeg" | "png")
        } else {
            false
        }
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::ImageKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_walk_filters_candidates() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("nested/deeper")).unwrap();
        fs::write(root.join("a.png"), b"png").unwrap();
        fs::write(root.join("notes.txt"), b"text").unwrap();
        fs::write(root.join("nested/b.JPG"), b"jpeg!").unwrap();
        fs::write(root.join("nested/deeper/c.jpeg"), b"j").unwrap();
        fs::create_dir_all(root.join("folder.png")).unwrap();

        let mut assets = FileManager::find_assets(root).unwrap();
        assets.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(assets.len(), 3);
        assert_eq!(assets[0].path, root.join("a.png"));
        assert_eq!(assets[0].kind, ImageKind::Png);
        assert_eq!(assets[0].size_bytes, 3);
        assert_eq!(assets[1].kind, ImageKind::Jpeg);
        assert_eq!(assets[1].size_bytes, 5);
        assert_eq!(assets[2].path, root.join("nested/deeper/c.jpeg"));
    }

    #[test]
    fn test_walk_is_pre_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("sub/inner.png"), b"x").unwrap();

        let assets = FileManager::find_assets(root).unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].path, root.join("sub/inner.png"));
    }

    #[test]
    fn test_missing_root_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = FileManager::walk_assets(&temp_dir.path().join("missing"));
        assert!(matches!(result, Err(OptimizeError::Io(_))));
    }

    #[test]
    fn test_file_root_fails() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.png");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(FileManager::walk_assets(&file), Err(OptimizeError::Io(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_fails() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let locked = root.join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(root.join("a.png"), b"png").unwrap();
        fs::write(locked.join("hidden.png"), b"png").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Con i privilegi di root la directory resta leggibile
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let walked: Vec<_> = FileManager::walk_assets(root).unwrap().collect();
        let result = FileManager::find_assets(root);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(walked.iter().any(|r| matches!(r, Err(OptimizeError::Io(_)))));
        assert!(matches!(result, Err(OptimizeError::Io(_))));
    }

    #[test]
    fn test_is_supported_format() {
        assert!(FileManager::is_supported_format(Path::new("x.PNG")));
        assert!(FileManager::is_supported_format(Path::new("x.jpeg")));
        assert!(!FileManager::is_supported_format(Path::new("x.webp")));
        assert!(!FileManager::is_supported_format(Path::new("png")));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(512), "512 B");
        assert_eq!(FileManager::format_size(1536), "1.50 KB");
        assert_eq!(FileManager::format_size(3 * 1024 * 1024), "3.00 MB");
    }
}
