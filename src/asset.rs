//! # Asset Data Model
//!
//! Tipi condivisi tra walker, classificatore, transcoder e orchestratore.
//!
//! - `AssetFile`: snapshot in sola lettura preso al momento della discovery
//! - `ConversionAction`: decisione del classificatore, immutabile
//! - `ConversionResult`: esito di un singolo file, posseduto dal report del run

use crate::error::FailureKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Declared image type, derived from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageKind {
    Png,
    Jpeg,
    Other,
}

impl ImageKind {
    /// Case-insensitive mapping from extension
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .as_deref()
        {
            Some("png") => Self::Png,
            Some("jpg") | Some("jpeg") => Self::Jpeg,
            _ => Self::Other,
        }
    }
}

/// A candidate discovered by the walker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFile {
    pub path: PathBuf,
    pub kind: ImageKind,
    pub size_bytes: u64,
}

impl AssetFile {
    pub fn new(path: PathBuf, size_bytes: u64) -> Self {
        let kind = ImageKind::from_path(&path);
        Self {
            path,
            kind,
            size_bytes,
        }
    }

    /// File name for progress display
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// What the classifier decided for one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ConversionAction {
    ConvertToWebP { target_width: u32 },
    RecompressJpeg { quality: u8 },
    Skip,
}

/// Final state of one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ConversionOutcome {
    Success,
    Skipped,
    Failed { kind: FailureKind, reason: String },
}

/// Result record, exactly one per discovered file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub file: AssetFile,
    pub action: ConversionAction,
    pub output_path: Option<PathBuf>,
    pub output_size_bytes: Option<u64>,
    pub savings_percent: Option<f64>,
    pub outcome: ConversionOutcome,
}

impl ConversionResult {
    pub fn success(file: AssetFile, action: ConversionAction, output_path: PathBuf, output_size: u64) -> Self {
        let savings = savings_percent(file.size_bytes, output_size);
        Self {
            file,
            action,
            output_path: Some(output_path),
            output_size_bytes: Some(output_size),
            savings_percent: Some(savings),
            outcome: ConversionOutcome::Success,
        }
    }

    pub fn skipped(file: AssetFile) -> Self {
        Self {
            file,
            action: ConversionAction::Skip,
            output_path: None,
            output_size_bytes: None,
            savings_percent: None,
            outcome: ConversionOutcome::Skipped,
        }
    }

    pub fn failed(file: AssetFile, action: ConversionAction, kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            file,
            action,
            output_path: None,
            output_size_bytes: None,
            savings_percent: None,
            outcome: ConversionOutcome::Failed {
                kind,
                reason: reason.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ConversionOutcome::Success)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, ConversionOutcome::Failed { .. })
    }
}

/// `(1 - output/input) * 100`, rounded to one decimal. Negative when the output grew.
pub fn savings_percent(input_size: u64, output_size: u64) -> f64 {
    if input_size == 0 {
        return 0.0;
    }
    let raw = (1.0 - output_size as f64 / input_size as f64) * 100.0;
    (raw * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(ImageKind::from_path(Path::new("a/b.PNG")), ImageKind::Png);
        assert_eq!(ImageKind::from_path(Path::new("b.Jpeg")), ImageKind::Jpeg);
        assert_eq!(ImageKind::from_path(Path::new("b.jpg")), ImageKind::Jpeg);
        assert_eq!(ImageKind::from_path(Path::new("b.gif")), ImageKind::Other);
        assert_eq!(ImageKind::from_path(Path::new("README")), ImageKind::Other);
    }

    #[test]
    fn test_savings_percent() {
        assert_eq!(savings_percent(1000, 250), 75.0);
        assert_eq!(savings_percent(3, 2), 33.3);
        assert_eq!(savings_percent(1000, 1100), -10.0);
        assert_eq!(savings_percent(0, 10), 0.0);
    }

    #[test]
    fn test_success_carries_savings() {
        let file = AssetFile::new(PathBuf::from("x.jpg"), 2000);
        let result = ConversionResult::success(
            file,
            ConversionAction::RecompressJpeg { quality: 85 },
            PathBuf::from("x-optimized.jpg"),
            500,
        );
        assert_eq!(result.savings_percent, Some(75.0));
        assert!(result.is_success());
    }
}
