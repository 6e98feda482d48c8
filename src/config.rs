//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione della pipeline.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con soglie e parametri di codifica
//! - Fornisce validazione dei parametri di input
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//! - Fornisce i valori di default osservati in produzione
//!
//! ## Parametri di configurazione:
//! - `large_threshold_bytes`: Sopra questa dimensione un file è eleggibile (default: 512000)
//! - `webp_quality`: Qualità WebP (1-100, default: 85)
//! - `webp_effort`: Sforzo di compressione WebP (0-6, default: 6)
//! - `jpeg_quality`: Qualità JPEG progressivo (1-100, default: 85)
//! - `max_width`: Larghezza massima dopo la conversione WebP (default: 1920)
//! - `output_suffix`: Suffisso inserito prima dell'estensione (default: "-optimized")
//! - `json_output`: Eventi JSON su stdout al posto della progress bar
//!
//! ## Esempio:
//! ```rust
//! use asset_optimizer::Config;
//!
//! let config = Config {
//!     large_threshold_bytes: 1024,
//!     ..Default::default()
//! };
//! config.validate().unwrap();
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for asset optimization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Files strictly larger than this are transcoded
    pub large_threshold_bytes: u64,
    /// WebP quality (1-100)
    pub webp_quality: u8,
    /// WebP compression effort (0-6, 6 = slowest/best)
    pub webp_effort: u8,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
    /// Maximum output width for WebP conversions
    pub max_width: u32,
    /// Token inserted before the extension of every output file
    pub output_suffix: String,
    /// Output progress and log as JSON for programmatic use
    pub json_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            large_threshold_bytes: 500 * 1024,
            webp_quality: 85,
            webp_effort: 6,
            jpeg_quality: 85,
            max_width: 1920,
            output_suffix: "-optimized".to_string(),
            json_output: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(anyhow::anyhow!("JPEG quality must be between 1 and 100"));
        }

        if self.webp_quality == 0 || self.webp_quality > 100 {
            return Err(anyhow::anyhow!("WebP quality must be between 1 and 100"));
        }

        if self.webp_effort > 6 {
            return Err(anyhow::anyhow!("WebP effort must be between 0 and 6"));
        }

        if self.max_width == 0 {
            return Err(anyhow::anyhow!("Maximum width must be greater than 0"));
        }

        if self.output_suffix.is_empty() {
            return Err(anyhow::anyhow!("Output suffix must not be empty"));
        }

        if self.output_suffix.contains(['/', '\\']) {
            return Err(anyhow::anyhow!(
                "Output suffix must not contain path separators: {}",
                self.output_suffix
            ));
        }

        Ok(())
    }

    /// Load configuration from file
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.jpeg_quality = 0;
        assert!(config.validate().is_err());

        config.jpeg_quality = 85;
        config.webp_effort = 7;
        assert!(config.validate().is_err());

        config.webp_effort = 6;
        config.output_suffix = "a/b".to_string();
        assert!(config.validate().is_err());

        config.output_suffix = "-small".to_string();
        config.max_width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.large_threshold_bytes, 512000);
        assert_eq!(config.webp_quality, 85);
        assert_eq!(config.webp_effort, 6);
        assert_eq!(config.jpeg_quality, 85);
        assert_eq!(config.max_width, 1920);
        assert_eq!(config.output_suffix, "-optimized");
        assert!(!config.json_output);
    }

    #[tokio::test]
    async fn test_config_save_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let original_config = Config {
            large_threshold_bytes: 2048,
            jpeg_quality: 70,
            max_width: 800,
            ..Default::default()
        };

        original_config.save_to_file(&config_path).await.unwrap();
        let loaded_config = Config::from_file(&config_path).await.unwrap();

        assert_eq!(loaded_config.large_threshold_bytes, 2048);
        assert_eq!(loaded_config.jpeg_quality, 70);
        assert_eq!(loaded_config.max_width, 800);
        assert_eq!(loaded_config.webp_quality, 85);
    }

    #[tokio::test]
    async fn test_partial_config_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        tokio::fs::write(&config_path, r#"{ "max_width": 1280 }"#).await.unwrap();

        let config = Config::from_file(&config_path).await.unwrap();
        assert_eq!(config.max_width, 1280);
        assert_eq!(config.large_threshold_bytes, 512000);
    }

    #[tokio::test]
    async fn test_missing_config_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::from_file(&temp_dir.path().join("nope.json")).await.unwrap();
        assert_eq!(config.jpeg_quality, 85);
    }
}
