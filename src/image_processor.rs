//! # Image Processing Module
//!
//! Questo modulo esegue la transcodifica vera e propria di un singolo asset.
//!
//! ## Azioni supportate
//!
//! | Azione | Pipeline | Output |
//! |--------|----------|--------|
//! | `ConvertToWebP` | decode → resize (mai upscale) → WebP lossy | estensione `.webp` |
//! | `RecompressJpeg` | decode → JPEG progressivo (mozjpeg) | path dichiarato dal chiamante |
//! | `Skip` | nessuna | nessun file |
//!
//! ## Resize
//! Il resize preserva l'aspect ratio e non ritaglia mai: l'immagine viene
//! contenuta nella larghezza target. Se la larghezza nativa è già minore o
//! uguale al target, i pixel restano invariati.
//!
//! ## Scrittura atomica
//! La codifica avviene in memoria; i byte vengono scritti in un file temporaneo
//! nella directory di destinazione e rinominati solo a successo. Un fallimento
//! non lascia mai artefatti parziali e il file sorgente non viene mai toccato.
//!
//! ## Error Handling
//! Ogni errore (I/O, decode, encode, panic del codec) diventa un outcome
//! `Failed` sul `ConversionResult`: nessun errore supera il confine del file.
//! Il lavoro CPU-bound gira in `spawn_blocking`, un panic del codec viene
//! intercettato dal `JoinHandle`.

use crate::asset::{AssetFile, ConversionAction, ConversionResult};
use crate::config::Config;
use crate::error::OptimizeError;
use crate::optimizer::path_resolver::PathResolver;
use image::imageops::FilterType;
use image::DynamicImage;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Transcodes one asset according to its classified action
pub struct ImageProcessor {
    /// Encoder parameters (WebP quality/effort)
    config: Config,
}

impl ImageProcessor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run `action` on `file`, writing to `output_path` (rewritten to `.webp` for WebP).
    ///
    /// Never fails: every error is folded into the returned result.
    pub async fn transcode(
        &self,
        file: &AssetFile,
        action: ConversionAction,
        output_path: &Path,
    ) -> ConversionResult {
        if action == ConversionAction::Skip {
            return ConversionResult::skipped(file.clone());
        }

        match self.run_blocking(file, action, output_path).await {
            Ok((written_path, output_size)) => {
                debug!(
                    "Transcoded {} -> {} ({} bytes)",
                    file.path.display(),
                    written_path.display(),
                    output_size
                );
                ConversionResult::success(file.clone(), action, written_path, output_size)
            }
            Err(e) => {
                warn!("Failed to transcode {}: {}", file.path.display(), e);
                ConversionResult::failed(file.clone(), action, e.kind(), e.to_string())
            }
        }
    }

    /// Final path for an action, before anything is written
    pub fn resolve_output_path(action: ConversionAction, output_path: &Path) -> PathBuf {
        match action {
            ConversionAction::ConvertToWebP { .. } => PathResolver::webp_path(output_path),
            _ => output_path.to_path_buf(),
        }
    }

    async fn run_blocking(
        &self,
        file: &AssetFile,
        action: ConversionAction,
        output_path: &Path,
    ) -> Result<(PathBuf, u64), OptimizeError> {
        let source = file.path.clone();
        let destination = Self::resolve_output_path(action, output_path);
        let webp_quality = self.config.webp_quality;
        let webp_effort = self.config.webp_effort;

        let handle = tokio::task::spawn_blocking(move || {
            let bytes = match action {
                ConversionAction::ConvertToWebP { target_width } => {
                    let img = Self::decode(&source)?;
                    let img = Self::fit_width(img, target_width);
                    Self::encode_webp(&img, webp_quality, webp_effort)?
                }
                ConversionAction::RecompressJpeg { quality } => {
                    let img = Self::decode(&source)?;
                    Self::encode_progressive_jpeg(&img, quality)?
                }
                ConversionAction::Skip => unreachable!("skip is handled before spawning"),
            };
            let size = Self::write_atomically(&destination, &bytes)?;
            Ok::<_, OptimizeError>((destination, size))
        });

        match handle.await {
            Ok(result) => result,
            Err(join_error) => Err(OptimizeError::Encode(format!(
                "Codec panicked while processing {}: {}",
                file.path.display(),
                join_error
            ))),
        }
    }

    fn decode(path: &Path) -> Result<DynamicImage, OptimizeError> {
        Ok(image::open(path)?)
    }

    /// Shrink to `target_width` keeping the aspect ratio; never enlarges
    pub fn fit_width(img: DynamicImage, target_width: u32) -> DynamicImage {
        let (width, height) = (img.width(), img.height());
        if width <= target_width || target_width == 0 {
            return img;
        }

        let scaled_height = ((height as f64 * target_width as f64 / width as f64).round() as u32).max(1);
        debug!("Resizing {}x{} -> {}x{}", width, height, target_width, scaled_height);
        img.resize_exact(target_width, scaled_height, FilterType::Lanczos3)
    }

    fn encode_webp(img: &DynamicImage, quality: u8, effort: u8) -> Result<Vec<u8>, OptimizeError> {
        let mut webp_config = webp::WebPConfig::new()
            .map_err(|_| OptimizeError::Encode("Failed to initialise WebP config".to_string()))?;
        webp_config.lossless = 0;
        webp_config.quality = quality as f32;
        webp_config.method = effort as i32;

        let (width, height) = (img.width(), img.height());
        let encoded = if img.color().has_alpha() {
            let rgba = img.to_rgba8();
            let encoded = webp::Encoder::from_rgba(rgba.as_raw(), width, height)
                .encode_advanced(&webp_config)
                .map(|memory| memory.to_vec());
            encoded
        } else {
            let rgb = img.to_rgb8();
            let encoded = webp::Encoder::from_rgb(rgb.as_raw(), width, height)
                .encode_advanced(&webp_config)
                .map(|memory| memory.to_vec());
            encoded
        };

        encoded.map_err(|e| OptimizeError::Encode(format!("WebP encoding failed: {:?}", e)))
    }

    fn encode_progressive_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, OptimizeError> {
        let rgb = img.to_rgb8();
        let encode_error = |e: std::io::Error| OptimizeError::Encode(format!("JPEG encoding failed: {}", e));

        let mut compress = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        compress.set_size(rgb.width() as usize, rgb.height() as usize);
        compress.set_quality(quality as f32);
        compress.set_progressive_mode();

        let mut started = compress.start_compress(Vec::new()).map_err(encode_error)?;
        started.write_scanlines(rgb.as_raw()).map_err(encode_error)?;
        started.finish().map_err(encode_error)
    }

    /// Write through a temp file in the destination directory, then rename
    fn write_atomically(destination: &Path, bytes: &[u8]) -> Result<u64, OptimizeError> {
        let parent = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = tempfile::Builder::new()
            .prefix(".asset-optimizer-")
            .tempfile_in(parent)?;
        temp.write_all(bytes)?;
        temp.as_file().sync_all()?;
        temp.persist(destination).map_err(|e| OptimizeError::Io(e.error))?;

        Ok(std::fs::metadata(destination)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::ConversionOutcome;
    use crate::error::FailureKind;
    use image::{ImageBuffer, Rgb};
    use tempfile::TempDir;

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        }))
    }

    #[test]
    fn test_fit_width_never_enlarges() {
        let img = ImageProcessor::fit_width(gradient(100, 50), 400);
        assert_eq!((img.width(), img.height()), (100, 50));
    }

    #[test]
    fn test_fit_width_keeps_aspect_ratio() {
        let img = ImageProcessor::fit_width(gradient(300, 100), 150);
        assert_eq!((img.width(), img.height()), (150, 50));
    }

    #[test]
    fn test_resolve_output_path() {
        let out = Path::new("a/b-optimized.png");
        assert_eq!(
            ImageProcessor::resolve_output_path(ConversionAction::ConvertToWebP { target_width: 10 }, out),
            PathBuf::from("a/b-optimized.webp")
        );
        assert_eq!(
            ImageProcessor::resolve_output_path(ConversionAction::RecompressJpeg { quality: 85 }, out),
            PathBuf::from("a/b-optimized.png")
        );
    }

    #[tokio::test]
    async fn test_skip_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("small.jpg");
        std::fs::write(&source, b"tiny").unwrap();
        let output = temp_dir.path().join("small-optimized.jpg");

        let processor = ImageProcessor::new(Config::default());
        let result = processor
            .transcode(&AssetFile::new(source, 4), ConversionAction::Skip, &output)
            .await;

        assert_eq!(result.outcome, ConversionOutcome::Skipped);
        assert!(result.output_path.is_none());
        assert!(result.output_size_bytes.is_none());
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_webp_conversion_resizes() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("shot.png");
        gradient(400, 200).save(&source).unwrap();
        let size = std::fs::metadata(&source).unwrap().len();
        let output = temp_dir.path().join("shot-optimized.png");

        let processor = ImageProcessor::new(Config::default());
        let result = processor
            .transcode(
                &AssetFile::new(source.clone(), size),
                ConversionAction::ConvertToWebP { target_width: 100 },
                &output,
            )
            .await;

        let webp_path = temp_dir.path().join("shot-optimized.webp");
        assert_eq!(result.outcome, ConversionOutcome::Success);
        assert_eq!(result.output_path.as_deref(), Some(webp_path.as_path()));
        assert_eq!(image::image_dimensions(&webp_path).unwrap(), (100, 50));
        assert_eq!(
            result.output_size_bytes,
            Some(std::fs::metadata(&webp_path).unwrap().len())
        );
        assert!(source.exists());
    }

    #[tokio::test]
    async fn test_jpeg_recompression_is_progressive() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("photo.jpg");
        gradient(64, 48).save(&source).unwrap();
        let size = std::fs::metadata(&source).unwrap().len();
        let output = temp_dir.path().join("photo-optimized.jpg");

        let processor = ImageProcessor::new(Config::default());
        let result = processor
            .transcode(
                &AssetFile::new(source, size),
                ConversionAction::RecompressJpeg { quality: 85 },
                &output,
            )
            .await;

        assert_eq!(result.outcome, ConversionOutcome::Success);
        assert_eq!(result.output_path.as_deref(), Some(output.as_path()));
        let bytes = std::fs::read(&output).unwrap();
        // SOF2 marker: progressive DCT
        assert!(bytes.windows(2).any(|w| w == [0xFF, 0xC2]));
        assert_eq!(image::image_dimensions(&output).unwrap(), (64, 48));
    }

    #[tokio::test]
    async fn test_corrupted_jpeg_fails_without_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("broken.jpg");
        std::fs::write(&source, vec![0x42u8; 4096]).unwrap();
        let output = temp_dir.path().join("broken-optimized.jpg");

        let processor = ImageProcessor::new(Config::default());
        let result = processor
            .transcode(
                &AssetFile::new(source, 4096),
                ConversionAction::RecompressJpeg { quality: 85 },
                &output,
            )
            .await;

        match result.outcome {
            ConversionOutcome::Failed { kind, .. } => assert_eq!(kind, FailureKind::Decode),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(result.savings_percent.is_none());
        assert!(!output.exists());
        let leftovers = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
