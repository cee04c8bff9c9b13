//! OCRS engine implementation
//!
//! Pure Rust OCR engine using the ocrs library. No system dependencies required.
//! Downloads neural network models automatically on first use.

use crate::config::Config;
use crate::engine::{image_formats, OcrEngine, RecognizedSegment};
use crate::error::ScanError;
use crate::preprocessing::Preset;
use ocrs::{DecodeMethod, ImageSource, OcrEngine as OcrsOcrEngine, OcrEngineParams};
use rten::Model;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default model URLs from the ocrs project
const DETECTION_MODEL_URL: &str =
    "https://ocrs-models.s3-accelerate.amazonaws.com/text-detection.rten";
const RECOGNITION_MODEL_URL: &str =
    "https://ocrs-models.s3-accelerate.amazonaws.com/text-recognition.rten";
/// ureq caps bodies at 10MB unless told otherwise
const MAX_MODEL_SIZE: u64 = 200 * 1024 * 1024;

/// Local OCR engine wrapping the ocrs library
pub struct OcrsEngine {
    engine: OcrsOcrEngine,
    preset: Preset,
}

impl OcrsEngine {
    pub fn new(config: &Config) -> Result<Self, ScanError> {
        let detection_model_path =
            ensure_model_downloaded(DETECTION_MODEL_URL, "text-detection.rten")?;
        let recognition_model_path =
            ensure_model_downloaded(RECOGNITION_MODEL_URL, "text-recognition.rten")?;

        let detection_model = Model::load_file(&detection_model_path).map_err(|e| {
            ScanError::InitializationError(format!("Failed to load detection model: {}", e))
        })?;
        let recognition_model = Model::load_file(&recognition_model_path).map_err(|e| {
            ScanError::InitializationError(format!("Failed to load recognition model: {}", e))
        })?;

        let engine = OcrsOcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            decode_method: DecodeMethod::Greedy,
            ..Default::default()
        })
        .map_err(|e| {
            ScanError::InitializationError(format!("Failed to create OCR engine: {}", e))
        })?;

        tracing::info!(
            "ocrs engine ready (preprocessing preset: {})",
            config.preprocess.as_str()
        );

        Ok(Self {
            engine,
            preset: config.preprocess,
        })
    }
}

impl OcrEngine for OcrsEngine {
    fn name(&self) -> &'static str {
        "ocrs"
    }

    fn description(&self) -> &'static str {
        "Pure Rust OCR engine - runs locally, no system dependencies required"
    }

    fn recognize(&self, path: &Path) -> Result<Vec<RecognizedSegment>, ScanError> {
        // Uploads are staged with a MIME-derived extension that may be wrong
        let img = image::ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| ScanError::RecognitionFailure(format!("Failed to open image: {}", e)))?
            .decode()
            .map_err(|e| ScanError::RecognitionFailure(format!("Failed to load image: {}", e)))?;

        let rgb_img = self.preset.apply(img)?.into_rgb8();
        let dimensions = rgb_img.dimensions();

        // ImageSource::from_bytes expects HWC RGB data
        let img_source = ImageSource::from_bytes(rgb_img.as_raw(), dimensions).map_err(|e| {
            ScanError::RecognitionFailure(format!("Failed to create image source: {}", e))
        })?;

        let ocr_input = self.engine.prepare_input(img_source).map_err(|e| {
            ScanError::RecognitionFailure(format!("Failed to prepare input: {}", e))
        })?;

        let word_rects = self.engine.detect_words(&ocr_input).map_err(|e| {
            ScanError::RecognitionFailure(format!("Failed to detect words: {}", e))
        })?;

        let line_rects = self.engine.find_text_lines(&ocr_input, &word_rects);

        let line_texts = self
            .engine
            .recognize_text(&ocr_input, &line_rects)
            .map_err(|e| {
                ScanError::RecognitionFailure(format!("Failed to recognize text: {}", e))
            })?;

        // One segment per line, in reading order
        let segments = line_texts
            .iter()
            .filter_map(|line| line.as_ref())
            .map(|line| {
                line.words()
                    .map(|word| word.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|text| !text.trim().is_empty())
            .map(RecognizedSegment::new)
            .collect();

        Ok(segments)
    }

    fn supported_formats(&self) -> Vec<String> {
        image_formats()
    }
}

/// Return the cached model path, downloading it first if needed
fn ensure_model_downloaded(url: &str, filename: &str) -> Result<PathBuf, ScanError> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("expiry-ocr");

    std::fs::create_dir_all(&cache_dir).map_err(|e| {
        ScanError::InitializationError(format!("Failed to create cache directory: {}", e))
    })?;

    let model_path = cache_dir.join(filename);

    if model_path.exists() {
        tracing::info!("Using cached model from {:?}", model_path);
        return Ok(model_path);
    }

    tracing::info!("Downloading {} (this may take a moment)...", filename);
    download_file(url, &model_path)?;
    tracing::info!("Downloaded {} to {:?}", filename, model_path);

    Ok(model_path)
}

/// Download `url` to `path`, going through a temp file so a failed
/// download never leaves a truncated model in the cache
fn download_file(url: &str, path: &Path) -> Result<(), ScanError> {
    let response = ureq::get(url).call().map_err(|e| {
        ScanError::InitializationError(format!("Failed to download model: {}", e))
    })?;

    let buffer = response
        .into_body()
        .with_config()
        .limit(MAX_MODEL_SIZE)
        .read_to_vec()
        .map_err(|e| {
            ScanError::InitializationError(format!("Failed to read response body: {}", e))
        })?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut staging = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
        ScanError::InitializationError(format!("Failed to create model file: {}", e))
    })?;

    staging.write_all(&buffer).map_err(|e| {
        ScanError::InitializationError(format!("Failed to write model file: {}", e))
    })?;

    staging.persist(path).map_err(|e| {
        ScanError::InitializationError(format!("Failed to store model file: {}", e))
    })?;

    Ok(())
}
