//! OCR engine implementations
//!
//! `ocrs` recognizes locally and is compiled in with the `engine-ocrs`
//! feature. `remote` forwards the upload to an external OCR service.

#[cfg(feature = "engine-ocrs")]
pub mod ocrs;

pub mod remote;

use crate::config::Config;
use crate::engine::OcrEngine;
use crate::error::ScanError;
use std::sync::Arc;

/// Selectable OCR backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EngineKind {
    /// Local pure-Rust recognition
    Ocrs,
    /// External OCR service over HTTP
    Remote,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ocrs => "ocrs",
            Self::Remote => "remote",
        }
    }
}

/// Construct the engine selected in `config`
pub fn build(config: &Config) -> Result<Arc<dyn OcrEngine>, ScanError> {
    tracing::info!("Initializing {} engine...", config.engine.as_str());

    match config.engine {
        EngineKind::Ocrs => build_ocrs(config),
        EngineKind::Remote => {
            let url = config.ocr_url.as_deref().ok_or_else(|| {
                ScanError::InitializationError(
                    "The remote engine needs --ocr-url (or OCR_REMOTE_URL)".to_string(),
                )
            })?;
            Ok(Arc::new(remote::RemoteEngine::new(url, config.ocr_timeout)?))
        }
    }
}

#[cfg(feature = "engine-ocrs")]
fn build_ocrs(config: &Config) -> Result<Arc<dyn OcrEngine>, ScanError> {
    Ok(Arc::new(ocrs::OcrsEngine::new(config)?))
}

#[cfg(not(feature = "engine-ocrs"))]
fn build_ocrs(_config: &Config) -> Result<Arc<dyn OcrEngine>, ScanError> {
    Err(ScanError::InitializationError(
        "ocrs engine not compiled in. Build with --features engine-ocrs or use --engine remote"
            .to_string(),
    ))
}
