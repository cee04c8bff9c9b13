//! Remote OCR engine
//!
//! Forwards the uploaded file to an external OCR service and reads back its
//! segments. The service receives the raw image bytes as the POST body and
//! answers with `{"segments": [{"text": "..."}, ...]}`.

use crate::engine::{image_formats, mime_for_path, OcrEngine, RecognizedSegment};
use crate::error::ScanError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use ureq::Agent;

/// Longest error body echoed back into a failure message
const MAX_ERROR_BODY: usize = 500;

#[derive(Deserialize)]
struct RemoteResponse {
    segments: Vec<RecognizedSegment>,
}

/// OCR engine backed by an HTTP service
pub struct RemoteEngine {
    agent: Agent,
    url: String,
}

impl RemoteEngine {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, ScanError> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ScanError::InitializationError(format!(
                "OCR service URL must be http(s): {}",
                url
            )));
        }

        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        tracing::info!("Remote OCR engine targeting {} (timeout {:?})", url, timeout);

        Ok(Self {
            agent,
            url: url.to_string(),
        })
    }
}

impl OcrEngine for RemoteEngine {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn description(&self) -> &'static str {
        "Delegates recognition to an external OCR service over HTTP"
    }

    fn recognize(&self, path: &Path) -> Result<Vec<RecognizedSegment>, ScanError> {
        let data = std::fs::read(path).map_err(|e| {
            ScanError::RecognitionFailure(format!("Failed to read upload: {}", e))
        })?;

        let mut response = self
            .agent
            .post(&self.url)
            .header("Content-Type", mime_for_path(path))
            .send(&data[..])
            .map_err(|e| {
                ScanError::RecognitionFailure(format!("OCR service request failed: {}", e))
            })?;

        let status = response.status();
        let body = response.body_mut().read_to_string().map_err(|e| {
            ScanError::RecognitionFailure(format!("Failed to read OCR response: {}", e))
        })?;

        if !status.is_success() {
            let detail: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(ScanError::RecognitionFailure(format!(
                "OCR service returned {}: {}",
                status, detail
            )));
        }

        let parsed: RemoteResponse = serde_json::from_str(&body).map_err(|e| {
            ScanError::RecognitionFailure(format!("Malformed OCR response: {}", e))
        })?;

        tracing::debug!("OCR service returned {} segments", parsed.segments.len());

        Ok(parsed.segments)
    }

    fn supported_formats(&self) -> Vec<String> {
        image_formats()
    }
}
