use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One unit of recognized text, in the order the engine produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizedSegment {
    pub text: String,
}

impl RecognizedSegment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Trait that all OCR engines must implement
pub trait OcrEngine: Send + Sync {
    /// Returns the engine identifier (e.g., "ocrs", "remote")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the engine
    fn description(&self) -> &'static str;

    /// Recognize the image at `path`, returning its text segments in reading order
    fn recognize(&self, path: &Path) -> Result<Vec<RecognizedSegment>, ScanError>;

    /// Get supported MIME types
    fn supported_formats(&self) -> Vec<String>;
}

/// MIME types accepted by every engine
pub fn image_formats() -> Vec<String> {
    [
        "image/png",
        "image/jpeg",
        "image/gif",
        "image/bmp",
        "image/webp",
        "image/tiff",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// File extension used for the temporary copy of an upload
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/png" => ".png",
        "image/jpeg" => ".jpg",
        "image/gif" => ".gif",
        "image/bmp" => ".bmp",
        "image/webp" => ".webp",
        "image/tiff" => ".tiff",
        _ => ".tmp",
    }
}

/// Inverse of [`extension_for_mime`], for engines that forward the file
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_round_trips_for_known_types() {
        for mime in image_formats() {
            let name = format!("upload{}", extension_for_mime(&mime));
            assert_eq!(mime_for_path(Path::new(&name)), mime);
        }
    }

    #[test]
    fn test_unknown_mime_falls_back() {
        assert_eq!(extension_for_mime("application/zip"), ".tmp");
        assert_eq!(
            mime_for_path(Path::new("upload.tmp")),
            "application/octet-stream"
        );
    }
}
