//! Scan pipeline: recognize, join, extract.

use crate::engine::{OcrEngine, RecognizedSegment};
use crate::error::ScanError;
use crate::expiration::ExpirationDate;
use std::path::Path;

/// Result of scanning one upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub text: String,
    pub expiration_date: ExpirationDate,
}

impl ScanOutcome {
    pub fn from_segments(segments: &[RecognizedSegment]) -> Self {
        let text = join_segments(segments);
        let expiration_date = ExpirationDate::extract(&text);
        Self {
            text,
            expiration_date,
        }
    }
}

/// Join segment texts with a single space, in engine order.
pub fn join_segments(segments: &[RecognizedSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run the engine on `path` and extract the expiration date from its text.
pub fn scan(engine: &dyn OcrEngine, path: &Path) -> Result<ScanOutcome, ScanError> {
    let segments = engine.recognize(path)?;
    let outcome = ScanOutcome::from_segments(&segments);

    tracing::debug!(
        engine = engine.name(),
        segments = segments.len(),
        "Joined {} chars of recognized text",
        outcome.text.len()
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEngine(Result<Vec<&'static str>, &'static str>);

    impl OcrEngine for FixedEngine {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn description(&self) -> &'static str {
            "Returns canned segments"
        }

        fn recognize(&self, _path: &Path) -> Result<Vec<RecognizedSegment>, ScanError> {
            match &self.0 {
                Ok(texts) => Ok(texts.iter().map(|t| RecognizedSegment::new(*t)).collect()),
                Err(msg) => Err(ScanError::RecognitionFailure(msg.to_string())),
            }
        }

        fn supported_formats(&self) -> Vec<String> {
            vec![]
        }
    }

    #[test]
    fn test_join_preserves_order_with_single_spaces() {
        let segments = vec![
            RecognizedSegment::new("Best"),
            RecognizedSegment::new("Before"),
            RecognizedSegment::new("12/31/2025"),
        ];
        assert_eq!(join_segments(&segments), "Best Before 12/31/2025");
    }

    #[test]
    fn test_join_passes_segment_text_through() {
        let segments = vec![
            RecognizedSegment::new("<b>EXP</b>"),
            RecognizedSegment::new(" 01/02/27 "),
        ];
        assert_eq!(join_segments(&segments), "<b>EXP</b>  01/02/27 ");
    }

    #[test]
    fn test_scan_finds_date() {
        let engine = FixedEngine(Ok(vec!["Best", "Before", "12/31/2025", "Batch", "A1"]));
        let outcome = scan(&engine, Path::new("unused.png")).unwrap();
        assert_eq!(outcome.text, "Best Before 12/31/2025 Batch A1");
        assert_eq!(
            outcome.expiration_date,
            ExpirationDate::Found("12/31/2025".to_string())
        );
    }

    #[test]
    fn test_scan_without_date() {
        let engine = FixedEngine(Ok(vec!["No", "dates", "here"]));
        let outcome = scan(&engine, Path::new("unused.png")).unwrap();
        assert_eq!(outcome.text, "No dates here");
        assert_eq!(outcome.expiration_date.to_string(), "not found");
    }

    #[test]
    fn test_scan_with_no_segments() {
        let engine = FixedEngine(Ok(vec![]));
        let outcome = scan(&engine, Path::new("unused.png")).unwrap();
        assert_eq!(outcome.text, "");
        assert_eq!(outcome.expiration_date, ExpirationDate::NotFound);
    }

    #[test]
    fn test_scan_propagates_engine_failure() {
        let engine = FixedEngine(Err("connection refused"));
        let err = scan(&engine, Path::new("unused.png")).unwrap_err();
        assert!(matches!(err, ScanError::RecognitionFailure(ref m) if m == "connection refused"));
    }
}
