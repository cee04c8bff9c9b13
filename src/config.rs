use crate::engines::EngineKind;
use crate::preprocessing::Preset;
use crate::Args;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_file_size: usize,
    pub engine: EngineKind,
    pub ocr_url: Option<String>,
    pub ocr_timeout: Duration,
    pub preprocess: Preset,
    /// Where uploads are staged while being scanned; system temp dir if unset
    pub upload_dir: Option<PathBuf>,
}

impl Config {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            max_file_size: args.max_file_size,
            engine: args.engine,
            ocr_url: args.ocr_url,
            ocr_timeout: Duration::from_secs(args.ocr_timeout_secs),
            preprocess: args.preprocess,
            upload_dir: args.upload_dir,
        }
    }
}
