use crate::config::Config;
use crate::engine::{extension_for_mime, OcrEngine};
use crate::engines;
use crate::error::ScanError;
use crate::expiration::ExpirationDate;
use crate::pipeline;
use crate::views;
use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::{header::ACCEPT, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tempfile::NamedTempFile;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn OcrEngine>,
    pub config: Arc<Config>,
}

/// Scan result for JSON clients
#[derive(Serialize)]
pub struct ScanResponse {
    pub text: String,
    pub expiration_date: ExpirationDate,
    pub engine: String,
    pub processing_time_ms: u64,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Server info response
#[derive(Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub engine: String,
    pub engine_description: String,
    pub supported_formats: Vec<String>,
    pub max_file_size_bytes: usize,
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    let engine = engines::build(&config)?;
    let addr = config.bind_addr();

    let app = router(AppState {
        engine,
        config: Arc::new(config),
    });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_file_size + MULTIPART_OVERHEAD;

    Router::new()
        .route("/", get(handle_index))
        .route("/upload", post(handle_upload))
        .route("/health", get(handle_health))
        .route("/info", get(handle_info))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_index() -> Html<String> {
    Html(views::index_page())
}

/// Handle image uploads: stage, recognize, extract, render
async fn handle_upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ScanError> {
    let start = Instant::now();
    let max_file_size = state.config.max_file_size;

    let mut multipart = multipart.map_err(|e| ScanError::InvalidUpload(e.body_text()))?;
    let mut upload: Option<(Bytes, Option<String>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_file_size))?
    {
        if field.name() != Some("image") {
            continue;
        }
        if upload.is_some() {
            return Err(ScanError::InvalidUpload(
                "Expected a single 'image' file".to_string(),
            ));
        }
        if field.file_name().is_none() {
            return Err(ScanError::InvalidUpload(
                "'image' field is not a file".to_string(),
            ));
        }

        let content_type = field.content_type().map(|s| s.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_file_size))?;
        upload = Some((data, content_type));
    }

    let (data, content_type) = upload.ok_or(ScanError::MissingFile)?;

    if data.len() > max_file_size {
        tracing::warn!("Rejected {} byte upload", data.len());
        return Err(ScanError::ImageTooLarge { max: max_file_size });
    }

    let mime = content_type.unwrap_or_else(|| "application/octet-stream".to_string());
    if !state.engine.supported_formats().contains(&mime) {
        tracing::warn!("Received file with content type: {}", mime);
    }

    let temp_file = stage_upload(&data, &mime, state.config.upload_dir.as_deref())?;

    // Staged file is removed when the closure drops it
    let engine = state.engine.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        pipeline::scan(engine.as_ref(), temp_file.path())
    })
    .await
    .map_err(|e| ScanError::Internal(format!("Scan task failed: {}", e)))??;

    let processing_time_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        found = outcome.expiration_date.is_found(),
        "Scan completed in {}ms, text length: {}, expiration date: {}",
        processing_time_ms,
        outcome.text.len(),
        outcome.expiration_date
    );

    if wants_json(&headers) {
        let body = ScanResponse {
            text: outcome.text,
            expiration_date: outcome.expiration_date,
            engine: state.engine.name().to_string(),
            processing_time_ms,
        };
        return Ok(Json(body).into_response());
    }

    Ok(Html(views::result_page(&outcome)).into_response())
}

/// Handle health check requests
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle info requests
async fn handle_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine: state.engine.name().to_string(),
        engine_description: state.engine.description().to_string(),
        supported_formats: state.engine.supported_formats(),
        max_file_size_bytes: state.config.max_file_size,
    })
}

fn multipart_error(err: MultipartError, max_file_size: usize) -> ScanError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ScanError::ImageTooLarge { max: max_file_size };
    }
    ScanError::InvalidUpload(format!("Failed to parse multipart: {}", err.body_text()))
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false)
}

/// Write the upload to a temp file whose extension matches its MIME type
fn stage_upload(data: &[u8], mime: &str, dir: Option<&Path>) -> Result<NamedTempFile, ScanError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("upload-").suffix(extension_for_mime(mime));

    let mut temp_file = match dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|e| ScanError::Internal(format!("Failed to create temp file: {}", e)))?;

    temp_file
        .write_all(data)
        .map_err(|e| ScanError::Internal(format!("Failed to write temp file: {}", e)))?;

    Ok(temp_file)
}
