// HTTP request handlers
use crate::application::analysis_backend::AnalysisError;
use crate::domain::chart::ChartSuggestion;
use crate::domain::upload::{UploadedFile, ValidationError, MAX_UPLOAD_BYTES};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

pub enum ApiError {
    InvalidInput(String),
    Analysis(AnalysisError),
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::InvalidInput(e.to_string())
    }
}

impl From<AnalysisError> for ApiError {
    fn from(e: AnalysisError) -> Self {
        ApiError::Analysis(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidInput(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Analysis(e) => {
                tracing::error!("Error processing file: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to process file: {e}"),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Build the HTTP surface. The transport body limit sits above the
/// validation ceiling so an oversize upload gets our 400, not a 413.
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/analyze", post(analyze_upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Analyze an uploaded spreadsheet and return chart suggestions
pub async fn analyze_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Vec<ChartSuggestion>>, ApiError> {
    let upload = read_file_field(&mut multipart)
        .await?
        .ok_or_else(|| ApiError::InvalidInput("No file was provided".to_string()))?;

    upload.validate()?;

    let suggestions = state.analysis_service.analyze(&upload).await?;
    Ok(Json(suggestions))
}

/// Pull the "file" field out of the multipart form, if present.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<UploadedFile>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidInput(format!("Malformed multipart request: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let name = field.file_name().unwrap_or("upload").to_string();
        let mime_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidInput(format!("Could not read file field: {e}")))?;

        return Ok(Some(UploadedFile::new(name, mime_type, bytes)));
    }

    Ok(None)
}
