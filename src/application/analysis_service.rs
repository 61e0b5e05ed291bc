// Analysis service - Use case for analyzing an uploaded spreadsheet
use crate::application::analysis_backend::{AnalysisBackend, AnalysisError};
use crate::domain::chart::ChartSuggestion;
use crate::domain::upload::UploadedFile;
use std::sync::Arc;

#[derive(Clone)]
pub struct AnalysisService {
    backend: Arc<dyn AnalysisBackend>,
}

impl AnalysisService {
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        Self { backend }
    }

    pub async fn analyze(
        &self,
        upload: &UploadedFile,
    ) -> Result<Vec<ChartSuggestion>, AnalysisError> {
        tracing::debug!(
            "Analyzing upload '{}' ({} bytes, {})",
            upload.name,
            upload.size_bytes(),
            upload.mime_type
        );
        self.backend.analyze(upload).await
    }
}
