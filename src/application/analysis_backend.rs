// Port for the external analysis collaborator
use crate::domain::chart::ChartSuggestion;
use crate::domain::upload::UploadedFile;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Ways the bridge to the external analysis program can fail. Validation
/// errors are not part of this taxonomy; they are caught upstream.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("could not start analysis process: {0}")]
    ProcessSpawn(#[source] std::io::Error),

    #[error("analysis process failed with code {code:?}: {stderr}")]
    ProcessExit { code: Option<i32>, stderr: String },

    #[error("{reason}")]
    OutputParse { reason: String, raw_output: String },

    #[error("analysis did not finish within {0:?}")]
    Timeout(Duration),
}

/// Abstraction over "something that turns an uploaded spreadsheet into
/// chart suggestions". The production implementation spawns a subprocess;
/// tests substitute their own.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Analyze an already-validated upload and return the suggested charts.
    async fn analyze(&self, upload: &UploadedFile) -> Result<Vec<ChartSuggestion>, AnalysisError>;
}
