use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum CardioError {
    #[error("model artifact not found at {path}: {reason}")]
    ArtifactNotFound { path: PathBuf, reason: String },
    #[error("model artifact at {path} is invalid: {reason}")]
    InvalidArtifact { path: PathBuf, reason: String },
    #[error("feature schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("prediction failed: {0}")]
    PredictionFailure(String),
    #[error("invalid input: {}", .0.join("; "))]
    InvalidInput(Vec<String>),
    #[error("dataset {path} unavailable: {reason}")]
    DatasetUnavailable { path: PathBuf, reason: String },
}

impl CardioError {
    /// Stable code used in the `--json` error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            CardioError::ArtifactNotFound { .. } => "ARTIFACT_NOT_FOUND",
            CardioError::InvalidArtifact { .. } => "INVALID_ARTIFACT",
            CardioError::SchemaMismatch(_) => "SCHEMA_MISMATCH",
            CardioError::PredictionFailure(_) => "PREDICTION_FAILURE",
            CardioError::InvalidInput(_) => "INVALID_INPUT",
            CardioError::DatasetUnavailable { .. } => "DATASET_UNAVAILABLE",
        }
    }
}

pub fn error_code(err: &anyhow::Error) -> &'static str {
    err.downcast_ref::<CardioError>()
        .map(CardioError::code)
        .unwrap_or("INTERNAL")
}
