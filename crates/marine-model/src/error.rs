//! Model loading, training and inference errors.

use std::path::PathBuf;

use smartcore::error::Failed;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to access model file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid model: {0}")]
    Invalid(String),

    #[error("Training failed: {0}")]
    Training(#[source] Failed),

    #[error("Prediction failed: {0}")]
    Prediction(#[source] Failed),
}
