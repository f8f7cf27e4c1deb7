use thiserror::Error;

use crate::core::types::UpdateError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Malformed formula '{formula}': {reason}")]
    MalformedFormula { formula: String, reason: String },

    #[error("Missing context: {0}")]
    MissingContext(&'static str),

    #[error("External update failed: {0}")]
    ExternalUpdateFailure(#[from] UpdateError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Scenario parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl EngineError {
    pub fn malformed(formula: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::MalformedFormula {
            formula: formula.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
