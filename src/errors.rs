//! Error taxonomy for roimap submission handling.
//!
//! The calculation path itself never fails: numeric input is coerced and
//! clamped by the normalizer, and denominator fields are floored at 1, so
//! the engine always returns a complete breakdown. Errors here belong to
//! the layers around the engine: contact validation, configuration,
//! persistence, and serialization.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoimapError {
    /// A required contact field (full_name, email, company_name) is absent
    /// or empty. Raised by the submission layer before the engine runs.
    #[error("missing required field: {field}")]
    MissingRequiredField { field: &'static str },

    /// A contact field is present but unusable (e.g. an email with no '@').
    #[error("invalid value for {field}: {reason}")]
    InvalidContactField { field: &'static str, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("submission {0} not found")]
    SubmissionNotFound(u64),

    #[error("store error at {path}: {message}")]
    Store { message: String, path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

impl RoimapError {
    pub fn store(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        RoimapError::Store {
            message: message.into(),
            path: path.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RoimapError>;
