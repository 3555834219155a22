use thiserror::Error;

use crate::store::StoreError;

/// Why a check record was rejected before probing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Check record is not a JSON object")]
    NotAnObject,

    #[error("Invalid id: expected a 20 character string")]
    InvalidId,

    #[error("Invalid owner id: expected a 10 digit key")]
    InvalidOwner,

    #[error("Invalid protocol: must be http or https")]
    InvalidProtocol,

    #[error("Invalid url: cannot be empty")]
    EmptyUrl,

    #[error("Invalid method: must be one of GET, POST, PUT, DELETE")]
    InvalidMethod,

    #[error("Invalid success codes: {0}")]
    InvalidSuccessCodes(String),

    #[error("Invalid timeout: must be a whole number of seconds between 1 and 5")]
    InvalidTimeout,
}

/// Failure of a single check's pipeline.
///
/// Each variant stops the pipeline before any later stage runs, so a read or
/// validation failure never leads to a write.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Error reading check data: {0}")]
    Read(#[source] StoreError),

    #[error("Check is not properly formatted: {0}")]
    Validation(#[from] ValidationError),

    #[error("Error saving check updates: {0}")]
    Write(#[source] StoreError),
}
