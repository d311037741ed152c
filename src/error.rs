use thiserror::Error;

/// Error taxonomy for the control plane.
///
/// Ownership mismatches deliberately surface as [`Error::NotFound`] rather
/// than a distinguishable "forbidden" variant, so callers cannot confirm the
/// existence of another user's records.
#[derive(Debug, Error)]
pub enum Error {
    #[error("authentication required")]
    Unauthenticated,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{0} already exists")]
    AlreadyExists(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("backend failure: {0}")]
    BackendFailure(String),

    #[error("state serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
