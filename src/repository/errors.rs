use thiserror::Error;

/// Result type returned by catalog repository calls.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Failures talking to the remote catalog.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Transport, timeout or body decoding failure.
    #[error("catalog request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The catalog answered 404.
    #[error("record not found")]
    NotFound,
    /// The catalog answered with another non-success status.
    #[error("catalog responded with status {status}: {body}")]
    Status { status: u16, body: String },
}
