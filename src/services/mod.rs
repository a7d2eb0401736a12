use thiserror::Error;

use crate::forms::products::FormErrors;
use crate::repository::RepositoryError;

pub mod inventory;

/// Result type returned by service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the inventory services to the routes.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The submitted product form did not pass validation.
    #[error("form validation failed")]
    Form(FormErrors),
    /// An update was submitted while no product was open for editing.
    #[error("no product is open for editing")]
    NoEditContext,
    /// The requested page size is not offered by the product table.
    #[error("unsupported page size {0}")]
    UnsupportedPageSize(usize),
    #[error("product not found")]
    NotFound,
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}
