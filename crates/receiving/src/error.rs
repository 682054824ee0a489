use thiserror::Error;

use pickpoint_core::{DomainError, StoreError};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the receiving services.
///
/// Business-rule failures are [`DomainError`]s; anything the storage layer
/// could not do is `Store`, tagged with the operation that failed.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{op} failed")]
    Store {
        op: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ServiceError {
    pub(crate) fn store(op: &'static str) -> impl FnOnce(StoreError) -> ServiceError {
        move |source| ServiceError::Store { op, source }
    }
}
