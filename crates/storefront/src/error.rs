use powermarket_core::DomainError;

use crate::storage::StorageError;

/// Failure of a storefront operation.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl StorefrontError {
    /// Short machine-readable code for the renderer's toast/notice layer.
    pub fn code(&self) -> &'static str {
        match self {
            StorefrontError::Domain(DomainError::Validation(_)) => "validation_error",
            StorefrontError::Domain(DomainError::InvariantViolation(_)) => "invariant_violation",
            StorefrontError::Domain(DomainError::InvalidId(_)) => "invalid_id",
            StorefrontError::Domain(DomainError::NotFound(_)) => "not_found",
            StorefrontError::Domain(DomainError::Conflict(_)) => "conflict",
            StorefrontError::Storage(_) => "storage_error",
        }
    }
}

pub type StorefrontResult<T> = Result<T, StorefrontError>;
