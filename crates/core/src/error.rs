//! Error model shared by the storefront services and their repositories.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Result type returned by repository implementations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Result type returned by use-case services.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Domain-level error.
///
/// Business failures only (validation, lookups, conflicts). Every variant
/// carries the human-readable message handed back to the caller, and maps to
/// an HTTP-style status through [`DomainError::status_code`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The request was rejected by a business check.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request collides with existing state (duplicate name, email, ...).
    #[error("conflict: {0}")]
    Conflict(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// The bare message, without the variant prefix used by `Display`.
    pub fn message(&self) -> &str {
        match self {
            DomainError::Validation(msg)
            | DomainError::NotFound(msg)
            | DomainError::Conflict(msg)
            | DomainError::InvalidId(msg) => msg,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            DomainError::Validation(_) | DomainError::InvalidId(_) => 400,
            DomainError::NotFound(_) => 404,
            DomainError::Conflict(_) => 409,
        }
    }
}

/// Storage-level error raised by repository implementations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The backing store could not be reached or refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A uniqueness/foreign-key/check constraint rejected the write.
    #[error("constraint violated: {0}")]
    Constraint(String),

    /// A stored row could not be mapped back into a domain type.
    #[error("failed to decode row: {0}")]
    Decode(String),
}

/// Error returned by use-case services: either a business rejection or a
/// storage failure underneath it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Domain(e) => e.status_code(),
            ServiceError::Repository(_) => 500,
        }
    }

    /// The domain error, if this is a business rejection.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            ServiceError::Domain(e) => Some(e),
            ServiceError::Repository(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_strips_variant_prefix() {
        let err = DomainError::validation("There is no customer with this id.");
        assert_eq!(err.message(), "There is no customer with this id.");
        assert_eq!(
            err.to_string(),
            "validation failed: There is no customer with this id."
        );
    }

    #[test]
    fn status_codes_follow_variant() {
        assert_eq!(DomainError::validation("x").status_code(), 400);
        assert_eq!(DomainError::not_found("x").status_code(), 404);
        assert_eq!(DomainError::conflict("x").status_code(), 409);
        assert_eq!(DomainError::invalid_id("x").status_code(), 400);
    }

    #[test]
    fn repository_failures_map_to_500() {
        let err: ServiceError = RepositoryError::Unavailable("pool closed".into()).into();
        assert_eq!(err.status_code(), 500);
        assert!(err.as_domain().is_none());

        let err: ServiceError = DomainError::conflict("dup").into();
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.as_domain(), Some(&DomainError::conflict("dup")));
    }
}
