use async_graphql::{ErrorExtensions, ServerError};
use thiserror::Error;

use crate::db::StoreError;

/// Machine-readable category attached to every error returned by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ValidationError,
    NotFound,
    IntegrityViolation,
    StoreFailure,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "VALIDATION_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::IntegrityViolation => "INTEGRITY_VIOLATION",
            ErrorKind::StoreFailure => "STORE_FAILURE",
        }
    }
}

/// A store error tagged with the resolver operation that hit it
#[derive(Debug, Error)]
#[error("Failed to {operation}: {source}")]
pub struct ResolverError {
    pub operation: &'static str,
    #[source]
    pub source: StoreError,
}

impl ResolverError {
    pub fn new(operation: &'static str, source: StoreError) -> Self {
        Self { operation, source }
    }

    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

impl ErrorExtensions for ResolverError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.kind().code());
            e.set("operation", self.operation);
        })
    }
}

/// Extension trait to turn store results into GraphQL results
pub trait OperationContext<T> {
    fn during(self, operation: &'static str) -> async_graphql::Result<T>;
}

impl<T> OperationContext<T> for Result<T, StoreError> {
    fn during(self, operation: &'static str) -> async_graphql::Result<T> {
        self.map_err(|source| {
            let err = ResolverError::new(operation, source);
            match err.kind() {
                ErrorKind::StoreFailure => tracing::error!(operation, error = %err.source, "store failure"),
                _ => tracing::debug!(operation, error = %err.source, "operation rejected"),
            }
            err.extend()
        })
    }
}

/// Errors produced by parsing, validation or argument coercion never pass
/// through a resolver, so they arrive without a code.
pub fn tag_untagged(error: &mut ServerError) {
    let extensions = error.extensions.get_or_insert_with(Default::default);
    if extensions.get("code").is_none() {
        extensions.set("code", ErrorKind::ValidationError.code());
    }
}
