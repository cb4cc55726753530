//! # Service Errors
//!
//! The two outcomes a caller has to handle, plus an opaque pass-through for
//! store failures.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Service Error Flow                               │
//! │                                                                         │
//! │  ValidationError (core)  ──► ServiceError::IntegrityViolation          │
//! │                              "bad request" for a transport             │
//! │                                                                         │
//! │  empty lookup / filter   ──► ServiceError::NotFound(message)           │
//! │                              "not found" for a transport               │
//! │                                                                         │
//! │  DbError (db)            ──► ServiceError::Store                       │
//! │                              never interpreted here                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Display` of the first two variants is exactly the contract message, so
//! a caller can forward `err.to_string()` unchanged.

use pitwall_core::ValidationError;
use pitwall_db::DbError;
use thiserror::Error;

/// Errors returned by every service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A lookup or filter matched nothing.
    #[error("{0}")]
    NotFound(String),

    /// A write was rejected before reaching the store.
    #[error(transparent)]
    IntegrityViolation(#[from] ValidationError),

    /// Store-tier failure, propagated as is.
    #[error(transparent)]
    Store(#[from] DbError),
}

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound(_))
    }

    pub fn is_integrity_violation(&self) -> bool {
        matches!(self, ServiceError::IntegrityViolation(_))
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
