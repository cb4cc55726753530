//! # Error Types
//!
//! Rule violations raised by [`crate::validation`].
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pitwall-core (this file)                                              │
//! │  └── ValidationError  - A candidate entity broke a domain rule         │
//! │                                                                         │
//! │  pitwall-db                                                            │
//! │  └── DbError          - Store failures (opaque to the services)        │
//! │                                                                         │
//! │  pitwall-service                                                       │
//! │  └── ServiceError     - NotFound | IntegrityViolation | Store          │
//! │                                                                         │
//! │  Flow: ValidationError ──► ServiceError::IntegrityViolation ──► caller │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Message Contract
//! The `Display` text of every variant is what API clients see and assert
//! on. Do not reword them.

use thiserror::Error;

/// A candidate entity failed a validation rule before a write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Championship without a year.
    #[error("Ano não pode ser nulo")]
    MissingYear,

    /// Championship year outside the configured range.
    #[error("Ano inválido: {0}")]
    YearOutOfRange(i32),

    /// Speedway size absent, zero or negative.
    #[error("Tamanho da pista inválido")]
    InvalidSpeedwaySize,

    /// Race without a championship.
    #[error("Campeonato não pode ser nulo")]
    MissingChampionship,

    /// Race without a date.
    #[error("Data inválida")]
    MissingRaceDate,

    /// Race date falls in another year than its championship.
    #[error("Ano da corrida diferente do ano do campeonato")]
    RaceYearMismatch,

    #[error("Colocacao null!")]
    MissingPlacement,

    #[error("Colocacao zero!")]
    ZeroPlacement,

    #[error("Colocacao inválida: {0}")]
    NegativePlacement(i32),

    /// Another user already owns this email.
    #[error("Email já existente: {0}")]
    DuplicateEmail(String),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(ValidationError::MissingYear.to_string(), "Ano não pode ser nulo");
        assert_eq!(
            ValidationError::YearOutOfRange(1980).to_string(),
            "Ano inválido: 1980"
        );
        assert_eq!(
            ValidationError::InvalidSpeedwaySize.to_string(),
            "Tamanho da pista inválido"
        );
        assert_eq!(
            ValidationError::RaceYearMismatch.to_string(),
            "Ano da corrida diferente do ano do campeonato"
        );
        assert_eq!(ValidationError::MissingPlacement.to_string(), "Colocacao null!");
        assert_eq!(ValidationError::ZeroPlacement.to_string(), "Colocacao zero!");
    }

    #[test]
    fn test_duplicate_email_embeds_address() {
        let err = ValidationError::DuplicateEmail("email1".to_string());
        assert_eq!(err.to_string(), "Email já existente: email1");
    }
}
