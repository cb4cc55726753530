//! # pitwall-core: Pure Domain Logic for Pitwall
//!
//! Entities, validation rules and report shapes for the motorsport registry.
//! Nothing in this crate touches a database, the network or the file system.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Pitwall Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Callers (transport layer, pitwall-cli)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    pitwall-service                              │   │
//! │  │     rules ──► store call ──► query-or-error ──► caller          │   │
//! │  └──────────────┬──────────────────────────────┬───────────────────┘   │
//! │                 │                              │                        │
//! │  ┌──────────────▼───────────────┐  ┌───────────▼──────────────────┐   │
//! │  │  ★ pitwall-core (THIS) ★     │  │        pitwall-db            │   │
//! │  │  types • validation • error  │  │  SQLite entity stores        │   │
//! │  │  NO I/O • PURE FUNCTIONS     │  │                              │   │
//! │  └──────────────────────────────┘  └──────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Country, Team, Speedway, Championship, Pilot,
//!   Race, PilotRace, User) and the race report shape
//! - [`validation`] - Write rules, first violated rule wins
//! - [`error`] - [`ValidationError`], whose messages are part of the API
//!
//! ## Example Usage
//!
//! ```rust
//! use pitwall_core::validation::validate_championship_year;
//! use pitwall_core::{ChampionshipYears, ValidationError};
//!
//! let years = ChampionshipYears::DEFAULT;
//! assert!(validate_championship_year(Some(2023), years).is_ok());
//!
//! let err = validate_championship_year(Some(1980), years).unwrap_err();
//! assert_eq!(err, ValidationError::YearOutOfRange(1980));
//! assert_eq!(err.to_string(), "Ano inválido: 1980");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use types::*;
pub use validation::{Rule, ValidationResult};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Earliest championship year accepted by default.
pub const MIN_CHAMPIONSHIP_YEAR: i32 = 1990;

/// Latest championship year accepted by default.
pub const MAX_CHAMPIONSHIP_YEAR: i32 = 2100;
