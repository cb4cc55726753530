//! # pitwall-service: Registry Services for Pitwall
//!
//! Validation and query policy on top of the entity stores.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pitwall Request Flow                             │
//! │                                                                         │
//! │  Caller (pitwall-cli, a transport layer)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  pitwall-service (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   CrudService<E, S, R>   one generic find/insert/list/          │   │
//! │  │        │                 update/delete for every entity         │   │
//! │  │        ├── Rule<E>       (pitwall-core) before every write      │   │
//! │  │        └── query::one / query::many  empty → NotFound           │   │
//! │  │                                                                 │   │
//! │  │   CountryService … UserService   Deref to CrudService + filters │   │
//! │  │   ReportService                  races by country and year      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  pitwall-db stores (Store<E> + named filters)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pitwall_service::{Registry, ServiceError};
//!
//! let registry = Registry::new(&db, ChampionshipYears::DEFAULT);
//! match registry.races.find_by_id(10).await {
//!     Err(ServiceError::NotFound(message)) => eprintln!("{message}"),
//!     other => println!("{:?}", other?),
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod championship;
pub mod country;
pub mod crud;
pub mod error;
pub mod pilot;
pub mod pilot_race;
pub mod query;
pub mod race;
pub mod registry;
pub mod report;
pub mod speedway;
pub mod team;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use championship::ChampionshipService;
pub use country::CountryService;
pub use crud::{CrudService, Messages, Validator};
pub use error::{ServiceError, ServiceResult};
pub use pilot::PilotService;
pub use pilot_race::PilotRaceService;
pub use race::RaceService;
pub use registry::Registry;
pub use report::ReportService;
pub use speedway::SpeedwayService;
pub use team::TeamService;
pub use user::UserService;
