//! # pitwall-db: Database Layer for Pitwall
//!
//! SQLite storage for every registry entity, built on sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pitwall Data Flow                                │
//! │                                                                         │
//! │  pitwall-service (RaceService::find_by_speedway)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     pitwall-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (one/entity)  │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ CountryRepo   │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │    │ RaceRepo      │    │              │  │   │
//! │  │   │ Management    │    │ UserRepo ...  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (pitwall.db)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - The [`Store`] contract and one repository per entity
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pitwall_db::{Database, DbConfig, SpeedwayStore};
//!
//! let db = Database::new(DbConfig::new("path/to/pitwall.db")).await?;
//! let tracks = db.speedways().find_by_country_by_size_desc(&brazil).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use migrations::MigrationStatus;
pub use pool::{Database, DbConfig};
pub use repository::Store;

// Repository re-exports for convenience
pub use repository::championship::{ChampionshipRepository, ChampionshipStore};
pub use repository::country::{CountryRepository, CountryStore};
pub use repository::pilot::{PilotRepository, PilotStore};
pub use repository::pilot_race::{PilotRaceRepository, PilotRaceStore};
pub use repository::race::{RaceRepository, RaceStore};
pub use repository::speedway::{SpeedwayRepository, SpeedwayStore};
pub use repository::team::{TeamRepository, TeamStore};
pub use repository::user::{UserRepository, UserStore};
