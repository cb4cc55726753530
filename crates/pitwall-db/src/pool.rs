//! # Database Handle
//!
//! ```text
//! DbConfig ──► Database::new ──► SqlitePool (+ migrations)
//!                                   │
//!                                   └─► db.countries(), db.races(), ...
//! ```
//!
//! Every repository holds a clone of the pool, so handing them out is cheap.
//! File databases use WAL; foreign keys are always on because every entity
//! reference is an FK in the schema.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations::{self, MigrationStatus};
use crate::repository::championship::ChampionshipRepository;
use crate::repository::country::CountryRepository;
use crate::repository::pilot::PilotRepository;
use crate::repository::pilot_race::PilotRaceRepository;
use crate::repository::race::RaceRepository;
use crate::repository::speedway::SpeedwayRepository;
use crate::repository::team::TeamRepository;
use crate::repository::user::UserRepository;

/// Where the registry lives and how the pool is sized.
///
/// ```rust,ignore
/// let config = DbConfig::new("./pitwall.db").max_connections(4);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_path: PathBuf,
    /// Default: 5
    pub max_connections: u32,
    /// Default: 1
    pub min_connections: u32,
    /// How long a caller waits for a free connection.
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    /// Apply pending migrations in [`Database::new`]. Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// The file is created on first connect.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// A private, migrated database for tests.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            // each in-memory connection would be its own database
            max_connections: 1,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }
}

/// Pool handle that hands out the entity repositories.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (creating if needed) the database and applies migrations unless
    /// `run_migrations` is off.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening registry database");

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());
        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // off by default in SQLite
            .foreign_keys(true)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(max_connections = config.max_connections, "Pool ready");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Known versus applied migrations, for `pitwall status`.
    pub async fn migration_status(&self) -> DbResult<MigrationStatus> {
        migrations::migration_status(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn countries(&self) -> CountryRepository {
        CountryRepository::new(self.pool.clone())
    }

    pub fn teams(&self) -> TeamRepository {
        TeamRepository::new(self.pool.clone())
    }

    pub fn speedways(&self) -> SpeedwayRepository {
        SpeedwayRepository::new(self.pool.clone())
    }

    pub fn championships(&self) -> ChampionshipRepository {
        ChampionshipRepository::new(self.pool.clone())
    }

    pub fn pilots(&self) -> PilotRepository {
        PilotRepository::new(self.pool.clone())
    }

    pub fn races(&self) -> RaceRepository {
        RaceRepository::new(self.pool.clone())
    }

    pub fn pilot_races(&self) -> PilotRaceRepository {
        PilotRaceRepository::new(self.pool.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    /// Repositories handed out earlier fail after this.
    pub async fn close(&self) {
        info!("Closing registry database");
        self.pool.close().await;
    }

    /// True when the database answers `SELECT 1`.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
