//! # Race Repository
//!
//! A race row hydrates three references in one query:
//! ```text
//! races r ──INNER JOIN── speedways s     ON s.id = r.speedway_id
//!         │              └─INNER JOIN── countries c ON c.id = s.country_id
//!         └─INNER JOIN── championships ch ON ch.id = r.championship_id
//! ```
//!
//! Dates are stored as RFC 3339 text and keep their UTC offset. Equality
//! filters compare instants through `julianday()`, so the same moment written
//! with a different offset still matches.

use std::future::Future;

use chrono::{DateTime, FixedOffset};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::Store;
use pitwall_core::{Championship, Country, EntityId, Race, Speedway};

const ENTITY: &str = "Race";

pub(crate) const SELECT_RACE_COLUMNS: &str = r#"
        r.id                AS race_id,
        r.date              AS race_date,
        s.id                AS speedway_id,
        s.name              AS speedway_name,
        s.size              AS speedway_size,
        sc.id               AS speedway_country_id,
        sc.name             AS speedway_country_name,
        ch.id               AS championship_id,
        ch.description      AS championship_description,
        ch.year             AS championship_year
"#;

pub(crate) const RACE_JOINS: &str = r#"
    INNER JOIN speedways s      ON s.id = r.speedway_id
    INNER JOIN countries sc     ON sc.id = s.country_id
    INNER JOIN championships ch ON ch.id = r.championship_id
"#;

/// Flat race columns, shared with the pilot-race join.
#[derive(Debug, FromRow)]
pub(crate) struct RaceRow {
    race_id: EntityId,
    race_date: String,
    speedway_id: EntityId,
    speedway_name: String,
    speedway_size: i32,
    speedway_country_id: EntityId,
    speedway_country_name: String,
    championship_id: EntityId,
    championship_description: String,
    championship_year: i32,
}

impl RaceRow {
    pub(crate) fn into_race(self) -> DbResult<Race> {
        let date = DateTime::parse_from_rfc3339(&self.race_date)
            .map_err(|e| DbError::corrupt(ENTITY, format!("date '{}': {e}", self.race_date)))?;

        Ok(Race {
            id: Some(self.race_id),
            date: Some(date),
            speedway: Speedway {
                id: Some(self.speedway_id),
                name: self.speedway_name,
                size: Some(self.speedway_size),
                country: Country::with_id(self.speedway_country_id, self.speedway_country_name),
            },
            championship: Some(Championship {
                id: Some(self.championship_id),
                description: self.championship_description,
                year: Some(self.championship_year),
            }),
        })
    }
}

fn into_races(rows: Vec<RaceRow>) -> DbResult<Vec<Race>> {
    rows.into_iter().map(RaceRow::into_race).collect()
}

/// RFC 3339 text as written to the `date` column.
pub(crate) fn encode_date(date: &DateTime<FixedOffset>) -> String {
    date.to_rfc3339()
}

/// Race filters on top of [`Store`].
pub trait RaceStore: Store<Race> {
    /// Races held at exactly `date` (same instant, any offset).
    fn find_by_date(
        &self,
        date: DateTime<FixedOffset>,
    ) -> impl Future<Output = DbResult<Vec<Race>>> + Send;

    fn find_by_speedway(
        &self,
        speedway: &Speedway,
    ) -> impl Future<Output = DbResult<Vec<Race>>> + Send;

    fn find_by_championship(
        &self,
        championship: &Championship,
    ) -> impl Future<Output = DbResult<Vec<Race>>> + Send;
}

/// Repository for race database operations.
#[derive(Debug, Clone)]
pub struct RaceRepository {
    pool: SqlitePool,
}

impl RaceRepository {
    /// Creates a new RaceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RaceRepository { pool }
    }

    async fn fetch_by_key(&self, clause: &str, key: Option<EntityId>) -> DbResult<Vec<Race>> {
        let sql = format!(
            "SELECT {SELECT_RACE_COLUMNS} FROM races r {RACE_JOINS} WHERE {clause} ORDER BY r.id"
        );
        let rows = sqlx::query_as::<_, RaceRow>(&sql)
            .bind(key)
            .fetch_all(&self.pool)
            .await?;

        into_races(rows)
    }
}

impl Store<Race> for RaceRepository {
    async fn get_by_id(&self, id: EntityId) -> DbResult<Option<Race>> {
        let sql = format!("SELECT {SELECT_RACE_COLUMNS} FROM races r {RACE_JOINS} WHERE r.id = ?1");
        let row = sqlx::query_as::<_, RaceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(RaceRow::into_race).transpose()
    }

    async fn get_all(&self) -> DbResult<Vec<Race>> {
        let sql = format!("SELECT {SELECT_RACE_COLUMNS} FROM races r {RACE_JOINS} ORDER BY r.id");
        let rows = sqlx::query_as::<_, RaceRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Listed races");
        into_races(rows)
    }

    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - the speedway or championship does not exist
    async fn save(&self, race: &Race) -> DbResult<Race> {
        debug!(id = ?race.id, date = ?race.date, "Saving race");

        let id: EntityId = sqlx::query_scalar(
            r#"
            INSERT INTO races (id, date, speedway_id, championship_id) VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                date = excluded.date,
                speedway_id = excluded.speedway_id,
                championship_id = excluded.championship_id
            RETURNING id
            "#,
        )
        .bind(race.id)
        .bind(race.date.as_ref().map(encode_date))
        .bind(race.speedway.id)
        .bind(race.championship.as_ref().and_then(|c| c.id))
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))
    }

    async fn delete(&self, id: EntityId) -> DbResult<()> {
        debug!(id = %id, "Deleting race");

        let result = sqlx::query("DELETE FROM races WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, id));
        }

        Ok(())
    }
}

impl RaceStore for RaceRepository {
    async fn find_by_date(&self, date: DateTime<FixedOffset>) -> DbResult<Vec<Race>> {
        debug!(date = %date, "Finding races by date");

        let sql = format!(
            "SELECT {SELECT_RACE_COLUMNS} FROM races r {RACE_JOINS} \
             WHERE julianday(r.date) = julianday(?1) ORDER BY r.id"
        );
        let rows = sqlx::query_as::<_, RaceRow>(&sql)
            .bind(encode_date(&date))
            .fetch_all(&self.pool)
            .await?;

        into_races(rows)
    }

    async fn find_by_speedway(&self, speedway: &Speedway) -> DbResult<Vec<Race>> {
        debug!(speedway_id = ?speedway.id, "Finding races by speedway");
        self.fetch_by_key("r.speedway_id = ?1", speedway.id).await
    }

    async fn find_by_championship(&self, championship: &Championship) -> DbResult<Vec<Race>> {
        debug!(championship_id = ?championship.id, "Finding races by championship");
        self.fetch_by_key("r.championship_id = ?1", championship.id)
            .await
    }
}
