//! # Pilot Repository
//!
//! ```text
//! pilots p ──INNER JOIN── countries c ON c.id = p.country_id
//!          └─INNER JOIN── teams t     ON t.id = p.team_id
//! ```

use std::future::Future;

use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{search_key, starts_with_pattern, Store};
use pitwall_core::{Country, EntityId, Pilot, Team};

const ENTITY: &str = "Pilot";

const SELECT_PILOT: &str = r#"
    SELECT
        p.id,
        p.name,
        c.id   AS country_id,
        c.name AS country_name,
        t.id   AS team_id,
        t.name AS team_name
    FROM pilots p
    INNER JOIN countries c ON c.id = p.country_id
    INNER JOIN teams t     ON t.id = p.team_id
"#;

#[derive(Debug, FromRow)]
struct PilotRow {
    id: EntityId,
    name: String,
    country_id: EntityId,
    country_name: String,
    team_id: EntityId,
    team_name: String,
}

impl From<PilotRow> for Pilot {
    fn from(row: PilotRow) -> Self {
        Pilot {
            id: Some(row.id),
            name: row.name,
            country: Country::with_id(row.country_id, row.country_name),
            team: Team::with_id(row.team_id, row.team_name),
        }
    }
}

/// Pilot filters on top of [`Store`].
pub trait PilotStore: Store<Pilot> {
    /// Pilots whose name starts with `prefix`, ignoring case.
    fn find_by_name_starting_with(
        &self,
        prefix: &str,
    ) -> impl Future<Output = DbResult<Vec<Pilot>>> + Send;

    fn find_by_country(&self, country: &Country)
        -> impl Future<Output = DbResult<Vec<Pilot>>> + Send;

    fn find_by_team(&self, team: &Team) -> impl Future<Output = DbResult<Vec<Pilot>>> + Send;
}

/// Repository for pilot database operations.
#[derive(Debug, Clone)]
pub struct PilotRepository {
    pool: SqlitePool,
}

impl PilotRepository {
    /// Creates a new PilotRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PilotRepository { pool }
    }

    async fn fetch_where(&self, clause: &str, key: Option<EntityId>) -> DbResult<Vec<Pilot>> {
        let sql = format!("{SELECT_PILOT} WHERE {clause} ORDER BY p.id");
        let rows = sqlx::query_as::<_, PilotRow>(&sql)
            .bind(key)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Pilot::from).collect())
    }
}

impl Store<Pilot> for PilotRepository {
    async fn get_by_id(&self, id: EntityId) -> DbResult<Option<Pilot>> {
        let sql = format!("{SELECT_PILOT} WHERE p.id = ?1");
        let row = sqlx::query_as::<_, PilotRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Pilot::from))
    }

    async fn get_all(&self) -> DbResult<Vec<Pilot>> {
        let sql = format!("{SELECT_PILOT} ORDER BY p.id");
        let rows = sqlx::query_as::<_, PilotRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Listed pilots");
        Ok(rows.into_iter().map(Pilot::from).collect())
    }

    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - the country or team does not exist
    async fn save(&self, pilot: &Pilot) -> DbResult<Pilot> {
        debug!(id = ?pilot.id, name = %pilot.name, "Saving pilot");

        let id: EntityId = sqlx::query_scalar(
            r#"
            INSERT INTO pilots (id, name, name_key, country_id, team_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                name_key = excluded.name_key,
                country_id = excluded.country_id,
                team_id = excluded.team_id
            RETURNING id
            "#,
        )
        .bind(pilot.id)
        .bind(&pilot.name)
        .bind(search_key(&pilot.name))
        .bind(pilot.country.id)
        .bind(pilot.team.id)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))
    }

    async fn delete(&self, id: EntityId) -> DbResult<()> {
        debug!(id = %id, "Deleting pilot");

        let result = sqlx::query("DELETE FROM pilots WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, id));
        }

        Ok(())
    }
}

impl PilotStore for PilotRepository {
    async fn find_by_name_starting_with(&self, prefix: &str) -> DbResult<Vec<Pilot>> {
        debug!(prefix = %prefix, "Finding pilots by name prefix");

        let sql = format!("{SELECT_PILOT} WHERE p.name_key LIKE ?1 ESCAPE '\\' ORDER BY p.id");
        let rows = sqlx::query_as::<_, PilotRow>(&sql)
            .bind(starts_with_pattern(prefix))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Pilot::from).collect())
    }

    async fn find_by_country(&self, country: &Country) -> DbResult<Vec<Pilot>> {
        debug!(country_id = ?country.id, "Finding pilots by country");
        self.fetch_where("p.country_id = ?1", country.id).await
    }

    async fn find_by_team(&self, team: &Team) -> DbResult<Vec<Pilot>> {
        debug!(team_id = ?team.id, "Finding pilots by team");
        self.fetch_where("p.team_id = ?1", team.id).await
    }
}
