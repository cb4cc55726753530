//! # Team Repository

use std::future::Future;

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{search_key, Store};
use pitwall_core::{EntityId, Team};

const ENTITY: &str = "Team";

/// Team filters on top of [`Store`].
pub trait TeamStore: Store<Team> {
    /// Teams whose name equals `name`, ignoring case.
    fn find_by_name(&self, name: &str) -> impl Future<Output = DbResult<Vec<Team>>> + Send;

    /// Teams whose name contains `fragment` (case-sensitive).
    fn find_by_name_containing(
        &self,
        fragment: &str,
    ) -> impl Future<Output = DbResult<Vec<Team>>> + Send;
}

/// Repository for team database operations.
#[derive(Debug, Clone)]
pub struct TeamRepository {
    pool: SqlitePool,
}

impl TeamRepository {
    /// Creates a new TeamRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TeamRepository { pool }
    }
}

impl Store<Team> for TeamRepository {
    async fn get_by_id(&self, id: EntityId) -> DbResult<Option<Team>> {
        let team = sqlx::query_as::<_, Team>("SELECT id, name FROM teams WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(team)
    }

    async fn get_all(&self) -> DbResult<Vec<Team>> {
        let teams = sqlx::query_as::<_, Team>("SELECT id, name FROM teams ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        debug!(count = teams.len(), "Listed teams");
        Ok(teams)
    }

    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - another team already has the name
    async fn save(&self, team: &Team) -> DbResult<Team> {
        debug!(id = ?team.id, name = %team.name, "Saving team");

        let id: EntityId = sqlx::query_scalar(
            r#"
            INSERT INTO teams (id, name, name_key) VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                name_key = excluded.name_key
            RETURNING id
            "#,
        )
        .bind(team.id)
        .bind(&team.name)
        .bind(search_key(&team.name))
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))
    }

    async fn delete(&self, id: EntityId) -> DbResult<()> {
        debug!(id = %id, "Deleting team");

        let result = sqlx::query("DELETE FROM teams WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, id));
        }

        Ok(())
    }
}

impl TeamStore for TeamRepository {
    async fn find_by_name(&self, name: &str) -> DbResult<Vec<Team>> {
        debug!(name = %name, "Finding teams by name");

        let teams = sqlx::query_as::<_, Team>(
            "SELECT id, name FROM teams WHERE name_key = ?1 ORDER BY id",
        )
        .bind(search_key(name))
        .fetch_all(&self.pool)
        .await?;

        Ok(teams)
    }

    async fn find_by_name_containing(&self, fragment: &str) -> DbResult<Vec<Team>> {
        debug!(fragment = %fragment, "Finding teams by name fragment");

        // instr() is case-sensitive, unlike LIKE
        let teams = sqlx::query_as::<_, Team>(
            "SELECT id, name FROM teams WHERE instr(name, ?1) > 0 ORDER BY id",
        )
        .bind(fragment)
        .fetch_all(&self.pool)
        .await?;

        Ok(teams)
    }
}
