//! # Championship Repository

use std::future::Future;

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{contains_pattern, search_key, Store};
use pitwall_core::{Championship, EntityId};

const ENTITY: &str = "Championship";

/// Championship filters on top of [`Store`].
pub trait ChampionshipStore: Store<Championship> {
    /// Championships with `start <= year <= end`.
    fn find_by_year_between(
        &self,
        start: i32,
        end: i32,
    ) -> impl Future<Output = DbResult<Vec<Championship>>> + Send;

    fn find_by_year(&self, year: i32) -> impl Future<Output = DbResult<Vec<Championship>>> + Send;

    /// Championships whose description contains `fragment`, ignoring case.
    fn find_by_description_containing(
        &self,
        fragment: &str,
    ) -> impl Future<Output = DbResult<Vec<Championship>>> + Send;

    fn find_by_description_containing_and_year(
        &self,
        fragment: &str,
        year: i32,
    ) -> impl Future<Output = DbResult<Vec<Championship>>> + Send;
}

/// Repository for championship database operations.
#[derive(Debug, Clone)]
pub struct ChampionshipRepository {
    pool: SqlitePool,
}

impl ChampionshipRepository {
    /// Creates a new ChampionshipRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ChampionshipRepository { pool }
    }
}

impl Store<Championship> for ChampionshipRepository {
    async fn get_by_id(&self, id: EntityId) -> DbResult<Option<Championship>> {
        let championship = sqlx::query_as::<_, Championship>(
            "SELECT id, description, year FROM championships WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(championship)
    }

    async fn get_all(&self) -> DbResult<Vec<Championship>> {
        let championships = sqlx::query_as::<_, Championship>(
            "SELECT id, description, year FROM championships ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = championships.len(), "Listed championships");
        Ok(championships)
    }

    async fn save(&self, championship: &Championship) -> DbResult<Championship> {
        debug!(id = ?championship.id, year = ?championship.year, "Saving championship");

        let id: EntityId = sqlx::query_scalar(
            r#"
            INSERT INTO championships (id, description, description_key, year)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                description = excluded.description,
                description_key = excluded.description_key,
                year = excluded.year
            RETURNING id
            "#,
        )
        .bind(championship.id)
        .bind(&championship.description)
        .bind(search_key(&championship.description))
        .bind(championship.year)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))
    }

    async fn delete(&self, id: EntityId) -> DbResult<()> {
        debug!(id = %id, "Deleting championship");

        let result = sqlx::query("DELETE FROM championships WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, id));
        }

        Ok(())
    }
}

impl ChampionshipStore for ChampionshipRepository {
    async fn find_by_year_between(&self, start: i32, end: i32) -> DbResult<Vec<Championship>> {
        debug!(start = start, end = end, "Finding championships by year range");

        let championships = sqlx::query_as::<_, Championship>(
            r#"
            SELECT id, description, year FROM championships
            WHERE year BETWEEN ?1 AND ?2
            ORDER BY id
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(championships)
    }

    async fn find_by_year(&self, year: i32) -> DbResult<Vec<Championship>> {
        let championships = sqlx::query_as::<_, Championship>(
            "SELECT id, description, year FROM championships WHERE year = ?1 ORDER BY id",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await?;

        Ok(championships)
    }

    async fn find_by_description_containing(&self, fragment: &str) -> DbResult<Vec<Championship>> {
        debug!(fragment = %fragment, "Finding championships by description");

        let championships = sqlx::query_as::<_, Championship>(
            r#"
            SELECT id, description, year FROM championships
            WHERE description_key LIKE ?1 ESCAPE '\'
            ORDER BY id
            "#,
        )
        .bind(contains_pattern(fragment))
        .fetch_all(&self.pool)
        .await?;

        Ok(championships)
    }

    async fn find_by_description_containing_and_year(
        &self,
        fragment: &str,
        year: i32,
    ) -> DbResult<Vec<Championship>> {
        debug!(fragment = %fragment, year = year, "Finding championships by description and year");

        let championships = sqlx::query_as::<_, Championship>(
            r#"
            SELECT id, description, year FROM championships
            WHERE description_key LIKE ?1 ESCAPE '\' AND year = ?2
            ORDER BY id
            "#,
        )
        .bind(contains_pattern(fragment))
        .bind(year)
        .fetch_all(&self.pool)
        .await?;

        Ok(championships)
    }
}
