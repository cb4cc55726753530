//! # Speedway Repository
//!
//! Every speedway is read together with its country:
//! ```text
//! speedways s ──INNER JOIN── countries c ON c.id = s.country_id
//! ```

use std::future::Future;

use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{search_key, starts_with_pattern, Store};
use pitwall_core::{Country, EntityId, Speedway};

const ENTITY: &str = "Speedway";

const SELECT_SPEEDWAY: &str = r#"
    SELECT
        s.id,
        s.name,
        s.size,
        c.id   AS country_id,
        c.name AS country_name
    FROM speedways s
    INNER JOIN countries c ON c.id = s.country_id
"#;

/// Flat row of [`SELECT_SPEEDWAY`].
#[derive(Debug, FromRow)]
struct SpeedwayRow {
    id: EntityId,
    name: String,
    size: i32,
    country_id: EntityId,
    country_name: String,
}

impl From<SpeedwayRow> for Speedway {
    fn from(row: SpeedwayRow) -> Self {
        Speedway {
            id: Some(row.id),
            name: row.name,
            size: Some(row.size),
            country: Country::with_id(row.country_id, row.country_name),
        }
    }
}

/// Speedway filters on top of [`Store`].
pub trait SpeedwayStore: Store<Speedway> {
    /// Speedways whose name starts with `prefix`, ignoring case.
    fn find_by_name_starting_with(
        &self,
        prefix: &str,
    ) -> impl Future<Output = DbResult<Vec<Speedway>>> + Send;

    /// Speedways with `min <= size <= max`.
    fn find_by_size_between(
        &self,
        min: i32,
        max: i32,
    ) -> impl Future<Output = DbResult<Vec<Speedway>>> + Send;

    /// Speedways of `country`, largest first.
    fn find_by_country_by_size_desc(
        &self,
        country: &Country,
    ) -> impl Future<Output = DbResult<Vec<Speedway>>> + Send;
}

/// Repository for speedway database operations.
#[derive(Debug, Clone)]
pub struct SpeedwayRepository {
    pool: SqlitePool,
}

impl SpeedwayRepository {
    /// Creates a new SpeedwayRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SpeedwayRepository { pool }
    }
}

impl Store<Speedway> for SpeedwayRepository {
    async fn get_by_id(&self, id: EntityId) -> DbResult<Option<Speedway>> {
        let sql = format!("{SELECT_SPEEDWAY} WHERE s.id = ?1");
        let row = sqlx::query_as::<_, SpeedwayRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Speedway::from))
    }

    async fn get_all(&self) -> DbResult<Vec<Speedway>> {
        let sql = format!("{SELECT_SPEEDWAY} ORDER BY s.id");
        let rows = sqlx::query_as::<_, SpeedwayRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Listed speedways");
        Ok(rows.into_iter().map(Speedway::from).collect())
    }

    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - the country does not exist
    /// * `Err(DbError::QueryFailed)` - size is absent (NOT NULL)
    async fn save(&self, speedway: &Speedway) -> DbResult<Speedway> {
        debug!(id = ?speedway.id, name = %speedway.name, "Saving speedway");

        let id: EntityId = sqlx::query_scalar(
            r#"
            INSERT INTO speedways (id, name, name_key, size, country_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                name_key = excluded.name_key,
                size = excluded.size,
                country_id = excluded.country_id
            RETURNING id
            "#,
        )
        .bind(speedway.id)
        .bind(&speedway.name)
        .bind(search_key(&speedway.name))
        .bind(speedway.size)
        .bind(speedway.country.id)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))
    }

    async fn delete(&self, id: EntityId) -> DbResult<()> {
        debug!(id = %id, "Deleting speedway");

        let result = sqlx::query("DELETE FROM speedways WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, id));
        }

        Ok(())
    }
}

impl SpeedwayStore for SpeedwayRepository {
    async fn find_by_name_starting_with(&self, prefix: &str) -> DbResult<Vec<Speedway>> {
        debug!(prefix = %prefix, "Finding speedways by name prefix");

        let sql = format!("{SELECT_SPEEDWAY} WHERE s.name_key LIKE ?1 ESCAPE '\\' ORDER BY s.id");
        let rows = sqlx::query_as::<_, SpeedwayRow>(&sql)
            .bind(starts_with_pattern(prefix))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Speedway::from).collect())
    }

    async fn find_by_size_between(&self, min: i32, max: i32) -> DbResult<Vec<Speedway>> {
        debug!(min = min, max = max, "Finding speedways by size");

        let sql = format!("{SELECT_SPEEDWAY} WHERE s.size BETWEEN ?1 AND ?2 ORDER BY s.id");
        let rows = sqlx::query_as::<_, SpeedwayRow>(&sql)
            .bind(min)
            .bind(max)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Speedway::from).collect())
    }

    async fn find_by_country_by_size_desc(&self, country: &Country) -> DbResult<Vec<Speedway>> {
        debug!(country_id = ?country.id, "Finding speedways by country");

        let sql = format!("{SELECT_SPEEDWAY} WHERE s.country_id = ?1 ORDER BY s.size DESC, s.id");
        let rows = sqlx::query_as::<_, SpeedwayRow>(&sql)
            .bind(country.id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Speedway::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::db;

    #[tokio::test]
    async fn test_filters() {
        let db = db().await;
        let brazil = db.countries().save(&Country::new("Brasil")).await.unwrap();
        let italy = db.countries().save(&Country::new("Itália")).await.unwrap();
        let repo = db.speedways();

        repo.save(&Speedway::new("Interlagos", Some(4309), brazil.clone()))
            .await
            .unwrap();
        repo.save(&Speedway::new("Jacarepaguá", Some(5031), brazil.clone()))
            .await
            .unwrap();
        repo.save(&Speedway::new("Monza", Some(5793), italy))
            .await
            .unwrap();

        let by_prefix = repo.find_by_name_starting_with("inter").await.unwrap();
        assert_eq!(by_prefix.len(), 1);
        assert_eq!(by_prefix[0].country.name, "Brasil");

        let by_size = repo.find_by_size_between(4309, 5031).await.unwrap();
        assert_eq!(by_size.len(), 2);

        let brazilian = repo.find_by_country_by_size_desc(&brazil).await.unwrap();
        let names: Vec<_> = brazilian.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Jacarepaguá", "Interlagos"]);
    }

    #[tokio::test]
    async fn test_unknown_country_is_fk_violation() {
        let db = db().await;
        let ghost = Country::with_id(99, "Atlântida");

        let err = db
            .speedways()
            .save(&Speedway::new("Nowhere", Some(1000), ghost))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
