//! # Country Repository

use std::future::Future;

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{search_key, Store};
use pitwall_core::{Country, EntityId};

const ENTITY: &str = "Country";

/// Country filters on top of [`Store`].
pub trait CountryStore: Store<Country> {
    /// Countries whose name equals `name`, ignoring case.
    fn find_by_name(&self, name: &str) -> impl Future<Output = DbResult<Vec<Country>>> + Send;
}

/// Repository for country database operations.
#[derive(Debug, Clone)]
pub struct CountryRepository {
    pool: SqlitePool,
}

impl CountryRepository {
    /// Creates a new CountryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CountryRepository { pool }
    }

    /// Counts stored countries (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM countries")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

impl Store<Country> for CountryRepository {
    async fn get_by_id(&self, id: EntityId) -> DbResult<Option<Country>> {
        let country = sqlx::query_as::<_, Country>("SELECT id, name FROM countries WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(country)
    }

    async fn get_all(&self) -> DbResult<Vec<Country>> {
        let countries = sqlx::query_as::<_, Country>("SELECT id, name FROM countries ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        debug!(count = countries.len(), "Listed countries");
        Ok(countries)
    }

    async fn save(&self, country: &Country) -> DbResult<Country> {
        debug!(id = ?country.id, name = %country.name, "Saving country");

        let id: EntityId = sqlx::query_scalar(
            r#"
            INSERT INTO countries (id, name, name_key) VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                name_key = excluded.name_key
            RETURNING id
            "#,
        )
        .bind(country.id)
        .bind(&country.name)
        .bind(search_key(&country.name))
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))
    }

    async fn delete(&self, id: EntityId) -> DbResult<()> {
        debug!(id = %id, "Deleting country");

        let result = sqlx::query("DELETE FROM countries WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, id));
        }

        Ok(())
    }
}

impl CountryStore for CountryRepository {
    async fn find_by_name(&self, name: &str) -> DbResult<Vec<Country>> {
        debug!(name = %name, "Finding countries by name");

        let countries = sqlx::query_as::<_, Country>(
            "SELECT id, name FROM countries WHERE name_key = ?1 ORDER BY id",
        )
        .bind(search_key(name))
        .fetch_all(&self.pool)
        .await?;

        Ok(countries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::db;

    #[tokio::test]
    async fn test_save_assigns_id_then_upserts() {
        let db = db().await;
        let repo = db.countries();

        let saved = repo.save(&Country::new("Brasil")).await.unwrap();
        let id = saved.id.unwrap();

        let renamed = repo.save(&Country::with_id(id, "Brazil")).await.unwrap();
        assert_eq!(renamed.id, Some(id));
        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(repo.get_by_id(id).await.unwrap().unwrap().name, "Brazil");
    }

    #[tokio::test]
    async fn test_find_by_name_ignores_case() {
        let db = db().await;
        let repo = db.countries();
        repo.save(&Country::new("Brasil")).await.unwrap();

        repo.save(&Country::new("Itália")).await.unwrap();

        assert_eq!(repo.find_by_name("bRaSiL").await.unwrap().len(), 1);
        assert_eq!(repo.find_by_name("ITÁLIA").await.unwrap().len(), 1);
        assert!(repo.find_by_name("Bras").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_is_not_found() {
        let db = db().await;
        let err = db.countries().delete(42).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
