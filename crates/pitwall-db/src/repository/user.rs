//! # User Repository
//!
//! Roles live in a single TEXT column as a comma separated list
//! (`"ADMIN,USER"`). A role name the core does not know is reported as a
//! corrupt row rather than silently dropped.

use std::future::Future;

use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{search_key, starts_with_pattern, Store};
use pitwall_core::{join_roles, parse_roles, EntityId, User};

const ENTITY: &str = "User";

#[derive(Debug, FromRow)]
struct UserRow {
    id: EntityId,
    name: String,
    email: String,
    password: String,
    roles: String,
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> DbResult<Self> {
        let roles = parse_roles(&row.roles).map_err(|reason| DbError::corrupt(ENTITY, reason))?;

        Ok(User {
            id: Some(row.id),
            name: row.name,
            email: row.email,
            password: row.password,
            roles,
        })
    }
}

fn into_users(rows: Vec<UserRow>) -> DbResult<Vec<User>> {
    rows.into_iter().map(User::try_from).collect()
}

/// User filters on top of [`Store`].
pub trait UserStore: Store<User> {
    /// Users whose name starts with `prefix`, ignoring case.
    fn find_by_name_starting_with(
        &self,
        prefix: &str,
    ) -> impl Future<Output = DbResult<Vec<User>>> + Send;

    /// The user holding `email` (exact match), if any.
    fn find_by_email(&self, email: &str) -> impl Future<Output = DbResult<Option<User>>> + Send;
}

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }
}

impl Store<User> for UserRepository {
    async fn get_by_id(&self, id: EntityId) -> DbResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password, roles FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn get_all(&self) -> DbResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password, roles FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed users");
        into_users(rows)
    }

    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - the email is already stored on another row
    async fn save(&self, user: &User) -> DbResult<User> {
        // never log the password
        debug!(id = ?user.id, email = %user.email, "Saving user");

        let id: EntityId = sqlx::query_scalar(
            r#"
            INSERT INTO users (id, name, name_key, email, password, roles)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                name_key = excluded.name_key,
                email = excluded.email,
                password = excluded.password,
                roles = excluded.roles
            RETURNING id
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(search_key(&user.name))
        .bind(&user.email)
        .bind(&user.password)
        .bind(join_roles(&user.roles))
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))
    }

    async fn delete(&self, id: EntityId) -> DbResult<()> {
        debug!(id = %id, "Deleting user");

        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, id));
        }

        Ok(())
    }
}

impl UserStore for UserRepository {
    async fn find_by_name_starting_with(&self, prefix: &str) -> DbResult<Vec<User>> {
        debug!(prefix = %prefix, "Finding users by name prefix");

        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password, roles FROM users
            WHERE name_key LIKE ?1 ESCAPE '\'
            ORDER BY id
            "#,
        )
        .bind(starts_with_pattern(prefix))
        .fetch_all(&self.pool)
        .await?;

        into_users(rows)
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        debug!(email = %email, "Finding user by email");

        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password, roles FROM users WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::db;
    use pitwall_core::Role;

    #[tokio::test]
    async fn test_roles_round_trip_through_column() {
        let db = db().await;
        let repo = db.users();

        let saved = repo
            .save(&User::new("Ana", "ana@pitwall.dev", "secret", vec![Role::Admin, Role::User]))
            .await
            .unwrap();
        assert_eq!(saved.roles, vec![Role::Admin, Role::User]);

        let by_email = repo.find_by_email("ana@pitwall.dev").await.unwrap().unwrap();
        assert_eq!(by_email.id, saved.id);
        assert!(repo.find_by_email("nobody@pitwall.dev").await.unwrap().is_none());
        assert_eq!(repo.find_by_name_starting_with("an").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_role_is_corrupt_row() {
        let db = db().await;
        sqlx::query("INSERT INTO users (name, name_key, email, password, roles) VALUES ('x', 'x', 'x@x', 'x', 'PILOT')")
            .execute(db.pool())
            .await
            .unwrap();

        let err = db.users().get_all().await.unwrap_err();
        assert!(matches!(err, DbError::CorruptRow { .. }));
    }
}
