//! # User Service
//!
//! Users differ from the other entities in two ways:
//! - email uniqueness needs a store lookup, so it runs here rather than as
//!   a plain rule
//! - `update` requires the target to exist before anything else is checked
//!
//! ## Known gap
//! The uniqueness check is a read followed by a separate write. Two
//! concurrent inserts with the same email can both pass it; the UNIQUE
//! index then rejects the second one as a store error. The check also does
//! not exclude the user being updated, so an update that keeps its own
//! email is rejected; clients rely on that behaviour today.

use std::ops::Deref;

use pitwall_core::validation::{accept, validate_unique_email};
use pitwall_core::{EntityId, User};
use pitwall_db::UserStore;
use tracing::warn;

use crate::crud::{CrudService, Messages, Validator};
use crate::error::{ServiceError, ServiceResult};
use crate::query;

const MESSAGES: Messages = Messages {
    entity: "User",
    missing,
    empty: "Nenhum usuário cadastrado",
};

fn missing(id: EntityId) -> String {
    format!("O usuário {id} não existe")
}

// an update without an id can never match a stored user
fn missing_id() -> String {
    "O usuário null não existe".to_string()
}

pub struct UserService<S> {
    crud: CrudService<User, S>,
}

impl<S: UserStore> UserService<S> {
    pub fn new(store: S) -> Self {
        UserService {
            crud: CrudService::new(MESSAGES, store, accept as Validator<User>),
        }
    }

    async fn check_email(&self, candidate: &User) -> ServiceResult<()> {
        let holder = self.store().find_by_email(&candidate.email).await?;

        validate_unique_email(candidate, holder.as_ref()).map_err(|err| {
            warn!(entity = MESSAGES.entity, reason = %err, "Write rejected");
            ServiceError::from(err)
        })
    }

    pub async fn insert(&self, user: &User) -> ServiceResult<User> {
        self.check_email(user).await?;
        self.crud.insert(user).await
    }

    /// Fails with NotFound before the email check when the id is unknown.
    pub async fn update(&self, user: &User) -> ServiceResult<User> {
        let id = user.id.ok_or_else(|| ServiceError::not_found(missing_id()))?;
        self.find_by_id(id).await?;

        self.check_email(user).await?;
        self.crud.update(user).await
    }

    pub async fn find_by_name_starting_with(&self, prefix: &str) -> ServiceResult<Vec<User>> {
        query::many(
            MESSAGES.entity,
            self.store().find_by_name_starting_with(prefix),
            || format!("Nenhum nome de usuário inicia com {prefix}"),
        )
        .await
    }

    /// Resolves the user holding `email`, e.g. for an authentication layer.
    pub async fn find_by_email(&self, email: &str) -> ServiceResult<User> {
        query::one(MESSAGES.entity, self.store().find_by_email(email), || {
            format!("Nenhum usuário com o email: {email}")
        })
        .await
    }
}

impl<S> Deref for UserService<S> {
    type Target = CrudService<User, S>;

    fn deref(&self) -> &Self::Target {
        &self.crud
    }
}
