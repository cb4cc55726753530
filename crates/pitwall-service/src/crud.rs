//! # Generic CRUD Service
//!
//! One implementation of find / insert / list / update / delete shared by
//! every entity service. An entity service is this struct plus its named
//! filters.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  insert(entity)                                                        │
//! │       │                                                                 │
//! │       ├── clear id (the store assigns it)                              │
//! │       ├── rule.check(&candidate) ──► Err ──► IntegrityViolation        │
//! │       │                                      (store untouched)         │
//! │       └── store.save(&candidate) ──► stored entity, id assigned        │
//! │                                                                         │
//! │  update(entity)                                                        │
//! │       ├── rule.check(entity)     ──► Err ──► IntegrityViolation        │
//! │       └── store.save(entity)     (upsert by id)                        │
//! │                                                                         │
//! │  delete(id)                                                            │
//! │       ├── find_by_id(id)         ──► NotFound if absent                │
//! │       └── store.delete(id)                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::marker::PhantomData;

use pitwall_core::{Entity, EntityId, Rule, ValidationResult};
use pitwall_db::Store;
use tracing::{debug, info, warn};

use crate::error::ServiceResult;
use crate::query;

/// Plain function rule, the default for entity services.
pub type Validator<E> = fn(&E) -> ValidationResult<()>;

/// Messages a [`CrudService`] reports when a lookup comes back empty.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    /// Entity name used in log fields.
    pub entity: &'static str,
    /// Message for a `find_by_id` (or `delete`) miss.
    pub missing: fn(EntityId) -> String,
    /// Message for an empty `list_all`.
    pub empty: &'static str,
}

/// Store + rule + messages for one entity.
pub struct CrudService<E, S, R = Validator<E>> {
    messages: Messages,
    store: S,
    rule: R,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S, R> CrudService<E, S, R>
where
    E: Entity + Clone,
    S: Store<E>,
    R: Rule<E>,
{
    pub fn new(messages: Messages, store: S, rule: R) -> Self {
        CrudService {
            messages,
            store,
            rule,
            _entity: PhantomData,
        }
    }

    /// The underlying store, for entity specific filters.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs the rule without touching the store.
    pub fn validate(&self, candidate: &E) -> ServiceResult<()> {
        self.rule.check(candidate).map_err(|err| {
            warn!(entity = self.messages.entity, reason = %err, "Write rejected");
            err.into()
        })
    }

    pub async fn find_by_id(&self, id: EntityId) -> ServiceResult<E> {
        let missing = self.messages.missing;
        query::one(self.messages.entity, self.store.get_by_id(id), || missing(id)).await
    }

    /// Validates and stores a new entity. Any id on `entity` is ignored.
    pub async fn insert(&self, entity: &E) -> ServiceResult<E> {
        let mut candidate = entity.clone();
        candidate.set_id(None);

        self.validate(&candidate)?;
        let stored = self.store.save(&candidate).await?;

        info!(entity = self.messages.entity, id = ?stored.id(), "Inserted");
        Ok(stored)
    }

    pub async fn list_all(&self) -> ServiceResult<Vec<E>> {
        let empty = self.messages.empty;
        query::many(self.messages.entity, self.store.get_all(), || empty.to_string()).await
    }

    /// Validates and stores `entity` under its own id.
    pub async fn update(&self, entity: &E) -> ServiceResult<E> {
        self.validate(entity)?;
        let stored = self.store.save(entity).await?;

        debug!(entity = self.messages.entity, id = ?stored.id(), "Updated");
        Ok(stored)
    }

    /// Deletes `id`, failing with the `find_by_id` message if it is absent.
    pub async fn delete(&self, id: EntityId) -> ServiceResult<()> {
        self.find_by_id(id).await?;
        self.store.delete(id).await?;

        info!(entity = self.messages.entity, id = id, "Deleted");
        Ok(())
    }
}
