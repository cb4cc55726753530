//! # Repository Module
//!
//! SQLite implementations of the entity stores.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  Service                                                               │
//! │       │                                                                 │
//! │       │  store.find_by_country_by_size_desc(&country)                  │
//! │       ▼                                                                 │
//! │  SpeedwayStore (trait)  ◄── implemented by SpeedwayRepository          │
//! │  ├── Store<Speedway>: get_by_id / get_all / save / delete              │
//! │  └── named filters: prefix, range, foreign key                         │
//! │       │                                                                 │
//! │       │  SQL Query (joins hydrate every reference)                     │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Stores never validate and never turn "nothing" into an error:         │
//! │  they answer Option / Vec and leave policy to the services.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CountryRepository`](country::CountryRepository)
//! - [`TeamRepository`](team::TeamRepository)
//! - [`SpeedwayRepository`](speedway::SpeedwayRepository)
//! - [`ChampionshipRepository`](championship::ChampionshipRepository)
//! - [`PilotRepository`](pilot::PilotRepository)
//! - [`RaceRepository`](race::RaceRepository)
//! - [`PilotRaceRepository`](pilot_race::PilotRaceRepository)
//! - [`UserRepository`](user::UserRepository)

use std::future::Future;

use pitwall_core::EntityId;

use crate::error::DbResult;

pub mod championship;
pub mod country;
pub mod pilot;
pub mod pilot_race;
pub mod race;
pub mod speedway;
pub mod team;
pub mod user;

// =============================================================================
// Store Contract
// =============================================================================

/// Basic persistence contract every entity store offers.
///
/// ## Semantics
/// - `get_by_id` / `get_all` return `None` / an empty `Vec` when nothing
///   matches. `get_all` is ordered by id.
/// - `save` inserts when `id` is `None` (the store assigns the id) and
///   upserts by id otherwise. It returns the stored row, re-read.
/// - `delete` removes one row; an unknown id is `DbError::NotFound`.
pub trait Store<E>: Send + Sync {
    fn get_by_id(&self, id: EntityId) -> impl Future<Output = DbResult<Option<E>>> + Send;

    fn get_all(&self) -> impl Future<Output = DbResult<Vec<E>>> + Send;

    fn save(&self, entity: &E) -> impl Future<Output = DbResult<E>> + Send;

    fn delete(&self, id: EntityId) -> impl Future<Output = DbResult<()>> + Send;
}

// =============================================================================
// Search Helpers
// =============================================================================

/// Lowercases text for the `*_key` search columns.
///
/// SQLite only folds ASCII, so "Émerson" and "émerson" would differ under
/// `LIKE`/`NOCASE`. Both the stored key and every search argument go
/// through this function instead.
pub(crate) fn search_key(raw: &str) -> String {
    raw.to_lowercase()
}

/// Escapes `%`, `_` and `\` so user input matches literally in a LIKE
/// pattern declared with `ESCAPE '\'`.
pub(crate) fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// "Starts with" pattern over a `*_key` column.
pub(crate) fn starts_with_pattern(prefix: &str) -> String {
    format!("{}%", escape_like(&search_key(prefix)))
}

/// "Contains" pattern over a `*_key` column.
pub(crate) fn contains_pattern(fragment: &str) -> String {
    format!("%{}%", escape_like(&search_key(fragment)))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_patterns_escape_wildcards() {
        assert_eq!(starts_with_pattern("Alasca"), "alasca%");
        assert_eq!(contains_pattern("F1"), "%f1%");
        assert_eq!(starts_with_pattern("ÉMERSON"), "émerson%");
        assert_eq!(escape_like("100%_off\\"), "100\\%\\_off\\\\");
    }
}
