//! # Query-or-Error
//!
//! Every read in the service layer goes through one of two functions here.
//! An empty answer from the store becomes [`ServiceError::NotFound`] with a
//! caller-facing message; anything else passes through untouched, in the
//! order the store returned it.
//!
//! ```text
//!   store.find_by_year(2023) ──► Ok(vec![])   ──► Err(NotFound("Nenhum ... 2023"))
//!                             ──► Ok(vec![a]) ──► Ok(vec![a])
//!                             ──► Err(db)     ──► Err(Store(db))
//! ```
//!
//! The message is built lazily, only on a miss.

use std::future::Future;

use pitwall_db::DbResult;
use tracing::{debug, warn};

use crate::error::{ServiceError, ServiceResult};

/// Single-item lookup: `None` becomes NotFound.
pub async fn one<T, F, M>(entity: &'static str, lookup: F, describe: M) -> ServiceResult<T>
where
    F: Future<Output = DbResult<Option<T>>>,
    M: FnOnce() -> String,
{
    match lookup.await? {
        Some(found) => Ok(found),
        None => {
            let message = describe();
            warn!(entity = entity, message = %message, "Lookup matched nothing");
            Err(ServiceError::NotFound(message))
        }
    }
}

/// Collection lookup: an empty `Vec` becomes NotFound.
pub async fn many<T, F, M>(entity: &'static str, lookup: F, describe: M) -> ServiceResult<Vec<T>>
where
    F: Future<Output = DbResult<Vec<T>>>,
    M: FnOnce() -> String,
{
    let found = lookup.await?;

    if found.is_empty() {
        let message = describe();
        warn!(entity = entity, message = %message, "Filter matched nothing");
        return Err(ServiceError::NotFound(message));
    }

    debug!(entity = entity, count = found.len(), "Filter matched");
    Ok(found)
}
