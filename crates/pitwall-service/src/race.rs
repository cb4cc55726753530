//! # Race Service

use std::ops::Deref;

use chrono::{DateTime, FixedOffset};
use pitwall_core::validation::validate_race;
use pitwall_core::{Championship, EntityId, Race, Speedway};
use pitwall_db::RaceStore;

use crate::crud::{CrudService, Messages, Validator};
use crate::error::ServiceResult;
use crate::query;

const MESSAGES: Messages = Messages {
    entity: "Race",
    missing,
    empty: "Não existem corridas cadastradas",
};

fn missing(id: EntityId) -> String {
    format!("Corrida {id} não existe")
}

/// A race needs a championship and a date whose year matches it.
pub struct RaceService<S> {
    crud: CrudService<Race, S>,
}

impl<S: RaceStore> RaceService<S> {
    pub fn new(store: S) -> Self {
        RaceService {
            crud: CrudService::new(MESSAGES, store, validate_race as Validator<Race>),
        }
    }

    /// Races held at the same instant as `date`.
    pub async fn find_by_date(&self, date: DateTime<FixedOffset>) -> ServiceResult<Vec<Race>> {
        query::many(MESSAGES.entity, self.store().find_by_date(date), || {
            "Não existe corrida para a data especificada".to_string()
        })
        .await
    }

    pub async fn find_by_speedway(&self, speedway: &Speedway) -> ServiceResult<Vec<Race>> {
        query::many(MESSAGES.entity, self.store().find_by_speedway(speedway), || {
            "Não existe corrida na pista especificada".to_string()
        })
        .await
    }

    pub async fn find_by_championship(
        &self,
        championship: &Championship,
    ) -> ServiceResult<Vec<Race>> {
        query::many(
            MESSAGES.entity,
            self.store().find_by_championship(championship),
            || "Não existe corrida para o campeonato especificado".to_string(),
        )
        .await
    }
}

impl<S> Deref for RaceService<S> {
    type Target = CrudService<Race, S>;

    fn deref(&self) -> &Self::Target {
        &self.crud
    }
}
