//! # Pilot Service

use std::ops::Deref;

use pitwall_core::validation::accept;
use pitwall_core::{Country, EntityId, Pilot, Team};
use pitwall_db::PilotStore;

use crate::crud::{CrudService, Messages, Validator};
use crate::error::ServiceResult;
use crate::query;

const MESSAGES: Messages = Messages {
    entity: "Pilot",
    missing,
    empty: "Nenhum piloto cadastrado",
};

fn missing(id: EntityId) -> String {
    format!("Pilot {id} não existe")
}

/// Pilots have no field rule; their country and team are required by type
/// and by foreign key.
pub struct PilotService<S> {
    crud: CrudService<Pilot, S>,
}

impl<S: PilotStore> PilotService<S> {
    pub fn new(store: S) -> Self {
        PilotService {
            crud: CrudService::new(MESSAGES, store, accept as Validator<Pilot>),
        }
    }

    pub async fn find_by_name_starting_with(&self, prefix: &str) -> ServiceResult<Vec<Pilot>> {
        query::many(
            MESSAGES.entity,
            self.store().find_by_name_starting_with(prefix),
            || "Nenhum piloto com esse nome".to_string(),
        )
        .await
    }

    pub async fn find_by_country(&self, country: &Country) -> ServiceResult<Vec<Pilot>> {
        query::many(MESSAGES.entity, self.store().find_by_country(country), || {
            "Nenhum piloto nesse país".to_string()
        })
        .await
    }

    pub async fn find_by_team(&self, team: &Team) -> ServiceResult<Vec<Pilot>> {
        query::many(MESSAGES.entity, self.store().find_by_team(team), || {
            "Nenhum piloto nesse time".to_string()
        })
        .await
    }
}

impl<S> Deref for PilotService<S> {
    type Target = CrudService<Pilot, S>;

    fn deref(&self) -> &Self::Target {
        &self.crud
    }
}
