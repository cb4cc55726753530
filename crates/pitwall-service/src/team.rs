//! # Team Service

use std::ops::Deref;

use pitwall_core::validation::accept;
use pitwall_core::{EntityId, Team};
use pitwall_db::TeamStore;

use crate::crud::{CrudService, Messages, Validator};
use crate::error::ServiceResult;
use crate::query;

const MESSAGES: Messages = Messages {
    entity: "Team",
    missing,
    empty: "Não existe equipes cadastradas",
};

fn missing(id: EntityId) -> String {
    format!("Equipe {id} não encontrada")
}

pub struct TeamService<S> {
    crud: CrudService<Team, S>,
}

impl<S: TeamStore> TeamService<S> {
    pub fn new(store: S) -> Self {
        TeamService {
            crud: CrudService::new(MESSAGES, store, accept as Validator<Team>),
        }
    }

    /// Teams named exactly `name`, ignoring case.
    pub async fn find_by_name(&self, name: &str) -> ServiceResult<Vec<Team>> {
        query::many(MESSAGES.entity, self.store().find_by_name(name), || {
            format!("Equipe {name} não encontrada")
        })
        .await
    }

    /// Teams whose name contains `fragment`, case-sensitive.
    pub async fn find_by_name_containing(&self, fragment: &str) -> ServiceResult<Vec<Team>> {
        query::many(
            MESSAGES.entity,
            self.store().find_by_name_containing(fragment),
            || format!("Nenhuma equipe contém: {fragment}"),
        )
        .await
    }
}

impl<S> Deref for TeamService<S> {
    type Target = CrudService<Team, S>;

    fn deref(&self) -> &Self::Target {
        &self.crud
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{empty_db, seeded_db};

    #[tokio::test]
    async fn test_crud() {
        let db = seeded_db().await;
        let service = TeamService::new(db.teams());

        assert_eq!(service.find_by_id(6).await.unwrap().name, "Ferrari");
        let err = service.find_by_id(10).await.unwrap_err();
        assert_eq!(err.to_string(), "Equipe 10 não encontrada");

        let williams = service.insert(&Team::new("Williams")).await.unwrap();
        assert_eq!(service.list_all().await.unwrap().len(), 3);

        service.delete(williams.id.unwrap()).await.unwrap();
        assert_eq!(service.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_all_empty() {
        let db = empty_db().await;
        let err = TeamService::new(db.teams()).list_all().await.unwrap_err();
        assert_eq!(err.to_string(), "Não existe equipes cadastradas");
    }

    #[tokio::test]
    async fn test_name_filters() {
        let db = seeded_db().await;
        let service = TeamService::new(db.teams());

        assert_eq!(service.find_by_name("FERRARI").await.unwrap()[0].id, Some(6));
        let err = service.find_by_name("Team 3").await.unwrap_err();
        assert_eq!(err.to_string(), "Equipe Team 3 não encontrada");

        assert_eq!(service.find_by_name_containing("Lar").await.unwrap().len(), 1);
        let err = service.find_by_name_containing("lar").await.unwrap_err();
        assert_eq!(err.to_string(), "Nenhuma equipe contém: lar");
    }
}
