//! # Championship Service
//!
//! The only service whose rule is configurable: the accepted year range
//! defaults to [`ChampionshipYears::DEFAULT`] and can be replaced with
//! [`ChampionshipService::with_year_range`].

use std::ops::Deref;

use pitwall_core::validation::ChampionshipRule;
use pitwall_core::{Championship, ChampionshipYears, EntityId};
use pitwall_db::ChampionshipStore;

use crate::crud::{CrudService, Messages};
use crate::error::ServiceResult;
use crate::query;

const MESSAGES: Messages = Messages {
    entity: "Championship",
    missing,
    empty: "Nenhum campeonato cadastrado",
};

fn missing(id: EntityId) -> String {
    format!("Campeonato {id} não existe")
}

pub struct ChampionshipService<S> {
    crud: CrudService<Championship, S, ChampionshipRule>,
}

impl<S: ChampionshipStore> ChampionshipService<S> {
    pub fn new(store: S) -> Self {
        Self::with_year_range(store, ChampionshipYears::DEFAULT)
    }

    pub fn with_year_range(store: S, years: ChampionshipYears) -> Self {
        ChampionshipService {
            crud: CrudService::new(MESSAGES, store, ChampionshipRule::new(years)),
        }
    }

    /// Championships with `start <= year <= end`.
    pub async fn find_by_year_between(
        &self,
        start: i32,
        end: i32,
    ) -> ServiceResult<Vec<Championship>> {
        query::many(
            MESSAGES.entity,
            self.store().find_by_year_between(start, end),
            || format!("Nenhum campeonato cadastrado entre {start} e {end}"),
        )
        .await
    }

    pub async fn find_by_year(&self, year: i32) -> ServiceResult<Vec<Championship>> {
        query::many(MESSAGES.entity, self.store().find_by_year(year), || {
            format!("Nenhum campeonato cadastrado no ano: {year}")
        })
        .await
    }

    /// Description contains `fragment`, ignoring case.
    pub async fn find_by_description_containing(
        &self,
        fragment: &str,
    ) -> ServiceResult<Vec<Championship>> {
        query::many(
            MESSAGES.entity,
            self.store().find_by_description_containing(fragment),
            || format!("Nenhum campeonato com a descrição: {fragment}"),
        )
        .await
    }

    pub async fn find_by_description_containing_and_year(
        &self,
        fragment: &str,
        year: i32,
    ) -> ServiceResult<Vec<Championship>> {
        query::many(
            MESSAGES.entity,
            self.store()
                .find_by_description_containing_and_year(fragment, year),
            || format!("Nenhum campeonato com a descrição: {fragment} no ano: {year}"),
        )
        .await
    }
}

impl<S> Deref for ChampionshipService<S> {
    type Target = CrudService<Championship, S, ChampionshipRule>;

    fn deref(&self) -> &Self::Target {
        &self.crud
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{empty_db, seeded_db};

    #[tokio::test]
    async fn test_find_by_id() {
        let db = seeded_db().await;
        let service = ChampionshipService::new(db.championships());

        let f1 = service.find_by_id(6).await.unwrap();
        assert_eq!(f1.description, "F1");
        assert_eq!(f1.year, Some(2023));

        let err = service.find_by_id(10).await.unwrap_err();
        assert_eq!(err.to_string(), "Campeonato 10 não existe");
    }

    #[tokio::test]
    async fn test_insert_year_rules() {
        let db = seeded_db().await;
        let service = ChampionshipService::new(db.championships());

        let cases = [
            (None, "Ano não pode ser nulo"),
            (Some(1980), "Ano inválido: 1980"),
            (Some(3100), "Ano inválido: 3100"),
        ];
        for (year, message) in cases {
            let err = service
                .insert(&Championship::new("Stock Car", year))
                .await
                .unwrap_err();
            assert!(err.is_integrity_violation());
            assert_eq!(err.to_string(), message);
        }
        assert_eq!(service.list_all().await.unwrap().len(), 2);

        let stored = service
            .insert(&Championship::new("Stock Car", Some(2024)))
            .await
            .unwrap();
        assert_eq!(service.find_by_id(stored.id.unwrap()).await.unwrap(), stored);
    }

    #[tokio::test]
    async fn test_custom_year_range() {
        let db = empty_db().await;
        let service = ChampionshipService::with_year_range(
            db.championships(),
            ChampionshipYears::new(1950, 1999),
        );

        assert!(service
            .insert(&Championship::new("F1", Some(1950)))
            .await
            .is_ok());
        let err = service
            .insert(&Championship::new("F1", Some(2000)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Ano inválido: 2000");
    }

    #[tokio::test]
    async fn test_list_all_empty() {
        let db = empty_db().await;
        let err = ChampionshipService::new(db.championships())
            .list_all()
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Nenhum campeonato cadastrado");
    }

    #[tokio::test]
    async fn test_filters() {
        let db = seeded_db().await;
        let service = ChampionshipService::new(db.championships());

        assert_eq!(service.find_by_year_between(2022, 2023).await.unwrap().len(), 2);
        let err = service.find_by_year_between(2000, 2010).await.unwrap_err();
        assert_eq!(err.to_string(), "Nenhum campeonato cadastrado entre 2000 e 2010");

        assert_eq!(service.find_by_year(2022).await.unwrap()[0].id, Some(7));
        let err = service.find_by_year(2030).await.unwrap_err();
        assert_eq!(err.to_string(), "Nenhum campeonato cadastrado no ano: 2030");

        assert_eq!(service.find_by_description_containing("f").await.unwrap().len(), 2);
        let err = service.find_by_description_containing("Indy").await.unwrap_err();
        assert_eq!(err.to_string(), "Nenhum campeonato com a descrição: Indy");

        let found = service
            .find_by_description_containing_and_year("F", 2023)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        let err = service
            .find_by_description_containing_and_year("F8", 2023)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Nenhum campeonato com a descrição: F8 no ano: 2023"
        );
    }
}
