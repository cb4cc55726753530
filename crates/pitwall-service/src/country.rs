//! # Country Service

use std::ops::Deref;

use pitwall_core::validation::accept;
use pitwall_core::{Country, EntityId};
use pitwall_db::CountryStore;

use crate::crud::{CrudService, Messages, Validator};
use crate::error::ServiceResult;
use crate::query;

const MESSAGES: Messages = Messages {
    entity: "Country",
    missing,
    empty: "Nenhum país cadastrado",
};

fn missing(id: EntityId) -> String {
    format!("País {id} não existe")
}

/// Countries carry no field rule.
pub struct CountryService<S> {
    crud: CrudService<Country, S>,
}

impl<S: CountryStore> CountryService<S> {
    pub fn new(store: S) -> Self {
        CountryService {
            crud: CrudService::new(MESSAGES, store, accept as Validator<Country>),
        }
    }

    /// Countries named exactly `name`, ignoring case.
    pub async fn find_by_name(&self, name: &str) -> ServiceResult<Vec<Country>> {
        query::many(MESSAGES.entity, self.store().find_by_name(name), || {
            format!("Nenhum país com o nome: {name}")
        })
        .await
    }
}

impl<S> Deref for CountryService<S> {
    type Target = CrudService<Country, S>;

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
        let service = CountryService::new(db.countries());

        let brasil = service.find_by_id(6).await.unwrap();
        assert_eq!(brasil, Country::with_id(6, "Brasil"));

        let err = service.find_by_id(10).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "País 10 não existe");
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_round_trips() {
        let db = seeded_db().await;
        let service = CountryService::new(db.countries());

        let inserted = service.insert(&Country::with_id(1, "Japão")).await.unwrap();
        let id = inserted.id.unwrap();
        assert_ne!(id, 1);
        assert_eq!(service.find_by_id(id).await.unwrap(), inserted);
    }

    #[tokio::test]
    async fn test_list_all() {
        let db = seeded_db().await;
        let service = CountryService::new(db.countries());
        assert_eq!(service.list_all().await.unwrap().len(), 2);

        let db = empty_db().await;
        let service = CountryService::new(db.countries());
        let err = service.list_all().await.unwrap_err();
        assert_eq!(err.to_string(), "Nenhum país cadastrado");
    }

    #[tokio::test]
    async fn test_update() {
        let db = seeded_db().await;
        let service = CountryService::new(db.countries());

        service.update(&Country::with_id(7, "Canadá")).await.unwrap();
        assert_eq!(service.find_by_id(7).await.unwrap().name, "Canadá");
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let db = empty_db().await;
        let service = CountryService::new(db.countries());
        let id = service.insert(&Country::new("Japão")).await.unwrap().id.unwrap();

        service.delete(id).await.unwrap();
        let err = service.delete(id).await.unwrap_err();
        assert_eq!(err.to_string(), format!("País {id} não existe"));
        assert!(service.list_all().await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_find_by_name() {
        let db = seeded_db().await;
        let service = CountryService::new(db.countries());

        assert_eq!(service.find_by_name("brasil").await.unwrap().len(), 1);
        let err = service.find_by_name("Chile").await.unwrap_err();
        assert_eq!(err.to_string(), "Nenhum país com o nome: Chile");
    }
}
