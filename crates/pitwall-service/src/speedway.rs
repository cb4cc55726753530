//! # Speedway Service

use std::ops::Deref;

use pitwall_core::validation::validate_speedway;
use pitwall_core::{Country, EntityId, Speedway};
use pitwall_db::SpeedwayStore;

use crate::crud::{CrudService, Messages, Validator};
use crate::error::ServiceResult;
use crate::query;

const MESSAGES: Messages = Messages {
    entity: "Speedway",
    missing,
    empty: "Nenhuma pista cadastrada",
};

fn missing(id: EntityId) -> String {
    format!("Pista {id} não existe")
}

/// Speedways must have a positive size.
pub struct SpeedwayService<S> {
    crud: CrudService<Speedway, S>,
}

impl<S: SpeedwayStore> SpeedwayService<S> {
    pub fn new(store: S) -> Self {
        SpeedwayService {
            crud: CrudService::new(MESSAGES, store, validate_speedway as Validator<Speedway>),
        }
    }

    pub async fn find_by_name_starting_with(&self, prefix: &str) -> ServiceResult<Vec<Speedway>> {
        query::many(
            MESSAGES.entity,
            self.store().find_by_name_starting_with(prefix),
            || "Nenhuma pista cadastrada com esse nome".to_string(),
        )
        .await
    }

    /// Speedways with `min <= size <= max`.
    pub async fn find_by_size_between(&self, min: i32, max: i32) -> ServiceResult<Vec<Speedway>> {
        query::many(
            MESSAGES.entity,
            self.store().find_by_size_between(min, max),
            || "Nenhuma pista cadastrada com essas medidas".to_string(),
        )
        .await
    }

    /// Speedways of `country`, largest first.
    pub async fn find_by_country_by_size_desc(
        &self,
        country: &Country,
    ) -> ServiceResult<Vec<Speedway>> {
        query::many(
            MESSAGES.entity,
            self.store().find_by_country_by_size_desc(country),
            || format!("Nenhuma pista cadastrada no país: {}", country.name),
        )
        .await
    }
}

impl<S> Deref for SpeedwayService<S> {
    type Target = CrudService<Speedway, S>;

    fn deref(&self) -> &Self::Target {
        &self.crud
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{empty_db, seeded_db};

    fn brasil() -> Country {
        Country::with_id(6, "Brasil")
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let db = seeded_db().await;
        let service = SpeedwayService::new(db.speedways());

        let alasca = service.find_by_id(6).await.unwrap();
        assert_eq!(alasca.name, "Alasca");
        assert_eq!(alasca.size, Some(800));
        assert_eq!(alasca.country, brasil());

        let err = service.find_by_id(10).await.unwrap_err();
        assert_eq!(err.to_string(), "Pista 10 não existe");
    }

    #[tokio::test]
    async fn test_insert_rejects_missing_or_non_positive_size() {
        let db = seeded_db().await;
        let service = SpeedwayService::new(db.speedways());

        for size in [None, Some(0), Some(-10)] {
            let err = service
                .insert(&Speedway::new("Nowhere", size, brasil()))
                .await
                .unwrap_err();
            assert!(err.is_integrity_violation());
            assert_eq!(err.to_string(), "Tamanho da pista inválido");
        }
        assert_eq!(service.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_is_validated() {
        let db = seeded_db().await;
        let service = SpeedwayService::new(db.speedways());

        let mut alasca = service.find_by_id(6).await.unwrap();
        alasca.size = None;
        assert!(service.update(&alasca).await.unwrap_err().is_integrity_violation());
        assert_eq!(service.find_by_id(6).await.unwrap().size, Some(800));

        alasca.size = Some(1200);
        assert_eq!(service.update(&alasca).await.unwrap().size, Some(1200));
    }

    #[tokio::test]
    async fn test_list_all_empty() {
        let db = empty_db().await;
        let err = SpeedwayService::new(db.speedways()).list_all().await.unwrap_err();
        assert_eq!(err.to_string(), "Nenhuma pista cadastrada");
    }

    #[tokio::test]
    async fn test_filters() {
        let db = seeded_db().await;
        let service = SpeedwayService::new(db.speedways());

        assert_eq!(service.find_by_name_starting_with("inter").await.unwrap().len(), 1);
        let err = service.find_by_name_starting_with("Z").await.unwrap_err();
        assert_eq!(err.to_string(), "Nenhuma pista cadastrada com esse nome");

        assert_eq!(service.find_by_size_between(700, 4400).await.unwrap().len(), 3);
        let err = service.find_by_size_between(1, 10).await.unwrap_err();
        assert_eq!(err.to_string(), "Nenhuma pista cadastrada com essas medidas");

        let by_size = service.find_by_country_by_size_desc(&brasil()).await.unwrap();
        let names: Vec<_> = by_size.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Interlagos", "Alasca"]);

        let err = service
            .find_by_country_by_size_desc(&Country::with_id(99, "Canada"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Nenhuma pista cadastrada no país: Canada");
    }
}
