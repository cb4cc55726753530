//! # Pilot-Race Service
//!
//! Finishing results. The composite-key lookups share one message, the
//! remaining filters each have their own.

use std::ops::Deref;

use pitwall_core::validation::validate_pilot_race;
use pitwall_core::{EntityId, Pilot, PilotRace, Race};
use pitwall_db::PilotRaceStore;

use crate::crud::{CrudService, Messages, Validator};
use crate::error::ServiceResult;
use crate::query;

const ENTITY: &str = "PilotRace";

const MESSAGES: Messages = Messages {
    entity: ENTITY,
    missing,
    empty: "Nenhum PilotoCorrida cadastrado!",
};

const NO_MATCH: &str = "Nenhum PilotoCorrida com esses parâmetros de busca!";

fn missing(id: EntityId) -> String {
    format!("ID {id} inválido!")
}

/// Placement must be present and positive.
pub struct PilotRaceService<S> {
    crud: CrudService<PilotRace, S>,
}

impl<S: PilotRaceStore> PilotRaceService<S> {
    pub fn new(store: S) -> Self {
        PilotRaceService {
            crud: CrudService::new(MESSAGES, store, validate_pilot_race as Validator<PilotRace>),
        }
    }

    pub async fn find_by_placement(&self, placement: i32) -> ServiceResult<Vec<PilotRace>> {
        query::many(ENTITY, self.store().find_by_placement(placement), || {
            "Nenhum PilotoCorrida nesta posição!".to_string()
        })
        .await
    }

    pub async fn find_by_pilot(&self, pilot: &Pilot) -> ServiceResult<Vec<PilotRace>> {
        query::many(ENTITY, self.store().find_by_pilot(pilot), || {
            "Nenhum PilotoCorrida com esse piloto!".to_string()
        })
        .await
    }

    /// Results of `race`, best placement first.
    pub async fn find_by_race_by_placement(&self, race: &Race) -> ServiceResult<Vec<PilotRace>> {
        query::many(ENTITY, self.store().find_by_race_by_placement(race), || {
            "Nenhum PilotoCorrida nesta corrida!".to_string()
        })
        .await
    }

    pub async fn find_by_placement_between_and_race(
        &self,
        min: i32,
        max: i32,
        race: &Race,
    ) -> ServiceResult<Vec<PilotRace>> {
        query::many(
            ENTITY,
            self.store().find_by_placement_between_and_race(min, max, race),
            || NO_MATCH.to_string(),
        )
        .await
    }

    pub async fn find_by_pilot_and_race(
        &self,
        pilot: &Pilot,
        race: &Race,
    ) -> ServiceResult<PilotRace> {
        query::one(ENTITY, self.store().find_by_pilot_and_race(pilot, race), || {
            NO_MATCH.to_string()
        })
        .await
    }
}

impl<S> Deref for PilotRaceService<S> {
    type Target = CrudService<PilotRace, S>;

    fn deref(&self) -> &Self::Target {
        &self.crud
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{empty_db, seeded_db};
    use pitwall_db::{Database, Store};

    async fn senna_and_race(db: &Database) -> (Pilot, Race) {
        let senna = db.pilots().get_by_id(6).await.unwrap().unwrap();
        let race = db.races().get_by_id(6).await.unwrap().unwrap();
        (senna, race)
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let db = seeded_db().await;
        let service = PilotRaceService::new(db.pilot_races());

        let result = service.find_by_id(6).await.unwrap();
        assert_eq!(result.placement, Some(1));
        assert_eq!(result.pilot.name, "Ayrton Senna");
        assert_eq!(result.race.speedway.name, "Alasca");

        let err = service.find_by_id(10).await.unwrap_err();
        assert_eq!(err.to_string(), "ID 10 inválido!");
    }

    #[tokio::test]
    async fn test_insert_placement_rules() {
        let db = seeded_db().await;
        let service = PilotRaceService::new(db.pilot_races());
        let (senna, race) = senna_and_race(&db).await;

        let err = service
            .insert(&PilotRace::new(None, senna.clone(), race.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Colocacao null!");

        let err = service
            .insert(&PilotRace::new(Some(0), senna.clone(), race.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Colocacao zero!");

        let err = service
            .insert(&PilotRace::new(Some(-1), senna.clone(), race.clone()))
            .await
            .unwrap_err();
        assert!(err.is_integrity_violation());

        assert_eq!(service.list_all().await.unwrap().len(), 2);

        let stored = service
            .insert(&PilotRace::new(Some(3), senna, race))
            .await
            .unwrap();
        let found = service.find_by_id(stored.id.unwrap()).await.unwrap();
        assert_eq!(found, stored);
        assert_eq!(found.placement, Some(3));
    }

    #[tokio::test]
    async fn test_list_all_and_delete() {
        let db = seeded_db().await;
        let service = PilotRaceService::new(db.pilot_races());

        service.delete(6).await.unwrap();
        service.delete(7).await.unwrap();
        let err = service.list_all().await.unwrap_err();
        assert_eq!(err.to_string(), "Nenhum PilotoCorrida cadastrado!");

        let db = empty_db().await;
        let service = PilotRaceService::new(db.pilot_races());
        assert!(service.delete(6).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_filters() {
        let db = seeded_db().await;
        let service = PilotRaceService::new(db.pilot_races());
        let (senna, race) = senna_and_race(&db).await;

        assert_eq!(service.find_by_placement(2).await.unwrap()[0].id, Some(7));
        let err = service.find_by_placement(9).await.unwrap_err();
        assert_eq!(err.to_string(), "Nenhum PilotoCorrida nesta posição!");

        assert_eq!(service.find_by_pilot(&senna).await.unwrap().len(), 1);
        let mut stranger = senna.clone();
        stranger.id = Some(99);
        let err = service.find_by_pilot(&stranger).await.unwrap_err();
        assert_eq!(err.to_string(), "Nenhum PilotoCorrida com esse piloto!");

        let podium = service.find_by_race_by_placement(&race).await.unwrap();
        let placements: Vec<_> = podium.iter().map(|r| r.placement).collect();
        assert_eq!(placements, [Some(1), Some(2)]);

        let other_race = db.races().get_by_id(7).await.unwrap().unwrap();
        let err = service.find_by_race_by_placement(&other_race).await.unwrap_err();
        assert_eq!(err.to_string(), "Nenhum PilotoCorrida nesta corrida!");

        assert_eq!(
            service
                .find_by_placement_between_and_race(1, 2, &race)
                .await
                .unwrap()
                .len(),
            2
        );
        let err = service
            .find_by_placement_between_and_race(3, 5, &race)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), NO_MATCH);

        let single = service.find_by_pilot_and_race(&senna, &race).await.unwrap();
        assert_eq!(single.id, Some(6));
        let err = service
            .find_by_pilot_and_race(&senna, &other_race)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), NO_MATCH);
    }
}
