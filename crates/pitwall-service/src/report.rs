//! # Race Report
//!
//! Races held in one country during one calendar year.
//!
//! ## Algorithm
//! ```text
//! country_id ──► CountryService::find_by_id          (NotFound propagates)
//!                     │
//!                     ▼
//!     SpeedwayService::find_by_country_by_size_desc  (NotFound → no speedways)
//!                     │  largest speedway first
//!                     ▼
//!     for each speedway:
//!         RaceService::find_by_speedway              (NotFound → no races)
//!                     │
//!                     ▼
//!     keep races whose date falls in `year` (in the race's own offset)
//!                     │
//!                     ▼
//!     RaceCountryYear { year, country, race_count, races }
//! ```

use pitwall_core::{EntityId, RaceCountryYear};
use pitwall_db::{
    CountryRepository, CountryStore, Database, RaceRepository, RaceStore, SpeedwayRepository,
    SpeedwayStore,
};
use tracing::{debug, info};

use crate::country::CountryService;
use crate::error::{ServiceError, ServiceResult};
use crate::race::RaceService;
use crate::speedway::SpeedwayService;

/// Turns a "nothing found" into an empty contribution.
fn or_empty<T>(result: ServiceResult<Vec<T>>) -> ServiceResult<Vec<T>> {
    match result {
        Err(ServiceError::NotFound(_)) => Ok(Vec::new()),
        other => other,
    }
}

pub struct ReportService<C, S, R> {
    countries: CountryService<C>,
    speedways: SpeedwayService<S>,
    races: RaceService<R>,
}

impl ReportService<CountryRepository, SpeedwayRepository, RaceRepository> {
    /// Report over the SQLite stores of `db`.
    pub fn from_database(db: &Database) -> Self {
        ReportService::new(db.countries(), db.speedways(), db.races())
    }
}

impl<C, S, R> ReportService<C, S, R>
where
    C: CountryStore,
    S: SpeedwayStore,
    R: RaceStore,
{
    pub fn new(countries: C, speedways: S, races: R) -> Self {
        ReportService {
            countries: CountryService::new(countries),
            speedways: SpeedwayService::new(speedways),
            races: RaceService::new(races),
        }
    }

    /// ## Returns
    /// * `Err(ServiceError::NotFound)` - unknown country
    /// * `Ok(report)` - possibly with zero races; a country without
    ///   speedways or races is not an error
    pub async fn races_by_country_and_year(
        &self,
        country_id: EntityId,
        year: i32,
    ) -> ServiceResult<RaceCountryYear> {
        let country = self.countries.find_by_id(country_id).await?;

        let speedways = or_empty(
            self.speedways
                .find_by_country_by_size_desc(&country)
                .await,
        )?;
        debug!(country = %country.name, speedways = speedways.len(), "Collecting races");

        let mut races = Vec::new();
        for speedway in &speedways {
            let held = or_empty(self.races.find_by_speedway(speedway).await)?;
            races.extend(held.into_iter().filter(|race| race.year() == Some(year)));
        }

        let report = RaceCountryYear::new(year, country.name, races);
        info!(
            country_id = country_id,
            year = year,
            race_count = report.race_count,
            "Race report built"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::seeded_db;
    use pitwall_core::Country;
    use pitwall_db::Store;

    #[tokio::test]
    async fn test_skips_speedways_without_races() {
        let db = seeded_db().await;
        let report = ReportService::from_database(&db);

        // Brasil: Interlagos (no races), Alasca (race 6 in 2023)
        let result = report.races_by_country_and_year(6, 2023).await.unwrap();
        assert_eq!(result.year, 2023);
        assert_eq!(result.country, "Brasil");
        assert_eq!(result.race_count, 1);
        assert_eq!(result.races.len(), 1);
        assert_eq!(result.races[0].id, Some(6));
    }

    #[tokio::test]
    async fn test_filters_by_year() {
        let db = seeded_db().await;
        let report = ReportService::from_database(&db);

        let result = report.races_by_country_and_year(7, 2023).await.unwrap();
        assert_eq!(result.race_count, 0);
        assert!(result.races.is_empty());

        let result = report.races_by_country_and_year(7, 2022).await.unwrap();
        assert_eq!(result.race_count, 1);
    }

    #[tokio::test]
    async fn test_country_without_speedways_is_empty() {
        let db = seeded_db().await;
        let japan = db.countries().save(&Country::new("Japão")).await.unwrap();
        let report = ReportService::from_database(&db);

        let result = report
            .races_by_country_and_year(japan.id.unwrap(), 2023)
            .await
            .unwrap();
        assert_eq!(result.country, "Japão");
        assert_eq!(result.race_count, 0);
    }

    #[tokio::test]
    async fn test_unknown_country_is_not_found() {
        let db = seeded_db().await;
        let err = ReportService::from_database(&db)
            .races_by_country_and_year(10, 2023)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "País 10 não existe");
    }
}
