//! Every service wired to one [`Database`].

use pitwall_core::ChampionshipYears;
use pitwall_db::{
    ChampionshipRepository, CountryRepository, Database, PilotRaceRepository, PilotRepository,
    RaceRepository, SpeedwayRepository, TeamRepository, UserRepository,
};

use crate::championship::ChampionshipService;
use crate::country::CountryService;
use crate::pilot::PilotService;
use crate::pilot_race::PilotRaceService;
use crate::race::RaceService;
use crate::report::ReportService;
use crate::speedway::SpeedwayService;
use crate::team::TeamService;
use crate::user::UserService;

/// The full service layer over SQLite stores.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./pitwall.db")).await?;
/// let registry = Registry::new(&db, ChampionshipYears::DEFAULT);
/// let pilots = registry.pilots.find_by_name_starting_with("Ay").await?;
/// ```
pub struct Registry {
    pub countries: CountryService<CountryRepository>,
    pub teams: TeamService<TeamRepository>,
    pub speedways: SpeedwayService<SpeedwayRepository>,
    pub championships: ChampionshipService<ChampionshipRepository>,
    pub pilots: PilotService<PilotRepository>,
    pub races: RaceService<RaceRepository>,
    pub pilot_races: PilotRaceService<PilotRaceRepository>,
    pub users: UserService<UserRepository>,
    pub report: ReportService<CountryRepository, SpeedwayRepository, RaceRepository>,
}

impl Registry {
    pub fn new(db: &Database, years: ChampionshipYears) -> Self {
        Registry {
            countries: CountryService::new(db.countries()),
            teams: TeamService::new(db.teams()),
            speedways: SpeedwayService::new(db.speedways()),
            championships: ChampionshipService::with_year_range(db.championships(), years),
            pilots: PilotService::new(db.pilots()),
            races: RaceService::new(db.races()),
            pilot_races: PilotRaceService::new(db.pilot_races()),
            users: UserService::new(db.users()),
            report: ReportService::from_database(db),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::seeded_db;

    #[tokio::test]
    async fn test_services_share_one_database() {
        let db = seeded_db().await;
        let registry = Registry::new(&db, ChampionshipYears::DEFAULT);

        let brasil = registry.countries.find_by_id(6).await.unwrap();
        let pilots = registry.pilots.find_by_country(&brasil).await.unwrap();
        assert_eq!(pilots[0].name, "Ayrton Senna");

        let report = registry.report.races_by_country_and_year(6, 2023).await.unwrap();
        assert_eq!(report.race_count, 1);
    }
}
