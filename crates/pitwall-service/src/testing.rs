//! Fixture database shared by the service tests.
//!
//! ```text
//! countries      6 Brasil            7 Canada
//! teams          6 Ferrari           7 McLaren
//! speedways      6 Alasca (800m, BR) 7 Interlagos (4309m, BR)  8 Montreal (4361m, CA)
//! championships  6 F1 2023           7 F8 2022
//! pilots         6 Ayrton Senna (BR, McLaren)   7 Gilles Villeneuve (CA, Ferrari)
//! races          6 Alasca, F1, 2023-03-05       7 Montreal, F8, 2022-06-12
//! pilot_races    6 Senna 1st race 6             7 Villeneuve 2nd race 6
//! users          6 User 1 <email1> ADMIN,USER   7 User 2 <email2> USER
//! ```
//!
//! Rows are written straight through the stores with explicit ids, so the
//! rules under test never see them.

use chrono::DateTime;
use pitwall_core::{
    Championship, Country, Pilot, PilotRace, Race, Role, Speedway, Team, User,
};
use pitwall_db::{Database, DbConfig, Store};

pub async fn empty_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

pub async fn seeded_db() -> Database {
    let db = empty_db().await;

    let brasil = db.countries().save(&Country::with_id(6, "Brasil")).await.unwrap();
    let canada = db.countries().save(&Country::with_id(7, "Canada")).await.unwrap();

    let ferrari = db.teams().save(&Team::with_id(6, "Ferrari")).await.unwrap();
    let mclaren = db.teams().save(&Team::with_id(7, "McLaren")).await.unwrap();

    let alasca = speedway(&db, 6, "Alasca", 800, &brasil).await;
    speedway(&db, 7, "Interlagos", 4309, &brasil).await;
    let montreal = speedway(&db, 8, "Montreal", 4361, &canada).await;

    let f1 = championship(&db, 6, "F1", 2023).await;
    let f8 = championship(&db, 7, "F8", 2022).await;

    let senna = pilot(&db, 6, "Ayrton Senna", &brasil, &mclaren).await;
    let villeneuve = pilot(&db, 7, "Gilles Villeneuve", &canada, &ferrari).await;

    let race6 = race(&db, 6, "2023-03-05T15:00:00-03:00", &alasca, &f1).await;
    race(&db, 7, "2022-06-12T14:00:00-04:00", &montreal, &f8).await;

    pilot_race(&db, 6, 1, &senna, &race6).await;
    pilot_race(&db, 7, 2, &villeneuve, &race6).await;

    user(&db, 6, "User 1", "email1", vec![Role::Admin, Role::User]).await;
    user(&db, 7, "User 2", "email2", vec![Role::User]).await;

    db
}

async fn speedway(db: &Database, id: i64, name: &str, size: i32, country: &Country) -> Speedway {
    let mut speedway = Speedway::new(name, Some(size), country.clone());
    speedway.id = Some(id);
    db.speedways().save(&speedway).await.unwrap()
}

async fn championship(db: &Database, id: i64, description: &str, year: i32) -> Championship {
    let mut championship = Championship::new(description, Some(year));
    championship.id = Some(id);
    db.championships().save(&championship).await.unwrap()
}

async fn pilot(db: &Database, id: i64, name: &str, country: &Country, team: &Team) -> Pilot {
    let mut pilot = Pilot::new(name, country.clone(), team.clone());
    pilot.id = Some(id);
    db.pilots().save(&pilot).await.unwrap()
}

async fn race(
    db: &Database,
    id: i64,
    date: &str,
    speedway: &Speedway,
    championship: &Championship,
) -> Race {
    let date = DateTime::parse_from_rfc3339(date).unwrap();
    let mut race = Race::new(Some(date), speedway.clone(), Some(championship.clone()));
    race.id = Some(id);
    db.races().save(&race).await.unwrap()
}

async fn pilot_race(db: &Database, id: i64, placement: i32, pilot: &Pilot, race: &Race) {
    let mut result = PilotRace::new(Some(placement), pilot.clone(), race.clone());
    result.id = Some(id);
    db.pilot_races().save(&result).await.unwrap();
}

async fn user(db: &Database, id: i64, name: &str, email: &str, roles: Vec<Role>) {
    let mut user = User::new(name, email, "secret", roles);
    user.id = Some(id);
    db.users().save(&user).await.unwrap();
}
