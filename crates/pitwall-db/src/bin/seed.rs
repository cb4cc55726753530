//! # Seed Data Generator
//!
//! Populates the database with a small motorsport registry for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p pitwall-db --bin seed
//!
//! # Specify database path
//! cargo run -p pitwall-db --bin seed -- --db ./data/pitwall.db
//!
//! # Seed a different season
//! cargo run -p pitwall-db --bin seed -- --year 2019
//! ```
//!
//! ## Generated Data
//! - Countries and teams from [`COUNTRIES`] / [`TEAMS`]
//! - One speedway per entry in [`SPEEDWAYS`]
//! - One championship for the chosen year, one race per speedway
//! - A pilot per team and a full grid of results for every race
//!
//! Every row goes through the same rules the services apply, so a season
//! outside the accepted championship years is refused before anything is
//! written.

use std::env;

use chrono::{FixedOffset, TimeZone};
use pitwall_core::validation::{
    validate_championship_year, validate_pilot_race, validate_race, validate_speedway,
};
use pitwall_core::{
    Championship, ChampionshipYears, Country, Pilot, PilotRace, Race, Role, Speedway, Team, User,
};
use pitwall_db::repository::Store;
use pitwall_db::{Database, DbConfig};

const COUNTRIES: &[&str] = &["Brasil", "Itália", "Mônaco", "Reino Unido", "Japão"];

const TEAMS: &[&str] = &["Ferrari", "McLaren", "Williams", "Mercedes"];

/// (name, size in meters, index into [`COUNTRIES`], UTC offset in hours)
const SPEEDWAYS: &[(&str, i32, usize, i32)] = &[
    ("Interlagos", 4309, 0, -3),
    ("Jacarepaguá", 5031, 0, -3),
    ("Monza", 5793, 1, 1),
    ("Imola", 4909, 1, 1),
    ("Monte Carlo", 3337, 2, 1),
    ("Silverstone", 5891, 3, 0),
    ("Suzuka", 5807, 4, 9),
];

/// (name, index into [`COUNTRIES`], index into [`TEAMS`])
const PILOTS: &[(&str, usize, usize)] = &[
    ("Ayrton Senna", 0, 1),
    ("Nelson Piquet", 0, 2),
    ("Michele Alboreto", 1, 0),
    ("Nigel Mansell", 3, 2),
    ("Lewis Hamilton", 3, 3),
    ("Satoru Nakajima", 4, 1),
];

/// Parses `--year`, refusing seasons no championship rule would accept.
fn parse_season(raw: &str) -> Result<i32, String> {
    let year: i32 = raw
        .parse()
        .map_err(|_| format!("invalid year '{raw}'"))?;
    validate_championship_year(Some(year), ChampionshipYears::DEFAULT)
        .map_err(|e| e.to_string())?;
    Ok(year)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut year: i32 = 2018;
    let mut db_path = String::from("./pitwall_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--year" | "-y" => {
                let raw = args.get(i + 1).ok_or("--year needs a value")?;
                year = parse_season(raw)?;
                i += 1;
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Pitwall Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -y, --year <YEAR>  Championship year to generate (default: 2018)");
                println!("  -d, --db <PATH>    Database file path (default: ./pitwall_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🏁 Pitwall Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!("Season:   {}", year);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.countries().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} countries", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();

    let mut countries = Vec::with_capacity(COUNTRIES.len());
    for name in COUNTRIES {
        countries.push(db.countries().save(&Country::new(*name)).await?);
    }

    let mut teams = Vec::with_capacity(TEAMS.len());
    for name in TEAMS {
        teams.push(db.teams().save(&Team::new(*name)).await?);
    }

    let championship = Championship::new(format!("Fórmula 1 {}", year), Some(year));
    validate_championship_year(championship.year, ChampionshipYears::DEFAULT)?;
    let championship = db.championships().save(&championship).await?;

    let mut pilots = Vec::with_capacity(PILOTS.len());
    for (name, country_idx, team_idx) in PILOTS {
        let pilot = Pilot::new(*name, countries[*country_idx].clone(), teams[*team_idx].clone());
        pilots.push(db.pilots().save(&pilot).await?);
    }

    let mut results = 0;
    for (round, (name, size, country_idx, offset_hours)) in SPEEDWAYS.iter().enumerate() {
        let speedway = Speedway::new(*name, Some(*size), countries[*country_idx].clone());
        validate_speedway(&speedway)?;
        let speedway = db.speedways().save(&speedway).await?;

        // Round n is held on the n-th fortnight, 14:00 local time
        let offset = FixedOffset::east_opt(offset_hours * 3600).ok_or("invalid UTC offset")?;
        let date = offset
            .with_ymd_and_hms(year, 3, 1, 14, 0, 0)
            .single()
            .ok_or("ambiguous race date")?
            + chrono::Duration::days(14 * round as i64);

        let race = Race::new(Some(date), speedway, Some(championship.clone()));
        validate_race(&race)?;
        let race = db.races().save(&race).await?;

        for (grid, pilot) in pilots.iter().enumerate() {
            // rotate the finishing order so every pilot wins somewhere
            let placement = ((grid + round) % pilots.len()) as i32 + 1;
            let result = PilotRace::new(Some(placement), pilot.clone(), race.clone());
            validate_pilot_race(&result)?;

            if let Err(e) = db.pilot_races().save(&result).await {
                eprintln!("Failed to insert result for {}: {}", pilot.name, e);
                continue;
            }
            results += 1;
        }
    }

    db.users()
        .save(&User::new(
            "Admin",
            "admin@pitwall.dev",
            "admin",
            vec![Role::Admin, Role::User],
        ))
        .await?;

    let elapsed = start.elapsed();
    println!();
    println!(
        "✓ Seeded {} countries, {} speedways, {} pilots, {} results in {:?}",
        countries.len(),
        SPEEDWAYS.len(),
        pilots.len(),
        results,
        elapsed
    );

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_season() {
        assert_eq!(parse_season("2018"), Ok(2018));
        assert_eq!(parse_season("20x8"), Err("invalid year '20x8'".to_string()));
        assert_eq!(parse_season("1800"), Err("Ano inválido: 1800".to_string()));
    }
}
