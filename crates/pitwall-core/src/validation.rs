//! # Validation Module
//!
//! Rules deciding whether a candidate entity may be inserted or updated.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Transport (excluded)                                         │
//! │  └── Shape checks, required scalar fields                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Services                                                     │
//! │  └── THIS MODULE: domain rules, first violated rule wins               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE constraints (team name, user email)                        │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rules are pure. Each checks its simplest condition first, so the
//! reported message is stable for a given candidate.
//!
//! ## Usage
//! ```rust
//! use pitwall_core::validation::validate_pilot_race_placement;
//! use pitwall_core::ValidationError;
//!
//! assert_eq!(validate_pilot_race_placement(Some(3)), Ok(()));
//! assert_eq!(validate_pilot_race_placement(Some(0)), Err(ValidationError::ZeroPlacement));
//! ```

use crate::error::ValidationError;
use crate::types::{Championship, ChampionshipYears, PilotRace, Race, Speedway, User};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Rule Abstraction
// =============================================================================

/// A validation rule applied to every insert and update of `E`.
///
/// Plain functions and closures are rules, so entities without field level
/// constraints use [`accept`].
pub trait Rule<E>: Send + Sync {
    fn check(&self, candidate: &E) -> ValidationResult<()>;
}

impl<E, F> Rule<E> for F
where
    F: Fn(&E) -> ValidationResult<()> + Send + Sync,
{
    fn check(&self, candidate: &E) -> ValidationResult<()> {
        self(candidate)
    }
}

/// Rule for entities that carry no field level constraint.
pub fn accept<E>(_candidate: &E) -> ValidationResult<()> {
    Ok(())
}

// =============================================================================
// Championship
// =============================================================================

/// Validates a championship year against the allowed range.
///
/// ## Rules
/// - Year must be present
/// - Year must fall inside `years` (inclusive)
pub fn validate_championship_year(
    year: Option<i32>,
    years: ChampionshipYears,
) -> ValidationResult<()> {
    let year = year.ok_or(ValidationError::MissingYear)?;

    if !years.contains(year) {
        return Err(ValidationError::YearOutOfRange(year));
    }

    Ok(())
}

/// Championship rule bound to a configured year range.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChampionshipRule {
    pub years: ChampionshipYears,
}

impl ChampionshipRule {
    pub fn new(years: ChampionshipYears) -> Self {
        ChampionshipRule { years }
    }
}

impl Rule<Championship> for ChampionshipRule {
    fn check(&self, candidate: &Championship) -> ValidationResult<()> {
        validate_championship_year(candidate.year, self.years)
    }
}

// =============================================================================
// Speedway
// =============================================================================

/// Validates a speedway.
///
/// ## Rules
/// - Size must be present and greater than zero
pub fn validate_speedway(speedway: &Speedway) -> ValidationResult<()> {
    match speedway.size {
        Some(size) if size > 0 => Ok(()),
        _ => Err(ValidationError::InvalidSpeedwaySize),
    }
}

// =============================================================================
// Race
// =============================================================================

/// Validates a race.
///
/// ## Rules (in order)
/// ```text
/// championship absent? ──► "Campeonato não pode ser nulo"
///         │
/// date absent? ──────────► "Data inválida"
///         │
/// year(date) != championship.year? ──► "Ano da corrida diferente do ano do campeonato"
///         │
///         ▼
///        OK
/// ```
pub fn validate_race(race: &Race) -> ValidationResult<()> {
    let championship = race
        .championship
        .as_ref()
        .ok_or(ValidationError::MissingChampionship)?;

    let race_year = race.year().ok_or(ValidationError::MissingRaceDate)?;

    if championship.year != Some(race_year) {
        return Err(ValidationError::RaceYearMismatch);
    }

    Ok(())
}

// =============================================================================
// PilotRace
// =============================================================================

/// Validates a finishing placement.
///
/// ## Rules
/// - Must be present
/// - Must not be zero
/// - Must not be negative
pub fn validate_pilot_race_placement(placement: Option<i32>) -> ValidationResult<()> {
    match placement {
        None => Err(ValidationError::MissingPlacement),
        Some(0) => Err(ValidationError::ZeroPlacement),
        Some(p) if p < 0 => Err(ValidationError::NegativePlacement(p)),
        Some(_) => Ok(()),
    }
}

pub fn validate_pilot_race(pilot_race: &PilotRace) -> ValidationResult<()> {
    validate_pilot_race_placement(pilot_race.placement)
}

// =============================================================================
// User
// =============================================================================

/// Validates email uniqueness given the user currently holding that email.
///
/// `holder` is the stored user whose email equals the candidate's, if any.
/// Any holder is a conflict, including the candidate itself on update: this
/// mirrors the behaviour clients already observe.
pub fn validate_unique_email(candidate: &User, holder: Option<&User>) -> ValidationResult<()> {
    match holder {
        Some(_) => Err(ValidationError::DuplicateEmail(candidate.email.clone())),
        None => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Country, Pilot, Team};
    use chrono::{FixedOffset, TimeZone};

    fn speedway() -> Speedway {
        Speedway::new("Alasca", Some(600), Country::with_id(6, "EUA"))
    }

    fn race(date_year: Option<i32>, championship: Option<Championship>) -> Race {
        let offset = FixedOffset::east_opt(0).unwrap();
        let date = date_year.map(|y| offset.with_ymd_and_hms(y, 7, 23, 15, 0, 0).unwrap());
        Race::new(date, speedway(), championship)
    }

    #[test]
    fn test_validate_championship_year() {
        let years = ChampionshipYears::DEFAULT;
        assert_eq!(validate_championship_year(Some(2021), years), Ok(()));
        assert_eq!(
            validate_championship_year(None, years),
            Err(ValidationError::MissingYear)
        );
        assert_eq!(
            validate_championship_year(Some(1980), years),
            Err(ValidationError::YearOutOfRange(1980))
        );
        assert_eq!(
            validate_championship_year(Some(3100), years),
            Err(ValidationError::YearOutOfRange(3100))
        );
    }

    #[test]
    fn test_championship_rule_uses_configured_range() {
        let rule = ChampionshipRule::new(ChampionshipYears::new(1950, 1960));
        let old = Championship::new("F1", Some(1955));
        let new = Championship::new("F1", Some(2023));
        assert!(rule.check(&old).is_ok());
        assert_eq!(rule.check(&new), Err(ValidationError::YearOutOfRange(2023)));
    }

    #[test]
    fn test_validate_speedway() {
        assert!(validate_speedway(&speedway()).is_ok());

        let mut missing = speedway();
        missing.size = None;
        assert_eq!(
            validate_speedway(&missing),
            Err(ValidationError::InvalidSpeedwaySize)
        );

        let mut zero = speedway();
        zero.size = Some(0);
        assert!(validate_speedway(&zero).is_err());

        let mut negative = speedway();
        negative.size = Some(-10);
        assert!(validate_speedway(&negative).is_err());
    }

    #[test]
    fn test_validate_race_order_of_checks() {
        // Championship is checked before the date
        assert_eq!(
            validate_race(&race(None, None)),
            Err(ValidationError::MissingChampionship)
        );
        assert_eq!(
            validate_race(&race(None, Some(Championship::new("F1", Some(2023))))),
            Err(ValidationError::MissingRaceDate)
        );
    }

    #[test]
    fn test_validate_race_year_must_match_championship() {
        let mismatch = race(Some(2024), Some(Championship::new("F8", Some(2021))));
        assert_eq!(
            validate_race(&mismatch),
            Err(ValidationError::RaceYearMismatch)
        );

        let missing_year = race(Some(2024), Some(Championship::new("F8", None)));
        assert_eq!(
            validate_race(&missing_year),
            Err(ValidationError::RaceYearMismatch)
        );

        let matching = race(Some(2023), Some(Championship::new("F1", Some(2023))));
        assert!(validate_race(&matching).is_ok());
    }

    #[test]
    fn test_validate_pilot_race_placement() {
        assert_eq!(
            validate_pilot_race_placement(None),
            Err(ValidationError::MissingPlacement)
        );
        assert_eq!(
            validate_pilot_race_placement(Some(0)),
            Err(ValidationError::ZeroPlacement)
        );
        assert_eq!(
            validate_pilot_race_placement(Some(-2)),
            Err(ValidationError::NegativePlacement(-2))
        );
        assert!(validate_pilot_race_placement(Some(3)).is_ok());

        let pilot = Pilot::new("Alisson", Country::with_id(6, "EUA"), Team::with_id(6, "Team 1"));
        let entry = PilotRace::new(Some(1), pilot, race(Some(2023), None));
        assert!(validate_pilot_race(&entry).is_ok());
    }

    #[test]
    fn test_validate_unique_email() {
        let candidate = User::new("insert", "email1", "insert", Vec::new());
        let mut holder = User::new("User 1", "email1", "senha1", Vec::new());
        holder.id = Some(3);

        assert!(validate_unique_email(&candidate, None).is_ok());
        assert_eq!(
            validate_unique_email(&candidate, Some(&holder)),
            Err(ValidationError::DuplicateEmail("email1".to_string()))
        );

        // The stored record itself still counts as a holder
        let mut same = holder.clone();
        same.name = "altera".to_string();
        assert!(validate_unique_email(&same, Some(&holder)).is_err());
    }

    #[test]
    fn test_accept_and_closure_rules() {
        let country = Country::new("Brasil");
        assert!(accept(&country).is_ok());

        let reject_all = |_: &Country| -> ValidationResult<()> { Err(ValidationError::MissingYear) };
        assert!(reject_all.check(&country).is_err());
    }
}
