//! # Domain Types
//!
//! Entities recorded by Pitwall.
//!
//! ## Entity Graph
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌───────────┐      ┌───────────┐      ┌───────────┐                   │
//! │  │  Country  │◄─────│ Speedway  │◄─────│   Race    │─────┐             │
//! │  └───────────┘      └───────────┘      └───────────┘     │             │
//! │        ▲                                     ▲           ▼             │
//! │        │            ┌───────────┐            │    ┌──────────────┐     │
//! │        └────────────│   Pilot   │            │    │ Championship │     │
//! │                     └───────────┘            │    └──────────────┘     │
//! │  ┌───────────┐            ▲  ▲         ┌───────────┐                   │
//! │  │   Team    │◄───────────┘  └─────────│ PilotRace │                   │
//! │  └───────────┘                         └───────────┘                   │
//! │                                                                         │
//! │  ┌───────────┐                                                         │
//! │  │   User    │  (standalone, email unique)                             │
//! │  └───────────┘                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity carries a surrogate integer `id` assigned by the store on
//! insert. A `None` id means "not persisted yet"; callers only set it when
//! building an update.
//!
//! ## References
//! Foreign keys are held as the referenced entity itself (non-owning copy).
//! References that may never be absent are plain fields; the ones the
//! validation rules check for absence are `Option`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Surrogate identifier assigned by the store.
pub type EntityId = i64;

/// Id access shared by every persisted record.
pub trait Entity {
    fn id(&self) -> Option<EntityId>;

    fn set_id(&mut self, id: Option<EntityId>);
}

macro_rules! impl_entity {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Entity for $ty {
                fn id(&self) -> Option<EntityId> {
                    self.id
                }

                fn set_id(&mut self, id: Option<EntityId>) {
                    self.id = id;
                }
            }
        )+
    };
}

impl_entity!(Country, Team, Speedway, Championship, Pilot, Race, PilotRace, User);

// =============================================================================
// Country / Team
// =============================================================================

/// A country speedways and pilots belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Country {
    pub id: Option<EntityId>,
    pub name: String,
}

impl Country {
    /// Creates a country that has not been stored yet.
    pub fn new(name: impl Into<String>) -> Self {
        Country {
            id: None,
            name: name.into(),
        }
    }

    /// Creates a reference to an already stored country.
    pub fn with_id(id: EntityId, name: impl Into<String>) -> Self {
        Country {
            id: Some(id),
            name: name.into(),
        }
    }
}

/// A racing team. Names are unique across teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Team {
    pub id: Option<EntityId>,
    pub name: String,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Team {
            id: None,
            name: name.into(),
        }
    }

    pub fn with_id(id: EntityId, name: impl Into<String>) -> Self {
        Team {
            id: Some(id),
            name: name.into(),
        }
    }
}

// =============================================================================
// Speedway
// =============================================================================

/// A race track located in a country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Speedway {
    pub id: Option<EntityId>,
    pub name: String,

    /// Track length. Must be present and positive to be stored.
    pub size: Option<i32>,

    pub country: Country,
}

impl Speedway {
    pub fn new(name: impl Into<String>, size: Option<i32>, country: Country) -> Self {
        Speedway {
            id: None,
            name: name.into(),
            size,
            country,
        }
    }
}

// =============================================================================
// Championship
// =============================================================================

/// A championship season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Championship {
    pub id: Option<EntityId>,
    pub description: String,

    /// Calendar year of the season, checked against [`ChampionshipYears`].
    pub year: Option<i32>,
}

impl Championship {
    pub fn new(description: impl Into<String>, year: Option<i32>) -> Self {
        Championship {
            id: None,
            description: description.into(),
            year,
        }
    }
}

/// Inclusive range of calendar years a championship may be recorded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChampionshipYears {
    pub min: i32,
    pub max: i32,
}

impl ChampionshipYears {
    /// The range used unless configuration replaces it.
    pub const DEFAULT: ChampionshipYears = ChampionshipYears {
        min: crate::MIN_CHAMPIONSHIP_YEAR,
        max: crate::MAX_CHAMPIONSHIP_YEAR,
    };

    pub const fn new(min: i32, max: i32) -> Self {
        ChampionshipYears { min, max }
    }

    #[inline]
    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

impl Default for ChampionshipYears {
    fn default() -> Self {
        ChampionshipYears::DEFAULT
    }
}

// =============================================================================
// Pilot
// =============================================================================

/// A pilot racing for a team and representing a country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Pilot {
    pub id: Option<EntityId>,
    pub name: String,
    pub country: Country,
    pub team: Team,
}

impl Pilot {
    pub fn new(name: impl Into<String>, country: Country, team: Team) -> Self {
        Pilot {
            id: None,
            name: name.into(),
            country,
            team,
        }
    }
}

// =============================================================================
// Race
// =============================================================================

/// A race held at a speedway as part of a championship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Race {
    pub id: Option<EntityId>,

    /// Zoned start time. Its calendar year must match the championship year.
    pub date: Option<DateTime<FixedOffset>>,

    pub speedway: Speedway,
    pub championship: Option<Championship>,
}

impl Race {
    pub fn new(
        date: Option<DateTime<FixedOffset>>,
        speedway: Speedway,
        championship: Option<Championship>,
    ) -> Self {
        Race {
            id: None,
            date,
            speedway,
            championship,
        }
    }

    /// Calendar year of the race date, in the date's own offset.
    pub fn year(&self) -> Option<i32> {
        self.date.map(|date| date.year())
    }
}

// =============================================================================
// PilotRace
// =============================================================================

/// Final placement of a pilot in a race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PilotRace {
    pub id: Option<EntityId>,

    /// Finishing rank, 1 is the winner.
    pub placement: Option<i32>,

    pub pilot: Pilot,
    pub race: Race,
}

impl PilotRace {
    pub fn new(placement: Option<i32>, pilot: Pilot, race: Race) -> Self {
        PilotRace {
            id: None,
            placement,
            pilot,
            race,
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// Permission attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Parses a comma separated role list such as `"ADMIN,USER"`.
///
/// Blank entries are skipped.
pub fn parse_roles(raw: &str) -> Result<Vec<Role>, String> {
    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(Role::from_str)
        .collect()
}

/// Joins roles back into their stored form.
pub fn join_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// An account able to call the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: Option<EntityId>,
    pub name: String,

    /// Unique across all users.
    pub email: String,

    pub password: String,
    pub roles: Vec<Role>,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        roles: Vec<Role>,
    ) -> Self {
        User {
            id: None,
            name: name.into(),
            email: email.into(),
            password: password.into(),
            roles,
        }
    }

    /// Authorization precondition consumed by the transport layer.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

// =============================================================================
// Report
// =============================================================================

/// Races held in one country during one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RaceCountryYear {
    pub year: i32,
    pub country: String,
    pub race_count: usize,
    pub races: Vec<Race>,
}

impl RaceCountryYear {
    /// Builds the report; `race_count` always equals `races.len()`.
    pub fn new(year: i32, country: impl Into<String>, races: Vec<Race>) -> Self {
        RaceCountryYear {
            year,
            country: country.into(),
            race_count: races.len(),
            races,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
