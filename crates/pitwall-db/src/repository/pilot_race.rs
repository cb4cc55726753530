//! # Pilot-Race Repository
//!
//! Result rows join the pilot (with country and team) and the race (with
//! speedway, speedway country and championship). The race half of the
//! projection is shared with [`race`](super::race).

use std::future::Future;

use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::race::{RaceRow, RACE_JOINS, SELECT_RACE_COLUMNS};
use crate::repository::Store;
use pitwall_core::{Country, EntityId, Pilot, PilotRace, Race, Team};

const ENTITY: &str = "PilotRace";

const PILOT_RACE_COLUMNS: &str = r#"
        pr.id               AS id,
        pr.placement        AS placement,
        p.id                AS pilot_id,
        p.name              AS pilot_name,
        pc.id               AS pilot_country_id,
        pc.name             AS pilot_country_name,
        t.id                AS pilot_team_id,
        t.name              AS pilot_team_name,
"#;

const PILOT_RACE_FROM: &str = r#"
    FROM pilot_races pr
    INNER JOIN pilots p     ON p.id = pr.pilot_id
    INNER JOIN countries pc ON pc.id = p.country_id
    INNER JOIN teams t      ON t.id = p.team_id
    INNER JOIN races r      ON r.id = pr.race_id
"#;

#[derive(Debug, FromRow)]
struct PilotRaceRow {
    id: EntityId,
    placement: i32,
    pilot_id: EntityId,
    pilot_name: String,
    pilot_country_id: EntityId,
    pilot_country_name: String,
    pilot_team_id: EntityId,
    pilot_team_name: String,
    #[sqlx(flatten)]
    race: RaceRow,
}

impl PilotRaceRow {
    fn into_pilot_race(self) -> DbResult<PilotRace> {
        Ok(PilotRace {
            id: Some(self.id),
            placement: Some(self.placement),
            pilot: Pilot {
                id: Some(self.pilot_id),
                name: self.pilot_name,
                country: Country::with_id(self.pilot_country_id, self.pilot_country_name),
                team: Team::with_id(self.pilot_team_id, self.pilot_team_name),
            },
            race: self.race.into_race()?,
        })
    }
}

fn into_pilot_races(rows: Vec<PilotRaceRow>) -> DbResult<Vec<PilotRace>> {
    rows.into_iter().map(PilotRaceRow::into_pilot_race).collect()
}

fn select(tail: &str) -> String {
    format!("SELECT {PILOT_RACE_COLUMNS} {SELECT_RACE_COLUMNS} {PILOT_RACE_FROM} {RACE_JOINS} {tail}")
}

/// Pilot-race filters on top of [`Store`].
pub trait PilotRaceStore: Store<PilotRace> {
    fn find_by_placement(
        &self,
        placement: i32,
    ) -> impl Future<Output = DbResult<Vec<PilotRace>>> + Send;

    fn find_by_pilot(&self, pilot: &Pilot)
        -> impl Future<Output = DbResult<Vec<PilotRace>>> + Send;

    /// Results of `race`, best placement first.
    fn find_by_race_by_placement(
        &self,
        race: &Race,
    ) -> impl Future<Output = DbResult<Vec<PilotRace>>> + Send;

    /// Results of `race` with `min <= placement <= max`.
    fn find_by_placement_between_and_race(
        &self,
        min: i32,
        max: i32,
        race: &Race,
    ) -> impl Future<Output = DbResult<Vec<PilotRace>>> + Send;

    /// The result of `pilot` in `race`, if any. When several rows match the
    /// lowest id wins.
    fn find_by_pilot_and_race(
        &self,
        pilot: &Pilot,
        race: &Race,
    ) -> impl Future<Output = DbResult<Option<PilotRace>>> + Send;
}

/// Repository for pilot-race database operations.
#[derive(Debug, Clone)]
pub struct PilotRaceRepository {
    pool: SqlitePool,
}

impl PilotRaceRepository {
    /// Creates a new PilotRaceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PilotRaceRepository { pool }
    }
}

impl Store<PilotRace> for PilotRaceRepository {
    async fn get_by_id(&self, id: EntityId) -> DbResult<Option<PilotRace>> {
        let sql = select("WHERE pr.id = ?1");
        let row = sqlx::query_as::<_, PilotRaceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(PilotRaceRow::into_pilot_race).transpose()
    }

    async fn get_all(&self) -> DbResult<Vec<PilotRace>> {
        let sql = select("ORDER BY pr.id");
        let rows = sqlx::query_as::<_, PilotRaceRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Listed pilot races");
        into_pilot_races(rows)
    }

    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - the pilot or race does not exist
    async fn save(&self, pilot_race: &PilotRace) -> DbResult<PilotRace> {
        debug!(
            id = ?pilot_race.id,
            placement = ?pilot_race.placement,
            "Saving pilot race"
        );

        let id: EntityId = sqlx::query_scalar(
            r#"
            INSERT INTO pilot_races (id, placement, pilot_id, race_id) VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                placement = excluded.placement,
                pilot_id = excluded.pilot_id,
                race_id = excluded.race_id
            RETURNING id
            "#,
        )
        .bind(pilot_race.id)
        .bind(pilot_race.placement)
        .bind(pilot_race.pilot.id)
        .bind(pilot_race.race.id)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))
    }

    async fn delete(&self, id: EntityId) -> DbResult<()> {
        debug!(id = %id, "Deleting pilot race");

        let result = sqlx::query("DELETE FROM pilot_races WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, id));
        }

        Ok(())
    }
}

impl PilotRaceStore for PilotRaceRepository {
    async fn find_by_placement(&self, placement: i32) -> DbResult<Vec<PilotRace>> {
        debug!(placement = placement, "Finding pilot races by placement");

        let sql = select("WHERE pr.placement = ?1 ORDER BY pr.id");
        let rows = sqlx::query_as::<_, PilotRaceRow>(&sql)
            .bind(placement)
            .fetch_all(&self.pool)
            .await?;

        into_pilot_races(rows)
    }

    async fn find_by_pilot(&self, pilot: &Pilot) -> DbResult<Vec<PilotRace>> {
        debug!(pilot_id = ?pilot.id, "Finding pilot races by pilot");

        let sql = select("WHERE pr.pilot_id = ?1 ORDER BY pr.id");
        let rows = sqlx::query_as::<_, PilotRaceRow>(&sql)
            .bind(pilot.id)
            .fetch_all(&self.pool)
            .await?;

        into_pilot_races(rows)
    }

    async fn find_by_race_by_placement(&self, race: &Race) -> DbResult<Vec<PilotRace>> {
        debug!(race_id = ?race.id, "Finding pilot races by race");

        let sql = select("WHERE pr.race_id = ?1 ORDER BY pr.placement ASC, pr.id");
        let rows = sqlx::query_as::<_, PilotRaceRow>(&sql)
            .bind(race.id)
            .fetch_all(&self.pool)
            .await?;

        into_pilot_races(rows)
    }

    async fn find_by_placement_between_and_race(
        &self,
        min: i32,
        max: i32,
        race: &Race,
    ) -> DbResult<Vec<PilotRace>> {
        debug!(min = min, max = max, race_id = ?race.id, "Finding pilot races by placement range");

        let sql = select("WHERE pr.placement BETWEEN ?1 AND ?2 AND pr.race_id = ?3 ORDER BY pr.id");
        let rows = sqlx::query_as::<_, PilotRaceRow>(&sql)
            .bind(min)
            .bind(max)
            .bind(race.id)
            .fetch_all(&self.pool)
            .await?;

        into_pilot_races(rows)
    }

    async fn find_by_pilot_and_race(
        &self,
        pilot: &Pilot,
        race: &Race,
    ) -> DbResult<Option<PilotRace>> {
        debug!(pilot_id = ?pilot.id, race_id = ?race.id, "Finding pilot race");

        let sql = select("WHERE pr.pilot_id = ?1 AND pr.race_id = ?2 ORDER BY pr.id LIMIT 1");
        let row = sqlx::query_as::<_, PilotRaceRow>(&sql)
            .bind(pilot.id)
            .bind(race.id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(PilotRaceRow::into_pilot_race).transpose()
    }
}
