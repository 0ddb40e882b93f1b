#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the space shooter engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Contribution data seeds the world,
//! strategies turn the same data into a lazy stream of [`Action`] values,
//! drivers translate each action into [`Command`] values that the world
//! executes via its `apply` entry point, and the world broadcasts [`Event`]
//! values describing what happened.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of day rows contained in a single contribution week.
pub const DAYS_PER_WEEK: usize = 7;

/// Position the ship occupies before it enters the grid from the left.
pub const SHIP_ENTRY: GridCoord = GridCoord::new(-1, 3);

/// Activity level recorded for a single day. Nominally `0..=4`, never capped.
pub type Level = u32;

/// Location on the contribution grid expressed as week (column) and day (row).
///
/// Coordinates are signed so that positions outside the grid, such as the
/// ship's [`SHIP_ENTRY`] sentinel, remain representable.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridCoord {
    week: i32,
    day: i32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(week: i32, day: i32) -> Self {
        Self { week, day }
    }

    /// Creates a coordinate from zero-based indices.
    ///
    /// Indices above `i32::MAX` saturate, so distinct indices past that limit
    /// map to the same coordinate. Debug builds assert they stay in range.
    #[must_use]
    pub fn from_indices(week: usize, day: usize) -> Self {
        debug_assert!(
            i32::try_from(week).is_ok() && i32::try_from(day).is_ok(),
            "grid index ({week}, {day}) exceeds i32::MAX"
        );
        Self {
            week: i32::try_from(week).unwrap_or(i32::MAX),
            day: i32::try_from(day).unwrap_or(i32::MAX),
        }
    }

    /// Zero-based week (column) index.
    #[must_use]
    pub const fn week(&self) -> i32 {
        self.week
    }

    /// Zero-based day (row) index.
    #[must_use]
    pub const fn day(&self) -> i32 {
        self.day
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "week={}, day={}", self.week, self.day)
    }
}

/// Size of the contribution grid measured in weeks and days.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridDimensions {
    weeks: u32,
    days: u32,
}

impl GridDimensions {
    /// Creates a grid descriptor spanning `weeks` columns of seven days.
    #[must_use]
    pub const fn new(weeks: u32) -> Self {
        Self {
            weeks,
            days: DAYS_PER_WEEK as u32,
        }
    }

    /// Number of week columns in the grid.
    #[must_use]
    pub const fn weeks(&self) -> u32 {
        self.weeks
    }

    /// Number of day rows in the grid. Always seven.
    #[must_use]
    pub const fn days(&self) -> u32 {
        self.days
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: GridCoord) -> bool {
        u32::try_from(cell.week()).map_or(false, |week| week < self.weeks)
            && u32::try_from(cell.day()).map_or(false, |day| day < self.days)
    }
}

/// Activity recorded for a single day of the contribution calendar.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DayRecord {
    /// Activity level used to seed enemy health.
    pub level: Level,
    /// Raw number of contributions made that day, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    /// Calendar date of the day, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl DayRecord {
    /// Creates a record carrying only an activity level.
    #[must_use]
    pub const fn with_level(level: Level) -> Self {
        Self {
            level,
            count: None,
            date: None,
        }
    }
}

/// Seven consecutive day records forming one column of the grid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WeekRecord", into = "WeekRecord")]
pub struct Week {
    days: [DayRecord; DAYS_PER_WEEK],
}

impl Week {
    /// Creates a week from exactly seven day records.
    #[must_use]
    pub const fn new(days: [DayRecord; DAYS_PER_WEEK]) -> Self {
        Self { days }
    }

    /// Creates a week carrying only activity levels.
    #[must_use]
    pub fn from_levels(levels: [Level; DAYS_PER_WEEK]) -> Self {
        Self {
            days: levels.map(DayRecord::with_level),
        }
    }

    /// Builds a week from an arbitrary list of day records.
    ///
    /// Returns an error unless exactly seven records are supplied.
    pub fn try_from_days(days: Vec<DayRecord>) -> Result<Self, ContributionError> {
        let found = days.len();
        let days: [DayRecord; DAYS_PER_WEEK] = days
            .try_into()
            .map_err(|_| ContributionError::WrongDayCount { found })?;
        Ok(Self { days })
    }

    /// Day records ordered from day zero to day six.
    #[must_use]
    pub fn days(&self) -> &[DayRecord; DAYS_PER_WEEK] {
        &self.days
    }

    /// Activity levels ordered from day zero to day six.
    #[must_use]
    pub fn levels(&self) -> [Level; DAYS_PER_WEEK] {
        let mut levels = [0; DAYS_PER_WEEK];
        for (level, day) in levels.iter_mut().zip(self.days.iter()) {
            *level = day.level;
        }
        levels
    }

    /// Highest activity level recorded in the week, zero for an idle week.
    #[must_use]
    pub fn max_level(&self) -> Level {
        self.days.iter().map(|day| day.level).max().unwrap_or(0)
    }
}

#[derive(Serialize, Deserialize)]
struct WeekRecord {
    days: Vec<DayRecord>,
}

impl TryFrom<WeekRecord> for Week {
    type Error = ContributionError;

    fn try_from(record: WeekRecord) -> Result<Self, Self::Error> {
        Self::try_from_days(record.days)
    }
}

impl From<Week> for WeekRecord {
    fn from(week: Week) -> Self {
        Self {
            days: week.days.into(),
        }
    }
}

/// Contribution calendar supplied by the data-loading collaborator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionData {
    weeks: Vec<Week>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_contributions: Option<u32>,
}

impl ContributionData {
    /// Creates contribution data from an ordered list of weeks.
    #[must_use]
    pub fn new(weeks: Vec<Week>) -> Self {
        Self {
            weeks,
            username: None,
            total_contributions: None,
        }
    }

    /// Creates contribution data from per-week activity levels.
    #[must_use]
    pub fn from_levels<I>(levels: I) -> Self
    where
        I: IntoIterator<Item = [Level; DAYS_PER_WEEK]>,
    {
        Self::new(levels.into_iter().map(Week::from_levels).collect())
    }

    /// Weeks ordered from oldest to newest.
    #[must_use]
    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    /// Number of weeks contained in the calendar.
    #[must_use]
    pub fn week_count(&self) -> usize {
        self.weeks.len()
    }

    /// Dimensions of the grid derived from the calendar.
    #[must_use]
    pub fn dimensions(&self) -> GridDimensions {
        GridDimensions::new(u32::try_from(self.weeks.len()).unwrap_or(u32::MAX))
    }

    /// Account the calendar belongs to, when known.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Total contributions reported alongside the calendar, when known.
    #[must_use]
    pub const fn total_contributions(&self) -> Option<u32> {
        self.total_contributions
    }
}

/// Reasons contribution data may be rejected at the loading boundary.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ContributionError {
    /// A week did not contain exactly seven day records.
    #[error("a week must contain exactly {expected} days, found {found}", expected = DAYS_PER_WEEK)]
    WrongDayCount {
        /// Number of day records that were supplied.
        found: usize,
    },
}

/// Single step of a clearing plan: move the ship to a cell and optionally fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Action {
    cell: GridCoord,
    shoot: bool,
}

impl Action {
    /// Creates an action targeting the provided cell.
    #[must_use]
    pub const fn new(cell: GridCoord, shoot: bool) -> Self {
        Self { cell, shoot }
    }

    /// Creates an action that moves the ship over `cell` without firing.
    #[must_use]
    pub const fn pass(cell: GridCoord) -> Self {
        Self::new(cell, false)
    }

    /// Creates an action that moves the ship to `cell` and fires at it.
    #[must_use]
    pub const fn fire(cell: GridCoord) -> Self {
        Self::new(cell, true)
    }

    /// Cell the ship visits during the action.
    #[must_use]
    pub const fn cell(&self) -> GridCoord {
        self.cell
    }

    /// Reports whether the ship fires at the visited cell.
    #[must_use]
    pub const fn shoots(&self) -> bool {
        self.shoot
    }

    /// World commands that carry out the action, in application order.
    pub fn commands(&self) -> impl Iterator<Item = Command> {
        let cell = self.cell;
        let shot = self.shoot.then_some(Command::Shoot { target: cell });
        std::iter::once(Command::MoveShip { to: cell }).chain(shot)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.shoot { "SHOOT" } else { "MOVE" };
        write!(f, "{kind} {}", self.cell)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Places the ship at the provided cell without validating bounds.
    MoveShip {
        /// Destination of the ship.
        to: GridCoord,
    },
    /// Fires a bullet at the provided cell, damaging any living enemy there.
    Shoot {
        /// Cell the bullet is fired at.
        target: GridCoord,
    },
    /// Empties the bullet history.
    ClearBullets,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Confirms that the ship moved.
    ShipMoved {
        /// Position before the move.
        from: GridCoord,
        /// Position after the move.
        to: GridCoord,
    },
    /// Confirms that a bullet was recorded, regardless of whether it hit.
    BulletFired {
        /// Cell the bullet was fired at.
        target: GridCoord,
    },
    /// Reports that a living enemy lost one point of health.
    EnemyDamaged {
        /// Cell occupied by the enemy.
        cell: GridCoord,
        /// Health left after the hit.
        remaining: u32,
    },
    /// Reports that an enemy's health reached zero.
    EnemyDestroyed {
        /// Cell occupied by the enemy.
        cell: GridCoord,
    },
    /// Confirms that the bullet history was emptied.
    BulletsCleared {
        /// Number of bullets removed.
        count: usize,
    },
    /// Announces that the last living enemy was destroyed.
    SweepCompleted,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EnemySnapshot {
    /// Grid cell occupied by the enemy.
    pub cell: GridCoord,
    /// Health left before the enemy is destroyed.
    pub health: u32,
    /// Health the enemy was seeded with.
    pub max_health: u32,
}

impl EnemySnapshot {
    /// Reports whether the enemy still has health left.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// Read-only snapshot describing a set of enemies in creation order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from snapshots already in creation order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<EnemySnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the ship used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShipSnapshot {
    /// Cell the ship currently occupies, possibly outside the grid.
    pub cell: GridCoord,
}

impl ShipSnapshot {
    /// Reports whether the ship is still left of the grid, entering the scene.
    #[must_use]
    pub const fn is_entering(&self) -> bool {
        self.cell.week() < 0
    }
}

/// Produces a finite, ordered plan of actions that clears every enemy.
///
/// Replaying the plan against a world freshly seeded from the same data must
/// leave the world complete. Each call to [`Strategy::actions`] starts a new,
/// independent stream; streams may be dropped before they are exhausted.
pub trait Strategy {
    /// Lazy stream of actions borrowing the contribution data.
    type Actions<'data>: Iterator<Item = Action>
    where
        Self: 'data;

    /// Short identifier used in logs and on the command line.
    fn name(&self) -> &'static str;

    /// Starts a new action stream for the provided contribution data.
    fn actions<'data>(&'data self, data: &'data ContributionData) -> Self::Actions<'data>;
}
