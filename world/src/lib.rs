#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state for the space shooter.
//!
//! The world is seeded once from contribution data and afterwards mutated
//! exclusively through [`apply`]. Enemies live in a fixed arena indexed by
//! creation order; destroyed enemies stay in the arena with zero health.

use space_shooter_core::{
    Command, ContributionData, Event, GridCoord, GridDimensions, Level, DAYS_PER_WEEK, SHIP_ENTRY,
};

/// Represents the authoritative space shooter world state.
#[derive(Debug)]
pub struct World {
    data: ContributionData,
    dimensions: GridDimensions,
    ship: Ship,
    enemies: Vec<Enemy>,
    occupancy: OccupancyGrid,
    alive: usize,
    bullets: Vec<Bullet>,
}

impl World {
    /// Creates a world with one enemy for every day whose level is above zero.
    ///
    /// Enemies are created week by week, top to bottom, and start with health
    /// equal to the day's level.
    #[must_use]
    pub fn new(data: ContributionData) -> Self {
        let dimensions = data.dimensions();
        let mut occupancy = OccupancyGrid::new(dimensions);
        let mut enemies = Vec::new();

        for (week_index, week) in data.weeks().iter().enumerate() {
            for (day_index, day) in week.days().iter().enumerate() {
                if day.level == 0 {
                    continue;
                }

                let cell = GridCoord::from_indices(week_index, day_index);
                occupancy.occupy(cell, enemies.len());
                enemies.push(Enemy::spawn(cell, day.level));
            }
        }

        Self {
            alive: enemies.len(),
            data,
            dimensions,
            ship: Ship::new(),
            enemies,
            occupancy,
            bullets: Vec::new(),
        }
    }

    fn living_enemy_mut(&mut self, cell: GridCoord) -> Option<&mut Enemy> {
        let index = self.occupancy.occupant(cell)?;
        self.enemies
            .get_mut(index)
            .filter(|enemy| enemy.is_alive())
    }

    fn shoot(&mut self, target: GridCoord, out_events: &mut Vec<Event>) {
        self.bullets.push(Bullet { cell: target });
        out_events.push(Event::BulletFired { target });

        let Some(enemy) = self.living_enemy_mut(target) else {
            return;
        };

        let destroyed = enemy.take_damage();
        out_events.push(Event::EnemyDamaged {
            cell: target,
            remaining: enemy.health,
        });

        if !destroyed {
            return;
        }

        out_events.push(Event::EnemyDestroyed { cell: target });
        self.alive = self.alive.saturating_sub(1);
        if self.alive == 0 {
            out_events.push(Event::SweepCompleted);
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::MoveShip { to } => {
            let from = world.ship.cell;
            world.ship.move_to(to);
            out_events.push(Event::ShipMoved { from, to });
        }
        Command::Shoot { target } => world.shoot(target, out_events),
        Command::ClearBullets => {
            let count = world.bullets.len();
            world.bullets.clear();
            out_events.push(Event::BulletsCleared { count });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Enemy, World};
    use space_shooter_core::{
        ContributionData, EnemySnapshot, EnemyView, GridCoord, GridDimensions, ShipSnapshot,
    };

    /// Returns the living enemy occupying the cell, if any.
    ///
    /// Destroyed enemies and cells outside the grid report `None`.
    #[must_use]
    pub fn enemy_at(world: &World, cell: GridCoord) -> Option<EnemySnapshot> {
        let index = world.occupancy.occupant(cell)?;
        world
            .enemies
            .get(index)
            .filter(|enemy| enemy.is_alive())
            .map(Enemy::snapshot)
    }

    /// Captures the living enemies in creation order.
    #[must_use]
    pub fn alive_enemies(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .filter(|enemy| enemy.is_alive())
                .map(Enemy::snapshot)
                .collect(),
        )
    }

    /// Captures every seeded enemy, destroyed ones included, in creation order.
    #[must_use]
    pub fn enemies(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(Enemy::snapshot).collect())
    }

    /// Reports whether every enemy has been destroyed.
    #[must_use]
    pub fn is_complete(world: &World) -> bool {
        world.alive == 0
    }

    /// Sum of the health left across all living enemies.
    #[must_use]
    pub fn remaining_health(world: &World) -> u64 {
        world
            .enemies
            .iter()
            .filter(|enemy| enemy.is_alive())
            .map(|enemy| u64::from(enemy.health))
            .sum()
    }

    /// Dimensions of the grid the world was seeded with.
    #[must_use]
    pub fn grid_dimensions(world: &World) -> GridDimensions {
        world.dimensions
    }

    /// Captures the ship's current position.
    #[must_use]
    pub fn ship(world: &World) -> ShipSnapshot {
        ShipSnapshot {
            cell: world.ship.cell,
        }
    }

    /// Cells targeted by the bullets recorded since the last clear, oldest first.
    pub fn bullets(world: &World) -> impl Iterator<Item = GridCoord> + '_ {
        world.bullets.iter().map(|bullet| bullet.cell)
    }

    /// Number of bullets recorded since the last clear.
    #[must_use]
    pub fn bullet_count(world: &World) -> usize {
        world.bullets.len()
    }

    /// Provides read-only access to the contribution data that seeded the world.
    #[must_use]
    pub fn contribution_data(world: &World) -> &ContributionData {
        &world.data
    }
}

#[derive(Clone, Debug)]
struct Enemy {
    cell: GridCoord,
    health: u32,
    max_health: u32,
}

impl Enemy {
    fn spawn(cell: GridCoord, level: Level) -> Self {
        Self {
            cell,
            health: level,
            max_health: level,
        }
    }

    /// Removes one point of health and reports whether the enemy is now destroyed.
    fn take_damage(&mut self) -> bool {
        self.health = self.health.saturating_sub(1);
        self.health == 0
    }

    fn is_alive(&self) -> bool {
        self.health > 0
    }

    fn snapshot(&self) -> space_shooter_core::EnemySnapshot {
        space_shooter_core::EnemySnapshot {
            cell: self.cell,
            health: self.health,
            max_health: self.max_health,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Bullet {
    cell: GridCoord,
}

#[derive(Clone, Copy, Debug)]
struct Ship {
    cell: GridCoord,
}

impl Ship {
    const fn new() -> Self {
        Self { cell: SHIP_ENTRY }
    }

    fn move_to(&mut self, cell: GridCoord) {
        self.cell = cell;
    }
}

/// Dense lookup from on-grid cells to enemy arena slots.
#[derive(Clone, Debug)]
struct OccupancyGrid {
    dimensions: GridDimensions,
    cells: Vec<Option<usize>>,
}

impl OccupancyGrid {
    fn new(dimensions: GridDimensions) -> Self {
        let capacity = usize::try_from(dimensions.weeks())
            .unwrap_or(0)
            .saturating_mul(DAYS_PER_WEEK);
        Self {
            dimensions,
            cells: vec![None; capacity],
        }
    }

    fn occupy(&mut self, cell: GridCoord, enemy: usize) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = Some(enemy);
            }
        }
    }

    fn occupant(&self, cell: GridCoord) -> Option<usize> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    fn index(&self, cell: GridCoord) -> Option<usize> {
        if !self.dimensions.contains(cell) {
            return None;
        }
        let week = usize::try_from(cell.week()).ok()?;
        let day = usize::try_from(cell.day()).ok()?;
        Some(week * DAYS_PER_WEEK + day)
    }
}
