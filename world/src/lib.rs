#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative battle state for Beverage Bandits.

mod grid;
mod layout;

use beverage_bandits_core::{
    AttackError, AttackPower, AttackPowers, CellCoord, Command, Event, Faction, HitPoints,
    RelocationError, UnitId, UnitSnapshot, STARTING_HIT_POINTS,
};

use crate::grid::Grid;

pub use crate::layout::{Layout, LayoutError, Spawn};

/// Represents the authoritative battle: the grid and the roster of units.
///
/// Cloning a world yields a fully independent battle; occupancy refers to
/// units by identifier, never by address.
#[derive(Clone, Debug)]
pub struct World {
    grid: Grid,
    units: Vec<Unit>,
}

impl World {
    /// Builds a fresh battle from a validated layout.
    ///
    /// Attack powers are read once here. Units created later never exist, so
    /// changing the configuration requires building a new world.
    #[must_use]
    pub fn new(layout: &Layout, powers: &AttackPowers) -> Self {
        let mut grid = Grid::new(layout.columns(), layout.rows(), layout.tiles().to_vec());
        let mut units = Vec::with_capacity(layout.spawns().len());

        for (index, spawn) in layout.spawns().iter().enumerate() {
            let id = UnitId::new(u32::try_from(index).unwrap_or(u32::MAX));
            grid.occupy(id, spawn.cell);
            units.push(Unit {
                id,
                faction: spawn.faction,
                cell: spawn.cell,
                hit_points: STARTING_HIT_POINTS,
                attack_power: powers.for_faction(spawn.faction),
            });
        }

        Self { grid, units }
    }

    /// Parses the layout text and builds a battle in one step.
    pub fn from_text(text: &str, powers: &AttackPowers) -> Result<Self, LayoutError> {
        Layout::parse(text).map(|layout| Self::new(&layout, powers))
    }

    fn unit_index(&self, id: UnitId) -> Option<usize> {
        usize::try_from(id.get())
            .ok()
            .filter(|index| *index < self.units.len())
    }

    fn relocate(&mut self, id: UnitId, to: CellCoord, out_events: &mut Vec<Event>) {
        let reject = |reason| Event::RelocationRejected { unit: id, to, reason };

        let Some(index) = self.unit_index(id) else {
            out_events.push(reject(RelocationError::UnknownUnit));
            return;
        };
        let unit = self.units[index];
        if !unit.is_alive() {
            out_events.push(reject(RelocationError::DeadUnit));
            return;
        }
        if !unit.cell.is_adjacent(to) {
            out_events.push(reject(RelocationError::NotAdjacent));
            return;
        }
        if !self.grid.is_open(to) {
            out_events.push(reject(RelocationError::Blocked));
            return;
        }

        self.grid.vacate(unit.cell);
        self.grid.occupy(id, to);
        self.units[index].cell = to;
        out_events.push(Event::UnitMoved {
            unit: id,
            from: unit.cell,
            to,
        });
    }

    fn attack(&mut self, attacker: UnitId, target: UnitId, out_events: &mut Vec<Event>) {
        let reject = |reason| Event::AttackRejected {
            attacker,
            target,
            reason,
        };

        let (Some(attacker_index), Some(target_index)) =
            (self.unit_index(attacker), self.unit_index(target))
        else {
            out_events.push(reject(AttackError::UnknownUnit));
            return;
        };
        let striker = self.units[attacker_index];
        let victim = self.units[target_index];

        let rejection = if !striker.is_alive() {
            Some(AttackError::DeadAttacker)
        } else if !victim.is_alive() {
            Some(AttackError::DeadTarget)
        } else if striker.faction == victim.faction {
            Some(AttackError::Friendly)
        } else if !striker.cell.is_adjacent(victim.cell) {
            Some(AttackError::NotAdjacent)
        } else {
            None
        };
        if let Some(reason) = rejection {
            out_events.push(reject(reason));
            return;
        }

        let remaining = victim.hit_points.after_attack(striker.attack_power);
        self.units[target_index].hit_points = remaining;
        out_events.push(Event::UnitAttacked {
            attacker,
            target,
            damage: striker.attack_power,
            remaining,
        });

        if remaining.is_depleted() {
            self.grid.vacate(victim.cell);
            out_events.push(Event::UnitDied {
                unit: target,
                faction: victim.faction,
                cell: victim.cell,
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Invalid commands leave the world untouched and produce a rejection event.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::RelocateUnit { unit, to } => world.relocate(unit, to, out_events),
        Command::Attack { attacker, target } => world.attack(attacker, target, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use beverage_bandits_core::{CellCoord, Direction, RosterView, Tile, UnitId, UnitSnapshot};

    use super::{Grid, World};

    /// Captures a read-only view of every unit, dead or alive, in creation order.
    #[must_use]
    pub fn roster_view(world: &World) -> RosterView {
        RosterView::from_snapshots(world.units.iter().map(|unit| unit.snapshot()).collect())
    }

    /// Snapshot of a single unit.
    #[must_use]
    pub fn unit(world: &World, id: UnitId) -> Option<UnitSnapshot> {
        world
            .unit_index(id)
            .map(|index| world.units[index].snapshot())
    }

    /// Every unit ordered by the reading order of its current cell.
    ///
    /// Dead units are included at their last cell; callers skip them.
    #[must_use]
    pub fn turn_order(world: &World) -> Vec<UnitId> {
        let mut order: Vec<(CellCoord, UnitId)> =
            world.units.iter().map(|unit| (unit.cell, unit.id)).collect();
        order.sort();
        order.into_iter().map(|(_, id)| id).collect()
    }

    /// Exposes a read-only view of terrain and occupancy.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        GridView { grid: &world.grid }
    }

    /// Read-only view into the dense battle grid.
    #[derive(Clone, Copy, Debug)]
    pub struct GridView<'a> {
        grid: &'a Grid,
    }

    impl<'a> GridView<'a> {
        /// Static tile at the cell, or `None` outside the grid.
        #[must_use]
        pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
            self.grid.tile(cell)
        }

        /// Returns the unit occupying the provided cell, if any.
        #[must_use]
        pub fn occupant(&self, cell: CellCoord) -> Option<UnitId> {
            self.grid.occupant(cell)
        }

        /// Reports whether the cell is in bounds, floor, and unoccupied.
        #[must_use]
        pub fn is_open(&self, cell: CellCoord) -> bool {
            self.grid.is_open(cell)
        }

        /// In-bounds orthogonal neighbors in reading order: up, left, right, down.
        #[must_use]
        pub fn neighbors(&self, cell: CellCoord) -> Neighbors {
            let (columns, rows) = self.grid.dimensions();
            let mut neighbors = Neighbors::default();
            for direction in Direction::READING_ORDER {
                if let Some(next) = cell.step(direction) {
                    if next.column() < columns && next.row() < rows {
                        neighbors.push(next);
                    }
                }
            }
            neighbors
        }

        /// Row-major index of the cell, or `None` outside the grid.
        #[must_use]
        pub fn index(&self, cell: CellCoord) -> Option<usize> {
            self.grid.index(cell)
        }

        /// Provides the dimensions of the grid as `(columns, rows)`.
        #[must_use]
        pub fn dimensions(&self) -> (u32, u32) {
            self.grid.dimensions()
        }
    }

    /// Fixed-capacity iterator over the neighbors of a cell.
    #[derive(Clone, Debug, Default)]
    pub struct Neighbors {
        buffer: [Option<CellCoord>; 4],
        len: usize,
        cursor: usize,
    }

    impl Neighbors {
        fn push(&mut self, cell: CellCoord) {
            if self.len < self.buffer.len() {
                self.buffer[self.len] = Some(cell);
                self.len += 1;
            }
        }
    }

    impl Iterator for Neighbors {
        type Item = CellCoord;

        fn next(&mut self) -> Option<Self::Item> {
            if self.cursor >= self.len {
                return None;
            }

            let value = self.buffer[self.cursor];
            self.cursor += 1;
            value
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Unit {
    id: UnitId,
    faction: Faction,
    cell: CellCoord,
    hit_points: HitPoints,
    attack_power: AttackPower,
}

impl Unit {
    fn is_alive(&self) -> bool {
        !self.hit_points.is_depleted()
    }

    fn snapshot(&self) -> UnitSnapshot {
        UnitSnapshot {
            id: self.id,
            faction: self.faction,
            cell: self.cell,
            hit_points: self.hit_points,
            attack_power: self.attack_power,
        }
    }
}
