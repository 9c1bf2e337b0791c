#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Beverage Bandits engine.
//!
//! This crate defines the message surface that connects the driver, the
//! authoritative world, and pure systems. Systems inspect immutable views of
//! the world and respond with [`Command`] values describing desired mutations.
//! The world executes those commands via its `apply` entry point and then
//! broadcasts [`Event`] values describing what actually happened.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Hit points every unit starts the battle with.
pub const STARTING_HIT_POINTS: HitPoints = HitPoints::new(200);

/// Attack power assigned to both factions unless overridden.
pub const DEFAULT_ATTACK_POWER: AttackPower = AttackPower::new(3);

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Requests that a unit step into an adjacent open cell.
    RelocateUnit {
        /// Identifier of the unit attempting to move.
        unit: UnitId,
        /// Cell the unit should occupy after the move.
        to: CellCoord,
    },
    /// Requests that a unit strike an adjacent enemy.
    Attack {
        /// Identifier of the unit dealing damage.
        attacker: UnitId,
        /// Identifier of the unit receiving damage.
        target: UnitId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Confirms that a unit moved between two adjacent cells.
    UnitMoved {
        /// Identifier of the unit that moved.
        unit: UnitId,
        /// Cell the unit occupied before moving.
        from: CellCoord,
        /// Cell the unit occupies after the move.
        to: CellCoord,
    },
    /// Confirms that an attack landed.
    UnitAttacked {
        /// Identifier of the unit that dealt damage.
        attacker: UnitId,
        /// Identifier of the unit that received damage.
        target: UnitId,
        /// Damage dealt by the attack.
        damage: AttackPower,
        /// Hit points the target has left, possibly zero or negative.
        remaining: HitPoints,
    },
    /// Announces that a unit died and was removed from the grid.
    UnitDied {
        /// Identifier of the unit that died.
        unit: UnitId,
        /// Faction the unit fought for.
        faction: Faction,
        /// Cell the unit occupied when it died.
        cell: CellCoord,
    },
    /// Reports that a relocation request was rejected.
    RelocationRejected {
        /// Identifier of the unit that attempted to move.
        unit: UnitId,
        /// Requested destination cell.
        to: CellCoord,
        /// Specific reason the relocation failed.
        reason: RelocationError,
    },
    /// Reports that an attack request was rejected.
    AttackRejected {
        /// Identifier of the unit that attempted the attack.
        attacker: UnitId,
        /// Identifier of the requested target.
        target: UnitId,
        /// Specific reason the attack failed.
        reason: AttackError,
    },
}

impl Event {
    /// Reports whether the event signals a rejected command.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::RelocationRejected { .. } | Self::AttackRejected { .. }
        )
    }
}

/// The two sides fighting over the hot chocolate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    /// Elves, drawn as `E`.
    Elf,
    /// Goblins, drawn as `G`.
    Goblin,
}

impl Faction {
    /// Every faction in declaration order.
    pub const ALL: [Faction; 2] = [Faction::Elf, Faction::Goblin];

    /// Layout symbol that spawns a unit of this faction.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Elf => 'E',
            Self::Goblin => 'G',
        }
    }

    /// Resolves a layout symbol into a faction.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'E' => Some(Self::Elf),
            'G' => Some(Self::Goblin),
            _ => None,
        }
    }

    /// The faction this one fights against.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Elf => Self::Goblin,
            Self::Goblin => Self::Elf,
        }
    }
}

/// Static classification of a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Open cavern that units may stand on.
    Floor,
    /// Solid rock.
    Wall,
}

impl Tile {
    /// Layout symbol for the floor.
    pub const FLOOR_SYMBOL: char = '.';
    /// Layout symbol for walls.
    pub const WALL_SYMBOL: char = '#';

    /// Resolves a layout symbol into a tile. Unit symbols stand on floor.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            Self::FLOOR_SYMBOL => Some(Self::Floor),
            Self::WALL_SYMBOL => Some(Self::Wall),
            other => match Faction::from_symbol(other) {
                Some(_) => Some(Self::Floor),
                None => None,
            },
        }
    }

    /// Reports whether units may stand on the tile.
    #[must_use]
    pub const fn is_floor(self) -> bool {
        matches!(self, Self::Floor)
    }
}

/// Cardinal movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward decreasing column indices.
    West,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
}

impl Direction {
    /// Directions ordered so the neighbors they reach appear in reading order.
    pub const READING_ORDER: [Direction; 4] = [
        Direction::North,
        Direction::West,
        Direction::East,
        Direction::South,
    ];
}

/// Unique identifier assigned to a unit, stable for the lifetime of a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Cells are totally ordered in reading order: top to bottom, then left to
/// right. Every tie-break in the engine relies on this ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Reports whether the two cells share an edge.
    #[must_use]
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Cell one step away in the provided direction.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// Callers are responsible for checking the far edges of their grid.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => Some(Self::new(self.column, self.row.checked_sub(1)?)),
            Direction::West => Some(Self::new(self.column.checked_sub(1)?, self.row)),
            Direction::East => Some(Self::new(self.column.checked_add(1)?, self.row)),
            Direction::South => Some(Self::new(self.column, self.row.checked_add(1)?)),
        }
    }

    fn reading_key(self) -> (u32, u32) {
        (self.row, self.column)
    }
}

impl Ord for CellCoord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.reading_key().cmp(&other.reading_key())
    }
}

impl PartialOrd for CellCoord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Remaining health of a unit. Values at or below zero mean the unit is dead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HitPoints(i32);

impl HitPoints {
    /// Wraps a raw hit point value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Raw hit point value.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Reports whether the value no longer sustains a living unit.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 <= 0
    }

    /// Hit points left after absorbing a single attack.
    #[must_use]
    pub fn after_attack(self, power: AttackPower) -> Self {
        let damage = i32::try_from(power.get()).unwrap_or(i32::MAX);
        Self(self.0.saturating_sub(damage))
    }
}

/// Damage a unit deals with each attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttackPower(u32);

impl AttackPower {
    /// Wraps a raw attack power value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw attack power value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Per-faction attack power, consumed when a world is constructed.
///
/// Changing the configuration never affects a world that already exists;
/// build a new world to observe the override.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackPowers {
    /// Attack power assigned to every elf.
    pub elf: AttackPower,
    /// Attack power assigned to every goblin.
    pub goblin: AttackPower,
}

impl AttackPowers {
    /// Attack power configured for the provided faction.
    #[must_use]
    pub const fn for_faction(&self, faction: Faction) -> AttackPower {
        match faction {
            Faction::Elf => self.elf,
            Faction::Goblin => self.goblin,
        }
    }

    /// Returns a copy with the faction's attack power replaced.
    #[must_use]
    pub fn with_override(mut self, faction: Faction, power: AttackPower) -> Self {
        match faction {
            Faction::Elf => self.elf = power,
            Faction::Goblin => self.goblin = power,
        }
        self
    }
}

impl Default for AttackPowers {
    fn default() -> Self {
        Self {
            elf: DEFAULT_ATTACK_POWER,
            goblin: DEFAULT_ATTACK_POWER,
        }
    }
}

/// Reasons a relocation request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelocationError {
    /// No unit with the provided identifier exists.
    UnknownUnit,
    /// The unit is dead and no longer occupies the grid.
    DeadUnit,
    /// The destination does not share an edge with the unit's cell.
    NotAdjacent,
    /// The destination is a wall, out of bounds, or occupied.
    Blocked,
}

/// Reasons an attack request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackError {
    /// Either identifier does not name a unit.
    UnknownUnit,
    /// The attacker is dead.
    DeadAttacker,
    /// The target is already dead.
    DeadTarget,
    /// Attacker and target fight for the same faction.
    Friendly,
    /// The target does not share an edge with the attacker.
    NotAdjacent,
}

/// Immutable representation of a single unit's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UnitSnapshot {
    /// Unique identifier assigned to the unit.
    pub id: UnitId,
    /// Faction the unit fights for.
    pub faction: Faction,
    /// Cell the unit occupies, or occupied when it died.
    pub cell: CellCoord,
    /// Remaining hit points.
    pub hit_points: HitPoints,
    /// Damage dealt by each of the unit's attacks.
    pub attack_power: AttackPower,
}

impl UnitSnapshot {
    /// Reports whether the unit is still fighting.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !self.hit_points.is_depleted()
    }

    /// Reports whether the other unit fights for the same faction.
    #[must_use]
    pub fn is_friend(&self, other: &UnitSnapshot) -> bool {
        self.faction == other.faction
    }
}

/// Read-only snapshot describing every unit created for a world.
///
/// Dead units remain in the view so callers can report casualties.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RosterView {
    snapshots: Vec<UnitSnapshot>,
}

impl RosterView {
    /// Creates a new roster view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over the units that are still alive.
    pub fn living(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter().filter(|snapshot| snapshot.is_alive())
    }

    /// Iterator over living units that oppose the provided faction.
    pub fn living_enemies_of(&self, faction: Faction) -> impl Iterator<Item = &UnitSnapshot> {
        self.living()
            .filter(move |snapshot| snapshot.faction != faction)
    }

    /// Looks up the snapshot for a unit.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&UnitSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Reports whether any unit of the faction is still alive.
    #[must_use]
    pub fn has_living(&self, faction: Faction) -> bool {
        self.living().any(|snapshot| snapshot.faction == faction)
    }

    /// Number of units of the faction that died.
    #[must_use]
    pub fn casualties(&self, faction: Faction) -> usize {
        self.snapshots
            .iter()
            .filter(|snapshot| snapshot.faction == faction && !snapshot.is_alive())
            .count()
    }

    /// Sum of the hit points of every living unit.
    #[must_use]
    pub fn total_hit_points(&self) -> u64 {
        self.living()
            .map(|snapshot| u64::try_from(snapshot.hit_points.get()).unwrap_or(0))
            .sum()
    }

    /// Number of units captured in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no units at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<UnitSnapshot> {
        self.snapshots
    }
}
