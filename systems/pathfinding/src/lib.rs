#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic pathfinding system that moves units toward their enemies.

mod navigation;

use beverage_bandits_core::{CellCoord, Command, RosterView, UnitSnapshot};
use beverage_bandits_world::query::GridView;

use crate::navigation::DistanceField;

/// Result of planning a single unit's movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathPlan {
    /// No living enemy exists anywhere; combat is over.
    NoEnemies,
    /// The unit already borders a living enemy and should not move.
    InRange,
    /// Enemies exist but no cell in range of them can be reached.
    Blocked,
    /// The unit should take one step toward the chosen destination.
    Step {
        /// Open cell adjacent to an enemy that the unit is heading for.
        destination: CellCoord,
        /// Neighboring cell the unit moves into this turn.
        next: CellCoord,
        /// Shortest-path distance from the unit to the destination.
        distance: u32,
    },
}

/// Pure system that selects destinations and first steps for units.
///
/// Scratch distance fields are reused across calls to avoid repeated
/// allocations.
#[derive(Debug, Default)]
pub struct Pathfinder {
    forward: DistanceField,
    reverse: DistanceField,
    candidates: Vec<CellCoord>,
}

impl Pathfinder {
    /// Creates a new pathfinder with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plans the movement of `unit` and emits a relocation command for a step.
    pub fn handle(
        &mut self,
        unit: &UnitSnapshot,
        roster: &RosterView,
        grid: GridView<'_>,
        out: &mut Vec<Command>,
    ) -> PathPlan {
        let plan = self.plan(unit, roster, grid);
        if let PathPlan::Step { next, .. } = plan {
            out.push(Command::RelocateUnit {
                unit: unit.id,
                to: next,
            });
        }
        plan
    }

    /// Computes the destination and first step for `unit`.
    ///
    /// The destination is the nearest open cell adjacent to a living enemy;
    /// the step is the neighboring open cell that starts a shortest path to
    /// it. Both choices break ties in reading order, independently.
    pub fn plan(
        &mut self,
        unit: &UnitSnapshot,
        roster: &RosterView,
        grid: GridView<'_>,
    ) -> PathPlan {
        self.candidates.clear();
        let mut any_enemy = false;

        for enemy in roster.living_enemies_of(unit.faction) {
            any_enemy = true;
            for cell in grid.neighbors(enemy.cell) {
                if cell == unit.cell {
                    return PathPlan::InRange;
                }
                if grid.is_open(cell) {
                    self.candidates.push(cell);
                }
            }
        }

        if !any_enemy {
            return PathPlan::NoEnemies;
        }

        self.forward.rebuild_from(grid, unit.cell);

        let Some((distance, destination)) = self
            .candidates
            .iter()
            .filter_map(|cell| self.forward.distance(*cell).map(|distance| (distance, *cell)))
            .min()
        else {
            tracing::trace!(unit = unit.id.get(), "no reachable cell in range of an enemy");
            return PathPlan::Blocked;
        };

        self.reverse.rebuild_from(grid, destination);

        let next = grid
            .neighbors(unit.cell)
            .filter(|cell| grid.is_open(*cell))
            .find(|cell| {
                self.reverse.distance(*cell).map(|steps| steps + 1) == Some(distance)
            });

        match next {
            Some(next) => PathPlan::Step {
                destination,
                next,
                distance,
            },
            None => PathPlan::Blocked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beverage_bandits_core::{AttackPowers, UnitId};
    use beverage_bandits_world::{query, World};

    fn plan_for(text: &str, unit: u32) -> PathPlan {
        let world = World::from_text(text, &AttackPowers::default()).expect("valid layout");
        let roster = query::roster_view(&world);
        let snapshot = *roster.get(UnitId::new(unit)).expect("unit exists");
        Pathfinder::new().plan(&snapshot, &roster, query::grid_view(&world))
    }

    #[test]
    fn nearest_destination_breaks_ties_in_reading_order() {
        let plan = plan_for("#######\n#E..G.#\n#...#.#\n#.G.#G#\n#######", 0);

        assert_eq!(
            plan,
            PathPlan::Step {
                destination: CellCoord::new(3, 1),
                next: CellCoord::new(2, 1),
                distance: 2,
            }
        );
    }

    #[test]
    fn first_step_breaks_ties_in_reading_order() {
        let plan = plan_for("#######\n#.E...#\n#.....#\n#...G.#\n#######", 0);

        assert_eq!(
            plan,
            PathPlan::Step {
                destination: CellCoord::new(4, 2),
                next: CellCoord::new(3, 1),
                distance: 3,
            }
        );
    }

    #[test]
    fn units_in_range_do_not_move() {
        assert_eq!(plan_for("#####\n#EG.#\n#####", 0), PathPlan::InRange);
    }

    #[test]
    fn walled_off_enemies_block_movement() {
        assert_eq!(plan_for("#######\n#E.#G.#\n#######", 0), PathPlan::Blocked);
    }

    #[test]
    fn lone_faction_finds_no_enemies() {
        assert_eq!(plan_for("#####\n#E.E#\n#####", 0), PathPlan::NoEnemies);
    }

    #[test]
    fn handle_emits_relocation_for_steps() {
        let world = World::from_text("#######\n#E...G#\n#######", &AttackPowers::default())
            .expect("valid layout");
        let roster = query::roster_view(&world);
        let elf = *roster.get(UnitId::new(0)).expect("elf exists");
        let mut commands = Vec::new();

        let plan = Pathfinder::new().handle(&elf, &roster, query::grid_view(&world), &mut commands);

        assert!(matches!(plan, PathPlan::Step { .. }));
        assert_eq!(
            commands,
            vec![Command::RelocateUnit {
                unit: UnitId::new(0),
                to: CellCoord::new(2, 1),
            }]
        );
    }
}
