#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects attack targets and emits attack commands.

use beverage_bandits_core::{CellCoord, Command, HitPoints, RosterView, UnitId, UnitSnapshot};
use beverage_bandits_world::query::GridView;

/// Combat system that picks the weakest adjacent enemy for a unit.
#[derive(Debug, Default)]
pub struct CombatResolver;

impl CombatResolver {
    /// Creates a new combat resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits a `Command::Attack` when `unit` borders a living enemy.
    ///
    /// Returns the selected target, or `None` when nothing is in range.
    pub fn handle(
        &mut self,
        unit: &UnitSnapshot,
        roster: &RosterView,
        grid: GridView<'_>,
        out: &mut Vec<Command>,
    ) -> Option<UnitId> {
        let target = self.select_target(unit, roster, grid)?;
        tracing::trace!(
            attacker = unit.id.get(),
            target = target.get(),
            "selected attack target"
        );
        out.push(Command::Attack {
            attacker: unit.id,
            target,
        });
        Some(target)
    }

    /// Selects the adjacent living enemy with the fewest hit points.
    ///
    /// Ties go to the enemy whose cell comes first in reading order.
    #[must_use]
    pub fn select_target(
        &self,
        unit: &UnitSnapshot,
        roster: &RosterView,
        grid: GridView<'_>,
    ) -> Option<UnitId> {
        let mut best: Option<Candidate> = None;

        for cell in grid.neighbors(unit.cell) {
            let Some(occupant) = grid.occupant(cell) else {
                continue;
            };
            let Some(enemy) = roster.get(occupant) else {
                continue;
            };
            if !enemy.is_alive() || unit.is_friend(enemy) {
                continue;
            }

            let candidate = Candidate {
                hit_points: enemy.hit_points,
                cell,
                unit: enemy.id,
            };
            match &mut best {
                Some(existing) => {
                    if candidate.precedes(existing) {
                        *existing = candidate;
                    }
                }
                None => best = Some(candidate),
            }
        }

        best.map(|candidate| candidate.unit)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    hit_points: HitPoints,
    cell: CellCoord,
    unit: UnitId,
}

impl Candidate {
    fn precedes(&self, other: &Self) -> bool {
        (self.hit_points, self.cell) < (other.hit_points, other.cell)
    }
}
