//! Search for the smallest attack power that wins a battle without losses.

use beverage_bandits_core::{AttackPower, AttackPowers, Faction, STARTING_HIT_POINTS};
use beverage_bandits_world::Layout;

use crate::{Outcome, Simulation, SimulationError};

/// Attack power and outcome of the first flawless victory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerSearchResult {
    /// Smallest attack power that produced a flawless victory.
    pub attack_power: AttackPower,
    /// Outcome of the battle fought with that attack power.
    pub outcome: Outcome,
}

/// Raises one faction's attack power until it wins without a single death.
///
/// Every attempt builds an independent world from the same layout, so no
/// state leaks between battles. The search starts one above the faction's
/// base power and gives up once a single hit kills any unit.
#[derive(Clone, Copy, Debug)]
pub struct PowerSearch {
    faction: Faction,
    base: AttackPowers,
    start: Option<AttackPower>,
    round_limit: Option<u32>,
}

impl PowerSearch {
    /// Searches on behalf of `faction` with default base powers.
    #[must_use]
    pub fn new(faction: Faction) -> Self {
        Self {
            faction,
            base: AttackPowers::default(),
            start: None,
            round_limit: None,
        }
    }

    /// Uses `base` for the opposing faction and as the starting point.
    #[must_use]
    pub fn with_base_powers(mut self, base: AttackPowers) -> Self {
        self.base = base;
        self
    }

    /// Tries `power` first instead of one above the base power.
    #[must_use]
    pub fn starting_at(mut self, power: AttackPower) -> Self {
        self.start = Some(power);
        self
    }

    /// Applies a round limit to every attempted battle.
    #[must_use]
    pub fn with_round_limit(mut self, limit: u32) -> Self {
        self.round_limit = Some(limit);
        self
    }

    /// Fights battles with increasing attack power until one is flawless.
    pub fn run(&self, layout: &Layout) -> Result<PowerSearchResult, SimulationError> {
        let max_power = STARTING_HIT_POINTS.get().unsigned_abs();
        let start = self
            .start
            .map(|power| power.get())
            .unwrap_or_else(|| self.base.for_faction(self.faction).get().saturating_add(1));

        for power in start..=max_power {
            let attack_power = AttackPower::new(power);
            let powers = self.base.with_override(self.faction, attack_power);
            let mut simulation = Simulation::from_layout(layout, &powers);
            if let Some(limit) = self.round_limit {
                simulation = simulation.with_round_limit(limit);
            }

            let outcome = simulation.run()?;
            let casualties = simulation.roster().casualties(self.faction);
            tracing::debug!(
                faction = ?self.faction,
                power,
                casualties,
                outcome = outcome.value(),
                "attack power attempt finished"
            );

            if casualties == 0 && outcome.winner == Some(self.faction) {
                return Ok(PowerSearchResult {
                    attack_power,
                    outcome,
                });
            }
        }

        Err(SimulationError::NoFlawlessPower {
            faction: self.faction,
            max_power: AttackPower::new(max_power),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_enemies_surface_the_round_limit() {
        let layout = Layout::parse("#######\n#E.#G.#\n#######").expect("valid layout");

        let result = PowerSearch::new(Faction::Elf)
            .starting_at(AttackPower::new(199))
            .with_round_limit(3)
            .run(&layout);

        assert_eq!(result, Err(SimulationError::RoundLimitReached { limit: 3 }));
    }

    #[test]
    fn lone_faction_wins_flawlessly_at_the_first_attempt() {
        let layout = Layout::parse("#####\n#G.G#\n#####").expect("valid layout");

        let result = PowerSearch::new(Faction::Goblin)
            .run(&layout)
            .expect("flawless victory");

        assert_eq!(result.attack_power, AttackPower::new(4));
        assert_eq!(result.outcome.rounds_completed, 0);
        assert_eq!(result.outcome.winner, Some(Faction::Goblin));
    }

    #[test]
    fn missing_faction_exhausts_the_search() {
        let layout = Layout::parse("#####\n#G.G#\n#####").expect("valid layout");

        let result = PowerSearch::new(Faction::Elf)
            .starting_at(AttackPower::new(198))
            .run(&layout);

        assert_eq!(
            result,
            Err(SimulationError::NoFlawlessPower {
                faction: Faction::Elf,
                max_power: AttackPower::new(200),
            })
        );
    }

    #[test]
    fn first_raised_power_wins_a_duel() {
        let layout = Layout::parse("####\n#EG#\n####").expect("valid layout");

        let result = PowerSearch::new(Faction::Elf)
            .run(&layout)
            .expect("flawless victory");

        assert_eq!(result.attack_power, AttackPower::new(4));
        assert_eq!(result.outcome.rounds_completed, 50);
        assert_eq!(result.outcome.remaining_hit_points, 200 - 3 * 49);
    }
}
