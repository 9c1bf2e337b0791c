#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn scheduler that drives a battle from the first round to its outcome.
//!
//! Each round orders units by the reading order of their cells. A living unit
//! attacks when an enemy is adjacent; otherwise it asks the pathfinder for a
//! step, moves, and attacks if the move brought an enemy into range. Combat
//! ends the moment a unit finds no living enemy anywhere, and the round in
//! progress at that moment does not count.

mod power_search;

use beverage_bandits_core::{
    AttackPower, AttackPowers, Command, Event, Faction, RosterView, UnitId,
};
use beverage_bandits_system_combat::CombatResolver;
use beverage_bandits_system_pathfinding::{PathPlan, Pathfinder};
use beverage_bandits_world::{self as world, query, Layout, World};
use thiserror::Error;

pub use crate::power_search::{PowerSearch, PowerSearchResult};

/// Lifecycle of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SimulationState {
    /// Both factions may still act.
    Running,
    /// A unit found no enemies; the outcome is final.
    Over,
}

/// Errors that stop a battle before it reaches its outcome.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// The world rejected a command issued by a system.
    #[error("world rejected a command during the battle: {event:?}")]
    InvariantViolation {
        /// Rejection event reported by the world.
        event: Event,
    },
    /// Combat was still running after the configured number of rounds.
    #[error("combat still running after {limit} full rounds")]
    RoundLimitReached {
        /// Number of full rounds allowed.
        limit: u32,
    },
    /// No attack power lets the faction win without losing a unit.
    #[error("no attack power up to {} lets the {faction:?} side win without losses", .max_power.get())]
    NoFlawlessPower {
        /// Faction whose attack power was searched.
        faction: Faction,
        /// Highest attack power that was tried.
        max_power: AttackPower,
    },
}

/// Final result of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Outcome {
    /// Number of rounds that completed before combat ended.
    pub rounds_completed: u32,
    /// Sum of the hit points of every surviving unit.
    pub remaining_hit_points: u64,
    /// Faction left standing, if exactly one has survivors.
    pub winner: Option<Faction>,
}

impl Outcome {
    /// Full rounds multiplied by the surviving hit points.
    #[must_use]
    pub fn value(&self) -> u64 {
        u64::from(self.rounds_completed) * self.remaining_hit_points
    }
}

/// Drives one battle over an owned world.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    pathfinder: Pathfinder,
    combat: CombatResolver,
    state: SimulationState,
    rounds_completed: u32,
    round_limit: Option<u32>,
    commands: Vec<Command>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Turn {
    Skipped,
    Taken,
    NoEnemies,
}

impl Simulation {
    /// Wraps a freshly built world.
    #[must_use]
    pub fn new(world: World) -> Self {
        Self {
            world,
            pathfinder: Pathfinder::new(),
            combat: CombatResolver::new(),
            state: SimulationState::Running,
            rounds_completed: 0,
            round_limit: None,
            commands: Vec::new(),
        }
    }

    /// Builds an independent world from the layout and wraps it.
    #[must_use]
    pub fn from_layout(layout: &Layout, powers: &AttackPowers) -> Self {
        Self::new(World::new(layout, powers))
    }

    /// Makes [`Simulation::run`] fail once `limit` rounds complete without a
    /// winner.
    #[must_use]
    pub fn with_round_limit(mut self, limit: u32) -> Self {
        self.round_limit = Some(limit);
        self
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// Number of rounds that completed with combat still ongoing.
    #[must_use]
    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    /// Read-only access to the battle.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Every unit in creation order, including the dead.
    #[must_use]
    pub fn roster(&self) -> RosterView {
        query::roster_view(&self.world)
    }

    /// Final outcome, available once the battle is over.
    ///
    /// Repeated calls return the same value.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            SimulationState::Running => None,
            SimulationState::Over => Some(self.tally()),
        }
    }

    /// Plays rounds until combat ends and returns the outcome.
    pub fn run(&mut self) -> Result<Outcome, SimulationError> {
        let mut events = Vec::new();
        while self.state == SimulationState::Running {
            events.clear();
            if self.play_round(&mut events)? == SimulationState::Over {
                break;
            }
            if let Some(limit) = self.round_limit {
                if self.rounds_completed >= limit {
                    tracing::warn!(limit, "round limit reached before combat ended");
                    return Err(SimulationError::RoundLimitReached { limit });
                }
            }
        }
        Ok(self.tally())
    }

    /// Plays a single round, appending every world event to `out_events`.
    ///
    /// Calling this after the battle is over has no effect.
    pub fn play_round(
        &mut self,
        out_events: &mut Vec<Event>,
    ) -> Result<SimulationState, SimulationError> {
        if self.state == SimulationState::Over {
            return Ok(SimulationState::Over);
        }

        let order = query::turn_order(&self.world);
        if order.is_empty() {
            self.finish();
            return Ok(self.state);
        }

        tracing::debug!(round = self.rounds_completed + 1, "round started");
        for unit in order {
            if self.take_turn(unit, out_events)? == Turn::NoEnemies {
                self.finish();
                return Ok(self.state);
            }
        }

        self.rounds_completed += 1;
        Ok(self.state)
    }

    fn take_turn(
        &mut self,
        id: UnitId,
        out_events: &mut Vec<Event>,
    ) -> Result<Turn, SimulationError> {
        let roster = query::roster_view(&self.world);
        let Some(unit) = roster.get(id).copied().filter(|unit| unit.is_alive()) else {
            return Ok(Turn::Skipped);
        };

        let grid = query::grid_view(&self.world);
        if self
            .combat
            .handle(&unit, &roster, grid, &mut self.commands)
            .is_some()
        {
            self.execute(out_events)?;
            return Ok(Turn::Taken);
        }

        match self
            .pathfinder
            .handle(&unit, &roster, grid, &mut self.commands)
        {
            PathPlan::NoEnemies => return Ok(Turn::NoEnemies),
            PathPlan::InRange | PathPlan::Blocked => return Ok(Turn::Taken),
            PathPlan::Step { .. } => self.execute(out_events)?,
        }

        let roster = query::roster_view(&self.world);
        let Some(unit) = roster.get(id).copied() else {
            return Ok(Turn::Taken);
        };
        let grid = query::grid_view(&self.world);
        if self
            .combat
            .handle(&unit, &roster, grid, &mut self.commands)
            .is_some()
        {
            self.execute(out_events)?;
        }
        Ok(Turn::Taken)
    }

    fn execute(&mut self, out_events: &mut Vec<Event>) -> Result<(), SimulationError> {
        let first_new = out_events.len();
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, out_events);
        }

        for event in &out_events[first_new..] {
            match event {
                Event::UnitMoved { unit, from, to } => {
                    tracing::trace!(unit = unit.get(), ?from, ?to, "unit moved");
                }
                Event::UnitAttacked {
                    attacker,
                    target,
                    remaining,
                    ..
                } => {
                    tracing::trace!(
                        attacker = attacker.get(),
                        target = target.get(),
                        remaining = remaining.get(),
                        "unit attacked"
                    );
                }
                Event::UnitDied {
                    unit,
                    faction,
                    cell,
                } => {
                    tracing::debug!(unit = unit.get(), ?faction, ?cell, "unit died");
                }
                Event::RelocationRejected { .. } | Event::AttackRejected { .. } => {
                    tracing::warn!(?event, "world rejected a command; stopping the battle");
                    return Err(SimulationError::InvariantViolation { event: *event });
                }
            }
        }
        Ok(())
    }

    fn finish(&mut self) {
        self.state = SimulationState::Over;
        tracing::debug!(rounds_completed = self.rounds_completed, "combat ended");
    }

    fn tally(&self) -> Outcome {
        let roster = self.roster();
        let mut survivors = Faction::ALL
            .into_iter()
            .filter(|faction| roster.has_living(*faction));
        let winner = match (survivors.next(), survivors.next()) {
            (Some(faction), None) => Some(faction),
            _ => None,
        };

        Outcome {
            rounds_completed: self.rounds_completed,
            remaining_hit_points: roster.total_hit_points(),
            winner,
        }
    }
}
