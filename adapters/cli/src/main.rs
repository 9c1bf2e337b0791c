#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Beverage Bandits battles from layout files.

mod config;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use beverage_bandits_core::Faction;
use beverage_bandits_system_simulation::{Outcome, PowerSearch, Simulation};
use beverage_bandits_world::Layout;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::config::{FileConfig, Settings};

/// Simulates a battle between elves and goblins and reports its outcome.
#[derive(Debug, Parser)]
#[command(name = "beverage-bandits", version, about)]
struct Cli {
    /// Path to the battlefield layout (`#` wall, `.` floor, `E` elf, `G` goblin).
    layout: PathBuf,

    /// TOML file with an `[attack_power]` table and an optional `round_limit`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Attack power for every elf; overrides the config file.
    #[arg(long)]
    elf_power: Option<u32>,

    /// Attack power for every goblin; overrides the config file.
    #[arg(long)]
    goblin_power: Option<u32>,

    /// Stop with an error if combat is still running after this many rounds.
    #[arg(long)]
    round_limit: Option<u32>,

    /// Search for the smallest attack power that wins without losses.
    #[arg(long, value_enum)]
    find_flawless: Option<Side>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Side {
    Elf,
    Goblin,
}

impl From<Side> for Faction {
    fn from(side: Side) -> Self {
        match side {
            Side::Elf => Faction::Elf,
            Side::Goblin => Faction::Goblin,
        }
    }
}

/// Entry point for the Beverage Bandits command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(file, cli.elf_power, cli.goblin_power, cli.round_limit);

    let text = fs::read_to_string(&cli.layout)
        .with_context(|| format!("failed to read layout at {}", cli.layout.display()))?;
    let layout = Layout::parse(&text)
        .with_context(|| format!("invalid layout at {}", cli.layout.display()))?;
    tracing::info!(
        columns = layout.columns(),
        rows = layout.rows(),
        units = layout.spawns().len(),
        "layout loaded"
    );

    match cli.find_flawless {
        Some(side) => {
            let faction = Faction::from(side);
            let mut search = PowerSearch::new(faction).with_base_powers(settings.powers);
            if let Some(limit) = settings.round_limit {
                search = search.with_round_limit(limit);
            }
            let result = search
                .run(&layout)
                .context("flawless attack power search failed")?;
            println!(
                "{} win without losses at attack power {}",
                faction_name(faction),
                result.attack_power.get()
            );
            print_outcome(&result.outcome);
        }
        None => {
            let mut simulation = Simulation::from_layout(&layout, &settings.powers);
            if let Some(limit) = settings.round_limit {
                simulation = simulation.with_round_limit(limit);
            }
            let outcome = simulation.run().context("battle did not finish")?;
            print_outcome(&outcome);
        }
    }

    Ok(())
}

fn print_outcome(outcome: &Outcome) {
    println!("Combat ends after {} full rounds", outcome.rounds_completed);
    match outcome.winner {
        Some(faction) => println!(
            "{} win with {} total hit points left",
            faction_name(faction),
            outcome.remaining_hit_points
        ),
        None => println!("Nobody is left standing"),
    }
    println!(
        "Outcome: {} * {} = {}",
        outcome.rounds_completed,
        outcome.remaining_hit_points,
        outcome.value()
    );
}

fn faction_name(faction: Faction) -> &'static str {
    match faction {
        Faction::Elf => "Elves",
        Faction::Goblin => "Goblins",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_layout_and_overrides() {
        let cli = Cli::try_parse_from([
            "beverage-bandits",
            "battle.txt",
            "--elf-power",
            "15",
            "--round-limit",
            "300",
        ])
        .expect("valid arguments");

        assert_eq!(cli.layout, PathBuf::from("battle.txt"));
        assert_eq!(cli.elf_power, Some(15));
        assert_eq!(cli.goblin_power, None);
        assert_eq!(cli.round_limit, Some(300));
        assert_eq!(cli.find_flawless, None);
    }

    #[test]
    fn parses_flawless_search_side() {
        let cli = Cli::try_parse_from(["beverage-bandits", "battle.txt", "--find-flawless", "elf"])
            .expect("valid arguments");

        assert_eq!(cli.find_flawless, Some(Side::Elf));
        assert_eq!(Faction::from(Side::Goblin), Faction::Goblin);
    }

    #[test]
    fn rejects_unknown_side_and_missing_layout() {
        assert!(Cli::try_parse_from(["beverage-bandits", "battle.txt", "--find-flawless", "orc"])
            .is_err());
        assert!(Cli::try_parse_from(["beverage-bandits"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;

        Cli::command().debug_assert();
    }
}
