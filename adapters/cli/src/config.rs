//! Battle configuration loaded from TOML and merged with command-line flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use beverage_bandits_core::{AttackPower, AttackPowers, Faction};
use serde::Deserialize;

/// Settings read from a configuration file.
///
/// ```toml
/// round_limit = 500
///
/// [attack_power]
/// elf = 15
/// goblin = 3
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    attack_power: AttackPowers,
    round_limit: Option<u32>,
}

impl FileConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid config file at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }
}

/// Final settings for a run once flags have been applied over the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) powers: AttackPowers,
    pub(crate) round_limit: Option<u32>,
}

impl Settings {
    pub(crate) fn resolve(
        file: FileConfig,
        elf_power: Option<u32>,
        goblin_power: Option<u32>,
        round_limit: Option<u32>,
    ) -> Self {
        let mut powers = file.attack_power;
        if let Some(power) = elf_power {
            powers = powers.with_override(Faction::Elf, AttackPower::new(power));
        }
        if let Some(power) = goblin_power {
            powers = powers.with_override(Faction::Goblin, AttackPower::new(power));
        }

        Self {
            powers,
            round_limit: round_limit.or(file.round_limit),
        }
    }
}
