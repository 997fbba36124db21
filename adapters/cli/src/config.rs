//! Game file configuration loaded from TOML.

use anyhow::{Context, Result};
use rogue_core::MonsterSpawn;
use rogue_system_bootstrap::DEFAULT_ROSTER;
use rogue_world::Config;
use serde::Deserialize;
use std::{fs, path::Path};

/// Settings a player may override through `--config`.
///
/// ```toml
/// seed = 7
///
/// [player]
/// hit_points = 12
/// base_hit = 2
///
/// [[monsters]]
/// kind = "bat"
/// row = 1
/// column = 3
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct GameFile {
    seed: Option<u64>,
    #[serde(default)]
    player: PlayerSection,
    monsters: Option<Vec<MonsterSpawn>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlayerSection {
    hit_points: Option<i32>,
    base_hit: Option<i32>,
}

impl GameFile {
    /// Reads and parses a game file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read game file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse game file {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid game file")
    }

    /// Seed requested by the file, if any.
    pub(crate) fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// World configuration using `seed` and the file's player overrides.
    pub(crate) fn world_config(&self, seed: u64) -> Config {
        let defaults = Config::default();
        Config::new(
            seed,
            self.player
                .hit_points
                .unwrap_or(defaults.player_hit_points()),
            self.player.base_hit.unwrap_or(defaults.player_base_hit()),
        )
    }

    /// Monsters to spawn.
    ///
    /// Without an explicit list the built-in roster is used for the built-in
    /// map, and custom maps start empty.
    pub(crate) fn roster(&self, builtin_map: bool) -> Vec<MonsterSpawn> {
        match &self.monsters {
            Some(monsters) => monsters.clone(),
            None if builtin_map => DEFAULT_ROSTER.to_vec(),
            None => Vec::new(),
        }
    }
}
