#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares a Rogue level.

use rogue_core::{MonsterKind, MonsterSpawn, Position, WorldError};
use rogue_world::{query, Board, Config, World};
use tracing::debug;

/// Map played when no map file is supplied.
pub const DEFAULT_MAP: &str = include_str!("../maps/crypt.txt");

/// Monsters populating [`DEFAULT_MAP`].
pub const DEFAULT_ROSTER: [MonsterSpawn; 8] = [
    MonsterSpawn::new(MonsterKind::Bat, Position::new(1, 3)),
    MonsterSpawn::new(MonsterKind::Zombie, Position::new(3, 7)),
    MonsterSpawn::new(MonsterKind::GreenSlime, Position::new(1, 7)),
    MonsterSpawn::new(MonsterKind::BlueSlime, Position::new(4, 16)),
    MonsterSpawn::new(MonsterKind::Zombie, Position::new(6, 30)),
    MonsterSpawn::new(MonsterKind::Bat, Position::new(2, 35)),
    MonsterSpawn::new(MonsterKind::BlueSlime, Position::new(10, 8)),
    MonsterSpawn::new(MonsterKind::GreenSlime, Position::new(11, 20)),
];

/// Produces the data required to start a session and greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Builds the world for a level described by map text.
    ///
    /// The player starts on the level's up staircase.
    pub fn start_level(
        &self,
        map: &str,
        roster: &[MonsterSpawn],
        config: Config,
    ) -> Result<World, WorldError> {
        let board = Board::parse(map)?;
        let start = board.up_stairs();
        debug!(
            rows = board.rows(),
            columns = board.columns(),
            monsters = roster.len(),
            %start,
            "starting level"
        );
        World::new(board, start, roster, config)
    }
}
