#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Rogue.
//!
//! The world exclusively owns the board, the player, and the monster roster
//! for a whole session. The only way to mutate it is [`apply`], which
//! resolves one complete turn per command: the player's action, then every
//! monster's action in roster order, then the termination check.

mod board;
mod monsters;

pub use board::Board;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rogue_core::{
    Command, ConfigError, Direction, Event, GameStatus, InvalidAction, MapError, MonsterId,
    MonsterSpawn,
    OverReason, PlacementError, PlayerSnapshot, Position, WorldError, WELCOME_BANNER,
};
use tracing::{debug, info};

use self::monsters::Monster;

const DEFAULT_SEED: u64 = 0x5eed_0f_d00d;
const DEFAULT_PLAYER_HIT_POINTS: i32 = 10;
const DEFAULT_PLAYER_BASE_HIT: i32 = 1;

/// Tunable parameters applied when a session starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    seed: u64,
    player_hit_points: i32,
    player_base_hit: i32,
}

impl Config {
    /// Creates a configuration with explicit values.
    #[must_use]
    pub const fn new(seed: u64, player_hit_points: i32, player_base_hit: i32) -> Self {
        Self {
            seed,
            player_hit_points,
            player_base_hit,
        }
    }

    /// Seed for the random number generator driving monster movement.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Hit points the player starts with.
    #[must_use]
    pub const fn player_hit_points(&self) -> i32 {
        self.player_hit_points
    }

    /// Damage the player deals per attack.
    #[must_use]
    pub const fn player_base_hit(&self) -> i32 {
        self.player_base_hit
    }

    /// Returns a copy of the configuration using a different seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks that the player starts alive and cannot heal monsters.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.player_hit_points <= 0 {
            return Err(ConfigError::NonPositiveHitPoints {
                hit_points: self.player_hit_points,
            });
        }
        if self.player_base_hit < 0 {
            return Err(ConfigError::NegativeBaseHit {
                base_hit: self.player_base_hit,
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            DEFAULT_SEED,
            DEFAULT_PLAYER_HIT_POINTS,
            DEFAULT_PLAYER_BASE_HIT,
        )
    }
}

/// Represents the authoritative Rogue world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    board: Board,
    player: Player,
    monsters: Vec<Monster>,
    status: GameStatus,
    turn: u64,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a world with the player on the provided start tile.
    ///
    /// The configuration must pass [`Config::validate`]. Every spawn must
    /// name a passable, in-bounds tile distinct from the player's start and
    /// from every other spawn.
    pub fn new(
        board: Board,
        start: Position,
        roster: &[MonsterSpawn],
        config: Config,
    ) -> Result<Self, WorldError> {
        config.validate()?;
        if !board.is_passable(start)? {
            return Err(MapError::BlockedStart { position: start }.into());
        }

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut monsters: Vec<Monster> = Vec::with_capacity(roster.len());
        for (index, spawn) in roster.iter().enumerate() {
            let refuse = |reason| MapError::MonsterPlacement {
                kind: spawn.kind,
                position: spawn.position,
                reason,
            };
            if !board.contains(spawn.position) {
                return Err(refuse(PlacementError::OutOfBounds).into());
            }
            if !board.is_passable(spawn.position)? {
                return Err(refuse(PlacementError::Impassable).into());
            }
            if spawn.position == start {
                return Err(refuse(PlacementError::PlayerStart).into());
            }
            if monsters
                .iter()
                .any(|monster| monster.position == spawn.position)
            {
                return Err(refuse(PlacementError::Occupied).into());
            }

            let id = MonsterId::new(u32::try_from(index).unwrap_or(u32::MAX));
            monsters.push(Monster::spawn(id, spawn.kind, spawn.position, &mut rng));
        }

        Ok(Self {
            banner: WELCOME_BANNER,
            board,
            player: Player::new(start, config.player_hit_points, config.player_base_hit),
            monsters,
            status: GameStatus::Running,
            turn: 0,
            rng,
        })
    }

    fn resolve_player(
        &mut self,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) -> Result<(), WorldError> {
        let from = self.player.position;
        let target = from.step(direction);
        let damage = self.player.base_hit;

        if let Some(index) = self
            .monsters
            .iter()
            .position(|monster| monster.is_alive() && monster.position == target)
        {
            let monster = &mut self.monsters[index];
            let remaining = monster.suffer(damage);
            let id = monster.id;
            debug!(monster = id.get(), damage, remaining, "player strikes");
            out_events.push(Event::PlayerStruck {
                monster: id,
                damage,
                remaining,
            });
            if remaining <= 0 {
                self.move_player(target, out_events);
            }
            return Ok(());
        }

        let Ok(tile) = self.board.get(target) else {
            out_events.push(Event::PlayerBlocked { target });
            return Ok(());
        };

        if tile.is_openable() {
            let opened = self.board.open(target)?;
            debug!(%target, ?opened, "door opened");
            out_events.push(Event::DoorOpened { position: target });
        } else if tile.is_passable() {
            self.move_player(target, out_events);
        } else {
            out_events.push(Event::PlayerBlocked { target });
        }
        Ok(())
    }

    fn move_player(&mut self, to: Position, out_events: &mut Vec<Event>) {
        let from = self.player.position;
        self.player.position = to;
        out_events.push(Event::PlayerMoved { from, to });

        if let Some(level_delta) = self.board.get(to).ok().and_then(|tile| tile.level_delta()) {
            debug!(position = %to, level_delta, "stairs reached");
            out_events.push(Event::StairsReached {
                position: to,
                level_delta,
            });
        }
    }

    fn resolve_monsters(&mut self, out_events: &mut Vec<Event>) {
        let mut index = 0;
        while index < self.monsters.len() {
            if !self.monsters[index].is_alive() {
                let fallen = self.monsters.remove(index);
                let score = fallen.score_value();
                self.player.score = self.player.score.saturating_add(score);
                debug!(monster = fallen.id.get(), score, "monster slain");
                out_events.push(Event::MonsterSlain {
                    monster: fallen.id,
                    score,
                });
                continue;
            }

            if self.player.is_alive() {
                self.resolve_monster(index, out_events);
            }
            index += 1;
        }
    }

    fn resolve_monster(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let proposal = self.monsters[index].propose_move(&mut self.rng);
        let monster = &self.monsters[index];
        let (id, from) = (monster.id, monster.position);

        if proposal == self.player.position {
            let damage = monster.base_hit();
            self.player.hit_points = self.player.hit_points.saturating_sub(damage);
            let remaining = self.player.hit_points;
            debug!(monster = id.get(), damage, remaining, "monster strikes");
            out_events.push(Event::MonsterStruck {
                monster: id,
                damage,
                remaining,
            });
            return;
        }

        if proposal == from {
            return;
        }

        let crowded = self
            .monsters
            .iter()
            .enumerate()
            .any(|(other, monster)| {
                other != index && monster.is_alive() && monster.position == proposal
            });
        let passable = self.board.is_passable(proposal).unwrap_or(false);

        if passable && !crowded {
            self.monsters[index].position = proposal;
            out_events.push(Event::MonsterMoved {
                monster: id,
                from,
                to: proposal,
            });
        } else {
            out_events.push(Event::MonsterBlocked {
                monster: id,
                target: proposal,
            });
        }
    }

    fn finish(&mut self, reason: OverReason, out_events: &mut Vec<Event>) {
        self.status = GameStatus::Over { reason };
        info!(
            ?reason,
            score = self.player.score,
            turns = self.turn,
            "session over"
        );
        out_events.push(Event::GameOver { reason });
    }
}

/// Applies the provided command to the world, resolving one full turn.
///
/// Movement commands resolve the player's action, then every monster's
/// action, then check whether the player survived. Commands submitted after
/// the session ended are refused without touching any state.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<GameStatus, WorldError> {
    if world.status.is_over() {
        return Err(InvalidAction::SessionOver.into());
    }

    match command {
        Command::Quit => world.finish(OverReason::Quit, out_events),
        Command::Move { direction } => {
            world.resolve_player(direction, out_events)?;
            world.turn = world.turn.saturating_add(1);
            world.resolve_monsters(out_events);
            if !world.player.is_alive() {
                world.finish(OverReason::Defeated, out_events);
            }
        }
    }

    Ok(world.status)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Board, World};
    use rogue_core::{GameStatus, MonsterView, PlayerSnapshot};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the board.
    #[must_use]
    pub fn board(world: &World) -> &Board {
        &world.board
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Captures the monsters still on the board, in turn order.
    #[must_use]
    pub fn monster_view(world: &World) -> MonsterView {
        MonsterView::from_snapshots(world.monsters.iter().map(|monster| monster.snapshot()).collect())
    }

    /// Reports whether the session is still running.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Number of movement turns resolved so far.
    #[must_use]
    pub fn turn(world: &World) -> u64 {
        world.turn
    }
}

#[derive(Clone, Debug)]
struct Player {
    position: Position,
    hit_points: i32,
    max_hit_points: i32,
    base_hit: i32,
    coins: u32,
    score: u32,
}

impl Player {
    fn new(position: Position, hit_points: i32, base_hit: i32) -> Self {
        Self {
            position,
            hit_points,
            max_hit_points: hit_points,
            base_hit,
            coins: 0,
            score: 0,
        }
    }

    fn is_alive(&self) -> bool {
        self.hit_points > 0
    }

    fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            hit_points: self.hit_points,
            max_hit_points: self.max_hit_points,
            base_hit: self.base_hit,
            coins: self.coins,
            score: self.score,
        }
    }
}
