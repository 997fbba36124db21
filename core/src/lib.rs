#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rogue engine.
//!
//! This crate defines the message surface that connects adapters and the
//! authoritative world. Adapters submit [`Command`] values describing the
//! player's intent, the world resolves one full turn per command via its
//! `apply` entry point, and then reports [`Event`] values describing every
//! mutation that happened during the turn. Adapters only ever observe the
//! world through immutable snapshots.

use std::{fmt, ops::Add};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Rogue.";

/// Location of a single board cell expressed as row and column coordinates.
///
/// Coordinates are signed so that offsets can walk off the board; whether a
/// position lies on the board is decided by the board, not by the type.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    row: i32,
    column: i32,
}

impl Position {
    /// Creates a new board position.
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index, increasing downwards.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index, increasing to the right.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Position reached by taking a single step in the provided direction.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        self + direction.offset()
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, offset: Position) -> Position {
        Position::new(self.row + offset.row, self.column + offset.column)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Cardinal movement directions available to every entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All cardinal directions in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit offset applied to a position when stepping in this direction.
    #[must_use]
    pub const fn offset(self) -> Position {
        match self {
            Self::North => Position::new(-1, 0),
            Self::East => Position::new(0, 1),
            Self::South => Position::new(1, 0),
            Self::West => Position::new(0, -1),
        }
    }
}

/// Commands that express every action the player may take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Attempts to move, attack, or open a door in the given direction.
    Move {
        /// Direction the player acts towards.
        direction: Direction,
    },
    /// Ends the session immediately.
    Quit,
}

/// Lifecycle of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// The session accepts further commands.
    Running,
    /// The session has ended; no further turns are resolved.
    Over {
        /// Why the session ended.
        reason: OverReason,
    },
}

impl GameStatus {
    /// Reports whether the session reached its terminal state.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        matches!(self, Self::Over { .. })
    }
}

/// Terminal conditions that end a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverReason {
    /// The player issued the quit command.
    Quit,
    /// The player's hit points dropped to zero or below.
    Defeated,
}

/// Events broadcast by the world after resolving a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The player moved between two tiles.
    PlayerMoved {
        /// Tile occupied before the move.
        from: Position,
        /// Tile occupied after the move.
        to: Position,
    },
    /// The player's action ran into an impassable or off-board tile.
    PlayerBlocked {
        /// Tile the player tried to enter.
        target: Position,
    },
    /// The player opened a door, spending the turn.
    DoorOpened {
        /// Tile that held the door.
        position: Position,
    },
    /// The player stepped onto a staircase.
    StairsReached {
        /// Tile holding the staircase.
        position: Position,
        /// Level change carried by the staircase.
        level_delta: i8,
    },
    /// The player hit a monster.
    PlayerStruck {
        /// Monster that was hit.
        monster: MonsterId,
        /// Damage dealt.
        damage: i32,
        /// Monster hit points left after the hit.
        remaining: i32,
    },
    /// A defeated monster was removed and its score value credited.
    MonsterSlain {
        /// Monster that was removed.
        monster: MonsterId,
        /// Score credited to the player.
        score: u32,
    },
    /// A monster moved between two tiles.
    MonsterMoved {
        /// Monster that moved.
        monster: MonsterId,
        /// Tile occupied before the move.
        from: Position,
        /// Tile occupied after the move.
        to: Position,
    },
    /// A monster proposed a tile it could not enter.
    MonsterBlocked {
        /// Monster that stayed put.
        monster: MonsterId,
        /// Tile the monster tried to enter.
        target: Position,
    },
    /// A monster hit the player.
    MonsterStruck {
        /// Monster that attacked.
        monster: MonsterId,
        /// Damage dealt.
        damage: i32,
        /// Player hit points left after the hit.
        remaining: i32,
    },
    /// The session reached its terminal state.
    GameOver {
        /// Why the session ended.
        reason: OverReason,
    },
}

bitflags! {
    /// Capability flags carried by every tile variant.
    ///
    /// `BREAKABLE` and `SWIMMABLE` are latent: no tile variant sets them and
    /// the engine never consults them.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TileFlags: u8 {
        /// Entities may move onto the tile.
        const PASSABLE = 1;
        /// The tile can be broken.
        const BREAKABLE = 1 << 1;
        /// The tile can be swum through.
        const SWIMMABLE = 1 << 2;
        /// The tile does not block line of sight.
        const CLEAR_VIEW = 1 << 3;
        /// The tile can be opened, turning it into floor.
        const OPENABLE = 1 << 4;
    }
}

/// Closed set of tile variants a board is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Packed earth or void surrounding the dungeon.
    DirtWall,
    /// Walkable dungeon floor.
    DirtFloor,
    /// Masonry wall.
    StoneWall,
    /// Closed door that opens into floor.
    Door,
    /// Staircase leading one level up.
    UpStairs,
    /// Staircase leading one level down.
    DownStairs,
}

impl TileKind {
    /// Every tile variant in symbol-table order.
    pub const ALL: [TileKind; 6] = [
        TileKind::DirtWall,
        TileKind::DirtFloor,
        TileKind::StoneWall,
        TileKind::Door,
        TileKind::UpStairs,
        TileKind::DownStairs,
    ];

    /// Map-text symbol of the tile.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::DirtWall => ' ',
            Self::DirtFloor => '.',
            Self::StoneWall => '#',
            Self::Door => '+',
            Self::UpStairs => '<',
            Self::DownStairs => '>',
        }
    }

    /// Resolves a map-text symbol into its tile variant.
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.symbol() == symbol)
    }

    /// Capability flags of the tile.
    #[must_use]
    pub const fn flags(self) -> TileFlags {
        match self {
            Self::DirtWall | Self::StoneWall => TileFlags::empty(),
            Self::DirtFloor | Self::UpStairs | Self::DownStairs => {
                TileFlags::PASSABLE.union(TileFlags::CLEAR_VIEW)
            }
            Self::Door => TileFlags::OPENABLE,
        }
    }

    /// Reports whether entities may enter the tile.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        self.flags().contains(TileFlags::PASSABLE)
    }

    /// Reports whether the tile lets sight through.
    #[must_use]
    pub const fn is_clear_view(self) -> bool {
        self.flags().contains(TileFlags::CLEAR_VIEW)
    }

    /// Reports whether the tile can be opened.
    #[must_use]
    pub const fn is_openable(self) -> bool {
        self.flags().contains(TileFlags::OPENABLE)
    }

    /// Tile that replaces this one once opened, if it can be opened at all.
    #[must_use]
    pub const fn opened(self) -> Option<Self> {
        match self {
            Self::Door => Some(Self::DirtFloor),
            _ => None,
        }
    }

    /// Level change carried by staircases.
    #[must_use]
    pub const fn level_delta(self) -> Option<i8> {
        match self {
            Self::UpStairs => Some(1),
            Self::DownStairs => Some(-1),
            _ => None,
        }
    }

    /// Reports whether the tile is a staircase.
    #[must_use]
    pub const fn is_stairs(self) -> bool {
        self.level_delta().is_some()
    }
}

/// Kinds of monsters that inhabit the dungeon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterKind {
    /// Flutters in place, then takes a random step.
    Bat,
    /// Marches in a straight line until something stops it.
    Zombie,
    /// Never moves.
    GreenSlime,
    /// Sways right and left on a fixed rhythm.
    BlueSlime,
}

impl MonsterKind {
    /// Hit points a freshly spawned monster starts with.
    #[must_use]
    pub const fn hit_points(self) -> i32 {
        match self {
            Self::Bat | Self::Zombie | Self::GreenSlime => 1,
            Self::BlueSlime => 2,
        }
    }

    /// Damage dealt to the player per attack.
    #[must_use]
    pub const fn base_hit(self) -> i32 {
        1
    }

    /// Score credited to the player when the monster is slain.
    #[must_use]
    pub const fn score_value(self) -> u32 {
        1
    }

    /// Glyph drawn for the monster.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Bat => 'b',
            Self::Zombie => 'z',
            Self::GreenSlime | Self::BlueSlime => 's',
        }
    }
}

/// Request to place a monster when a level starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterSpawn {
    /// Kind of monster to create.
    pub kind: MonsterKind,
    /// Tile the monster starts on.
    #[serde(flatten)]
    pub position: Position,
}

impl MonsterSpawn {
    /// Creates a new spawn request.
    #[must_use]
    pub const fn new(kind: MonsterKind, position: Position) -> Self {
        Self { kind, position }
    }
}

/// Unique identifier assigned to a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonsterId(u32);

impl MonsterId {
    /// Creates a new monster identifier with the provided numeric value.
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

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Tile currently occupied by the player.
    pub position: Position,
    /// Remaining hit points; may be zero or negative once defeated.
    pub hit_points: i32,
    /// Hit points the player started the session with.
    pub max_hit_points: i32,
    /// Damage dealt per attack.
    pub base_hit: i32,
    /// Coins collected.
    pub coins: u32,
    /// Score accumulated from slain monsters.
    pub score: u32,
}

/// Immutable representation of a single monster's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonsterSnapshot {
    /// Unique identifier assigned to the monster.
    pub id: MonsterId,
    /// Kind of monster.
    pub kind: MonsterKind,
    /// Tile currently occupied by the monster.
    pub position: Position,
    /// Remaining hit points.
    pub hit_points: i32,
}

/// Read-only snapshot describing every monster still on the board.
#[derive(Clone, Debug, Default)]
pub struct MonsterView {
    snapshots: Vec<MonsterSnapshot>,
}

impl MonsterView {
    /// Creates a new monster view, preserving the world's turn order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<MonsterSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Number of monsters captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no monsters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Returns the monster standing on the provided tile, if any.
    #[must_use]
    pub fn at(&self, position: Position) -> Option<&MonsterSnapshot> {
        self.snapshots
            .iter()
            .find(|snapshot| snapshot.position == position)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<MonsterSnapshot> {
        self.snapshots
    }
}

/// Errors reported by the authoritative world.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WorldError {
    /// A coordinate fell outside the board extent.
    #[error("position {position} lies outside the {rows}x{columns} board")]
    OutOfBounds {
        /// Offending position.
        position: Position,
        /// Number of rows on the board.
        rows: u32,
        /// Number of columns on the board.
        columns: u32,
    },
    /// The map or level setup violates a structural invariant.
    #[error(transparent)]
    MapInvariant(#[from] MapError),
    /// The requested action is not valid in the current state.
    #[error(transparent)]
    InvalidAction(#[from] InvalidAction),
    /// The session configuration cannot start a playable game.
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}

/// Player statistics refused when a session starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum ConfigError {
    /// The player would start already defeated.
    #[error("player hit points must be positive, got {hit_points}")]
    NonPositiveHitPoints {
        /// Requested starting hit points.
        hit_points: i32,
    },
    /// The player's attacks would heal monsters.
    #[error("player base hit must not be negative, got {base_hit}")]
    NegativeBaseHit {
        /// Requested damage per attack.
        base_hit: i32,
    },
}

/// Structural problems detected while building a board or level.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MapError {
    /// The map text contained no rows.
    #[error("map is empty")]
    Empty,
    /// A row's length differed from the first row's.
    #[error("row {row} has {found} columns, expected {expected}")]
    JaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// The map text contained a character outside the symbol table.
    #[error("unknown map symbol {symbol:?} at row {row}, column {column}")]
    UnknownSymbol {
        /// Offending character.
        symbol: char,
        /// Zero-based row index.
        row: usize,
        /// Zero-based column index.
        column: usize,
    },
    /// The map did not contain exactly one staircase of the given kind.
    #[error("expected exactly one {kind:?} tile, found {found}")]
    StairCount {
        /// Staircase variant that was miscounted.
        kind: TileKind,
        /// Number of tiles of that kind found.
        found: usize,
    },
    /// A tile replacement would add or remove a staircase.
    #[error("tile at {position} would change the board's staircases")]
    StairOverwrite {
        /// Tile that was targeted.
        position: Position,
    },
    /// The player's start tile cannot be walked on.
    #[error("player start {position} is not passable")]
    BlockedStart {
        /// Requested start tile.
        position: Position,
    },
    /// A monster spawn could not be honoured.
    #[error("cannot place {kind:?} at {position}: {reason}")]
    MonsterPlacement {
        /// Kind of monster requested.
        kind: MonsterKind,
        /// Requested tile.
        position: Position,
        /// Why the placement was refused.
        reason: PlacementError,
    },
}

/// Reasons a monster spawn may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum PlacementError {
    /// The tile lies outside the board.
    #[error("outside the board")]
    OutOfBounds,
    /// The tile cannot be walked on.
    #[error("tile is not passable")]
    Impassable,
    /// The tile is where the player starts.
    #[error("tile is the player's start")]
    PlayerStart,
    /// Another monster already starts on the tile.
    #[error("tile is already occupied")]
    Occupied,
}

/// Actions refused by the world without touching any state.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidAction {
    /// The targeted tile cannot be opened.
    #[error("{tile:?} at {position} cannot be opened")]
    NotOpenable {
        /// Targeted tile.
        position: Position,
        /// Variant found there.
        tile: TileKind,
    },
    /// The session already ended.
    #[error("the session is over")]
    SessionOver,
}
