#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Rogue adapters.
//!
//! The engine never talks to a terminal directly. Adapters implement
//! [`Presentation`], receive an immutable [`Scene`] every turn, and hand back
//! validated [`Command`] values. [`run_session`] ties the two together.

use anyhow::Result as AnyResult;
use rogue_core::{
    Command, Direction, GameStatus, MonsterKind, MonsterSnapshot, PlayerSnapshot, Position,
    TileKind,
};
use thiserror::Error;

/// Glyph drawn for the player character.
pub const PLAYER_SYMBOL: char = '@';

/// Terminal palette used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// The terminal's default foreground.
    Plain,
    /// Muted gray used for terrain.
    Gray,
    /// Yellow used for the player.
    Yellow,
    /// Blue used for bats and blue slimes.
    Blue,
    /// Green used for zombies and green slimes.
    Green,
}

/// Single styled character cell of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Glyph {
    /// Character drawn in the cell.
    pub symbol: char,
    /// Foreground color.
    pub color: Color,
    /// Whether the glyph is drawn in bold.
    pub bold: bool,
    /// Whether the glyph is drawn dimmed.
    pub dim: bool,
}

impl Glyph {
    /// Creates an unstyled glyph.
    #[must_use]
    pub const fn plain(symbol: char) -> Self {
        Self {
            symbol,
            color: Color::Plain,
            bold: false,
            dim: false,
        }
    }

    /// Glyph used to draw a terrain tile.
    #[must_use]
    pub const fn for_tile(tile: TileKind) -> Self {
        match tile {
            TileKind::DirtWall => Self::plain(tile.symbol()),
            _ => Self {
                symbol: tile.symbol(),
                color: Color::Gray,
                bold: false,
                dim: true,
            },
        }
    }

    /// Glyph used to draw a monster.
    #[must_use]
    pub const fn for_monster(kind: MonsterKind) -> Self {
        let color = match kind {
            MonsterKind::Bat | MonsterKind::BlueSlime => Color::Blue,
            MonsterKind::Zombie | MonsterKind::GreenSlime => Color::Green,
        };
        Self {
            symbol: kind.symbol(),
            color,
            bold: false,
            dim: false,
        }
    }

    /// Glyph used to draw the player.
    #[must_use]
    pub const fn player() -> Self {
        Self {
            symbol: PLAYER_SYMBOL,
            color: Color::Yellow,
            bold: true,
            dim: false,
        }
    }
}

/// Immutable description of everything an adapter draws for one turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    tiles: Vec<Vec<TileKind>>,
    /// Player state shown in the stats panel and on the board.
    pub player: PlayerSnapshot,
    /// Monsters overlaid on the board, in turn order.
    pub monsters: Vec<MonsterSnapshot>,
    /// Whether the session is still running.
    pub status: GameStatus,
}

impl Scene {
    /// Creates a new scene descriptor from rows of terrain.
    #[must_use]
    pub fn new(
        tiles: Vec<Vec<TileKind>>,
        player: PlayerSnapshot,
        monsters: Vec<MonsterSnapshot>,
        status: GameStatus,
    ) -> Self {
        Self {
            tiles,
            player,
            monsters,
            status,
        }
    }

    /// Terrain rows, top to bottom.
    #[must_use]
    pub fn tiles(&self) -> &[Vec<TileKind>] {
        &self.tiles
    }

    /// Composes the board with monster and player glyphs overlaid.
    ///
    /// Terrain is drawn first, then monsters, then the player, so the player
    /// stays visible on a tile shared with a defeated monster.
    #[must_use]
    pub fn board_glyphs(&self) -> Vec<Vec<Glyph>> {
        let mut frame: Vec<Vec<Glyph>> = self
            .tiles
            .iter()
            .map(|row| row.iter().copied().map(Glyph::for_tile).collect())
            .collect();

        for monster in &self.monsters {
            overlay(&mut frame, monster.position, Glyph::for_monster(monster.kind));
        }
        overlay(&mut frame, self.player.position, Glyph::player());
        frame
    }

    /// Text lines of the stats panel.
    #[must_use]
    pub fn stats_lines(&self) -> [String; 5] {
        let player = &self.player;
        let health = player.hit_points.clamp(0, player.max_hit_points.max(0));
        [
            STATS_RULE.to_owned(),
            format!("Score  : {:7}", player.score),
            format!("Health : {health:2} / {}", player.max_hit_points),
            format!("Coins  : {:7}", player.coins),
            STATS_RULE.to_owned(),
        ]
    }
}

const STATS_RULE: &str = "----------------";

fn overlay(frame: &mut [Vec<Glyph>], position: Position, glyph: Glyph) {
    let (Ok(row), Ok(column)) = (
        usize::try_from(position.row()),
        usize::try_from(position.column()),
    ) else {
        return;
    };
    if let Some(cell) = frame.get_mut(row).and_then(|cells| cells.get_mut(column)) {
        *cell = glyph;
    }
}

/// Raised when typed input is not part of the command alphabet.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{input:?} is not a command; use w, a, s, d to move or q to quit")]
pub struct InputRejected {
    /// The rejected input, trimmed.
    pub input: String,
}

/// Translates one line of typed input into a command.
///
/// The alphabet is `w` (north), `a` (west), `s` (south), `d` (east) and `q`
/// (quit). Surrounding whitespace is ignored; anything else is rejected.
pub fn parse_command(input: &str) -> Result<Command, InputRejected> {
    let trimmed = input.trim();
    let direction = match trimmed {
        "w" => Direction::North,
        "a" => Direction::West,
        "s" => Direction::South,
        "d" => Direction::East,
        "q" => return Ok(Command::Quit),
        _ => {
            return Err(InputRejected {
                input: trimmed.to_owned(),
            })
        }
    };
    Ok(Command::Move { direction })
}

/// Port through which the engine reaches the player.
pub trait Presentation {
    /// Draws the provided scene.
    fn render(&mut self, scene: &Scene) -> AnyResult<()>;

    /// Blocks until the player enters a valid command.
    ///
    /// Invalid input is re-prompted inside the adapter and never returned.
    fn next_command(&mut self) -> AnyResult<Command>;

    /// Shows the final scene and the game over notice.
    fn announce_game_over(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Drives the render/input cycle until the session ends.
///
/// `resolve_turn` applies a command to the simulation and returns the scene
/// describing the resulting state. The final scene is returned once its
/// status reports that the session is over.
pub fn run_session<P, F>(
    presentation: &mut P,
    initial: Scene,
    mut resolve_turn: F,
) -> AnyResult<Scene>
where
    P: Presentation + ?Sized,
    F: FnMut(Command) -> AnyResult<Scene>,
{
    let mut scene = initial;
    while !scene.status.is_over() {
        presentation.render(&scene)?;
        let command = presentation.next_command()?;
        scene = resolve_turn(command)?;
    }
    presentation.announce_game_over(&scene)?;
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rogue_core::{MonsterId, OverReason};
    use std::collections::VecDeque;

    fn player_at(position: Position) -> PlayerSnapshot {
        PlayerSnapshot {
            position,
            hit_points: 10,
            max_hit_points: 10,
            base_hit: 1,
            coins: 0,
            score: 0,
        }
    }

    fn floor(rows: usize, columns: usize) -> Vec<Vec<TileKind>> {
        vec![vec![TileKind::DirtFloor; columns]; rows]
    }

    #[test]
    fn glyphs_overlay_monsters_then_player() {
        let scene = Scene::new(
            floor(3, 3),
            player_at(Position::new(1, 1)),
            vec![
                MonsterSnapshot {
                    id: MonsterId::new(0),
                    kind: MonsterKind::Bat,
                    position: Position::new(0, 2),
                    hit_points: 1,
                },
                MonsterSnapshot {
                    id: MonsterId::new(1),
                    kind: MonsterKind::Zombie,
                    position: Position::new(1, 1),
                    hit_points: 0,
                },
            ],
            GameStatus::Running,
        );

        let glyphs = scene.board_glyphs();

        assert_eq!(glyphs[0][2], Glyph::for_monster(MonsterKind::Bat));
        assert_eq!(glyphs[0][2].color, Color::Blue);
        assert_eq!(glyphs[1][1], Glyph::player());
        assert_eq!(glyphs[2][0], Glyph::for_tile(TileKind::DirtFloor));
    }

    #[test]
    fn overlays_outside_the_board_are_skipped() {
        let scene = Scene::new(
            floor(1, 1),
            player_at(Position::new(-1, 4)),
            Vec::new(),
            GameStatus::Running,
        );
        assert_eq!(
            scene.board_glyphs(),
            vec![vec![Glyph::for_tile(TileKind::DirtFloor)]]
        );
    }

    #[test]
    fn stats_panel_caps_displayed_health() {
        let mut player = player_at(Position::new(0, 0));
        player.hit_points = -3;
        player.score = 42;
        player.coins = 7;
        let scene = Scene::new(floor(1, 1), player, Vec::new(), GameStatus::Running);

        let lines = scene.stats_lines();

        assert_eq!(lines[0], "----------------");
        assert_eq!(lines[1], "Score  :      42");
        assert_eq!(lines[2], "Health :  0 / 10");
        assert_eq!(lines[3], "Coins  :       7");
        assert_eq!(lines[4], lines[0]);

        player.hit_points = 14;
        let scene = Scene::new(floor(1, 1), player, Vec::new(), GameStatus::Running);
        assert_eq!(scene.stats_lines()[2], "Health : 10 / 10");
    }

    #[test]
    fn command_alphabet_is_fixed() {
        assert_eq!(
            parse_command("w"),
            Ok(Command::Move {
                direction: Direction::North
            })
        );
        assert_eq!(
            parse_command("a\n"),
            Ok(Command::Move {
                direction: Direction::West
            })
        );
        assert_eq!(
            parse_command(" s "),
            Ok(Command::Move {
                direction: Direction::South
            })
        );
        assert_eq!(
            parse_command("d"),
            Ok(Command::Move {
                direction: Direction::East
            })
        );
        assert_eq!(parse_command("q"), Ok(Command::Quit));

        for rejected in ["", "W", "wd", "x", "+"] {
            assert_eq!(
                parse_command(rejected),
                Err(InputRejected {
                    input: rejected.to_owned()
                })
            );
        }
    }

    #[derive(Default)]
    struct ScriptedPresentation {
        commands: VecDeque<Command>,
        rendered: usize,
        final_scene: Option<Scene>,
    }

    impl Presentation for ScriptedPresentation {
        fn render(&mut self, _scene: &Scene) -> AnyResult<()> {
            self.rendered += 1;
            Ok(())
        }

        fn next_command(&mut self) -> AnyResult<Command> {
            self.commands
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("script exhausted"))
        }

        fn announce_game_over(&mut self, scene: &Scene) -> AnyResult<()> {
            assert!(self.final_scene.is_none(), "announced twice");
            self.final_scene = Some(scene.clone());
            Ok(())
        }
    }

    #[test]
    fn run_session_loops_until_the_scene_reports_over() {
        let mut presentation = ScriptedPresentation {
            commands: VecDeque::from(vec![
                Command::Move {
                    direction: Direction::East,
                },
                Command::Move {
                    direction: Direction::East,
                },
                Command::Quit,
            ]),
            ..ScriptedPresentation::default()
        };
        let initial = Scene::new(
            floor(1, 4),
            player_at(Position::new(0, 0)),
            Vec::new(),
            GameStatus::Running,
        );
        let mut column = 0;

        let last = run_session(&mut presentation, initial, |command| {
            let status = match command {
                Command::Move { .. } => {
                    column += 1;
                    GameStatus::Running
                }
                Command::Quit => GameStatus::Over {
                    reason: OverReason::Quit,
                },
            };
            Ok(Scene::new(
                floor(1, 4),
                player_at(Position::new(0, column)),
                Vec::new(),
                status,
            ))
        })
        .expect("session completes");

        assert_eq!(presentation.rendered, 3);
        assert_eq!(last.player.position, Position::new(0, 2));
        assert_eq!(presentation.final_scene, Some(last));
        assert!(presentation.commands.is_empty());
    }

    #[test]
    fn run_session_surfaces_adapter_failures() {
        let mut presentation = ScriptedPresentation::default();
        let initial = Scene::new(
            floor(1, 1),
            player_at(Position::new(0, 0)),
            Vec::new(),
            GameStatus::Running,
        );

        let result = run_session(&mut presentation, initial.clone(), |_| Ok(initial.clone()));

        assert!(result.is_err());
        assert!(presentation.final_scene.is_none());
    }
}
