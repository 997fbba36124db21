//! Tile board owned by the world for the duration of a level.

use std::fmt;

use rogue_core::{InvalidAction, MapError, Position, TileKind, WorldError};

/// Fixed-size grid of tiles addressed by [`Position`].
///
/// The visibility and passability masks are derived from the tiles when the
/// board is built and are rewritten together with a tile whenever that tile
/// is replaced, so they never drift from the cell they describe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    rows: u32,
    columns: u32,
    tiles: Vec<TileKind>,
    clear_view: Vec<bool>,
    passable: Vec<bool>,
    up_stairs: Position,
    down_stairs: Position,
}

impl Board {
    /// Builds a board from rectangular map text.
    ///
    /// Every character maps to a tile through [`TileKind::from_symbol`].
    /// Rows must share a width, and exactly one up and one down staircase
    /// must be present.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let lines: Vec<&str> = text.lines().collect();
        let Some(first) = lines.first() else {
            return Err(MapError::Empty);
        };
        let width = first.chars().count();
        if width == 0 {
            return Err(MapError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * lines.len());
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(MapError::JaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }

            for (column, symbol) in line.chars().enumerate() {
                let tile = TileKind::from_symbol(symbol).ok_or(MapError::UnknownSymbol {
                    symbol,
                    row,
                    column,
                })?;
                tiles.push(tile);
            }
        }

        let rows = u32::try_from(lines.len()).map_err(|_| MapError::Empty)?;
        let columns = u32::try_from(width).map_err(|_| MapError::Empty)?;
        Self::from_tiles(rows, columns, tiles)
    }

    /// Builds a board from row-major tiles.
    pub fn from_tiles(rows: u32, columns: u32, tiles: Vec<TileKind>) -> Result<Self, MapError> {
        let expected = usize::try_from(u64::from(rows) * u64::from(columns)).unwrap_or(0);
        if expected == 0 {
            return Err(MapError::Empty);
        }
        if tiles.len() != expected {
            let width = usize::try_from(columns).unwrap_or(usize::MAX);
            return Err(MapError::JaggedRow {
                row: tiles.len() / width.max(1),
                expected: width,
                found: tiles.len() % width.max(1),
            });
        }

        let up_stairs = locate_single(&tiles, columns, TileKind::UpStairs)?;
        let down_stairs = locate_single(&tiles, columns, TileKind::DownStairs)?;
        let clear_view = tiles.iter().map(|tile| tile.is_clear_view()).collect();
        let passable = tiles.iter().map(|tile| tile.is_passable()).collect();

        Ok(Self {
            rows,
            columns,
            tiles,
            clear_view,
            passable,
            up_stairs,
            down_stairs,
        })
    }

    /// Number of rows on the board.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns on the board.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Location of the single up staircase.
    #[must_use]
    pub const fn up_stairs(&self) -> Position {
        self.up_stairs
    }

    /// Location of the single down staircase.
    #[must_use]
    pub const fn down_stairs(&self) -> Position {
        self.down_stairs
    }

    /// Reports whether the position lies on the board.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.offset(position).is_some()
    }

    /// Tile stored at the provided position.
    pub fn get(&self, position: Position) -> Result<TileKind, WorldError> {
        let index = self.index(position)?;
        Ok(self.tiles[index])
    }

    /// Replaces the tile stored at the provided position.
    ///
    /// Replacements that would add or remove a staircase are refused so the
    /// one-up, one-down invariant holds for the board's whole life.
    pub fn set(&mut self, position: Position, tile: TileKind) -> Result<(), WorldError> {
        let index = self.index(position)?;
        let current = self.tiles[index];
        if current != tile && (current.is_stairs() || tile.is_stairs()) {
            return Err(MapError::StairOverwrite { position }.into());
        }
        self.store(index, tile);
        Ok(())
    }

    /// Reports whether entities may enter the tile at the provided position.
    pub fn is_passable(&self, position: Position) -> Result<bool, WorldError> {
        let index = self.index(position)?;
        Ok(self.passable[index])
    }

    /// Reports whether the tile at the provided position lets sight through.
    pub fn is_clear_view(&self, position: Position) -> Result<bool, WorldError> {
        let index = self.index(position)?;
        Ok(self.clear_view[index])
    }

    /// Opens the tile at the provided position, returning its replacement.
    ///
    /// Fails with [`InvalidAction::NotOpenable`] unless the tile is openable,
    /// which makes a second opening of the same door an error rather than a
    /// repeated mutation.
    pub fn open(&mut self, position: Position) -> Result<TileKind, WorldError> {
        let index = self.index(position)?;
        let tile = self.tiles[index];
        let opened = tile
            .opened()
            .ok_or(InvalidAction::NotOpenable { position, tile })?;
        self.store(index, opened);
        Ok(opened)
    }

    /// Iterator over every row of tiles, top to bottom.
    pub fn tile_rows(&self) -> impl Iterator<Item = &[TileKind]> {
        let width = usize::try_from(self.columns).unwrap_or(usize::MAX).max(1);
        self.tiles.chunks(width)
    }

    fn store(&mut self, index: usize, tile: TileKind) {
        self.tiles[index] = tile;
        self.clear_view[index] = tile.is_clear_view();
        self.passable[index] = tile.is_passable();
    }

    fn index(&self, position: Position) -> Result<usize, WorldError> {
        self.offset(position).ok_or(WorldError::OutOfBounds {
            position,
            rows: self.rows,
            columns: self.columns,
        })
    }

    fn offset(&self, position: Position) -> Option<usize> {
        let row = u32::try_from(position.row()).ok()?;
        let column = u32::try_from(position.column()).ok()?;
        if row >= self.rows || column >= self.columns {
            return None;
        }
        let row = usize::try_from(row).ok()?;
        let column = usize::try_from(column).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, tiles) in self.tile_rows().enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for tile in tiles {
                write!(f, "{}", tile.symbol())?;
            }
        }
        Ok(())
    }
}

fn locate_single(tiles: &[TileKind], columns: u32, kind: TileKind) -> Result<Position, MapError> {
    let mut found = tiles
        .iter()
        .enumerate()
        .filter(|(_, tile)| **tile == kind)
        .map(|(index, _)| index);

    match (found.next(), found.next()) {
        (Some(index), None) => Ok(position_of(index, columns)),
        (None, _) => Err(MapError::StairCount { kind, found: 0 }),
        (Some(_), Some(_)) => Err(MapError::StairCount {
            kind,
            found: tiles.iter().filter(|tile| **tile == kind).count(),
        }),
    }
}

fn position_of(index: usize, columns: u32) -> Position {
    let width = usize::try_from(columns).unwrap_or(usize::MAX).max(1);
    let row = i32::try_from(index / width).unwrap_or(i32::MAX);
    let column = i32::try_from(index % width).unwrap_or(i32::MAX);
    Position::new(row, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAMBER: &str = "\
#######
#<..+.#
#.....#
#....>#
#######";

    fn chamber() -> Board {
        Board::parse(CHAMBER).expect("chamber map is valid")
    }

    #[test]
    fn parse_locates_stairs_and_extent() {
        let board = chamber();
        assert_eq!(board.rows(), 5);
        assert_eq!(board.columns(), 7);
        assert_eq!(board.up_stairs(), Position::new(1, 1));
        assert_eq!(board.down_stairs(), Position::new(3, 5));
    }

    #[test]
    fn out_of_range_positions_are_errors() {
        let board = chamber();
        for position in [
            Position::new(-1, 0),
            Position::new(0, -1),
            Position::new(5, 0),
            Position::new(0, 7),
            Position::new(12, 40),
        ] {
            let expected = WorldError::OutOfBounds {
                position,
                rows: 5,
                columns: 7,
            };
            assert_eq!(board.get(position), Err(expected.clone()));
            assert_eq!(board.is_passable(position), Err(expected.clone()));
            assert_eq!(board.is_clear_view(position), Err(expected));
            assert!(!board.contains(position));
        }
    }

    #[test]
    fn set_out_of_range_leaves_board_untouched() {
        let mut board = chamber();
        let before = board.clone();
        assert!(matches!(
            board.set(Position::new(9, 9), TileKind::DirtFloor),
            Err(WorldError::OutOfBounds { .. })
        ));
        assert_eq!(board, before);
    }

    #[test]
    fn masks_follow_tile_replacement() {
        let mut board = chamber();
        let cell = Position::new(2, 2);
        assert_eq!(board.is_passable(cell), Ok(true));

        board.set(cell, TileKind::StoneWall).expect("in range");

        assert_eq!(board.get(cell), Ok(TileKind::StoneWall));
        assert_eq!(board.is_passable(cell), Ok(false));
        assert_eq!(board.is_clear_view(cell), Ok(false));
    }

    #[test]
    fn set_refuses_to_move_stairs() {
        let mut board = chamber();
        let stairs = board.up_stairs();
        assert_eq!(
            board.set(stairs, TileKind::DirtFloor),
            Err(WorldError::MapInvariant(MapError::StairOverwrite {
                position: stairs
            }))
        );
        assert!(board.set(Position::new(2, 2), TileKind::UpStairs).is_err());
        assert_eq!(board.set(stairs, TileKind::UpStairs), Ok(()));
    }

    #[test]
    fn opening_a_door_is_one_way() {
        let mut board = chamber();
        let door = Position::new(1, 4);
        assert_eq!(board.is_passable(door), Ok(false));

        assert_eq!(board.open(door), Ok(TileKind::DirtFloor));
        let once = board.clone();
        assert_eq!(board.is_passable(door), Ok(true));
        assert_eq!(board.is_clear_view(door), Ok(true));

        assert_eq!(
            board.open(door),
            Err(WorldError::InvalidAction(InvalidAction::NotOpenable {
                position: door,
                tile: TileKind::DirtFloor,
            }))
        );
        assert_eq!(board, once);
    }

    #[test]
    fn opening_a_wall_is_rejected() {
        let mut board = chamber();
        assert!(matches!(
            board.open(Position::new(0, 0)),
            Err(WorldError::InvalidAction(InvalidAction::NotOpenable { .. }))
        ));
    }

    #[test]
    fn display_reproduces_map_text() {
        let text = " #### \n#<..>#\n#.+..#\n ####.";
        let board = Board::parse(text).expect("valid");
        assert_eq!(board.to_string(), text);
    }

    #[test]
    fn unknown_symbols_are_rejected() {
        assert_eq!(
            Board::parse("<.>\n.X."),
            Err(MapError::UnknownSymbol {
                symbol: 'X',
                row: 1,
                column: 1,
            })
        );
    }

    #[test]
    fn jagged_rows_are_rejected() {
        assert_eq!(
            Board::parse("<..>\n..\n...."),
            Err(MapError::JaggedRow {
                row: 1,
                expected: 4,
                found: 2,
            })
        );
    }

    #[test]
    fn empty_maps_are_rejected() {
        assert_eq!(Board::parse(""), Err(MapError::Empty));
    }

    #[test]
    fn stairs_must_be_unique() {
        assert_eq!(
            Board::parse("...\n.>."),
            Err(MapError::StairCount {
                kind: TileKind::UpStairs,
                found: 0,
            })
        );
        assert_eq!(
            Board::parse("<<.\n.>."),
            Err(MapError::StairCount {
                kind: TileKind::UpStairs,
                found: 2,
            })
        );
        assert_eq!(
            Board::parse("<>.\n.>."),
            Err(MapError::StairCount {
                kind: TileKind::DownStairs,
                found: 2,
            })
        );
    }
}
