//! The board snapshot the engine searches.
//!
//! The engine never mutates a board it is given: [`Board::apply`] exists for
//! callers that hold the authoritative game state.

use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;
use crate::score_rules::Premium;
use crate::solver::Placement;
use crate::{Cursor, Direction, Letter, Position, Table, BOARD_SIZE, CENTER};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Tile {
    pub letter: Letter,
    /// A blank tile standing in for `letter`, worth nothing
    pub is_blank: bool,
    /// The player who put it there, if known
    pub owner: Option<u8>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Square {
    Empty,
    Filled(Tile),
}

impl Square {
    pub fn tile(&self) -> Option<&Tile> {
        match self {
            Square::Filled(tile) => Some(tile),
            Square::Empty => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: Table<Square>,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub fn empty() -> Self {
        Self {
            squares: Table::fill_with(Square::Empty),
        }
    }

    /// The tile at `pos`, None when empty or off the board
    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        self.squares.get(pos)?.tile()
    }

    pub fn square(&self, pos: Position) -> Square {
        self.squares.get(pos).copied().unwrap_or(Square::Empty)
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.tile(pos).is_some()
    }

    pub fn set(&mut self, pos: Position, tile: Tile) {
        self.squares.set(pos, Square::Filled(tile))
    }

    pub fn premium_at(&self, pos: Position) -> Premium {
        Premium::at(pos)
    }

    /// No tile at all: the next play is the first of the game
    pub fn is_empty(&self) -> bool {
        self.squares.iter().all(|(_, sq)| *sq == Square::Empty)
    }

    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }

    /// Every tile with its position, in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = (Position, &Tile)> {
        self.squares.iter().filter_map(|(pos, sq)| Some((pos, sq.tile()?)))
    }

    pub fn has_adjacent_tile(&self, pos: Position) -> bool {
        pos.neighbours().any(|n| self.is_occupied(n))
    }

    /// Empty squares touching a tile, in row-major order
    ///
    /// On an empty board the only anchor is the centre.
    pub fn find_anchors(&self) -> Vec<Position> {
        if self.is_empty() {
            return vec![CENTER];
        }
        self.squares
            .iter()
            .filter(|(pos, sq)| **sq == Square::Empty && self.has_adjacent_tile(*pos))
            .map(|(pos, _)| pos)
            .collect()
    }

    /// First square of the run of tiles going through `pos` along `dir`
    pub fn run_start(&self, pos: Position, dir: Direction) -> Position {
        let mut head = Cursor(pos, dir);
        while self.is_occupied(head.back().0) {
            head = head.back();
        }
        head.0
    }

    /// The letters of the run of tiles going through `pos` along `dir`
    ///
    /// Empty when `pos` itself holds no tile.
    pub fn extract_line(&self, pos: Position, dir: Direction) -> String {
        if !self.is_occupied(pos) {
            return String::new();
        }
        let mut word = String::new();
        let mut head = Cursor(self.run_start(pos, dir), dir);
        while let Some(tile) = self.tile(head.0) {
            word.push(tile.letter.to_char());
            head = head.next();
        }
        word
    }

    /// Puts the tiles of a play on the board
    ///
    /// The placements must lie on a single line and land on empty squares.
    pub fn apply(&mut self, placements: &[Placement], owner: Option<u8>) -> Result<(), EngineError> {
        if Cursor::find_alignment(placements.iter().map(|p| p.pos)).is_none() && !placements.is_empty() {
            return Err(EngineError::Misaligned);
        }
        for p in placements {
            if !p.pos.in_bounds() {
                return Err(EngineError::OffBoard { pos: p.pos });
            }
            if self.is_occupied(p.pos) {
                return Err(EngineError::Occupied { pos: p.pos });
            }
        }
        for p in placements {
            self.set(p.pos, Tile {
                letter: p.letter,
                is_blank: p.is_blank,
                owner,
            });
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = EngineError;

    /// One line per row. Spaces, underscores and dots are empty squares,
    /// lowercase letters are tiles and uppercase letters are blanks standing
    /// for that letter.
    fn from_str(s: &str) -> Result<Board, EngineError> {
        let mut board = Board::empty();
        for (row, line) in s.lines().enumerate() {
            for (col, c) in line.chars().enumerate() {
                let pos = Position { row, col };
                let is_blank = match c {
                    ' ' | '_' | '.' => continue,
                    c if c.is_ascii_lowercase() => false,
                    c if c.is_ascii_uppercase() => true,
                    found => return Err(EngineError::InvalidBoard { row, col, found }),
                };
                if !pos.in_bounds() {
                    return Err(EngineError::OffBoard { pos });
                }
                let letter = Letter(c.to_ascii_lowercase() as u8);
                board.set(pos, Tile { letter, is_blank, owner: None });
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let c = match self.tile(Position { row, col }) {
                    Some(t) if t.is_blank => t.letter.to_char().to_ascii_uppercase(),
                    Some(t) => t.letter.to_char(),
                    None => '.',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn board_with(words: &[(usize, usize, Direction, &str)]) -> Board {
    let mut board = Board::empty();
    for &(row, col, dir, word) in words {
        let mut head = Cursor(Position { row, col }, dir);
        for c in word.chars() {
            board.set(head.0, Tile {
                letter: Letter(c.to_ascii_lowercase() as u8),
                is_blank: c.is_ascii_uppercase(),
                owner: Some(0),
            });
            head = head.next();
        }
    }
    board
}

#[test]
fn anchors_on_empty_board() {
    let board = Board::empty();
    assert!(board.is_empty());
    assert_eq!(board.find_anchors(), vec![CENTER]);
    assert!(!board.has_adjacent_tile(CENTER));
}

#[test]
fn anchors_around_a_word() {
    let board = board_with(&[(7, 6, Direction::Horizontal, "cat")]);
    assert!(!board.is_empty());
    let anchors = board.find_anchors();
    // 3 above, 3 below, one on each end
    assert_eq!(anchors.len(), 8);
    assert!(anchors.contains(&Position::new(7, 5)));
    assert!(anchors.contains(&Position::new(7, 9)));
    assert!(anchors.contains(&Position::new(6, 7)));
    assert!(!anchors.contains(&Position::new(7, 7)));
    assert!(anchors.iter().all(|&p| !board.is_occupied(p) && board.has_adjacent_tile(p)));
}

#[test]
fn extract_lines() {
    let board = board_with(&[
        (7, 6, Direction::Horizontal, "cat"),
        (5, 8, Direction::Vertical, "sit"),
    ]);
    assert_eq!(board.extract_line(Position::new(7, 7), Direction::Horizontal), "cat");
    assert_eq!(board.extract_line(Position::new(7, 8), Direction::Vertical), "sit");
    assert_eq!(board.extract_line(Position::new(7, 7), Direction::Vertical), "a");
    assert_eq!(board.extract_line(Position::new(0, 0), Direction::Vertical), "");
    assert_eq!(board.run_start(Position::new(7, 8), Direction::Horizontal), Position::new(7, 6));
}

#[test]
fn parse_and_apply() {
    let text = "\n\n\n\n\n\n\n......cAt\n";
    let board: Board = text.parse().unwrap();
    let a = board.tile(Position::new(7, 7)).unwrap();
    assert!(a.is_blank);
    assert_eq!(a.letter, Letter(b'a'));
    assert_eq!(board.tile_count(), 3);
    assert!(format!("{}", board).lines().nth(7).unwrap().starts_with("......cAt"));

    assert!(matches!("..#".parse::<Board>(), Err(EngineError::InvalidBoard { row: 0, col: 2, found: '#' })));

    let mut board = board;
    let play = [
        Placement { pos: Position::new(8, 8), letter: Letter(b'o'), is_blank: false },
        Placement { pos: Position::new(9, 8), letter: Letter(b'o'), is_blank: false },
    ];
    board.apply(&play, Some(1)).unwrap();
    assert_eq!(board.extract_line(Position::new(9, 8), Direction::Vertical), "too");
    assert!(matches!(board.apply(&play, None), Err(EngineError::Occupied { .. })));

    let skew = [
        Placement { pos: Position::new(0, 0), letter: Letter(b'o'), is_blank: false },
        Placement { pos: Position::new(1, 1), letter: Letter(b'o'), is_blank: false },
    ];
    assert!(matches!(board.apply(&skew, None), Err(EngineError::Misaligned)));
}
