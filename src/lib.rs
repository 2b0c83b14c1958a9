//! Move generation engine for a 15x15 crossword tile game.
//!
//! The pieces, from the bottom up:
//! - [`lexicon`]: the word list, stored as an fst prefix automaton
//! - [`board`]: the grid snapshot, premium overlay and anchor geometry
//! - [`solver`]: enumerates every legal placement for a rack and scores it
//! - [`evaluator`]: strategic adjustments on top of the raw score
//! - [`policy`]: picks play / exchange / pass per difficulty tier
//!
//! [`Engine::generate_decision`] is the single entry point for callers.

pub mod board;
pub mod error;
pub mod evaluator;
pub mod lexicon;
pub mod policy;
pub mod rack;
pub mod score_rules;
pub mod settings;
pub mod solver;

use std::fmt;

pub const BOARD_SIZE: usize = 15;

/// The centre square, where the first word of the game must go
pub const CENTER: Position = Position { row: 7, col: 7 };

pub use board::{Board, Square, Tile};
pub use error::EngineError;
pub use evaluator::{EvaluatedMove, Evaluator, Weights};
pub use lexicon::{Lexicon, LexiconBuilder, LexiconNode};
pub use policy::{Decision, DecisionRequest, Difficulty, Engine};
pub use rack::{Rack, RackTile};
pub use score_rules::{Bonus, LetterValues, Premium, ScoreRules};
pub use settings::Settings;
pub use solver::{CandidateMove, Placement, SearchConfig};

// letters are stored as lowercase ascii bytes
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Letter(pub u8);

impl Letter {
    pub fn from_char(c: char) -> Option<Letter> {
        if c.is_ascii_alphabetic() {
            Some(Letter(c.to_ascii_lowercase() as u8))
        } else {
            None
        }
    }

    /// Position in the alphabet, `a` is 0
    ///
    /// Anything before `a` maps past the end of the alphabet rather than wrapping.
    pub fn index(self) -> usize {
        self.0.checked_sub(b'a').map_or(usize::MAX, usize::from)
    }

    pub fn from_index(i: usize) -> Letter {
        Letter(b'a' + i as u8)
    }

    pub fn to_char(self) -> char {
        self.0 as char
    }

    pub fn is_vowel(self) -> bool {
        matches!(self.0, b'a' | b'e' | b'i' | b'o' | b'u')
    }

    pub fn alphabet() -> impl Iterator<Item = Letter> {
        (b'a'..=b'z').map(Letter)
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", (self.0 as char).escape_default())
    }
}
impl fmt::Debug for Letter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    pub const BOTH: [Direction; 2] = [Direction::Horizontal, Direction::Vertical];

    pub fn perp(self) -> Self {
        match self {
            Self::Vertical => Self::Horizontal,
            Self::Horizontal => Self::Vertical,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    pub fn manhattan(self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// The orthogonal neighbours that are on the board
    pub fn neighbours(self) -> impl Iterator<Item = Position> {
        Direction::BOTH
            .into_iter()
            .flat_map(move |dir| {
                let cursor = Cursor(self, dir);
                [cursor.back().0, cursor.next().0]
            })
            .filter(|p| p.in_bounds())
    }
}

impl std::ops::Index<Direction> for Position {
    type Output = usize;
    /// The coordinate that changes in that direction
    fn index(&self, dir: Direction) -> &Self::Output {
        match dir {
            Direction::Vertical => &self.row,
            Direction::Horizontal => &self.col,
        }
    }
}

impl std::ops::IndexMut<Direction> for Position {
    /// The coordinate that changes in that direction
    fn index_mut(&mut self, dir: Direction) -> &mut Self::Output {
        match dir {
            Direction::Vertical => &mut self.row,
            Direction::Horizontal => &mut self.col,
        }
    }
}

/// A position walking along a direction
///
/// Stepping back from the first row/column wraps to `usize::MAX`, which every
/// table lookup treats as off the board.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(pub Position, pub Direction);

impl Cursor {
    pub fn next(mut self) -> Self {
        self.0[self.1] = self.0[self.1].saturating_add(1);
        self
    }

    pub fn back(mut self) -> Self {
        self.0[self.1] = self.0[self.1].wrapping_sub(1);
        self
    }

    /// A cursor at the same position, but different direction
    pub fn perp(self) -> Self {
        Self(self.0, self.1.perp())
    }

    /// Tries to find the first position on the line formed by the given `positions`
    ///
    /// None if `positions` is empty or if contains at least 2 positions that are not on the same row/column
    ///
    /// Some(Err(p)) if `positions` contains only `p`
    pub fn find_alignment(positions: impl IntoIterator<Item = Position>) -> Option<Result<Cursor, Position>> {
        let mut iter = positions.into_iter();
        let first = iter.next()?;
        let second = loop {
            let tmp = iter.next();
            if tmp != Some(first) {
                break tmp;
            }
        };
        let second = if let Some(s) = second { s } else { return Some(Err(first)) };
        let dir = if second.row == first.row {
            Direction::Horizontal
        } else if second.col == first.col {
            Direction::Vertical
        } else {
            return None;
        };
        let mut start = first;
        start[dir] = start[dir].min(second[dir]);

        for new in iter {
            if new[dir.perp()] != start[dir.perp()] {
                return None;
            }
            start[dir] = start[dir].min(new[dir])
        }
        Some(Ok(Cursor(start, dir)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table<T> {
    squares: Vec<Vec<T>>,
}

impl<T> Table<T> {
    pub fn fill_with(el: T) -> Self
    where
        T: Clone,
    {
        Self {
            squares: vec![vec![el; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    pub fn get(&self, pos: Position) -> Option<&T> {
        self.squares.get(pos.row)?.get(pos.col)
    }
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut T> {
        self.squares.get_mut(pos.row)?.get_mut(pos.col)
    }
    pub fn set(&mut self, pos: Position, val: T) {
        self.squares[pos.row][pos.col] = val
    }

    /// Every cell in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> {
        self.squares.iter().enumerate().flat_map(|(row, line)| {
            line.iter()
                .enumerate()
                .map(move |(col, el)| (Position { row, col }, el))
        })
    }
}

#[test]
fn test_alignement() {
    let p1 = Position { row: 3, col: 4 };
    let p2 = Position { row: 4, col: 4 };
    let p3 = Position { row: 8, col: 4 };
    let p4 = Position { row: 3, col: 6 };

    assert_eq!(Cursor::find_alignment(vec![]), None);
    assert_eq!(Cursor::find_alignment(vec![p1]), Some(Err(p1)));
    assert_eq!(Cursor::find_alignment(vec![p1, p1]), Some(Err(p1)));
    assert_eq!(
        Cursor::find_alignment(vec![p2, p1, p3]),
        Some(Ok(Cursor(p1, Direction::Vertical))),
    );
    assert_eq!(
        Cursor::find_alignment(vec![p3, p2]),
        Some(Ok(Cursor(p2, Direction::Vertical))),
    );
    assert_eq!(
        Cursor::find_alignment(vec![p1, p4]),
        Some(Ok(Cursor(p1, Direction::Horizontal))),
    );
    assert_eq!(Cursor::find_alignment(vec![p2, p4]), None);
    assert_eq!(Cursor::find_alignment(vec![p1, p2, p4]), None);
}

#[test]
fn test_neighbours() {
    let corner: Vec<_> = Position::new(0, 0).neighbours().collect();
    assert_eq!(corner.len(), 2);
    assert!(corner.contains(&Position::new(0, 1)));
    assert!(corner.contains(&Position::new(1, 0)));

    assert_eq!(Position::new(7, 7).neighbours().count(), 4);
    assert_eq!(Position::new(0, 7).manhattan(CENTER), 7);
}

#[test]
fn letter_index() {
    assert_eq!(Letter(b'a').index(), 0);
    assert_eq!(Letter(b'z').index(), 25);
    assert!(Letter(b'{').index() >= 26);
    assert!(Letter(b'A').index() >= 26);
    assert!(Letter(b'#').index() >= 26);
    assert!(Letter(0).index() >= 26);
}
