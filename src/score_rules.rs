use std::collections::HashMap;

use super::{Letter, Position, BOARD_SIZE};

/// Rules that influence the score
#[derive(Debug, Clone)]
pub struct ScoreRules {
    pub values: LetterValues,
    /// The amount of bonus points in case of bingo (aka all seven letters of the rack are played)
    pub bingo_bonus: u32,
    /// Tournament scoring: tiles already on the board and crossing words count too.
    ///
    /// Off by default, only the new tiles of the main line are scored.
    pub standard_scoring: bool,
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self {
            values: LetterValues::english(),
            bingo_bonus: 50,
            standard_scoring: false,
        }
    }
}

/// Face value of each letter, blanks are always worth 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterValues([u32; 26]);

impl LetterValues {
    pub fn english() -> Self {
        Self([
            1, 3, 3, 2, 1, 4, 2, 4, 1, 8, 5, 1, 3, // a..m
            1, 1, 3, 10, 1, 1, 1, 1, 4, 4, 8, 4, 10, // n..z
        ])
    }

    /// English values with some letters overridden
    pub fn with_overrides(overrides: &HashMap<char, u32>) -> Self {
        let mut values = Self::english();
        for (&c, &v) in overrides {
            match Letter::from_char(c) {
                Some(l) => values.0[l.index()] = v,
                None => log::warn!("unrecognized letter for score {:?}", c),
            }
        }
        values
    }

    pub fn value(&self, letter: Letter) -> u32 {
        self.0.get(letter.index()).copied().unwrap_or_else(|| {
            log::warn!("unrecognized letter for score {}", letter);
            0
        })
    }

    pub fn tile_value(&self, letter: Letter, is_blank: bool) -> u32 {
        if is_blank {
            0
        } else {
            self.value(letter)
        }
    }
}

/// Static premium overlay of the board
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Premium {
    Normal,
    Center,
    DoubleLetter,
    TripleLetter,
    DoubleWord,
    TripleWord,
}

pub struct Bonus {
    pub letter: u32,
    pub word: u32,
}

impl Premium {
    pub fn at(position: Position) -> Premium {
        let Position { row, col } = position;

        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            log::error!("index for bonus is out of board");
            return Premium::Normal;
        }

        fn fold_half(a: usize) -> usize {
            if a >= 7 {
                a - 7
            } else {
                7 - a
            }
        }

        // use the fact the bonus are symetrical from center
        let row = fold_half(row);
        let col = fold_half(col);

        match (row, col) {
            (0, 0) => Premium::Center,

            | (7, 0) | (0, 7)
            | (7, 7) => Premium::TripleWord,

            | (1, 1)
            | (4, 0) | (0, 4)
            | (5, 1) | (1, 5)
            | (7, 4) | (4, 7) => Premium::DoubleLetter,

            | (2, 2)
            | (6, 2) | (2, 6) => Premium::TripleLetter,

            (row, col) if row == col => Premium::DoubleWord,

            _ => Premium::Normal,
        }
    }

    /// The centre star doubles the word like any other double word square
    pub fn bonus(self) -> Bonus {
        match self {
            Premium::Normal => Bonus { letter: 1, word: 1 },
            Premium::Center | Premium::DoubleWord => Bonus { letter: 1, word: 2 },
            Premium::TripleWord => Bonus { letter: 1, word: 3 },
            Premium::DoubleLetter => Bonus { letter: 2, word: 1 },
            Premium::TripleLetter => Bonus { letter: 3, word: 1 },
        }
    }
}

#[test]
fn premium_layout() {
    let at = |row, col| Premium::at(Position { row, col });
    assert_eq!(at(7, 7), Premium::Center);
    assert_eq!(at(0, 0), Premium::TripleWord);
    assert_eq!(at(0, 7), Premium::TripleWord);
    assert_eq!(at(14, 14), Premium::TripleWord);
    assert_eq!(at(0, 3), Premium::DoubleLetter);
    assert_eq!(at(6, 6), Premium::DoubleLetter);
    assert_eq!(at(1, 5), Premium::TripleLetter);
    assert_eq!(at(5, 5), Premium::TripleLetter);
    assert_eq!(at(1, 1), Premium::DoubleWord);
    assert_eq!(at(4, 10), Premium::DoubleWord);
    assert_eq!(at(0, 1), Premium::Normal);
    assert_eq!(at(15, 0), Premium::Normal);

    let count = |p| {
        (0..BOARD_SIZE)
            .flat_map(|row| (0..BOARD_SIZE).map(move |col| Position { row, col }))
            .filter(|&pos| Premium::at(pos) == p)
            .count()
    };
    assert_eq!(count(Premium::TripleWord), 8);
    assert_eq!(count(Premium::DoubleWord), 16);
    assert_eq!(count(Premium::TripleLetter), 12);
    assert_eq!(count(Premium::DoubleLetter), 24);
}

#[test]
fn letter_values() {
    let values = LetterValues::english();
    assert_eq!(values.value(Letter(b'q')), 10);
    assert_eq!(values.value(Letter(b'e')), 1);
    assert_eq!(values.tile_value(Letter(b'z'), true), 0);

    let mut overrides = HashMap::new();
    overrides.insert('E', 2);
    overrides.insert('#', 9);
    let values = LetterValues::with_overrides(&overrides);
    assert_eq!(values.value(Letter(b'e')), 2);
    assert_eq!(values.value(Letter(b'a')), 1);
}

#[test]
fn non_letters_are_worth_nothing() {
    let values = LetterValues::english();
    for b in [b'#', b'A', b'*', 0, 255] {
        assert_eq!(values.value(Letter(b)), 0, "{}", b);
        assert_eq!(values.tile_value(Letter(b), false), 0);
    }
}
