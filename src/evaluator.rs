//! Strategic value of a move on top of its points.
//!
//! A hand-tuned linear heuristic: every term is a weight times a simple
//! measure of the move. Changing a default weight changes how the advanced
//! tier plays and is a policy change.

use serde::Deserialize;

use crate::board::Board;
use crate::rack::{Rack, RackTile};
use crate::score_rules::{LetterValues, Premium};
use crate::solver::CandidateMove;
use crate::{Letter, CENTER};

/// Weights of the strategic terms
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Weights {
    /// Leave whose vowel-to-consonant ratio is within `balanced_ratio`, bounds included
    pub balanced_leave: f64,
    pub balanced_ratio: (f64, f64),
    /// Per kept letter worth more than `heavy_letter_value`
    pub heavy_leave_penalty: f64,
    pub heavy_letter_value: u32,
    /// Per kept S
    pub keep_s: f64,
    /// Per kept blank
    pub keep_blank: f64,
    /// Per new tile, times how many steps closer than the board corner it is to the centre
    pub centrality: f64,
    /// Per empty square next to the new tiles, at most one per new tile
    pub hook: f64,
    pub double_word_square: f64,
    pub triple_word_square: f64,
    /// Below this many tiles in the bag, shedding heavy letters pays
    pub endgame_threshold: u32,
    /// Times the value of each heavy letter played in the endgame
    pub endgame_shed: f64,
    /// All seven tiles played
    pub bingo: f64,
    /// Main word of `long_word_len` letters or more
    pub long_word: f64,
    pub long_word_len: usize,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            balanced_leave: 5.0,
            balanced_ratio: (0.3, 0.5),
            heavy_leave_penalty: 2.0,
            heavy_letter_value: 4,
            keep_s: 3.0,
            keep_blank: 5.0,
            centrality: 0.25,
            hook: 1.0,
            double_word_square: 3.0,
            triple_word_square: 5.0,
            endgame_threshold: 20,
            endgame_shed: 0.5,
            bingo: 10.0,
            long_word: 3.0,
            long_word_len: 5,
        }
    }
}

/// The strategic terms of one move, before they are summed
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Breakdown {
    pub leave: f64,
    pub board_control: f64,
    pub defense: f64,
    pub endgame: f64,
    pub length: f64,
}

impl Breakdown {
    pub fn total(&self) -> f64 {
        self.leave + self.board_control + self.defense + self.endgame + self.length
    }
}

#[derive(Debug, Clone)]
pub struct EvaluatedMove {
    pub candidate: CandidateMove,
    pub strategic: f64,
}

impl EvaluatedMove {
    /// Points plus strategic value, the ranking key of the advanced tier
    pub fn combined(&self) -> f64 {
        self.candidate.score as f64 + self.strategic
    }
}

pub struct Evaluator<'a> {
    pub weights: &'a Weights,
    pub values: &'a LetterValues,
}

impl<'a> Evaluator<'a> {
    pub fn new(weights: &'a Weights, values: &'a LetterValues) -> Self {
        Self { weights, values }
    }

    pub fn strategic_score(&self, candidate: &CandidateMove, board: &Board, rack: &Rack, tiles_remaining: u32) -> f64 {
        self.breakdown(candidate, board, rack, tiles_remaining).total()
    }

    pub fn breakdown(&self, candidate: &CandidateMove, board: &Board, rack: &Rack, tiles_remaining: u32) -> Breakdown {
        Breakdown {
            leave: self.leave(&rack.without(&candidate.consumed)),
            board_control: self.board_control(candidate, board),
            defense: self.defense(candidate),
            endgame: self.endgame(candidate, tiles_remaining),
            length: self.length(candidate),
        }
    }

    fn leave(&self, leave: &Rack) -> f64 {
        let w = self.weights;
        let mut score = 0.0;

        let (vowels, consonants) = leave.letter_counts().fold((0u32, 0u32), |(v, c), (l, n)| {
            if l.is_vowel() {
                (v + n as u32, c)
            } else {
                (v, c + n as u32)
            }
        });
        // without consonants there is no ratio to reward
        if consonants > 0 {
            let ratio = vowels as f64 / consonants as f64;
            let (low, high) = w.balanced_ratio;
            if ratio >= low && ratio <= high {
                score += w.balanced_leave;
            }
        }

        for (l, n) in leave.letter_counts() {
            if self.values.value(l) > w.heavy_letter_value {
                score -= w.heavy_leave_penalty * n as f64;
            }
        }

        score += w.keep_s * leave.count(Letter(b's')) as f64;
        score += w.keep_blank * leave.blanks() as f64;
        score
    }

    fn board_control(&self, candidate: &CandidateMove, board: &Board) -> f64 {
        let w = self.weights;
        let placements = &candidate.placements;
        if placements.is_empty() {
            return 0.0;
        }

        // 14 is the distance from a corner to the centre
        let closeness: usize = placements.iter().map(|p| 14 - p.pos.manhattan(CENTER).min(14)).sum();
        let centrality = w.centrality * closeness as f64 / placements.len() as f64;

        let mut open = vec![];
        for p in placements {
            for n in p.pos.neighbours() {
                if !board.is_occupied(n) && !placements.iter().any(|q| q.pos == n) && !open.contains(&n) {
                    open.push(n);
                }
            }
        }
        let hooks = open.len().min(placements.len());

        centrality + w.hook * hooks as f64
    }

    fn defense(&self, candidate: &CandidateMove) -> f64 {
        candidate
            .placements
            .iter()
            .map(|p| match Premium::at(p.pos) {
                Premium::DoubleWord => self.weights.double_word_square,
                Premium::TripleWord => self.weights.triple_word_square,
                _ => 0.0,
            })
            .sum()
    }

    fn endgame(&self, candidate: &CandidateMove, tiles_remaining: u32) -> f64 {
        let w = self.weights;
        if tiles_remaining >= w.endgame_threshold {
            return 0.0;
        }
        let shed: u32 = candidate
            .consumed
            .iter()
            .filter_map(|t| match t {
                RackTile::Letter(l) => Some(self.values.value(*l)),
                RackTile::Blank => None,
            })
            .filter(|&v| v > w.heavy_letter_value)
            .sum();
        w.endgame_shed * shed as f64
    }

    fn length(&self, candidate: &CandidateMove) -> f64 {
        let w = self.weights;
        if candidate.tiles_used() == crate::rack::RACK_SIZE {
            w.bingo
        } else if candidate.word.len() >= w.long_word_len {
            w.long_word
        } else {
            0.0
        }
    }

    /// Scores every candidate, best combined value first
    ///
    /// Ties keep the order of `candidates`.
    pub fn rank(&self, candidates: Vec<CandidateMove>, board: &Board, rack: &Rack, tiles_remaining: u32) -> Vec<EvaluatedMove> {
        let mut evaluated: Vec<_> = candidates
            .into_iter()
            .map(|candidate| {
                let strategic = self.strategic_score(&candidate, board, rack, tiles_remaining);
                EvaluatedMove { candidate, strategic }
            })
            .collect();
        evaluated.sort_by(|a, b| b.combined().total_cmp(&a.combined()));
        evaluated
    }
}

#[cfg(test)]
fn candidate(tiles: &[(usize, usize, u8)], word: &str, rack_tiles: &str) -> CandidateMove {
    use crate::solver::Placement;
    let rack: Rack = rack_tiles.parse().unwrap();
    CandidateMove {
        placements: tiles
            .iter()
            .map(|&(row, col, l)| Placement { pos: crate::Position::new(row, col), letter: Letter(l), is_blank: false })
            .collect(),
        anchor: CENTER,
        direction: crate::Direction::Horizontal,
        word: word.to_owned(),
        score: 10,
        consumed: rack.tiles(),
    }
}

#[test]
fn leave_terms() {
    let weights = Weights::default();
    let values = LetterValues::english();
    let eval = Evaluator::new(&weights, &values);

    // keeps a, e, r, t, s*: 2 vowels for 3 consonants is too many vowels
    let rack: Rack = "caerts*".parse().unwrap();
    let m = candidate(&[(7, 7, b'c')], "c", "c");
    let b = eval.breakdown(&m, &Board::empty(), &rack, 80);
    assert_eq!(b.leave, 3.0 + 5.0);

    // keeps a, r, t, s*: 1 vowel for 3 consonants is balanced
    let rack: Rack = "caerts*".parse().unwrap();
    let m = candidate(&[(7, 7, b'c'), (7, 8, b'e')], "ce", "ce");
    let b = eval.breakdown(&m, &Board::empty(), &rack, 80);
    assert_eq!(b.leave, 5.0 + 3.0 + 5.0);

    // keeps q and z: no vowel, two heavy letters
    let rack: Rack = "qzae".parse().unwrap();
    let m = candidate(&[(7, 7, b'a'), (7, 8, b'e')], "ae", "ae");
    let b = eval.breakdown(&m, &Board::empty(), &rack, 80);
    assert_eq!(b.leave, -4.0);
}

#[test]
fn leave_ratio_bounds() {
    let weights = Weights::default();
    let values = LetterValues::english();
    let eval = Evaluator::new(&weights, &values);
    let leave = |letters: &str| {
        let tiles = letters.bytes().map(|b| RackTile::Letter(Letter(b)));
        eval.leave(&Rack::from_tiles(tiles))
    };

    // 3 vowels for 10 consonants sits on the lower bound, 2 for 7 is under it
    assert_eq!(leave("aeibcdfghlmnp"), 5.0);
    assert_eq!(leave("aebcdfghl"), 0.0);
    // 1 vowel for 2 consonants sits on the upper bound, 4 for 7 is over it
    assert_eq!(leave("abc"), 5.0);
    assert_eq!(leave("aeiobcdfghl"), 0.0);
    // 1 for 3 is inside, 1 for 4 is not
    assert_eq!(leave("abcd"), 5.0);
    assert_eq!(leave("abcdg"), 0.0);
    // 2 for 3 is over, only the x costs
    assert_eq!(leave("aertx"), -2.0);
    // no consonant, no ratio
    assert_eq!(leave("ae"), 0.0);
    assert_eq!(leave(""), 0.0);

    // the range comes from the weights
    let weights = Weights {
        balanced_ratio: (0.25, 0.25),
        ..Weights::default()
    };
    let eval = Evaluator::new(&weights, &values);
    let tiles = "abcdg".bytes().map(|b| RackTile::Letter(Letter(b)));
    assert_eq!(eval.leave(&Rack::from_tiles(tiles)), 5.0);
}

#[test]
fn board_and_defense_terms() {
    let weights = Weights::default();
    let values = LetterValues::english();
    let eval = Evaluator::new(&weights, &values);
    let board = Board::empty();

    // on the centre: full closeness, 4 open squares but a single tile -> 1 hook
    let m = candidate(&[(7, 7, b'a')], "a", "a");
    let b = eval.breakdown(&m, &board, &"a".parse().unwrap(), 80);
    assert_eq!(b.board_control, 0.25 * 14.0 + 1.0);
    assert_eq!(b.defense, 0.0);

    // corner triple word and 1,1 double word
    let m = candidate(&[(0, 0, b'a'), (1, 1, b'b')], "ab", "ab");
    let b = eval.breakdown(&m, &board, &"ab".parse().unwrap(), 80);
    assert_eq!(b.defense, 5.0 + 3.0);
}

#[test]
fn endgame_and_length_terms() {
    let weights = Weights::default();
    let values = LetterValues::english();
    let eval = Evaluator::new(&weights, &values);
    let board = Board::empty();
    let rack: Rack = "quizest".parse().unwrap();

    let m = candidate(&[(7, 5, b'q'), (7, 6, b'u'), (7, 7, b'i'), (7, 8, b'z')], "quiz", "quiz");
    assert_eq!(eval.breakdown(&m, &board, &rack, 50).endgame, 0.0);
    // q and z are heavy: (10 + 10) / 2
    assert_eq!(eval.breakdown(&m, &board, &rack, 10).endgame, 10.0);
    assert_eq!(eval.breakdown(&m, &board, &rack, 10).length, 0.0);

    let m = candidate(&[(7, 5, b'q'), (7, 6, b'u'), (7, 7, b'i'), (7, 8, b'z'), (7, 9, b'e')], "quize", "quize");
    assert_eq!(eval.breakdown(&m, &board, &rack, 50).length, 3.0);

    let all: Vec<_> = (0..7).map(|c| (7, 4 + c, b"quizest"[c])).collect();
    let m = candidate(&all, "quizest", "quizest");
    assert_eq!(eval.breakdown(&m, &board, &rack, 50).length, 10.0);
}

#[test]
fn rank_orders_by_combined_value() {
    let weights = Weights::default();
    let values = LetterValues::english();
    let eval = Evaluator::new(&weights, &values);
    let rack: Rack = "qs".parse().unwrap();

    // same points, but the first keeps the q and the second keeps the s
    let keeps_q = candidate(&[(7, 7, b's')], "s", "s");
    let keeps_s = candidate(&[(7, 7, b'q')], "q", "q");
    let ranked = eval.rank(vec![keeps_q, keeps_s], &Board::empty(), &rack, 80);
    assert_eq!(ranked[0].candidate.word, "q");
    assert!(ranked[0].combined() > ranked[1].combined());
}
