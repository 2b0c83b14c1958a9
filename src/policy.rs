//! Turns a board and a rack into a decision: play, exchange or pass.
//!
//! Every request goes `searching -> playing | exchanging | passing`. The
//! [`Engine`] is the only boundary callers see: whatever goes wrong below it,
//! an error or a panic, comes out as [`Decision::Pass`].

use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::Deserialize;

use crate::board::Board;
use crate::error::EngineError;
use crate::evaluator::{EvaluatedMove, Evaluator, Weights};
use crate::lexicon::Lexicon;
use crate::rack::{Rack, RackTile, RACK_SIZE};
use crate::score_rules::LetterValues;
use crate::settings::Settings;
use crate::solver::{self, CandidateMove, Placement, SearchConfig};
use crate::Letter;

/// Fewer tiles than this in the bag and exchanging is not allowed
pub const MIN_BAG_FOR_EXCHANGE: u32 = 7;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Highest raw score
    Basic,
    /// Highest raw plus strategic score, exchanges rather than playing weak moves
    Advanced,
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(Difficulty::Basic),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty {:?}, expected basic or advanced", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Play {
        placements: Vec<Placement>,
        word: String,
        score: u32,
    },
    /// Tiles to put back in the bag
    Exchange { letters: Vec<RackTile> },
    Pass,
}

impl Decision {
    fn play(candidate: CandidateMove) -> Decision {
        Decision::Play {
            placements: candidate.placements,
            word: candidate.word,
            score: candidate.score,
        }
    }
}

/// Everything a decision depends on, owned so it can move to another thread
#[derive(Debug, Clone)]
pub struct DecisionRequest {
    pub board: Board,
    pub rack: Rack,
    pub tiles_remaining: u32,
    pub difficulty: Difficulty,
}

/// Combined score under which the advanced tier would rather exchange
pub fn weak_move_threshold(tiles_remaining: u32) -> f64 {
    if tiles_remaining > 40 {
        15.0
    } else if tiles_remaining > 20 {
        10.0
    } else {
        5.0
    }
}

/// The tiles of `rack` that are hard to place
///
/// Letters worth 8 or more, a Q without a U, and the copies beyond two of a
/// consonant. Blanks are never hard.
pub fn hard_tiles(rack: &Rack, values: &LetterValues) -> Vec<RackTile> {
    let q = Letter(b'q');
    let u = Letter(b'u');

    let mut acc = vec![];
    for (letter, n) in rack.letter_counts() {
        let hard = if values.value(letter) >= 8 || (letter == q && rack.count(u) == 0) {
            n
        } else if !letter.is_vowel() && n > 2 {
            n - 2
        } else {
            0
        };
        acc.extend(std::iter::repeat(RackTile::Letter(letter)).take(hard as usize));
    }
    acc
}

/// Whether an exchange is allowed at all
pub fn can_exchange(rack: &Rack, tiles_remaining: u32) -> bool {
    rack.len() >= 2 && tiles_remaining >= MIN_BAG_FOR_EXCHANGE
}

#[derive(Debug, Clone)]
pub struct Engine {
    lexicon: Arc<Lexicon>,
    search: SearchConfig,
    weights: Weights,
    budget: Duration,
}

impl Engine {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self::from_settings(lexicon, &Settings::default())
    }

    pub fn from_settings(lexicon: Arc<Lexicon>, settings: &Settings) -> Self {
        Self {
            lexicon,
            search: settings.search_config(),
            weights: settings.weights.clone(),
            budget: settings.decision_budget(),
        }
    }

    pub fn with_search_config(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// The time budget configured for [`Engine::generate_decision_within`]
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Every legal move, best raw score first
    pub fn candidates(&self, board: &Board, rack: &Rack) -> Vec<CandidateMove> {
        solver::find_moves(board, rack, &self.lexicon, &self.search)
    }

    /// Every legal move, best combined score first
    pub fn ranked(&self, board: &Board, rack: &Rack, tiles_remaining: u32) -> Vec<EvaluatedMove> {
        self.evaluator().rank(self.candidates(board, rack), board, rack, tiles_remaining)
    }

    fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&self.weights, &self.search.score_rules.values)
    }

    /// Decides what to do with `rack` on `board`
    ///
    /// Never fails: invalid input, an error or a panic in the search all end
    /// up as [`Decision::Pass`].
    pub fn generate_decision(&self, board: &Board, rack: &Rack, tiles_remaining: u32, difficulty: Difficulty) -> Decision {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.decide(board, rack, tiles_remaining, difficulty)));
        match outcome {
            Ok(Ok(decision)) => decision,
            Ok(Err(err)) => {
                log::error!("passing, decision failed: {}", err);
                Decision::Pass
            }
            Err(payload) => {
                let msg = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_owned());
                log::error!("passing, decision panicked: {}", msg);
                Decision::Pass
            }
        }
    }

    pub fn generate_request(&self, request: &DecisionRequest) -> Decision {
        self.generate_decision(&request.board, &request.rack, request.tiles_remaining, request.difficulty)
    }

    /// Independent requests, decided in parallel
    ///
    /// The decisions are in the order of `requests`.
    pub fn generate_decisions(&self, requests: &[DecisionRequest]) -> Vec<Decision> {
        requests.par_iter().map(|request| self.generate_request(request)).collect()
    }

    /// Like [`Engine::generate_request`], but passes once `budget` has elapsed
    ///
    /// The computation keeps running in the background until it finishes, its
    /// result is then dropped.
    pub fn generate_decision_within(&self, request: DecisionRequest, budget: Duration) -> Decision {
        let (tx, rx) = mpsc::channel();
        let engine = self.clone();
        rayon::spawn(move || {
            let decision = engine.generate_request(&request);
            // the receiver is gone when the budget ran out
            let _ = tx.send(decision);
        });

        match rx.recv_timeout(budget) {
            Ok(decision) => decision,
            Err(RecvTimeoutError::Timeout) => {
                log::warn!("passing, no decision within {:?}", budget);
                Decision::Pass
            }
            Err(RecvTimeoutError::Disconnected) => {
                log::error!("passing, decision worker stopped without answering");
                Decision::Pass
            }
        }
    }

    fn decide(&self, board: &Board, rack: &Rack, tiles_remaining: u32, difficulty: Difficulty) -> Result<Decision, EngineError> {
        check_input(board, rack)?;

        let start = Instant::now();
        log::debug!("searching {:?} for {:?} with {} tiles in the bag", difficulty, rack, tiles_remaining);
        let candidates = self.candidates(board, rack);
        log::debug!("{} candidates in {:?}", candidates.len(), Instant::now() - start);

        let decision = match difficulty {
            Difficulty::Basic => match candidates.into_iter().next() {
                Some(best) => Decision::play(best),
                None => self.no_move(rack, tiles_remaining),
            },
            Difficulty::Advanced => {
                let ranked = self.evaluator().rank(candidates, board, rack, tiles_remaining);
                match ranked.into_iter().next() {
                    Some(best) => self.maybe_weak(best, rack, tiles_remaining),
                    None => self.no_move(rack, tiles_remaining),
                }
            }
        };

        match &decision {
            Decision::Play { word, score, .. } => log::debug!("playing {} for {}", word, score),
            Decision::Exchange { letters } => log::debug!("exchanging {} tiles", letters.len()),
            Decision::Pass => log::debug!("passing"),
        }
        Ok(decision)
    }

    /// Nothing to play: trade the hard tiles, or the whole rack when none is hard
    fn no_move(&self, rack: &Rack, tiles_remaining: u32) -> Decision {
        if !can_exchange(rack, tiles_remaining) {
            return Decision::Pass;
        }
        let mut letters = hard_tiles(rack, &self.search.score_rules.values);
        if letters.is_empty() {
            letters = rack.tiles();
        }
        Decision::Exchange { letters }
    }

    fn maybe_weak(&self, best: EvaluatedMove, rack: &Rack, tiles_remaining: u32) -> Decision {
        let threshold = weak_move_threshold(tiles_remaining);
        if best.combined() >= threshold {
            return Decision::play(best.candidate);
        }
        log::debug!("best move {} is weak ({:.1} < {})", best.candidate.word, best.combined(), threshold);

        if tiles_remaining < MIN_BAG_FOR_EXCHANGE {
            return Decision::Pass;
        }
        let letters = hard_tiles(rack, &self.search.score_rules.values);
        if letters.is_empty() || !can_exchange(rack, tiles_remaining) {
            // nothing worth trading
            return Decision::play(best.candidate);
        }
        Decision::Exchange { letters }
    }
}

/// Rejects what the search cannot work with
fn check_input(board: &Board, rack: &Rack) -> Result<(), EngineError> {
    if rack.len() > RACK_SIZE {
        return Err(EngineError::RackTooLarge(rack.len()));
    }
    for (pos, tile) in board.tiles() {
        if !tile.letter.0.is_ascii_lowercase() {
            return Err(EngineError::InvalidBoard {
                row: pos.row,
                col: pos.col,
                found: tile.letter.0 as char,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
fn engine(words: &[&str]) -> Engine {
    Engine::new(Arc::new(Lexicon::from_words(words.iter()).unwrap()))
}

#[cfg(test)]
fn letters(s: &str) -> Vec<RackTile> {
    s.bytes().map(|b| RackTile::Letter(Letter(b))).collect()
}

#[test]
fn exchange_selection() {
    let values = LetterValues::english();
    let hard = |s: &str| hard_tiles(&s.parse().unwrap(), &values);

    assert_eq!(hard("qxzjvwk"), letters("jqxz"));
    assert_eq!(hard("aeirst*"), vec![]);
    // q is hard anyway with english values, a u does not help
    assert_eq!(hard("qu"), letters("q"));
    // two copies are fine, the third is not, vowels never are
    assert_eq!(hard("tttaaaa"), letters("t"));

    // with q worth 1, only a missing u makes it hard
    let mut overrides = std::collections::HashMap::new();
    overrides.insert('q', 1);
    let cheap = LetterValues::with_overrides(&overrides);
    assert_eq!(hard_tiles(&"qa".parse().unwrap(), &cheap), letters("q"));
    assert_eq!(hard_tiles(&"qua".parse().unwrap(), &cheap), vec![]);
}

#[test]
fn thresholds() {
    assert_eq!(weak_move_threshold(80), 15.0);
    assert_eq!(weak_move_threshold(41), 15.0);
    assert_eq!(weak_move_threshold(40), 10.0);
    assert_eq!(weak_move_threshold(21), 10.0);
    assert_eq!(weak_move_threshold(20), 5.0);
    assert_eq!(weak_move_threshold(0), 5.0);

    let rack: Rack = "ab".parse().unwrap();
    assert!(can_exchange(&rack, 7));
    assert!(!can_exchange(&rack, 6));
    assert!(!can_exchange(&"a".parse().unwrap(), 50));
}

#[test]
fn basic_plays_the_top_score() {
    let engine = engine(&["cab", "crab", "ab", "bra"]);
    let rack: Rack = "crabxyz".parse().unwrap();
    let best = engine.candidates(&Board::empty(), &rack).remove(0);
    match engine.generate_decision(&Board::empty(), &rack, 80, Difficulty::Basic) {
        Decision::Play { placements, word, score } => {
            assert_eq!(word, "crab");
            assert_eq!(score, best.score);
            assert_eq!(placements, best.placements);
        }
        other => panic!("expected a play, got {:?}", other),
    }
}

#[test]
fn no_move_fallbacks() {
    let engine = engine(&["cat"]);
    let board = crate::board::board_with(&[(7, 6, crate::Direction::Horizontal, "cat")]);

    let rack: Rack = "qxzjvwk".parse().unwrap();
    for difficulty in [Difficulty::Basic, Difficulty::Advanced] {
        assert_eq!(engine.generate_decision(&board, &rack, 50, difficulty), Decision::Exchange { letters: letters("jqxz") });
        assert_eq!(engine.generate_decision(&board, &rack, 6, difficulty), Decision::Pass);
    }

    // nothing hard but nothing playable either: trade it all
    let rack: Rack = "eeiioo".parse().unwrap();
    assert_eq!(engine.generate_decision(&board, &rack, 50, Difficulty::Basic), Decision::Exchange { letters: rack.tiles() });

    assert_eq!(engine.generate_decision(&board, &Rack::empty(), 50, Difficulty::Basic), Decision::Pass);
    assert_eq!(engine.generate_decision(&board, &"q".parse().unwrap(), 50, Difficulty::Basic), Decision::Pass);
}

#[test]
fn advanced_trades_weak_moves() {
    // "at" off the centre is the only play, worth 4 points
    let engine = engine(&["at"]);
    let rack: Rack = "atqzjxv".parse().unwrap();

    let ranked = engine.ranked(&Board::empty(), &rack, 80);
    assert!(ranked.iter().all(|m| m.combined() < 15.0), "{:?}", ranked);

    assert_eq!(engine.generate_decision(&Board::empty(), &rack, 80, Difficulty::Advanced), Decision::Exchange { letters: letters("jqxz") });
    assert_eq!(engine.generate_decision(&Board::empty(), &rack, 5, Difficulty::Advanced), Decision::Pass);
    assert!(matches!(engine.generate_decision(&Board::empty(), &rack, 80, Difficulty::Basic), Decision::Play { .. }));

    // nothing hard to trade: the weak move is still played
    let rack: Rack = "at".parse().unwrap();
    assert!(matches!(engine.generate_decision(&Board::empty(), &rack, 80, Difficulty::Advanced), Decision::Play { .. }));
}

#[test]
fn invalid_input_passes() {
    let engine = engine(&["cat"]);
    let oversized = Rack::from_tiles(letters("abcdefgh"));
    assert_eq!(engine.generate_decision(&Board::empty(), &oversized, 80, Difficulty::Basic), Decision::Pass);

    let mut board = Board::empty();
    board.set(crate::CENTER, crate::Tile { letter: Letter(b'#'), is_blank: false, owner: None });
    assert_eq!(engine.generate_decision(&board, &"cat".parse().unwrap(), 80, Difficulty::Advanced), Decision::Pass);
}

#[test]
fn parallel_requests_keep_their_order() {
    let engine = engine(&["cat", "at", "ta"]);
    let requests: Vec<_> = ["cat", "qxzjvwk", ""]
        .iter()
        .map(|r| DecisionRequest {
            board: Board::empty(),
            rack: r.parse().unwrap(),
            tiles_remaining: 50,
            difficulty: Difficulty::Basic,
        })
        .collect();
    let decisions = engine.generate_decisions(&requests);
    assert_eq!(decisions.len(), 3);
    assert!(matches!(&decisions[0], Decision::Play { word, .. } if word == "cat"));
    assert_eq!(decisions[1], Decision::Exchange { letters: letters("jqxz") });
    assert_eq!(decisions[2], Decision::Pass);
    assert_eq!(decisions, requests.iter().map(|r| engine.generate_request(r)).collect::<Vec<_>>());
}
