pub mod letter_set;
pub mod restrictionner;
pub mod score;
pub mod word_finder;

use std::collections::HashSet;
use std::time::Instant;

use fst::{IntoStreamer, Set, Streamer};
use serde::Deserialize;

use super::board::{Board, Square};
use super::lexicon::Lexicon;
use super::rack::{Rack, RackTile};
use super::score_rules::ScoreRules;
use super::{Cursor, Direction, Letter, Position, BOARD_SIZE, CENTER};

use letter_set::LetterSet;
use word_finder::LineAutomaton;

/// Knobs of the move search
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// At most this many words are tried per anchor and direction, the
    /// longest first. Bounds the work on open boards at the cost of maybe
    /// missing a better short play.
    pub candidate_cap: usize,
    #[serde(skip)]
    pub score_rules: ScoreRules,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            candidate_cap: 50,
            score_rules: ScoreRules::default(),
        }
    }
}

/// One tile laid by a move
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Placement {
    pub pos: Position,
    /// The letter shown, for a blank the letter it stands for
    pub letter: Letter,
    pub is_blank: bool,
}

/// A legal play found by the search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateMove {
    /// New tiles only, in order along `direction`
    pub placements: Vec<Placement>,
    pub anchor: Position,
    pub direction: Direction,
    /// The main word, including tiles that were already on the board
    pub word: String,
    pub score: u32,
    /// What leaves the rack
    pub consumed: Vec<RackTile>,
}

impl CandidateMove {
    pub fn tiles_used(&self) -> usize {
        self.placements.len()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RestrictedSquare {
    Empty(LetterSet),
    Filled(Letter),
}

/// Letters allowed on each square for words laid along one direction
#[derive(Clone)]
pub struct ConstrainedBoard {
    /// The direction words will be laid in (the constraints come from the perp one)
    dir: Direction,
    /// indexed by [line][position along `dir`]
    table: Vec<Vec<RestrictedSquare>>,
}

impl ConstrainedBoard {
    pub fn build(board: &Board, dir: Direction, dictionary: &Set<impl AsRef<[u8]>>) -> Self {
        let mut table = vec![vec![RestrictedSquare::Empty(LetterSet::empty()); BOARD_SIZE]; BOARD_SIZE];
        let cross = dir.perp();

        for i in 0..BOARD_SIZE {
            // the crossing line whose coordinate along `dir` is i
            let mut start = Position { row: 0, col: 0 };
            start[dir] = i;

            let mut buf = [Square::Empty; BOARD_SIZE];
            let mut head = Cursor(start, cross);
            for sq in buf.iter_mut() {
                *sq = board.square(head.0);
                head = head.next();
            }

            let mut buf_restr = [RestrictedSquare::Empty(LetterSet::empty()); BOARD_SIZE];
            restrictionner::find_restrictions(&buf[..], &mut buf_restr[..], dictionary);

            for (j, r) in buf_restr.iter().enumerate() {
                table[j][i] = *r;
            }
        }

        Self { dir, table }
    }

    /// The line going through `pos` along the search direction
    pub fn line(&self, pos: Position) -> &[RestrictedSquare] {
        &self.table[pos[self.dir.perp()]][..]
    }
}

/// Every legal move for `rack` on `board`, best raw score first
///
/// Yields nothing when the rack is empty or the lexicon is not loaded.
pub fn find_moves(board: &Board, rack: &Rack, lexicon: &Lexicon, config: &SearchConfig) -> Vec<CandidateMove> {
    let dictionary = match lexicon.fst() {
        Some(d) => d,
        None => {
            log::debug!("lexicon not loaded, no move");
            return vec![];
        }
    };
    if rack.is_empty() {
        return vec![];
    }

    let start = Instant::now();
    let anchors = board.find_anchors();
    if anchors.is_empty() {
        log::warn!("board has tiles but no anchor");
        return vec![];
    }
    let first_move = board.is_empty();

    let prepared_h = ConstrainedBoard::build(board, Direction::Horizontal, dictionary);
    let prepared_v = ConstrainedBoard::build(board, Direction::Vertical, dictionary);

    let mut seen = HashSet::new();
    let mut moves = vec![];

    for &anchor in &anchors {
        for dir in Direction::BOTH {
            let words = if first_move {
                opening_words(anchor, dir, rack, lexicon, config.candidate_cap)
            } else {
                let prepared = match dir {
                    Direction::Horizontal => &prepared_h,
                    Direction::Vertical => &prepared_v,
                };
                anchored_words(prepared, anchor, dir, rack, dictionary, config.candidate_cap)
            };

            for (word, word_start) in words {
                let candidate = match try_place(board, rack, &word, Cursor(word_start, dir), anchor) {
                    Some(c) => c,
                    None => continue,
                };
                if !is_legal(board, &candidate, lexicon, first_move) {
                    continue;
                }
                if !seen.insert(candidate.placements.clone()) {
                    continue;
                }
                let score = score::raw_score(board, &candidate.placements, dir, &config.score_rules);
                moves.push(CandidateMove { score, ..candidate });
            }
        }
    }

    moves.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.word.cmp(&b.word))
            .then_with(|| a.placements.cmp(&b.placements))
    });

    log::debug!(
        "{} moves from {} anchors in {:?} for {:?}",
        moves.len(),
        anchors.len(),
        Instant::now() - start,
        rack
    );
    moves
}

/// Words for the first play of the game, each at every offset that covers the centre
fn opening_words(anchor: Position, dir: Direction, rack: &Rack, lexicon: &Lexicon, cap: usize) -> Vec<(String, Position)> {
    let mut words = lexicon.enumerate(rack, 2, rack.len(), None, None);
    words.truncate(cap);

    let mut acc = vec![];
    for word in words {
        for offset in 0..word.len() {
            if offset > anchor[dir] || anchor[dir] - offset + word.len() > BOARD_SIZE {
                continue;
            }
            let mut start = anchor;
            start[dir] -= offset;
            acc.push((word.clone(), start));
        }
    }
    acc
}

/// Words laid along `dir` that go through `anchor`, with where they start
///
/// Tries every start square from which the rack can reach the anchor.
fn anchored_words(
    prepared: &ConstrainedBoard,
    anchor: Position,
    dir: Direction,
    rack: &Rack,
    dictionary: &Set<Vec<u8>>,
    cap: usize,
) -> Vec<(String, Position)> {
    let line = prepared.line(anchor);
    let a = anchor[dir];
    let is_filled = |i: usize| matches!(line[i], RestrictedSquare::Filled(_));

    let mut acc = vec![];
    // squares needing a tile between the start and the anchor
    let mut empties = 0;
    let mut s = a;
    loop {
        // a tile just before the start would be part of the word
        if s == 0 || !is_filled(s - 1) {
            let automaton = LineAutomaton {
                line: &line[s..],
                rack: rack.clone(),
                min_len: a - s + 1,
            };
            let mut matches = dictionary.search(automaton).into_stream();
            while let Some(word) = matches.next() {
                let mut start = anchor;
                start[dir] = s;
                acc.push((String::from_utf8_lossy(word).into_owned(), start));
            }
        }
        if s == 0 {
            break;
        }
        if !is_filled(s - 1) {
            empties += 1;
            // the anchor itself needs a tile too
            if empties + 1 > rack.len() {
                break;
            }
        }
        s -= 1;
    }

    acc.sort_by(|(w1, p1), (w2, p2)| {
        w2.len()
            .cmp(&w1.len())
            .then_with(|| w1.cmp(w2))
            .then_with(|| p1.cmp(p2))
    });
    acc.truncate(cap);
    acc
}

/// Lays `word` from `start`, matching board tiles and drawing the rest from the rack
fn try_place(board: &Board, rack: &Rack, word: &str, start: Cursor, anchor: Position) -> Option<CandidateMove> {
    let mut available = rack.clone();
    let mut placements = vec![];
    let mut consumed = vec![];

    let mut head = start;
    for c in word.bytes() {
        if !head.0.in_bounds() {
            return None;
        }
        let letter = Letter(c);
        match board.tile(head.0) {
            Some(tile) => {
                if tile.letter != letter {
                    return None;
                }
            }
            None => {
                let tile = available.take_for(letter)?;
                placements.push(Placement {
                    pos: head.0,
                    letter,
                    is_blank: tile == RackTile::Blank,
                });
                consumed.push(tile);
            }
        }
        head = head.next();
    }

    if placements.is_empty() {
        return None;
    }

    Some(CandidateMove {
        placements,
        anchor,
        direction: start.1,
        word: word.to_owned(),
        score: 0,
        consumed,
    })
}

/// Checks the rules on the board with the move laid: connected to the
/// existing tiles (or on the centre for the first play), and every word
/// formed is in the lexicon
fn is_legal(board: &Board, candidate: &CandidateMove, lexicon: &Lexicon, first_move: bool) -> bool {
    let connected = if first_move {
        candidate.placements.iter().any(|p| p.pos == CENTER)
    } else {
        candidate.placements.iter().any(|p| board.has_adjacent_tile(p.pos))
    };
    if !connected {
        return false;
    }

    let mut after = board.clone();
    if let Err(err) = after.apply(&candidate.placements, None) {
        log::warn!("search produced an unplayable move {:?}: {}", candidate, err);
        return false;
    }

    let dir = candidate.direction;
    let main = after.extract_line(candidate.placements[0].pos, dir);
    if main.len() < 2 || main != candidate.word || !lexicon.is_word(&main) {
        return false;
    }

    candidate.placements.iter().all(|p| {
        let cross = after.extract_line(p.pos, dir.perp());
        cross.len() < 2 || lexicon.is_word(&cross)
    })
}

#[cfg(test)]
fn lexicon(words: &[&str]) -> Lexicon {
    Lexicon::from_words(words.iter()).unwrap()
}

#[test]
fn opening_moves_cover_the_center() {
    let lex = lexicon(&["cab", "crab", "able", "bale", "ab"]);
    let rack: Rack = "crabble".parse().unwrap();
    let moves = find_moves(&Board::empty(), &rack, &lex, &SearchConfig::default());
    assert!(!moves.is_empty());
    for m in &moves {
        assert!(m.placements.iter().any(|p| p.pos == CENTER), "{:?}", m);
        assert!(lex.is_word(&m.word));
        assert!(rack.contains_all(&m.consumed));
    }
    // both directions, every offset: "crab" has 4 placements per direction
    assert_eq!(moves.iter().filter(|m| m.word == "crab").count(), 8);
    assert!(moves.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn hooks_and_extensions() {
    let lex = lexicon(&["cat", "cats", "at", "as", "ta"]);
    let board = crate::board::board_with(&[(7, 6, Direction::Horizontal, "cat")]);
    let rack: Rack = "s".parse().unwrap();
    let moves = find_moves(&board, &rack, &lex, &SearchConfig::default());

    let cats = moves.iter().find(|m| m.word == "cats").expect("cats is playable");
    assert_eq!(cats.placements, vec![Placement { pos: Position::new(7, 9), letter: Letter(b's'), is_blank: false }]);
    assert_eq!(cats.direction, Direction::Horizontal);
    // the s alone scores, not the letters of cat already down
    assert_eq!(cats.score, 1);

    // "as" down from the a of cat
    assert!(moves.iter().any(|m| m.word == "as" && m.placements[0].pos == Position::new(8, 7)));
    for m in &moves {
        assert_eq!(m.placements.len(), 1);
        assert!(board.has_adjacent_tile(m.placements[0].pos));
    }
}

#[test]
fn blank_fills_in() {
    let lex = lexicon(&["cat", "cart"]);
    let board = crate::board::board_with(&[(7, 6, Direction::Horizontal, "cat")]);
    let rack: Rack = "*".parse().unwrap();
    let moves = find_moves(&board, &rack, &lex, &SearchConfig::default());
    // no word of the lexicon takes a single tile around "cat"
    assert!(moves.is_empty(), "{:?}", moves);

    let board = crate::board::board_with(&[(7, 6, Direction::Horizontal, "car")]);
    let moves = find_moves(&board, &rack, &lex, &SearchConfig::default());
    let cart = moves.iter().find(|m| m.word == "cart").expect("cart with a blank");
    assert!(cart.placements[0].is_blank);
    assert_eq!(cart.consumed, vec![RackTile::Blank]);
    assert_eq!(cart.score, 0);

    let standard = SearchConfig {
        score_rules: crate::score_rules::ScoreRules {
            standard_scoring: true,
            ..Default::default()
        },
        ..SearchConfig::default()
    };
    let moves = find_moves(&board, &rack, &lex, &standard);
    let cart = moves.iter().find(|m| m.word == "cart").expect("cart with a blank");
    assert_eq!(cart.score, 3 + 1 + 1);
}

#[test]
fn nothing_without_rack_or_lexicon() {
    let lex = lexicon(&["cat"]);
    assert!(find_moves(&Board::empty(), &Rack::empty(), &lex, &SearchConfig::default()).is_empty());
    let rack: Rack = "cat".parse().unwrap();
    assert!(find_moves(&Board::empty(), &rack, &Lexicon::new(), &SearchConfig::default()).is_empty());
}

#[test]
fn cap_limits_words_per_anchor() {
    let lex = lexicon(&["ab", "abs", "bas", "sab"]);
    let rack: Rack = "abs".parse().unwrap();
    let config = SearchConfig { candidate_cap: 1, ..SearchConfig::default() };
    let moves = find_moves(&Board::empty(), &rack, &lex, &config);
    // only the longest word, alphabetically first: "abs"
    assert!(moves.iter().all(|m| m.word == "abs"));
    assert_eq!(moves.len(), 6);
}
