//! End to end scenarios: a board, a rack and a lexicon in, candidates and
//! decisions out.

use std::sync::Arc;
use std::time::Duration;

use scrabble_engine::solver::find_moves;
use scrabble_engine::{
    Board, CandidateMove, Decision, DecisionRequest, Difficulty, Direction, Engine, Letter, Lexicon, LexiconBuilder,
    Position, Rack, RackTile, SearchConfig, CENTER,
};

fn lexicon(words: &[&str]) -> Arc<Lexicon> {
    Arc::new(Lexicon::from_words(words.iter()).expect("valid word list"))
}

fn built_in() -> Arc<Lexicon> {
    Arc::new(Lexicon::built_in().expect("built-in words"))
}

/// `cat` across the centre, `tea` going down from its `t`
fn midgame_board() -> Board {
    let mut rows = vec![String::new(); 7];
    rows.push("......cat".to_owned());
    rows.push("........e".to_owned());
    rows.push("........a".to_owned());
    rows.join("\n").parse().expect("valid board")
}

fn full_board() -> Board {
    let row = "e".repeat(15);
    vec![row; 15].join("\n").parse().expect("valid board")
}

/// Every word made by the move, read on the board once it is played
fn words_formed(board: &Board, candidate: &CandidateMove) -> Vec<String> {
    let mut after = board.clone();
    after.apply(&candidate.placements, None).expect("move can be applied");

    let mut words = vec![after.extract_line(candidate.placements[0].pos, candidate.direction)];
    for p in &candidate.placements {
        let cross = after.extract_line(p.pos, candidate.direction.perp());
        if cross.len() > 1 {
            words.push(cross);
        }
    }
    words
}

fn assert_legal(board: &Board, rack: &Rack, lexicon: &Lexicon, candidate: &CandidateMove) {
    assert!(!candidate.placements.is_empty());
    assert!(rack.contains_all(&candidate.consumed), "{:?} not in {:?}", candidate.consumed, rack);
    assert_eq!(candidate.consumed.len(), candidate.placements.len());

    for p in &candidate.placements {
        assert!(p.pos.in_bounds());
        assert!(!board.is_occupied(p.pos), "{:?} overwrites a tile", candidate);
    }
    if board.is_empty() {
        assert!(candidate.placements.iter().any(|p| p.pos == CENTER), "{:?} misses the centre", candidate);
    } else {
        assert!(candidate.placements.iter().any(|p| board.has_adjacent_tile(p.pos)), "{:?} is not connected", candidate);
    }

    let words = words_formed(board, candidate);
    assert_eq!(words[0], candidate.word);
    for w in words {
        assert!(lexicon.is_word(&w), "{:?} forms {:?}", candidate, w);
    }
}

#[test]
fn opening_move() {
    let lexicon = built_in();
    let engine = Engine::new(lexicon.clone());
    let rack: Rack = "crabble".parse().unwrap();

    for difficulty in [Difficulty::Basic, Difficulty::Advanced] {
        match engine.generate_decision(&Board::empty(), &rack, 86, difficulty) {
            Decision::Play { placements, word, score } => {
                assert!(placements.iter().any(|p| p.pos == Position::new(7, 7)));
                assert!(lexicon.is_word(&word), "{} is not a word", word);
                assert!(score > 0);
            }
            other => panic!("expected a play, got {:?}", other),
        }
    }
}

#[test]
fn blocked_rack() {
    let engine = Engine::new(lexicon(&["cat", "at", "ta"]));
    let board = midgame_board();
    let rack: Rack = "qxzjvwk".parse().unwrap();
    assert!(engine.candidates(&board, &rack).is_empty());

    let hard: Vec<_> = "jqxz".bytes().map(|b| RackTile::Letter(Letter(b))).collect();
    for difficulty in [Difficulty::Basic, Difficulty::Advanced] {
        assert_eq!(engine.generate_decision(&board, &rack, 7, difficulty), Decision::Exchange { letters: hard.clone() });
        assert_eq!(engine.generate_decision(&board, &rack, 6, difficulty), Decision::Pass);
    }
}

#[test]
fn cross_word_rejection() {
    let lexicon = lexicon(&["cat", "at", "on", "ta", "an"]);
    let board: Board = "\n\n\n\n\n\n\n......cat".parse().unwrap();
    let rack: Rack = "on".parse().unwrap();

    let moves = find_moves(&board, &rack, &lexicon, &SearchConfig::default());

    // "on" under "ca" is a word, but so would be "co" and "ao"
    let under = [Position::new(8, 6), Position::new(8, 7)];
    assert!(!moves.iter().any(|m| m.placements.iter().map(|p| p.pos).eq(under.iter().copied())));

    // "an" down from the a of cat only makes words
    assert!(moves
        .iter()
        .any(|m| m.word == "an" && m.direction == Direction::Vertical && m.placements[0].pos == Position::new(8, 7)));

    for m in &moves {
        assert_legal(&board, &rack, &lexicon, m);
    }
}

#[test]
fn placement_legality() {
    let lexicon = built_in();
    let config = SearchConfig::default();
    for board in [Board::empty(), midgame_board()] {
        for rack in ["aeinrst", "quizest", "ab*de", "??"] {
            let rack: Rack = rack.parse().unwrap();
            let moves = find_moves(&board, &rack, &lexicon, &config);
            assert!(!moves.is_empty(), "no move for {:?}", rack);
            for m in &moves {
                assert_legal(&board, &rack, &lexicon, m);
            }
            assert!(moves.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }
}

#[test]
fn determinism() {
    let engine = Engine::new(built_in());
    let board = midgame_board();
    let rack: Rack = "rest*ao".parse().unwrap();

    let first = engine.candidates(&board, &rack);
    for _ in 0..3 {
        assert_eq!(engine.candidates(&board, &rack), first);
    }

    for difficulty in [Difficulty::Basic, Difficulty::Advanced] {
        let decision = engine.generate_decision(&board, &rack, 30, difficulty);
        assert_eq!(engine.generate_decision(&board, &rack, 30, difficulty), decision);
    }
}

#[test]
fn decision_totality() {
    let lexicon = built_in();
    let engine = Engine::new(lexicon.clone());

    for board in [Board::empty(), midgame_board(), full_board()] {
        for rack in ["", "e", "aeinrst", "qxzjvwk", "*******"] {
            let rack: Rack = rack.parse().unwrap();
            for tiles_remaining in [0, 6, 7, 50] {
                for difficulty in [Difficulty::Basic, Difficulty::Advanced] {
                    match engine.generate_decision(&board, &rack, tiles_remaining, difficulty) {
                        Decision::Play { placements, word, .. } => {
                            assert!(!placements.is_empty());
                            assert!(lexicon.is_word(&word));
                        }
                        Decision::Exchange { letters } => {
                            assert!(!letters.is_empty());
                            assert!(rack.contains_all(&letters));
                            assert!(tiles_remaining >= 7);
                        }
                        Decision::Pass => {}
                    }
                }
            }
        }
    }

    // nothing to do on a full board or with an empty rack
    let rack: Rack = "e".parse().unwrap();
    assert_eq!(engine.generate_decision(&full_board(), &rack, 0, Difficulty::Basic), Decision::Pass);
    assert_eq!(engine.generate_decision(&Board::empty(), &Rack::empty(), 50, Difficulty::Advanced), Decision::Pass);
}

#[test]
fn unloaded_lexicon_falls_back() {
    let engine = Engine::new(Arc::new(Lexicon::new()));
    let rack: Rack = "qxzjvwk".parse().unwrap();
    assert!(engine.candidates(&Board::empty(), &rack).is_empty());
    assert!(matches!(
        engine.generate_decision(&Board::empty(), &rack, 50, Difficulty::Basic),
        Decision::Exchange { .. }
    ));
    assert_eq!(engine.generate_decision(&Board::empty(), &rack, 3, Difficulty::Basic), Decision::Pass);
}

#[test]
fn deadline_fallback() {
    let engine = Engine::new(built_in());
    let request = DecisionRequest {
        board: midgame_board(),
        rack: "*******".parse().unwrap(),
        tiles_remaining: 50,
        difficulty: Difficulty::Advanced,
    };

    assert_eq!(engine.generate_decision_within(request.clone(), Duration::ZERO), Decision::Pass);

    let expected = engine.generate_request(&request);
    assert_ne!(expected, Decision::Pass);
    assert_eq!(engine.generate_decision_within(request, Duration::from_secs(60)), expected);
}

#[test]
fn lexicon_files() {
    let lexicon = Lexicon::new();
    assert_eq!(lexicon.load_path("tests/fixtures/small_words.txt").unwrap(), 8);
    assert!(lexicon.is_word("cats"));
    assert!(!lexicon.is_word("dont"));

    let fst_path = std::env::temp_dir().join(format!("scrabble-engine-{}.fst", std::process::id()));
    let builder = LexiconBuilder::from_words(["crab", "cab", "able"]);
    builder.write_to(std::fs::File::create(&fst_path).unwrap()).unwrap();
    let lexicon = Lexicon::new();
    assert_eq!(lexicon.load_path(&fst_path).unwrap(), 3);
    assert!(lexicon.is_word("crab"));
    std::fs::remove_file(&fst_path).unwrap();

    // missing file: the built-in list takes over
    let lexicon = Lexicon::new();
    assert!(lexicon.load_path("tests/fixtures/missing.txt").is_err());
    assert!(lexicon.is_word("the"));
}
