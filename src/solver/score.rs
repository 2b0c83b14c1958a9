use super::{Board, Cursor, Direction, Placement, Position};
use crate::score_rules::{Premium, ScoreRules};

fn placed_at(placements: &[Placement], pos: Position) -> Option<&Placement> {
    placements.iter().find(|p| p.pos == pos)
}

/// Score of the word going through `from` along `dir`, once `placements` are on the board
///
/// Premiums only count under the new tiles.
fn word_score(board: &Board, placements: &[Placement], from: Position, dir: Direction, score_rules: &ScoreRules) -> u32 {
    let values = &score_rules.values;

    let mut head = Cursor(from, dir);
    while board.is_occupied(head.back().0) || placed_at(placements, head.back().0).is_some() {
        head = head.back();
    }

    let mut word_score = 0;
    let mut word_multiplier = 1;
    loop {
        if let Some(tile) = board.tile(head.0) {
            word_score += values.tile_value(tile.letter, tile.is_blank);
        } else if let Some(p) = placed_at(placements, head.0) {
            let bonus = Premium::at(p.pos).bonus();
            word_score += values.tile_value(p.letter, p.is_blank) * bonus.letter;
            word_multiplier *= bonus.word;
        } else {
            break;
        }
        head = head.next();
    }
    word_score * word_multiplier
}

fn forms_word(board: &Board, placements: &[Placement], pos: Position, dir: Direction) -> bool {
    let cursor = Cursor(pos, dir);
    [cursor.back().0, cursor.next().0]
        .iter()
        .any(|&n| board.is_occupied(n) || placed_at(placements, n).is_some())
}

/// New tiles only: their values with letter premiums, times the word
/// premiums under them
fn new_tiles_score(placements: &[Placement], score_rules: &ScoreRules) -> u32 {
    let mut sum = 0;
    let mut word_multiplier = 1;
    for p in placements {
        let bonus = Premium::at(p.pos).bonus();
        sum += score_rules.values.tile_value(p.letter, p.is_blank) * bonus.letter;
        word_multiplier *= bonus.word;
    }
    sum * word_multiplier
}

/// Tournament score: the whole main word, and every crossing word made by a new tile
fn standard_score(board: &Board, placements: &[Placement], dir: Direction, score_rules: &ScoreRules) -> u32 {
    let first = placements[0].pos;

    let main = if forms_word(board, placements, first, dir) {
        word_score(board, placements, first, dir, score_rules)
    } else {
        0
    };

    let perp_score: u32 = placements
        .iter()
        .filter(|p| forms_word(board, &[], p.pos, dir.perp()))
        .map(|p| word_score(board, std::slice::from_ref(p), p.pos, dir.perp(), score_rules))
        .sum();

    main + perp_score
}

/// Raw score of a play, plus the bingo bonus when seven tiles are laid
///
/// Only the new tiles count unless `score_rules.standard_scoring` is set.
/// `placements` must be on a single line along `dir` and on empty squares of `board`.
pub fn raw_score(board: &Board, placements: &[Placement], dir: Direction, score_rules: &ScoreRules) -> u32 {
    if placements.is_empty() {
        return 0;
    }

    let points = if score_rules.standard_scoring {
        standard_score(board, placements, dir, score_rules)
    } else {
        new_tiles_score(placements, score_rules)
    };

    let bingo = if placements.len() == crate::rack::RACK_SIZE {
        score_rules.bingo_bonus
    } else {
        0
    };

    points + bingo
}

#[cfg(test)]
fn play(tiles: &[(usize, usize, u8, bool)]) -> Vec<Placement> {
    tiles
        .iter()
        .map(|&(row, col, l, is_blank)| Placement {
            pos: Position { row, col },
            letter: super::Letter(l),
            is_blank,
        })
        .collect()
}

#[test]
fn first_word_on_center() {
    let rules = ScoreRules::default();
    let board = Board::empty();
    // c a t over 7,6 7,7 7,8: center doubles the word
    let p = play(&[(7, 6, b'c', false), (7, 7, b'a', false), (7, 8, b't', false)]);
    assert_eq!(raw_score(&board, &p, Direction::Horizontal, &rules), (3 + 1 + 1) * 2);

    // a blank scores nothing but still gets the word multiplier
    let p = play(&[(7, 6, b'c', true), (7, 7, b'a', false), (7, 8, b't', false)]);
    assert_eq!(raw_score(&board, &p, Direction::Horizontal, &rules), (1 + 1) * 2);
}

#[test]
fn only_new_tiles_count() {
    use crate::board::board_with;
    let rules = ScoreRules::default();
    let board = board_with(&[(7, 6, Direction::Horizontal, "cat")]);

    // cats: the c a t already down are worth nothing more
    let p = play(&[(7, 9, b's', false)]);
    assert_eq!(raw_score(&board, &p, Direction::Horizontal, &rules), 1);

    // "at" down from the a of cat
    let p = play(&[(8, 7, b't', false)]);
    assert_eq!(raw_score(&board, &p, Direction::Vertical, &rules), 1);

    // "to" on row 8 also makes "tt", which adds nothing: t on a double letter, then o
    let p = play(&[(8, 8, b't', false), (8, 9, b'o', false)]);
    assert_eq!(raw_score(&board, &p, Direction::Horizontal, &rules), 2 + 1);

    // a word premium under a new tile multiplies the new tiles only
    let board = board_with(&[(4, 6, Direction::Horizontal, "zoo")]);
    let p = play(&[(4, 4, b'a', false), (4, 5, b't', false)]);
    assert_eq!(raw_score(&board, &p, Direction::Horizontal, &rules), (1 + 1) * 2);
}

#[test]
fn standard_scoring_extends_and_crosses() {
    use crate::board::board_with;
    let rules = ScoreRules {
        standard_scoring: true,
        ..ScoreRules::default()
    };
    let board = board_with(&[(7, 6, Direction::Horizontal, "cat")]);

    // cat + s on 7,9: no premium there
    let p = play(&[(7, 9, b's', false)]);
    assert_eq!(raw_score(&board, &p, Direction::Horizontal, &rules), 3 + 1 + 1 + 1);

    // "at" below "a" of cat, going down from 7,7: a (existing) t on 8,7
    let p = play(&[(8, 7, b't', false)]);
    assert_eq!(raw_score(&board, &p, Direction::Vertical, &rules), 2);

    // "to" on row 8, from 8,8: t under the t of cat makes "tt" too, scored as a cross word
    let p = play(&[(8, 8, b't', false), (8, 9, b'o', false)]);
    // main "to": 8,8 is a double letter: 1*2 + 1
    // cross "tt": 1 + 1*2
    assert_eq!(raw_score(&board, &p, Direction::Horizontal, &rules), 3 + 3);
}

#[test]
fn bingo_bonus() {
    let rules = ScoreRules::default();
    let board = Board::empty();
    let p = play(&[
        (7, 4, b's', false),
        (7, 5, b'c', false),
        (7, 6, b'r', false),
        (7, 7, b'a', false),
        (7, 8, b'b', false),
        (7, 9, b'l', false),
        (7, 10, b'e', false),
    ]);
    // 7,7 doubles the word, no other premium on the row between 4 and 10
    assert_eq!(raw_score(&board, &p, Direction::Horizontal, &rules), (1 + 3 + 1 + 1 + 3 + 1 + 1) * 2 + 50);
}
