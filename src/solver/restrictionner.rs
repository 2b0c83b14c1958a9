use fst::{Automaton, IntoStreamer, Set, Streamer};

use super::{Letter, LetterSet, RestrictedSquare, Square};

/// Matches the words `prefix` + one letter + `suffix`, remembering the letter
struct RestrictionChecker<'a> {
    prefix: &'a [Letter],
    suffix: &'a [Letter],
}

#[derive(Clone, Debug)]
enum RestrictionCheckerState {
    Prefix(usize),
    Mid,
    Suffix(usize, Letter),
    Done(Letter),
}

impl<'a> Automaton for RestrictionChecker<'a> {
    type State = Option<RestrictionCheckerState>;
    fn start(&self) -> Self::State {
        if self.prefix.is_empty() {
            Some(RestrictionCheckerState::Mid)
        } else {
            Some(RestrictionCheckerState::Prefix(0))
        }
    }
    fn is_match(&self, state: &Self::State) -> bool {
        matches!(state, Some(RestrictionCheckerState::Done(_)))
    }
    fn accept(&self, state: &Self::State, byte: u8) -> Self::State {
        state.as_ref().and_then(|state| match *state {
            RestrictionCheckerState::Prefix(i) => {
                if self.prefix[i] == Letter(byte) {
                    Some(if i + 1 == self.prefix.len() {
                        RestrictionCheckerState::Mid
                    } else {
                        RestrictionCheckerState::Prefix(i + 1)
                    })
                } else {
                    None
                }
            }
            RestrictionCheckerState::Mid => {
                if !byte.is_ascii_lowercase() {
                    None
                } else if self.suffix.is_empty() {
                    Some(RestrictionCheckerState::Done(Letter(byte)))
                } else {
                    Some(RestrictionCheckerState::Suffix(0, Letter(byte)))
                }
            }
            RestrictionCheckerState::Suffix(i, l) => {
                if self.suffix.get(i) == Some(&Letter(byte)) {
                    Some(if i + 1 == self.suffix.len() {
                        RestrictionCheckerState::Done(l)
                    } else {
                        RestrictionCheckerState::Suffix(i + 1, l)
                    })
                } else {
                    None
                }
            }
            RestrictionCheckerState::Done(_) => None,
        })
    }

    fn can_match(&self, state: &Self::State) -> bool {
        state.is_some()
    }
}

/// For every square of `line`, what may be placed there without breaking the
/// word that `line` would then contain
///
/// Squares with no neighbouring tile on the line accept any letter. Squares
/// squeezed between tiles only accept letters that complete a word.
pub fn find_restrictions(line: &[Square], restr: &mut [RestrictedSquare], dictionary: &Set<impl AsRef<[u8]>>) {
    assert_eq!(line.len(), restr.len());

    let mut prefix = vec![];
    let mut suffix = vec![];

    for (i, r) in restr.iter_mut().enumerate() {
        *r = if let Some(tile) = line[i].tile() {
            RestrictedSquare::Filled(tile.letter)
        } else {
            // find prefix
            prefix.clear();
            for j in (0..i).rev() {
                if let Some(tile) = line[j].tile() {
                    prefix.insert(0, tile.letter)
                } else {
                    break;
                }
            }

            // find suffix
            suffix.clear();
            for sq in &line[(i + 1)..] {
                if let Some(tile) = sq.tile() {
                    suffix.push(tile.letter)
                } else {
                    break;
                }
            }

            RestrictedSquare::Empty(if prefix.is_empty() && suffix.is_empty() {
                LetterSet::any()
            } else {
                let automaton = RestrictionChecker {
                    prefix: &prefix[..],
                    suffix: &suffix[..],
                };
                let mut matches = dictionary.search_with_state(automaton).into_stream();
                let mut letter_set = LetterSet::empty();
                while let Some((_, state)) = matches.next() {
                    if let Some(RestrictionCheckerState::Done(l)) = state {
                        letter_set.insert(l);
                    }
                }
                letter_set
            })
        }
    }
}

#[test]
fn test() {
    use crate::board::Tile;
    use std::iter::FromIterator;

    let dict = Set::from_iter(vec!["bles", "elle", "lore", "love"]).unwrap();

    let filled = |c: u8| Square::Filled(Tile { letter: Letter(c), is_blank: false, owner: None });
    let line = [
        filled(b'e'),
        Square::Empty,
        Square::Empty,
        filled(b'l'),
        filled(b'l'),
        filled(b'e'),
        Square::Empty,
        Square::Empty,
        Square::Empty,
        filled(b'l'),
        filled(b'o'),
        Square::Empty,
        filled(b'e'),
    ];

    let mut restr = [RestrictedSquare::Empty(LetterSet::empty()); 13];

    find_restrictions(&line, &mut restr, &dict);

    assert_eq!(restr, [
        RestrictedSquare::Filled(Letter(b'e')),
        RestrictedSquare::Empty(LetterSet::empty()),
        RestrictedSquare::Empty(LetterSet::from_iter(vec![Letter(b'e')])),
        RestrictedSquare::Filled(Letter(b'l')),
        RestrictedSquare::Filled(Letter(b'l')),
        RestrictedSquare::Filled(Letter(b'e')),
        RestrictedSquare::Empty(LetterSet::empty()),
        RestrictedSquare::Empty(LetterSet::any()),
        RestrictedSquare::Empty(LetterSet::empty()),
        RestrictedSquare::Filled(Letter(b'l')),
        RestrictedSquare::Filled(Letter(b'o')),
        RestrictedSquare::Empty(LetterSet::from_iter(vec![Letter(b'v'), Letter(b'r')])),
        RestrictedSquare::Filled(Letter(b'e')),
    ]);
}
