use fst::Automaton;

use super::{Letter, Rack, RestrictedSquare};

/// Words that can be laid along a line, starting at its first square
///
/// Tiles already on the line must be matched as they are and cost nothing.
/// Empty squares take a tile from the rack (a blank when the letter is
/// missing) and must agree with the crossing word.
#[derive(Debug, Clone)]
pub struct LineAutomaton<'line> {
    /// The line slice that starts at the begin of the word
    pub line: &'line [RestrictedSquare],
    /// What there is in the rack
    pub rack: Rack,
    /// The word has to reach this length to cover the anchor
    pub min_len: usize,
}

#[derive(Debug, Clone)]
pub struct LineState {
    /// How far we are on the line
    pub position: usize,
    /// What is left in the rack
    pub rack: Rack,
}

impl<'line> Automaton for LineAutomaton<'line> {
    type State = Option<LineState>;

    fn start(&self) -> Self::State {
        Some(LineState {
            position: 0,
            rack: self.rack.clone(),
        })
    }

    fn is_match(&self, state: &Self::State) -> bool {
        match state {
            Some(state) => {
                // a tile right after the word would extend it
                !matches!(self.line.get(state.position), Some(RestrictedSquare::Filled(_)))
                    // at least one tile played
                    && self.rack.len() != state.rack.len()
                    && state.position >= self.min_len.max(2)
            }
            None => false,
        }
    }

    fn accept(&self, state: &Self::State, byte: u8) -> Self::State {
        let state = state.as_ref()?;
        if !byte.is_ascii_lowercase() {
            return None;
        }
        let letter = Letter(byte);
        let rack = match self.line.get(state.position)? {
            // letter on the board must match what we accept
            &RestrictedSquare::Filled(l) => {
                if l == letter {
                    state.rack.clone()
                } else {
                    return None;
                }
            }
            // consume the letter from the rack, or a blank
            RestrictedSquare::Empty(letter_set) => {
                if !letter_set.contains(letter) {
                    return None;
                }
                state.rack.remove(letter).or_else(|| state.rack.remove_blank())?
            }
        };
        Some(LineState {
            position: state.position + 1,
            rack,
        })
    }

    fn can_match(&self, state: &Self::State) -> bool {
        state.is_some()
    }
}

#[test]
fn test() {
    use super::LetterSet;
    use fst::{IntoStreamer, Set, Streamer};

    let dict = Set::from_iter(vec!["at", "cat", "coat", "tepa", "to"]).unwrap();
    let letters = |s: &[u8]| -> LetterSet { s.iter().map(|&l| Letter(l)).collect() };

    // _ a _ _ with the first square only accepting c or t
    let line = [
        RestrictedSquare::Empty(letters(b"ct")),
        RestrictedSquare::Filled(Letter(b'a')),
        RestrictedSquare::Empty(LetterSet::any()),
        RestrictedSquare::Empty(LetterSet::any()),
    ];

    let automaton = LineAutomaton {
        line: &line[..],
        rack: "ot*".parse().unwrap(),
        min_len: 1,
    };

    let mut stream = dict.search_with_state(automaton).into_stream();
    let mut acc = vec![];
    while let Some((w, state)) = stream.next() {
        acc.push((std::str::from_utf8(w).unwrap().to_string(), state.expect("reached valid state")));
    }

    // "at" needs the first square to be 'a', "coat" does not fit the board 'a'
    let words: Vec<_> = acc.iter().map(|(w, _)| w.as_str()).collect();
    assert_eq!(words, vec!["cat"]);
    // c from the blank, t from the rack
    assert_eq!(acc[0].1.position, 3);
    assert_eq!(acc[0].1.rack.len(), 1);
    assert_eq!(acc[0].1.rack.blanks(), 0);
}
