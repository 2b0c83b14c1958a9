use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;
use crate::Letter;

/// Tiles a player can hold: up to seven in standard play
pub const RACK_SIZE: usize = 7;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RackTile {
    Letter(Letter),
    /// Stands for any letter, scores nothing
    Blank,
}

impl fmt::Display for RackTile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RackTile::Letter(l) => write!(f, "{}", l),
            RackTile::Blank => write!(f, "*"),
        }
    }
}

/// A multiset of letters and blanks
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Rack {
    letters: [u8; 26],
    n_blanks: u8,
    /// The total number of remaining letters+blanks to play
    n_total: u32,
}

impl Rack {
    pub fn empty() -> Rack {
        Rack {
            letters: [0; 26],
            n_blanks: 0,
            n_total: 0,
        }
    }

    pub fn from_tiles(tiles: impl IntoIterator<Item = RackTile>) -> Rack {
        let mut rack = Rack::empty();
        tiles.into_iter().for_each(|t| rack.add(t));
        rack
    }

    pub fn add(&mut self, tile: RackTile) {
        match tile {
            RackTile::Letter(l) => self.letters[l.index()] += 1,
            RackTile::Blank => self.n_blanks += 1,
        }
        self.n_total += 1;
    }

    pub fn len(&self) -> usize {
        self.n_total as usize
    }

    pub fn is_empty(&self) -> bool {
        self.n_total == 0
    }

    pub fn count(&self, letter: Letter) -> u8 {
        self.letters[letter.index()]
    }

    pub fn blanks(&self) -> u8 {
        self.n_blanks
    }

    /// Letters (not blanks) with a non zero count, with their count
    pub fn letter_counts(&self) -> impl Iterator<Item = (Letter, u8)> + '_ {
        self.letters
            .iter()
            .enumerate()
            .filter(|(_, n)| **n > 0)
            .map(|(i, &n)| (Letter::from_index(i), n))
    }

    /// Every tile, letters in alphabetical order then blanks
    pub fn tiles(&self) -> Vec<RackTile> {
        let mut acc = Vec::with_capacity(self.len());
        for (l, n) in self.letter_counts() {
            acc.extend(std::iter::repeat(RackTile::Letter(l)).take(n as usize));
        }
        acc.extend(std::iter::repeat(RackTile::Blank).take(self.n_blanks as usize));
        acc
    }

    pub fn remove(&self, letter: Letter) -> Option<Rack> {
        if self.letters[letter.index()] > 0 {
            let mut tmp = self.clone();
            tmp.letters[letter.index()] -= 1;
            tmp.n_total -= 1;
            Some(tmp)
        } else {
            None
        }
    }

    pub fn remove_blank(&self) -> Option<Rack> {
        if self.n_blanks > 0 {
            let mut tmp = self.clone();
            tmp.n_blanks -= 1;
            tmp.n_total -= 1;
            Some(tmp)
        } else {
            None
        }
    }

    /// Takes the letter itself if present, otherwise a blank standing for it
    pub fn take_for(&mut self, letter: Letter) -> Option<RackTile> {
        if self.letters[letter.index()] > 0 {
            self.letters[letter.index()] -= 1;
            self.n_total -= 1;
            Some(RackTile::Letter(letter))
        } else if self.n_blanks > 0 {
            self.n_blanks -= 1;
            self.n_total -= 1;
            Some(RackTile::Blank)
        } else {
            None
        }
    }

    /// The rack leave after the given tiles are played
    ///
    /// Tiles that are not on the rack are ignored.
    pub fn without(&self, consumed: &[RackTile]) -> Rack {
        let mut leave = self.clone();
        for &tile in consumed {
            let next = match tile {
                RackTile::Letter(l) => leave.remove(l),
                RackTile::Blank => leave.remove_blank(),
            };
            match next {
                Some(next) => leave = next,
                None => log::warn!("{} is not on the rack {:?}", tile, self),
            }
        }
        leave
    }

    /// Whether `tiles` is a sub-multiset of the rack
    pub fn contains_all(&self, tiles: &[RackTile]) -> bool {
        let mut tmp = self.clone();
        tiles.iter().all(|&tile| {
            let next = match tile {
                RackTile::Letter(l) => tmp.remove(l),
                RackTile::Blank => tmp.remove_blank(),
            };
            next.map(|next| tmp = next).is_some()
        })
    }
}

impl FromStr for Rack {
    type Err = EngineError;

    /// Letters in any case, `*` or `?` for a blank
    fn from_str(s: &str) -> Result<Rack, EngineError> {
        let mut rack = Rack::empty();
        for c in s.chars().filter(|c| !c.is_whitespace()) {
            let tile = match c {
                '*' | '?' => RackTile::Blank,
                c => RackTile::Letter(Letter::from_char(c).ok_or(EngineError::InvalidRack(c))?),
            };
            rack.add(tile);
        }
        if rack.len() > RACK_SIZE {
            return Err(EngineError::RackTooLarge(rack.len()));
        }
        Ok(rack)
    }
}

impl fmt::Debug for Rack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for tile in self.tiles() {
            write!(f, "{}", tile)?;
        }
        write!(f, "[{} tiles]", self.n_total)
    }
}

#[test]
fn rack_parsing() {
    let rack: Rack = "AbB*e".parse().unwrap();
    assert_eq!(rack.len(), 5);
    assert_eq!(rack.count(Letter(b'b')), 2);
    assert_eq!(rack.blanks(), 1);
    assert_eq!(format!("{:?}", rack), "abbe*[5 tiles]");

    assert!(matches!("ab1".parse::<Rack>(), Err(EngineError::InvalidRack('1'))));
    assert!(matches!("abcdefgh".parse::<Rack>(), Err(EngineError::RackTooLarge(8))));
    assert!("".parse::<Rack>().unwrap().is_empty());
}

#[test]
fn rack_leave() {
    let rack: Rack = "cats?".parse().unwrap();
    let consumed = [RackTile::Letter(Letter(b'c')), RackTile::Blank];
    assert!(rack.contains_all(&consumed));
    let leave = rack.without(&consumed);
    assert_eq!(leave.tiles(), vec![
        RackTile::Letter(Letter(b'a')),
        RackTile::Letter(Letter(b's')),
        RackTile::Letter(Letter(b't')),
    ]);
    assert!(!leave.contains_all(&[RackTile::Blank]));

    let mut rack: Rack = "a*".parse().unwrap();
    assert_eq!(rack.take_for(Letter(b'a')), Some(RackTile::Letter(Letter(b'a'))));
    assert_eq!(rack.take_for(Letter(b'a')), Some(RackTile::Blank));
    assert_eq!(rack.take_for(Letter(b'a')), None);
}
