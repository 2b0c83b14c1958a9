use super::Letter;

/// Letters allowed on a square by the word crossing it
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct LetterSet {
    // bit i is one if the i-th letter of the alphabet is in it
    accepted: u32,
}

impl LetterSet {
    const ALL: u32 = (1 << 26) - 1;

    pub fn empty() -> Self {
        Self { accepted: 0 }
    }
    pub fn any() -> Self {
        Self { accepted: Self::ALL }
    }
    pub fn contains(&self, letter: Letter) -> bool {
        letter.0.is_ascii_lowercase() && (self.accepted & (1 << letter.index())) != 0
    }
    pub fn insert(&mut self, letter: Letter) {
        if letter.0.is_ascii_lowercase() {
            self.accepted |= 1 << letter.index()
        }
    }
    pub fn is_empty(&self) -> bool {
        self.accepted == 0
    }
    pub fn is_any(&self) -> bool {
        self.accepted == Self::ALL
    }
}

impl Default for LetterSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::iter::FromIterator<Letter> for LetterSet {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Letter>,
    {
        let mut tmp = Self::default();
        iter.into_iter().for_each(|l| tmp.insert(l));
        tmp
    }
}

use std::fmt;

impl fmt::Debug for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_any() {
            write!(f, ".")
        } else {
            write!(f, "[")?;
            for l in Letter::alphabet() {
                if self.contains(l) {
                    write!(f, "{}", l)?;
                }
            }
            write!(f, "]")
        }
    }
}

#[test]
fn letter_set() {
    let empty = LetterSet::empty();
    assert!(Letter::alphabet().all(|l| !empty.contains(l)));
    assert!(empty.is_empty());
    assert!(!empty.is_any());

    let some: LetterSet = b"zqaq".iter().map(|&l| Letter(l)).collect();
    for l in Letter::alphabet() {
        assert_eq!(some.contains(l), b"zqa".contains(&l.0));
    }
    assert!(!some.contains(Letter(b'#')));
    assert_eq!(format!("{:?}", some), "[aqz]");

    let any = LetterSet::any();
    assert!(Letter::alphabet().all(|l| any.contains(l)));
    assert!(any.is_any());
    assert_eq!(format!("{:?}", any), ".");
}
