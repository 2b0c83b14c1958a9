use std::collections::BTreeSet;

use fst::{Set, SetBuilder};

use crate::error::EngineError;

/// Collects words before they are frozen into an fst
///
/// Words are lowercased. Anything empty or holding a character outside a-z is
/// skipped. Inserting a word twice keeps one copy.
#[derive(Debug, Default, Clone)]
pub struct LexiconBuilder {
    words: BTreeSet<String>,
    skipped: usize,
}

impl LexiconBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = Self::new();
        for w in words {
            builder.insert(w.as_ref());
        }
        builder
    }

    /// Returns true if the word was new
    pub fn insert(&mut self, word: &str) -> bool {
        let word = word.trim().to_ascii_lowercase();
        if word.is_empty() || !word.bytes().all(|b| b.is_ascii_lowercase()) {
            self.skipped += 1;
            if !word.is_empty() {
                log::trace!("skipping word {:?}", word);
            }
            return false;
        }
        self.words.insert(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Writes the words to `wtr` as an fst, they are already sorted
    pub fn write_to<W: std::io::Write>(&self, wtr: W) -> Result<usize, EngineError> {
        if self.words.is_empty() {
            return Err(EngineError::EmptyLexicon);
        }
        let mut build = SetBuilder::new(wtr)?;
        build.extend_iter(self.words.iter())?;
        build.finish()?;
        Ok(self.words.len())
    }

    pub fn build(&self) -> Result<Set<Vec<u8>>, EngineError> {
        if self.words.is_empty() {
            return Err(EngineError::EmptyLexicon);
        }
        if self.skipped > 0 {
            log::warn!("{} entries of the word list were not valid words", self.skipped);
        }
        let mut build = SetBuilder::memory();
        build.extend_iter(self.words.iter())?;
        Ok(build.into_set())
    }
}

#[test]
fn normalizes_and_dedups() {
    let mut builder = LexiconBuilder::new();
    assert!(builder.insert("Cat"));
    assert!(!builder.insert("cat"));
    assert!(builder.insert("  dog\r"));
    assert!(!builder.insert(""));
    assert!(!builder.insert("don't"));
    assert_eq!(builder.len(), 2);

    let set = builder.build().unwrap();
    assert!(set.contains("cat"));
    assert!(set.contains("dog"));

    let mut bytes = vec![];
    assert_eq!(builder.write_to(&mut bytes).unwrap(), 2);
    let reloaded = Set::new(bytes).unwrap();
    assert_eq!(reloaded.len(), 2);

    assert!(matches!(LexiconBuilder::new().build(), Err(EngineError::EmptyLexicon)));
}
