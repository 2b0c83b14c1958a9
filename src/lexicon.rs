//! The word list, stored as an [`fst::Set`].
//!
//! An fst is a minimised prefix tree: walking it byte by byte from the root
//! answers prefix and membership queries, and [`LexiconNode`] exposes that walk.
//! The set is written once and then shared read-only between threads.

mod builder;
mod default_words;
mod node;

use std::path::Path;
use std::sync::OnceLock;
use std::time::Instant;

use fst::Set;

use crate::error::EngineError;
use crate::rack::Rack;
use crate::{Letter, BOARD_SIZE};

pub use builder::LexiconBuilder;
pub use node::LexiconNode;

#[derive(Default)]
pub struct Lexicon {
    words: OnceLock<Set<Vec<u8>>>,
}

impl std::fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.words.get() {
            Some(set) => write!(f, "Lexicon[{} words]", set.len()),
            None => write!(f, "Lexicon[not loaded]"),
        }
    }
}

impl Lexicon {
    /// An empty lexicon: every query answers "no" until [`Lexicon::load`]
    pub fn new() -> Self {
        Self::default()
    }

    /// A loaded lexicon holding exactly `words`
    ///
    /// Unlike [`Lexicon::load`] there is no fallback list.
    pub fn from_words<I, S>(words: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lexicon = Self::new();
        lexicon.install(LexiconBuilder::from_words(words).build()?);
        Ok(lexicon)
    }

    /// A lexicon holding the built-in word list
    pub fn built_in() -> Result<Self, EngineError> {
        Self::from_words(default_words::DEFAULT_WORDS.iter())
    }

    /// Loads the word list, once
    ///
    /// Loading an already loaded lexicon does nothing. When `words` yields
    /// nothing usable the built-in list is installed and the error returned.
    pub fn load<I, S>(&self, words: I) -> Result<usize, EngineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.is_loaded() {
            log::debug!("lexicon already loaded, ignoring load");
            return Ok(self.len());
        }
        let start = Instant::now();
        match LexiconBuilder::from_words(words).build() {
            Ok(set) => {
                self.install(set);
                log::info!("lexicon built in {:?} ({} words)", Instant::now() - start, self.len());
                Ok(self.len())
            }
            Err(err) => {
                self.fall_back(&err);
                Err(err)
            }
        }
    }

    /// Loads a `.txt` word list (one word per line) or a `.fst` file made by `make_fst`
    ///
    /// Failures install the built-in list, like [`Lexicon::load`].
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<usize, EngineError> {
        if self.is_loaded() {
            log::debug!("lexicon already loaded, ignoring load");
            return Ok(self.len());
        }
        match self.read_path(path.as_ref()) {
            Ok(n) => Ok(n),
            Err(err) => {
                self.fall_back(&err);
                Err(err)
            }
        }
    }

    fn read_path(&self, path: &Path) -> Result<usize, EngineError> {
        let start = Instant::now();
        match path.extension().and_then(|s| s.to_str()) {
            Some("fst") => {
                let data = std::fs::read(path)?;
                let set = Set::new(data)?;
                if set.is_empty() {
                    return Err(EngineError::EmptyLexicon);
                }
                self.install(set);
                log::info!("lexicon loaded in {:?} ({} words)", Instant::now() - start, self.len());
                Ok(self.len())
            }
            Some("txt") => {
                let text = std::fs::read_to_string(path)?;
                let set = LexiconBuilder::from_words(text.lines()).build()?;
                self.install(set);
                log::info!("lexicon built in {:?} ({} words)", Instant::now() - start, self.len());
                Ok(self.len())
            }
            other => Err(EngineError::UnsupportedLexiconFile(other.unwrap_or("").to_owned())),
        }
    }

    fn install(&self, set: Set<Vec<u8>>) {
        if self.words.set(set).is_err() {
            // another thread finished loading first
            log::debug!("lexicon loaded concurrently, keeping the first one");
        }
    }

    fn fall_back(&self, err: &EngineError) {
        log::warn!("lexicon load failed ({}), using the built-in word list", err);
        match LexiconBuilder::from_words(default_words::DEFAULT_WORDS.iter()).build() {
            Ok(set) => self.install(set),
            Err(err) => log::error!("built-in word list is unusable: {}", err),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.words.get().is_some()
    }

    pub(crate) fn fst(&self) -> Option<&Set<Vec<u8>>> {
        self.words.get()
    }

    pub fn len(&self) -> usize {
        self.words.get().map_or(0, |s| s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_word(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        match self.words.get() {
            Some(set) => set.contains(text.to_ascii_lowercase()),
            None => false,
        }
    }

    pub fn has_prefix(&self, text: &str) -> bool {
        match self.node(text) {
            Some(node) => node.is_terminal() || node.has_children(),
            None => false,
        }
    }

    pub fn root(&self) -> Option<LexiconNode<'_>> {
        self.words.get().map(|set| LexiconNode::root(set.as_fst()))
    }

    /// The node reached by reading `prefix` from the root
    pub fn node(&self, prefix: &str) -> Option<LexiconNode<'_>> {
        let mut node = self.root()?;
        for c in prefix.chars() {
            node = node.child(Letter::from_char(c)?)?;
        }
        Some(node)
    }

    /// Every word that can be spelled with `letters`
    ///
    /// The search starts at `prefix` (its letters are free, they are not taken
    /// from `letters`) and keeps words whose full length is within
    /// `min_len..=max_len` and that end with `suffix`. Blanks in `letters`
    /// stand for any letter.
    ///
    /// Sorted by decreasing length, then alphabetically.
    pub fn enumerate(
        &self,
        letters: &Rack,
        min_len: usize,
        max_len: usize,
        prefix: Option<&LexiconNode<'_>>,
        suffix: Option<&str>,
    ) -> Vec<String> {
        let start = match prefix {
            Some(node) => node.clone(),
            None => match self.root() {
                Some(root) => root,
                None => return vec![],
            },
        };
        let max_len = max_len.min(BOARD_SIZE);
        let suffix = suffix.map(|s| s.to_ascii_lowercase());

        let mut found = vec![];
        let mut path = start.path().to_vec();
        let mut available = letters.clone();
        collect_words(&start, &mut available, &mut path, min_len, max_len, suffix.as_deref(), &mut found);

        found.sort_unstable_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        found
    }
}

/// Depth first walk, taking a tile from `available` for every step and
/// putting it back when the branch is done
fn collect_words(
    node: &LexiconNode<'_>,
    available: &mut Rack,
    path: &mut Vec<u8>,
    min_len: usize,
    max_len: usize,
    suffix: Option<&str>,
    found: &mut Vec<String>,
) {
    if node.is_terminal()
        && path.len() >= min_len
        && path.len() <= max_len
        && suffix.map_or(true, |s| path.ends_with(s.as_bytes()))
    {
        found.push(String::from_utf8_lossy(&path[..]).into_owned());
    }
    if path.len() >= max_len || available.is_empty() {
        return;
    }
    for (letter, child) in node.children() {
        let tile = match available.take_for(letter) {
            Some(tile) => tile,
            None => continue,
        };
        path.push(letter.0);
        collect_words(&child, available, path, min_len, max_len, suffix, found);
        path.pop();
        available.add(tile);
    }
}

#[cfg(test)]
fn small() -> Lexicon {
    Lexicon::from_words(vec!["cat", "cats", "act", "at", "ta", "scat", "tacos", "coat", "a"]).unwrap()
}

#[test]
fn membership() {
    let lex = small();
    assert_eq!(lex.len(), 9);
    for w in &["cat", "cats", "act", "at", "ta", "scat", "tacos", "coat", "a"] {
        assert!(lex.is_word(w), "{}", w);
    }
    assert!(lex.is_word("CAT"));
    assert!(!lex.is_word("ca"));
    assert!(!lex.is_word("cast"));
    assert!(!lex.is_word(""));

    assert!(lex.has_prefix("ca"));
    assert!(lex.has_prefix("tacos"));
    assert!(lex.has_prefix(""));
    assert!(!lex.has_prefix("x"));
    assert!(!lex.has_prefix("cato"));
}

#[test]
fn unloaded_knows_nothing() {
    let lex = Lexicon::new();
    assert!(!lex.is_loaded());
    assert!(!lex.is_word("cat"));
    assert!(!lex.has_prefix("c"));
    assert!(lex.root().is_none());
    assert!(lex.enumerate(&"cat".parse().unwrap(), 1, 7, None, None).is_empty());
}

#[test]
fn load_is_idempotent() {
    let lex = Lexicon::new();
    assert_eq!(lex.load(vec!["cat", "cat", "Cat", "dog"]).unwrap(), 2);
    assert_eq!(lex.load(vec!["zebra"]).unwrap(), 2);
    assert!(!lex.is_word("zebra"));
}

#[test]
fn failed_load_falls_back() {
    let lex = Lexicon::new();
    assert!(matches!(lex.load(vec!["", "12", "a-b"]), Err(EngineError::EmptyLexicon)));
    assert!(lex.is_loaded());
    assert!(lex.len() > 50);
    assert!(lex.is_word("the"));

    let lex = Lexicon::new();
    assert!(lex.load_path("/nonexistent/words.txt").is_err());
    assert!(lex.is_word("the"));

    let lex = Lexicon::new();
    assert!(matches!(lex.load_path("words.csv"), Err(EngineError::UnsupportedLexiconFile(_))));
    assert!(lex.is_loaded());
}

#[test]
fn enumerate_from_rack() {
    let lex = small();
    let rack: Rack = "tacs".parse().unwrap();
    assert_eq!(
        lex.enumerate(&rack, 2, 7, None, None),
        vec!["cats", "scat", "act", "cat", "at", "ta"],
    );
    assert_eq!(lex.enumerate(&rack, 3, 3, None, None), vec!["act", "cat"]);
    assert_eq!(lex.enumerate(&rack, 2, 7, None, Some("t")), vec!["scat", "act", "cat", "at"]);

    // a blank stands for the missing o
    let rack: Rack = "tac*s".parse().unwrap();
    let words = lex.enumerate(&rack, 5, 5, None, None);
    assert_eq!(words, vec!["tacos"]);

    // the prefix letters are not taken from the rack
    let prefix = lex.node("co").unwrap();
    assert_eq!(lex.enumerate(&"t".parse().unwrap(), 2, 7, Some(&prefix), None), Vec::<String>::new());
    assert_eq!(lex.enumerate(&"at".parse().unwrap(), 2, 7, Some(&prefix), None), vec!["coat"]);
}

#[test]
fn enumerate_respects_counts() {
    let lex = small();
    let rack: Rack = "tacosx".parse().unwrap();
    for word in lex.enumerate(&rack, 1, 7, None, None) {
        assert!(lex.is_word(&word));
        let mut left = rack.clone();
        for c in word.chars() {
            assert!(left.take_for(Letter(c as u8)).is_some(), "{} overuses {}", word, c);
        }
    }
}
