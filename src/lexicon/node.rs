use fst::raw::{CompiledAddr, Fst, Node};

use crate::Letter;

/// A read-only position in the lexicon's prefix tree
///
/// Knows the letters read from the root to get there.
#[derive(Clone)]
pub struct LexiconNode<'a> {
    fst: &'a Fst<Vec<u8>>,
    node: Node<'a>,
    path: Vec<u8>,
}

impl<'a> LexiconNode<'a> {
    pub(super) fn root(fst: &'a Fst<Vec<u8>>) -> Self {
        Self {
            fst,
            node: fst.root(),
            path: vec![],
        }
    }

    fn descend(&self, letter: u8, addr: CompiledAddr) -> Self {
        let mut path = self.path.clone();
        path.push(letter);
        Self {
            fst: self.fst,
            node: self.fst.node(addr),
            path,
        }
    }

    /// A complete word ends here
    pub fn is_terminal(&self) -> bool {
        self.node.is_final()
    }

    pub fn has_children(&self) -> bool {
        self.node.len() > 0
    }

    pub fn child(&self, letter: Letter) -> Option<LexiconNode<'a>> {
        let i = self.node.find_input(letter.0)?;
        let t = self.node.transition(i);
        Some(self.descend(t.inp, t.addr))
    }

    pub fn children(&self) -> Vec<(Letter, LexiconNode<'a>)> {
        self.node
            .transitions()
            .filter(|t| t.inp.is_ascii_lowercase())
            .map(|t| (Letter(t.inp), self.descend(t.inp, t.addr)))
            .collect()
    }

    /// The letters from the root to this node
    pub fn path(&self) -> &[u8] {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Words that go through this node, including the one ending here
    pub fn word_count(&self) -> usize {
        fn count(fst: &Fst<Vec<u8>>, node: &Node<'_>) -> usize {
            let own = if node.is_final() { 1 } else { 0 };
            own + node.transitions().map(|t| count(fst, &fst.node(t.addr))).sum::<usize>()
        }
        count(self.fst, &self.node)
    }
}

impl std::fmt::Debug for LexiconNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "LexiconNode({:?}, terminal: {})",
            String::from_utf8_lossy(&self.path),
            self.is_terminal()
        )
    }
}

#[test]
fn walk_the_tree() {
    let lex = crate::Lexicon::from_words(vec!["car", "card", "care", "cat", "dog"]).unwrap();
    let root = lex.root().unwrap();
    assert_eq!(root.word_count(), 5);
    assert!(!root.is_terminal());

    let letters: Vec<_> = root.children().into_iter().map(|(l, _)| l).collect();
    assert_eq!(letters, vec![Letter(b'c'), Letter(b'd')]);

    let car = lex.node("car").unwrap();
    assert!(car.is_terminal());
    assert_eq!(car.path(), b"car");
    assert_eq!(car.depth(), 3);
    assert_eq!(car.word_count(), 3);
    assert_eq!(lex.node("ca").unwrap().word_count(), 4);
    assert!(car.child(Letter(b'z')).is_none());
    assert!(lex.node("cart").is_none());
}
