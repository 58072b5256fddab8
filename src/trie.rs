use std::collections::BTreeMap;
use std::fmt;
use std::io::BufRead;

use log::debug;
use rustc_hash::FxHashMap;

use crate::error::Error;
use crate::fold_char;

/// One node of the dictionary tree. `word` is set only on nodes that
/// terminate an accepted dictionary word and is cleared by the search the
/// first time the word is confirmed on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    letter: char,
    word: Option<String>,
    children: BTreeMap<char, Node>,
}

impl Node {
    pub fn new(letter: char, word: Option<&str>, children: Vec<Node>) -> Node {
        Node {
            letter,
            word: word.map(str::to_owned),
            children: children.into_iter().map(|c| (c.letter, c)).collect(),
        }
    }

    fn leaf(letter: char) -> Node {
        Node {
            letter,
            word: None,
            children: BTreeMap::new(),
        }
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    pub fn word(&self) -> Option<&str> {
        self.word.as_deref()
    }

    /// Children in ascending character order.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.values()
    }

    pub(crate) fn take_word(&mut self) -> Option<String> {
        self.word.take()
    }

    pub(crate) fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Snapshot of child keys, so children can be detached while iterating.
    pub(crate) fn child_letters(&self) -> Vec<char> {
        self.children.keys().copied().collect()
    }

    pub(crate) fn child_mut(&mut self, letter: char) -> Option<&mut Node> {
        self.children.get_mut(&letter)
    }

    pub(crate) fn detach_child(&mut self, letter: char) {
        self.children.remove(&letter);
    }

    /// A node with no word and no children can never match again.
    pub(crate) fn is_exhausted(&self) -> bool {
        self.word.is_none() && self.children.is_empty()
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            write!(f, "  ")?;
        }
        write!(f, "{}", self.letter)?;
        if let Some(word) = &self.word {
            write!(f, " [{}]", word)?;
        }
        writeln!(f)?;
        for child in self.children.values() {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

/// Prefix tree over the dictionary, scoped to one board's letter inventory.
///
/// Words that cannot possibly be traced on the board (too short, too long,
/// or needing more copies of a letter than the board holds) are filtered
/// out up front, which keeps the tree small no matter how large the word
/// list is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trie {
    roots: BTreeMap<char, Node>,
    word_count: usize,
    case_sensitive: bool,
}

impl Trie {
    /// Builds a trie from an open word source, one candidate per line.
    pub fn from_reader<R: BufRead>(
        reader: R,
        letter_counts: &FxHashMap<char, u32>,
        min_word_length: usize,
        case_sensitive: bool,
    ) -> Result<Trie, Error> {
        let mut lines = Vec::new();
        for line in reader.lines() {
            lines.push(line?);
        }
        Trie::build(&lines, letter_counts, min_word_length, case_sensitive)
    }

    /// Builds a trie from in-memory lines.
    pub fn build<S: AsRef<str>>(
        lines: &[S],
        letter_counts: &FxHashMap<char, u32>,
        min_word_length: usize,
        case_sensitive: bool,
    ) -> Result<Trie, Error> {
        // Case-insensitive matching folds both sides: the inventory here
        // (merging counts of letters that fold together) and each line below.
        let mut tile_counts: Vec<(char, u32)> = if case_sensitive {
            letter_counts.iter().map(|(&c, &n)| (c, n)).collect()
        } else {
            let mut folded: FxHashMap<char, u32> = FxHashMap::default();
            for (&c, &n) in letter_counts {
                *folded.entry(fold_char(c)).or_insert(0) += n;
            }
            folded.into_iter().collect()
        };
        tile_counts.sort_unstable_by_key(|&(c, _)| c);

        let max_word_length: usize = tile_counts.iter().map(|&(_, n)| n as usize).sum();
        let mut scratch = tile_counts.clone();

        let mut trie = Trie {
            roots: BTreeMap::new(),
            word_count: 0,
            case_sensitive,
        };

        for (index, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let word: String = if case_sensitive {
                line.to_owned()
            } else {
                line.chars().map(fold_char).collect()
            };

            if feasible(
                &word,
                min_word_length,
                max_word_length,
                &tile_counts,
                &mut scratch,
                index + 1,
            )? {
                trie.insert(&word);
            }
        }

        debug!(
            "accepted {} of {} dictionary lines",
            trie.word_count,
            lines.len()
        );
        Ok(trie)
    }

    fn insert(&mut self, word: &str) {
        let mut chars = word.chars();
        let first = match chars.next() {
            Some(c) => c,
            None => return,
        };

        let mut node = self.roots.entry(first).or_insert_with(|| Node::leaf(first));
        for c in chars {
            node = node.children.entry(c).or_insert_with(|| Node::leaf(c));
        }
        node.word = Some(word.to_owned());
        self.word_count += 1;
    }

    /// Top-level nodes in ascending character order.
    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.roots.values()
    }

    pub(crate) fn roots_mut(&mut self) -> &mut BTreeMap<char, Node> {
        &mut self.roots
    }

    /// Number of accepted dictionary lines.
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

impl fmt::Display for Trie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for root in self.roots.values() {
            root.fmt_indented(f, 0)?;
        }
        Ok(())
    }
}

/// Decides whether `word` could ever be traced on the board, by spending
/// board letters out of a scratch copy of the inventory. A control
/// character is a fatal format error rather than a skipped line.
fn feasible(
    word: &str,
    min_word_length: usize,
    max_word_length: usize,
    tile_counts: &[(char, u32)],
    scratch: &mut Vec<(char, u32)>,
    line: usize,
) -> Result<bool, Error> {
    let length = word.chars().count();
    if word.trim().is_empty() || length < min_word_length || length > max_word_length {
        return Ok(false);
    }

    scratch.clear();
    scratch.extend_from_slice(tile_counts);

    for c in word.chars() {
        if c.is_control() {
            return Err(Error::ControlCharacter { line });
        }
        match scratch.binary_search_by_key(&c, |&(letter, _)| letter) {
            Ok(index) if scratch[index].1 > 0 => scratch[index].1 -= 1,
            _ => return Ok(false),
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::{Node, Trie};
    use crate::error::Error;
    use rustc_hash::FxHashMap;

    fn counts(pairs: &[(char, u32)]) -> FxHashMap<char, u32> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn feasibility_respects_letter_inventory() {
        // Two a tiles can never trace a word needing three.
        let trie = Trie::build(&["aab", "aaab"], &counts(&[('a', 2), ('b', 1)]), 1, true).unwrap();

        assert_eq!(trie.word_count(), 1);
        assert_eq!(trie.roots().count(), 1);
    }

    #[test]
    fn length_bounds_enforced() {
        let inventory = counts(&[('a', 1), ('b', 1), ('c', 1)]);

        // "ab" is below the minimum, "abca" needs four letters from three
        // tiles, the other two lines are blank.
        let trie = Trie::build(&["ab", "abc", "abca", "", "   "], &inventory, 3, true).unwrap();

        assert_eq!(trie.word_count(), 1);
    }

    #[test]
    fn control_character_is_a_format_error() {
        let result = Trie::build(
            &["abc", "a\tc"],
            &counts(&[('a', 1), ('b', 1), ('c', 1), ('\t', 1)]),
            1,
            true,
        );

        assert!(matches!(result, Err(Error::ControlCharacter { line: 2 })));
    }

    #[test]
    fn case_insensitive_folds_words_and_inventory() {
        // One 'A' tile and one 'a' tile fold into two a's.
        let trie = Trie::build(&["AA", "aA"], &counts(&[('A', 1), ('a', 1)]), 1, false).unwrap();

        assert_eq!(trie.word_count(), 2);
        let root = trie.roots().next().unwrap();
        assert_eq!(root.letter(), 'a');
        assert_eq!(root.children().next().unwrap().word(), Some("aa"));
    }

    #[test]
    fn lower_case_tree_structure() {
        let trie = Trie::build(
            &["a", "aa", "aaa", "ab", "aba", "ba", "cabbage"],
            &counts(&[('a', 2), ('b', 1), ('c', 1)]),
            1,
            true,
        )
        .unwrap();

        let expected = vec![
            Node::new(
                'a',
                Some("a"),
                vec![
                    Node::new('a', Some("aa"), vec![]),
                    Node::new('b', Some("ab"), vec![Node::new('a', Some("aba"), vec![])]),
                ],
            ),
            Node::new('b', None, vec![Node::new('a', Some("ba"), vec![])]),
        ];

        assert_eq!(trie.word_count(), 5);
        assert!(trie.roots().eq(expected.iter()));
    }

    #[test]
    fn mixed_case_tree_structure() {
        let trie = Trie::build(
            &["A", "Aa", "Aba", "a", "ab", "ba", "baA"],
            &counts(&[('A', 1), ('a', 1), ('b', 1), ('c', 1)]),
            1,
            true,
        )
        .unwrap();

        let expected = vec![
            Node::new(
                'A',
                Some("A"),
                vec![
                    Node::new('a', Some("Aa"), vec![]),
                    Node::new('b', None, vec![Node::new('a', Some("Aba"), vec![])]),
                ],
            ),
            Node::new('a', Some("a"), vec![Node::new('b', Some("ab"), vec![])]),
            Node::new(
                'b',
                None,
                vec![Node::new(
                    'a',
                    Some("ba"),
                    vec![Node::new('A', Some("baA"), vec![])],
                )],
            ),
        ];

        assert!(trie.roots().eq(expected.iter()));
    }

    #[test]
    fn roots_iterate_in_ascending_order() {
        let trie = Trie::build(
            &["ca", "ab", "bc"],
            &counts(&[('a', 1), ('b', 1), ('c', 1)]),
            1,
            true,
        )
        .unwrap();

        let letters: Vec<char> = trie.roots().map(Node::letter).collect();
        assert_eq!(letters, vec!['a', 'b', 'c']);
    }

    #[test]
    fn from_reader_matches_build() {
        use std::io::Cursor;

        let inventory = counts(&[('a', 1), ('b', 1), ('c', 1)]);
        let from_reader =
            Trie::from_reader(Cursor::new("abc\nbca\n"), &inventory, 1, true).unwrap();
        let built = Trie::build(&["abc", "bca"], &inventory, 1, true).unwrap();

        assert_eq!(from_reader, built);
    }
}
