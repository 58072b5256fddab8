use log::debug;

use crate::board::{Board, MAX_TILES};
use crate::trie::{Node, Trie};

/// Runs the depth-first search of `trie` over `board` and returns every
/// matched word, in no particular order.
///
/// The trie is consumed: matched words are cleared and exhausted branches
/// detached as the walk proceeds, so by the time this returns the trie has
/// nothing left to say about this board. Taking it by value keeps a pruned
/// trie from being reused by accident.
pub fn search(board: &Board, mut trie: Trie) -> Vec<String> {
    let mut engine = Engine {
        board,
        case_sensitive: trie.case_sensitive(),
        results: Vec::new(),
        scratch: Vec::new(),
    };

    let all_tiles = board.all_tiles_mask();
    let roots = trie.roots_mut();

    for letter in roots.keys().copied().collect::<Vec<char>>() {
        if let Some(root) = roots.get_mut(&letter) {
            if engine.visit(root, None, all_tiles, 0) {
                roots.remove(&letter);
            }
        }
    }

    debug!("search matched {} words", engine.results.len());
    engine.results
}

struct Engine<'b> {
    board: &'b Board,
    case_sensitive: bool,
    results: Vec<String>,
    // One tile-index buffer per recursion depth, reused across visits.
    scratch: Vec<Vec<usize>>,
}

impl Engine<'_> {
    /// Visits one trie node with the tiles still `available` on the current
    /// path. Returns true when the node is exhausted and should be detached
    /// by its parent.
    fn visit(
        &mut self,
        node: &mut Node,
        previous: Option<usize>,
        available: u64,
        depth: usize,
    ) -> bool {
        let mut candidates =
            available & self.board.tiles_with_char(node.letter(), self.case_sensitive);
        if let Some(previous) = previous {
            candidates &= self.board.neighbors(previous);
        }
        if candidates == 0 {
            // Nothing on this path; the node may still match on another.
            return node.is_exhausted();
        }

        // The node's word is reachable through any candidate tile. Emit it
        // once and clear it so an alternate path cannot emit it again.
        if let Some(word) = node.take_word() {
            self.results.push(word);
        }

        if node.has_children() {
            let mut tiles = self.take_scratch(depth);
            expand_bits(candidates, &mut tiles);
            let letters = node.child_letters();

            for &tile in &tiles {
                let remaining = available & !(1u64 << tile);
                for &letter in &letters {
                    // A child detached on an earlier tile is gone for good.
                    let exhausted = match node.child_mut(letter) {
                        Some(child) => self.visit(child, Some(tile), remaining, depth + 1),
                        None => continue,
                    };
                    if exhausted {
                        node.detach_child(letter);
                    }
                }
                if !node.has_children() {
                    break;
                }
            }

            self.put_scratch(depth, tiles);
        }

        node.is_exhausted()
    }

    fn take_scratch(&mut self, depth: usize) -> Vec<usize> {
        while self.scratch.len() <= depth {
            self.scratch.push(Vec::with_capacity(MAX_TILES));
        }
        std::mem::take(&mut self.scratch[depth])
    }

    fn put_scratch(&mut self, depth: usize, buffer: Vec<usize>) {
        self.scratch[depth] = buffer;
    }
}

/// Expands the set bits of `mask` into tile indices.
fn expand_bits(mask: u64, out: &mut Vec<usize>) {
    out.clear();
    let mut bits = mask;
    while bits != 0 {
        out.push(bits.trailing_zeros() as usize);
        bits &= bits - 1;
    }
}
