//! Boggle-style word search over a letter grid.
//!
//! A [`Board`] precomputes a 64-bit adjacency mask per tile and position
//! masks per character; a [`Trie`] holds the dictionary filtered down to
//! words the board could possibly spell; [`solve::search`] walks both in
//! lock-step, pruning trie branches as they are exhausted.
//!
//! ```no_run
//! use gridwords::Board;
//!
//! let board = Board::new(2, 2, vec!['m', 'a', 't', 'r'])?;
//! let words = board.solve_file("wordlist.txt", 4, false)?;
//! # Ok::<(), gridwords::Error>(())
//! ```

pub mod board;
pub mod error;
pub mod solve;
pub mod trie;

pub use board::Board;
pub use error::Error;
pub use trie::Trie;

/// Simple one-character case fold. Characters whose lower-case form
/// expands to more than one character are left as-is.
pub(crate) fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(folded), None) => folded,
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::fold_char;

    #[test]
    fn fold_char_lowercases() {
        assert_eq!(fold_char('M'), 'm');
        assert_eq!(fold_char('m'), 'm');
        assert_eq!(fold_char('Ä'), 'ä');
        assert_eq!(fold_char('日'), '日');
    }
}
