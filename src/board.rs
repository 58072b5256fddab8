use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::info;
use rustc_hash::FxHashMap;

use crate::error::Error;
use crate::fold_char;
use crate::solve;
use crate::trie::Trie;

/// Hard ceiling on the tile count: every adjacency and availability mask
/// has to fit in one 64-bit word.
pub const MAX_TILES: usize = 64;

/// A letter grid with precomputed adjacency and per-character position masks.
///
/// Tiles are stored row-major (`index = row * width + col`). All masks are
/// computed once at construction; a `Board` is immutable afterwards and can
/// be shared freely between solves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    tiles: Vec<char>,
    adjacency: Vec<u64>,
    positions: FxHashMap<char, u64>,
    positions_folded: FxHashMap<char, u64>,
    letter_counts: FxHashMap<char, u32>,
}

impl Board {
    pub fn new(width: usize, height: usize, tiles: Vec<char>) -> Result<Board, Error> {
        if width * height != tiles.len() {
            return Err(Error::DimensionMismatch {
                width,
                height,
                tiles: tiles.len(),
            });
        }
        if tiles.len() > MAX_TILES {
            return Err(Error::TooManyTiles(tiles.len()));
        }

        let mut positions: FxHashMap<char, u64> = FxHashMap::default();
        let mut positions_folded: FxHashMap<char, u64> = FxHashMap::default();
        let mut letter_counts: FxHashMap<char, u32> = FxHashMap::default();

        for (index, &tile) in tiles.iter().enumerate() {
            *positions.entry(tile).or_insert(0) |= 1 << index;
            *positions_folded.entry(fold_char(tile)).or_insert(0) |= 1 << index;
            *letter_counts.entry(tile).or_insert(0) += 1;
        }

        Ok(Board {
            adjacency: adjacency_masks(width, height),
            width,
            height,
            tiles,
            positions,
            positions_folded,
            letter_counts,
        })
    }

    /// Parses a board from a string of letters, ignoring whitespace.
    pub fn parse(contents: &str, width: usize, height: usize) -> Result<Board, Error> {
        let tiles: Vec<char> = contents.chars().filter(|c| !c.is_whitespace()).collect();
        Board::new(width, height, tiles)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Mask of the up-to-8 grid neighbors of tile `index`.
    pub fn neighbors(&self, index: usize) -> u64 {
        self.adjacency[index]
    }

    /// Mask with every tile bit set.
    pub fn all_tiles_mask(&self) -> u64 {
        match self.tiles.len() {
            64 => u64::MAX,
            n => (1u64 << n) - 1,
        }
    }

    /// Mask of the tiles bearing `c`, or an empty mask if the character
    /// never appears on the board. Case-insensitive lookup folds `c` and
    /// matches it against folded tiles.
    pub fn tiles_with_char(&self, c: char, case_sensitive: bool) -> u64 {
        let mask = if case_sensitive {
            self.positions.get(&c)
        } else {
            self.positions_folded.get(&fold_char(c))
        };
        mask.copied().unwrap_or(0)
    }

    /// Case-sensitive occurrence counts of every character on the board.
    pub fn letter_counts(&self) -> &FxHashMap<char, u32> {
        &self.letter_counts
    }

    /// Solves the board against a word list file, one candidate per line.
    pub fn solve_file<P: AsRef<Path>>(
        &self,
        dict: P,
        min_word_length: usize,
        case_sensitive: bool,
    ) -> Result<Vec<String>, Error> {
        // Precondition runs before any file access.
        self.check_min_word_length(min_word_length)?;
        let file = File::open(dict)?;
        self.solve_words(BufReader::new(file), min_word_length, case_sensitive)
    }

    /// Solves the board against an already-open word source.
    pub fn solve_words<R: BufRead>(
        &self,
        words: R,
        min_word_length: usize,
        case_sensitive: bool,
    ) -> Result<Vec<String>, Error> {
        self.check_min_word_length(min_word_length)?;
        let trie = Trie::from_reader(words, &self.letter_counts, min_word_length, case_sensitive)?;
        info!("trie holds {} candidate words", trie.word_count());
        Ok(solve::search(self, trie))
    }

    fn check_min_word_length(&self, min_word_length: usize) -> Result<(), Error> {
        if min_word_length > self.tiles.len() {
            return Err(Error::MinWordLength {
                min_word_length,
                tiles: self.tiles.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                write!(f, "{}", self.tiles[row * self.width + col])?;
                if col != self.width - 1 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// One adjacency mask per tile, built with O(1) shifts per tile: a
/// left/self/right mask centered on the tile is shifted onto the row above,
/// the row below, and (with the self bit cleared) kept for the tile's own
/// row.
fn adjacency_masks(width: usize, height: usize) -> Vec<u64> {
    let count = width * height;
    let mut masks = Vec::with_capacity(count);

    for index in 0..count {
        let row = index / width;
        let col = index % width;

        let mut row_mask = 1u64 << index;
        if col > 0 {
            row_mask |= 1 << (index - 1);
        }
        if col + 1 < width {
            row_mask |= 1 << (index + 1);
        }

        let mut adjacent = row_mask & !(1 << index);
        if row > 0 {
            adjacent |= shift(row_mask, -(width as i32));
        }
        if row + 1 < height {
            adjacent |= shift(row_mask, width as i32);
        }
        masks.push(adjacent);
    }

    masks
}

/// Shifts left for positive amounts and right for negative ones. A bare
/// `<<` would wrap on a negative amount rather than reverse direction.
fn shift(mask: u64, amount: i32) -> u64 {
    if amount < 0 {
        mask >> -amount
    } else {
        mask << amount
    }
}

#[cfg(test)]
mod tests {
    use super::{adjacency_masks, Board};
    use crate::error::Error;

    fn three_by_three() -> Board {
        Board::new(3, 3, "yoxrbaved".chars().collect()).unwrap()
    }

    #[test]
    fn neighbors_calculated_properly() {
        let expected: [u64; 9] = [
            0x1A, 0x3D, 0x32, //
            0xD3, 0x1EF, 0x196, //
            0x98, 0x178, 0xB0,
        ];

        let board = three_by_three();
        for (index, &mask) in expected.iter().enumerate() {
            assert_eq!(board.neighbors(index), mask, "tile {}", index);
        }
    }

    #[test]
    fn neighbor_counts_by_position() {
        let masks = adjacency_masks(4, 4);

        // corner, non-corner edge, interior
        assert_eq!(masks[0].count_ones(), 3);
        assert_eq!(masks[1].count_ones(), 5);
        assert_eq!(masks[5].count_ones(), 8);
    }

    #[test]
    fn center_tile_sees_all_eight() {
        let board = three_by_three();
        assert_eq!(board.neighbors(4), 0b1_1110_1111);
    }

    #[test]
    fn wrong_dimensions_rejected() {
        let result = Board::new(4, 3, "yoxrbaved".chars().collect());
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn oversized_board_rejected() {
        let tiles: Vec<char> = std::iter::repeat('a').take(65).collect();
        let result = Board::new(13, 5, tiles);
        assert!(matches!(result, Err(Error::TooManyTiles(65))));
    }

    #[test]
    fn full_sixty_four_tile_board_accepted() {
        let tiles: Vec<char> = std::iter::repeat('a').take(64).collect();
        let board = Board::new(8, 8, tiles).unwrap();
        assert_eq!(board.all_tiles_mask(), u64::MAX);
        assert_eq!(board.tiles_with_char('a', true), u64::MAX);
    }

    #[test]
    fn position_masks_respect_case() {
        let board = Board::new(2, 2, vec!['M', 'a', 't', 'r']).unwrap();

        assert_eq!(board.tiles_with_char('M', true), 0b0001);
        assert_eq!(board.tiles_with_char('m', true), 0);
        assert_eq!(board.tiles_with_char('m', false), 0b0001);
        assert_eq!(board.tiles_with_char('q', false), 0);
    }

    #[test]
    fn letter_counts_are_case_sensitive() {
        let board = Board::new(2, 2, vec!['M', 'a', 'm', 'a']).unwrap();

        assert_eq!(board.letter_counts().get(&'M'), Some(&1));
        assert_eq!(board.letter_counts().get(&'m'), Some(&1));
        assert_eq!(board.letter_counts().get(&'a'), Some(&2));
    }

    #[test]
    fn empty_board_constructs() {
        let board = Board::new(0, 0, vec![]).unwrap();
        assert_eq!(board.tile_count(), 0);
        assert_eq!(board.all_tiles_mask(), 0);
    }

    #[test]
    fn parse_ignores_whitespace() {
        let board = Board::parse("m a\nt r\n", 2, 2).unwrap();
        assert_eq!(board, Board::new(2, 2, vec!['m', 'a', 't', 'r']).unwrap());
    }
}
