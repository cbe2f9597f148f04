//! The shuffle matrix: a 6x5 grid of decimal digits spread across the six
//! extent floats of a document.
//!
//! The hidden key's digits sit at the cells named by the shuffle sequence;
//! every other cell is a random decoy, so the grid alone does not reveal
//! which digits are meaningful or how many there are.

use crate::entropy::EntropySource;
use crate::error::{MeshkeyError, Result};
use crate::layout::LAYOUT;
use crate::token::decimal_width;

/// Row-major 6x5 digit grid. Flat offset `o` addresses row `o / 5`,
/// column `o % 5`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffleMatrix {
    cells: [u8; LAYOUT.matrix_size()],
}

impl ShuffleMatrix {
    /// Conceal `key` in a fresh matrix: digit `i` (counting from the
    /// least-significant end) goes to cell `sequence[i]`, every unnamed
    /// cell gets a decoy digit from `entropy`.
    ///
    /// The key must fit the sequence; a key with more significant digits
    /// than the sequence has entries would lose its high digits, so that
    /// is rejected up front.
    pub fn conceal(
        key: u64,
        sequence: &[u8],
        entropy: &mut impl EntropySource,
    ) -> Result<Self> {
        let digits = decimal_width(key);
        if digits > sequence.len() || digits > LAYOUT.seq_len {
            return Err(MeshkeyError::FieldTooLong {
                field: "hidden key",
                digits,
                capacity: sequence.len().min(LAYOUT.seq_len),
            });
        }

        let mut cells = [0u8; LAYOUT.matrix_size()];
        let mut named = [false; LAYOUT.matrix_size()];
        for (i, &offset) in sequence.iter().enumerate() {
            Self::check_offset(offset)?;
            cells[offset as usize] = ((key / 10u64.pow(i as u32)) % 10) as u8;
            named[offset as usize] = true;
        }
        for (cell, taken) in cells.iter_mut().zip(named) {
            if !taken {
                *cell = entropy.digit();
            }
        }

        Ok(Self { cells })
    }

    /// Rebuild a matrix from cells read out of a document.
    pub fn from_cells(cells: [u8; LAYOUT.matrix_size()]) -> Self {
        Self { cells }
    }

    /// Read the key back: walk the sequence in order, collecting digits
    /// least significant first, and normalize away the zero padding.
    pub fn recover_key(&self, sequence: &[u8]) -> Result<u64> {
        let mut key = 0u64;
        for &offset in sequence.iter().rev() {
            Self::check_offset(offset)?;
            key = key * 10 + self.cells[offset as usize] as u64;
        }
        Ok(key)
    }

    /// The five digits destined for float `row` (0..3 map onto `max`,
    /// 3..6 onto `min`).
    pub fn row(&self, row: usize) -> &[u8] {
        &self.cells[row * LAYOUT.matrix_cols..(row + 1) * LAYOUT.matrix_cols]
    }

    fn check_offset(offset: u8) -> Result<()> {
        if offset as usize >= LAYOUT.matrix_size() {
            return Err(MeshkeyError::InvalidSequence(format!(
                "offset {offset} outside matrix (0..{})",
                LAYOUT.matrix_size()
            )));
        }
        Ok(())
    }
}
