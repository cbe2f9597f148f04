//! Fixed wire-layout parameters shared by the token codec and the shuffle
//! matrix.
//!
//! These widths are a compatibility contract between encoders and every
//! viewer that decodes the resulting documents: once chosen they must not
//! change, or previously issued tokens stop resolving.

/// Wire layout of a token and the digit matrix it addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Decimal digits reserved for the user id.
    pub uid_len: usize,
    /// Slots reserved for the shuffle sequence (also the maximum number of
    /// hidden-key digits).
    pub seq_len: usize,
    /// Decimal digits reserved for the Unix-seconds issue timestamp.
    pub ts_len: usize,
    /// Decimal digits reserved for the validity window (seconds).
    pub tsv_len: usize,
    /// Matrix rows; rows 0..3 map onto `max[0..3]`, rows 3..6 onto `min[0..3]`.
    pub matrix_rows: usize,
    /// Digits substituted per float.
    pub matrix_cols: usize,
}

/// The one layout every component in this crate speaks.
pub const LAYOUT: Layout = Layout {
    uid_len: 10,
    seq_len: 10,
    ts_len: 10,
    tsv_len: 5,
    matrix_rows: 6,
    matrix_cols: 5,
};

impl Layout {
    /// Header length: one payload offset per reserved field slot.
    pub const fn header_len(&self) -> usize {
        self.uid_len + self.seq_len + self.ts_len + self.tsv_len
    }

    /// Payload slots addressable by header offsets.
    pub const fn active_payload_len(&self) -> usize {
        60
    }

    /// Full payload length: 60 addressable slots plus one trailing slot
    /// that no header offset can reach and that always holds a decoy.
    pub const fn payload_len(&self) -> usize {
        self.active_payload_len() + 1
    }

    /// Total token length in symbols.
    pub const fn token_len(&self) -> usize {
        self.header_len() + self.payload_len()
    }

    /// Matrix cell count; flat offsets live in `0..matrix_size()`.
    pub const fn matrix_size(&self) -> usize {
        self.matrix_rows * self.matrix_cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_totals() {
        assert_eq!(LAYOUT.header_len(), 35);
        assert_eq!(LAYOUT.payload_len(), 61);
        assert_eq!(LAYOUT.token_len(), 96);
        assert_eq!(LAYOUT.matrix_size(), 30);
    }
}
