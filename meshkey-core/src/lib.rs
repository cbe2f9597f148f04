//! Meshkey Core - steganographic key embedding for glTF asset documents
//!
//! This crate hides a document's integer key inside the least-significant
//! decimal digits of its extent floats and issues an opaque 96-symbol
//! token recording everything needed to find the key again: which payload
//! slots matter (the header), the obfuscated user id, shuffle sequence,
//! issue timestamp and validity window (the payload), with random decoys
//! everywhere else.
//!
//! This is obfuscation, not encryption: the base60 mapping and digit
//! placement are discoverable by anyone holding the algorithm. The point
//! is that neither the document nor the token stores the key, the uid or
//! the timestamps in plain form.
//!
//! # Example
//!
//! ```
//! use meshkey_core::{decode, encode, SeededEntropy};
//! use serde_json::json;
//!
//! # fn main() -> meshkey_core::Result<()> {
//! let document = json!({
//!     "accessors": [
//!         {
//!             "count": 42,
//!             "max": [1.234567, 2.345678, 3.456789],
//!             "min": [-1.000001, -2.000002, -3.000003]
//!         },
//!         { "count": 42 },
//!         { "count": 42 }
//!     ]
//! });
//!
//! // Use the OS-seeded provider in production; seeded here for the doc test.
//! let mut entropy = SeededEntropy::new(7);
//! let sealed = encode(&document, 123456789, &[3, 17, 29], 300, &mut entropy)?;
//! assert_eq!(sealed.token.len(), 96);
//!
//! let opened = decode(&sealed.document, &sealed.token)?;
//! assert_eq!(opened.key, "42");
//! assert_eq!(opened.uid, "123456789");
//! assert_eq!(opened.validity_secs, "300");
//! # Ok(())
//! # }
//! ```

pub mod base60;
pub mod codec;
pub mod document;
pub mod entropy;
pub mod error;
pub mod layout;
pub mod matrix;
pub mod token;

// Re-export main types for convenience
pub use codec::{decode, encode, encode_at, DecodeOutcome, EncodeOutcome};
pub use document::COUNT_SENTINEL;
pub use entropy::{EntropySource, OsEntropy, SeededEntropy};
pub use error::{MeshkeyError, Result};
pub use layout::{Layout, LAYOUT};
pub use matrix::ShuffleMatrix;
pub use token::TokenFields;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Integration test: encode a document, decode it back, check every
    /// recovered field.
    #[test]
    fn test_full_codec_workflow() {
        let document = json!({
            "accessors": [
                {
                    "count": 90210,
                    "max": [10.123456, 20.234567, 30.345678],
                    "min": [-10.456789, -20.567891, -30.678912]
                },
                { "count": 90210 },
                { "count": 90210 }
            ]
        });

        let mut entropy = OsEntropy::new();
        let sequence = [14, 2, 27, 9, 21];
        let sealed = encode(&document, 42, &sequence, 600, &mut entropy)
            .expect("Failed to encode document");

        assert_eq!(sealed.token.len(), LAYOUT.token_len());
        for index in 0..3 {
            assert_eq!(
                sealed.document["accessors"][index]["count"],
                serde_json::Value::from(COUNT_SENTINEL)
            );
        }

        let opened = decode(&sealed.document, &sealed.token).expect("Failed to decode document");
        assert_eq!(opened.key, "90210");
        assert_eq!(opened.uid, "42");
        assert_eq!(opened.validity_secs, "600");
        for index in 0..3 {
            assert_eq!(
                opened.document["accessors"][index]["count"],
                serde_json::Value::from(90210u64)
            );
        }
    }
}
