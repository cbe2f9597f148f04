//! Token assembly and parsing.
//!
//! A token is 96 base60 symbols: a 35-symbol header followed by a
//! 61-symbol payload. Each header symbol names one of the 60 addressable
//! payload slots; in draw order the named slots belong to the uid (10),
//! the shuffle sequence (10), the issue timestamp (10) and the validity
//! window (5). Named slots carry obfuscated field digits, every other slot
//! carries a uniformly random decoy, so the token reveals nothing about
//! which symbols matter without walking the header.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::base60;
use crate::entropy::EntropySource;
use crate::error::{MeshkeyError, Result};
use crate::layout::LAYOUT;

/// The four fields a token records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenFields {
    /// User identifier, at most 10 decimal digits.
    pub uid: u64,
    /// Distinct matrix offsets in `0..30`, 1..=10 entries. Entry `i` names
    /// the cell holding the hidden key's digit at distance `i` from the
    /// least-significant end.
    pub sequence: Vec<u8>,
    /// Issue time, Unix seconds.
    pub issued_at: u64,
    /// Validity window in seconds, at most 5 decimal digits.
    pub validity_secs: u32,
}

/// Multiples of 10 obfuscate decimal digits; recovery is `value % 10`.
const DIGIT_STRIDES: u32 = 6;
/// Multiples of 30 obfuscate matrix offsets; recovery is `value % 30`.
const OFFSET_STRIDES: u32 = 2;

/// Assemble a token from `fields`, drawing header positions, obfuscation
/// offsets and decoys from `entropy`.
pub fn build_token(fields: &TokenFields, entropy: &mut impl EntropySource) -> Result<String> {
    check_capacity("uid", fields.uid, LAYOUT.uid_len)?;
    check_capacity("issue timestamp", fields.issued_at, LAYOUT.ts_len)?;
    check_capacity("validity window", fields.validity_secs as u64, LAYOUT.tsv_len)?;
    validate_sequence(&fields.sequence)?;

    // Distinct payload offsets, one per header slot. Distinctness is what
    // guarantees no field ever overwrites another's payload slot.
    let header = entropy.sample_distinct(LAYOUT.active_payload_len() as u32, LAYOUT.header_len());

    let mut payload: Vec<Option<u32>> = vec![None; LAYOUT.payload_len()];

    let mut block = 0;
    for (i, digit) in lsd_digits(fields.uid, LAYOUT.uid_len).enumerate() {
        payload[header[block + i] as usize] = Some(digit + entropy.below(DIGIT_STRIDES) * 10);
    }

    // The sequence block carries matrix offsets, written in reverse: the
    // last sequence entry lands in the block's first slot. Shorter
    // sequences pad the written side with repeats of the first entry;
    // entries are distinct, so the pad run is unambiguous when parsing.
    block += LAYOUT.uid_len;
    let seq = &fields.sequence;
    for i in 0..LAYOUT.seq_len {
        let offset = if i < seq.len() {
            seq[seq.len() - 1 - i]
        } else {
            seq[0]
        };
        payload[header[block + i] as usize] =
            Some(offset as u32 + entropy.below(OFFSET_STRIDES) * 30);
    }

    block += LAYOUT.seq_len;
    for (i, digit) in lsd_digits(fields.issued_at, LAYOUT.ts_len).enumerate() {
        payload[header[block + i] as usize] = Some(digit + entropy.below(DIGIT_STRIDES) * 10);
    }

    block += LAYOUT.ts_len;
    for (i, digit) in lsd_digits(fields.validity_secs as u64, LAYOUT.tsv_len).enumerate() {
        payload[header[block + i] as usize] = Some(digit + entropy.below(DIGIT_STRIDES) * 10);
    }

    let mut token = String::with_capacity(LAYOUT.token_len());
    for &offset in &header {
        token.push(base60::symbol_of(offset as u32)?);
    }
    // Unassigned slots, including the trailing slot no header offset can
    // reach, become uniformly random decoys.
    for slot in payload {
        let value = match slot {
            Some(v) => v,
            None => entropy.below(60),
        };
        token.push(base60::symbol_of(value)?);
    }

    debug!(
        sequence_len = seq.len(),
        token_len = token.len(),
        "token assembled"
    );
    Ok(token)
}

/// Parse a token back into its four fields.
///
/// Anything that is not exactly 96 alphabet symbols is rejected as
/// [`MeshkeyError::MalformedToken`] before any field is decoded.
pub fn parse_token(token: &str) -> Result<TokenFields> {
    let symbols: Vec<char> = token.chars().collect();
    if symbols.len() != LAYOUT.token_len() {
        return Err(MeshkeyError::MalformedToken(format!(
            "expected {} symbols, got {}",
            LAYOUT.token_len(),
            symbols.len()
        )));
    }

    let values = symbols
        .iter()
        .map(|&c| {
            base60::value_of(c).map_err(|_| {
                MeshkeyError::MalformedToken(format!("symbol {c:?} is not in the token alphabet"))
            })
        })
        .collect::<Result<Vec<u32>>>()?;

    let (header, payload) = values.split_at(LAYOUT.header_len());
    let field = |block: usize, len: usize| -> Vec<u32> {
        (0..len)
            .map(|i| payload[header[block + i] as usize])
            .collect()
    };

    let uid = decimal_from_lsd(&field(0, LAYOUT.uid_len));
    let sequence = sequence_from_slots(&field(LAYOUT.uid_len, LAYOUT.seq_len));
    let issued_at = decimal_from_lsd(&field(
        LAYOUT.uid_len + LAYOUT.seq_len,
        LAYOUT.ts_len,
    ));
    let validity_secs = decimal_from_lsd(&field(
        LAYOUT.uid_len + LAYOUT.seq_len + LAYOUT.ts_len,
        LAYOUT.tsv_len,
    )) as u32;

    debug!(sequence_len = sequence.len(), "token parsed");
    Ok(TokenFields {
        uid,
        sequence,
        issued_at,
        validity_secs,
    })
}

/// Decimal digits of `value`, least significant first, zero-padded to `width`.
fn lsd_digits(value: u64, width: usize) -> impl Iterator<Item = u32> {
    (0..width).map(move |i| ((value / 10u64.pow(i as u32)) % 10) as u32)
}

/// Rebuild an integer from obfuscated payload values read least significant
/// digit first. Padding zeros vanish in the integer normalization.
fn decimal_from_lsd(values: &[u32]) -> u64 {
    values
        .iter()
        .rev()
        .fold(0u64, |acc, &v| acc * 10 + (v % 10) as u64)
}

/// Rebuild the shuffle sequence from its payload slots: reduce mod 30,
/// reverse back to natural order, collapse the leading pad run.
fn sequence_from_slots(values: &[u32]) -> Vec<u8> {
    let mut sequence: Vec<u8> = values.iter().rev().map(|&v| (v % 30) as u8).collect();
    while sequence.len() > 1 && sequence[0] == sequence[1] {
        sequence.remove(0);
    }
    sequence
}

fn check_capacity(field: &'static str, value: u64, capacity: usize) -> Result<()> {
    let digits = decimal_width(value);
    if digits > capacity {
        return Err(MeshkeyError::FieldTooLong {
            field,
            digits,
            capacity,
        });
    }
    Ok(())
}

/// Number of decimal digits in `value` (1 for zero).
pub(crate) fn decimal_width(value: u64) -> usize {
    let mut width = 1;
    let mut rest = value / 10;
    while rest > 0 {
        width += 1;
        rest /= 10;
    }
    width
}

fn validate_sequence(sequence: &[u8]) -> Result<()> {
    if sequence.is_empty() {
        return Err(MeshkeyError::InvalidSequence("no entries".into()));
    }
    if sequence.len() > LAYOUT.seq_len {
        return Err(MeshkeyError::FieldTooLong {
            field: "shuffle sequence",
            digits: sequence.len(),
            capacity: LAYOUT.seq_len,
        });
    }
    let mut seen = [false; 30];
    for &offset in sequence {
        if offset as usize >= LAYOUT.matrix_size() {
            return Err(MeshkeyError::InvalidSequence(format!(
                "offset {offset} outside matrix (0..{})",
                LAYOUT.matrix_size()
            )));
        }
        if seen[offset as usize] {
            return Err(MeshkeyError::InvalidSequence(format!(
                "offset {offset} appears twice"
            )));
        }
        seen[offset as usize] = true;
    }
    Ok(())
}
