//! Reading and rewriting the accessor fields of a glTF document.
//!
//! Only seven fields of the document are ever touched: the three
//! redundant `accessors[*].count` integers that carry the plaintext key,
//! and the `accessors[0].max` / `accessors[0].min` extent triples whose
//! least-significant decimal digits host the shuffle matrix. Everything
//! else in the tree passes through untouched.

use serde_json::Value;

use crate::error::{MeshkeyError, Result};
use crate::layout::LAYOUT;
use crate::matrix::ShuffleMatrix;

/// Written over every `count` field once the key is concealed. The key
/// then exists only via matrix + token.
pub const COUNT_SENTINEL: u64 = 1;

/// Accessors whose `count` mirrors the hidden key.
const COUNT_MIRRORS: usize = 3;

/// Digits substituted per float, plus the preserved final character.
const TAIL_LEN: usize = LAYOUT.matrix_cols + 1;

/// Read the plaintext key from `accessors[0].count`.
pub fn plaintext_key(document: &Value) -> Result<u64> {
    accessor(document, 0)?
        .get("count")
        .and_then(Value::as_u64)
        .ok_or_else(|| {
            MeshkeyError::UnsupportedDocument(
                "accessors[0].count must be a non-negative integer".into(),
            )
        })
}

/// Produce the encoded document: matrix rows spliced into the six extent
/// floats, all `count` fields scrubbed to the sentinel.
pub fn embed(document: &Value, matrix: &ShuffleMatrix) -> Result<Value> {
    // Check every mirror up front so a malformed document fails before
    // any field is rewritten.
    for index in 0..COUNT_MIRRORS {
        count_value(document, index)?;
    }

    let mut encoded = document.clone();

    for row in 0..LAYOUT.matrix_rows {
        let value = extent_value(document, row)?;
        let spliced = splice_row(value, matrix.row(row))?;
        *extent_slot(&mut encoded, row)? = json_float(spliced)?;
    }

    for index in 0..COUNT_MIRRORS {
        *count_slot(&mut encoded, index)? = Value::from(COUNT_SENTINEL);
    }

    Ok(encoded)
}

/// Read the matrix back out of an encoded document's extent floats.
pub fn extract(document: &Value) -> Result<ShuffleMatrix> {
    let mut cells = [0u8; LAYOUT.matrix_size()];
    for row in 0..LAYOUT.matrix_rows {
        let value = extent_value(document, row)?;
        let digits = digit_tail(value)?;
        cells[row * LAYOUT.matrix_cols..(row + 1) * LAYOUT.matrix_cols].copy_from_slice(&digits);
    }
    Ok(ShuffleMatrix::from_cells(cells))
}

/// Produce the decoded document: every `count` field restored to `key`.
pub fn restore(document: &Value, key: u64) -> Result<Value> {
    let mut decoded = document.clone();
    for index in 0..COUNT_MIRRORS {
        count_value(document, index)?;
        *count_slot(&mut decoded, index)? = Value::from(key);
    }
    Ok(decoded)
}

/// Canonical decimal rendering; both the embed and extract sides go
/// through this, so the JSON text form of the float is irrelevant.
fn render(value: f64) -> String {
    format!("{value}")
}

/// Replace the five digits before the final character with `digits`,
/// keeping the final character, and check the result survives a float
/// round-trip unchanged (otherwise extraction would read different digits
/// than were embedded).
fn splice_row(value: f64, digits: &[u8]) -> Result<f64> {
    let text = render(value);
    check_tail(&text)?;

    let mut spliced = String::with_capacity(text.len());
    spliced.push_str(&text[..text.len() - TAIL_LEN]);
    for &digit in digits {
        spliced.push(char::from(b'0' + digit));
    }
    spliced.push_str(&text[text.len() - 1..]);

    let reparsed: f64 = spliced.parse().map_err(|_| {
        MeshkeyError::UnsupportedDocument(format!("spliced value {spliced:?} is not a float"))
    })?;
    if render(reparsed) != spliced {
        return Err(MeshkeyError::UnsupportedDocument(format!(
            "float {text} cannot carry substituted digits without precision loss"
        )));
    }
    Ok(reparsed)
}

/// The five digits immediately preceding the final character.
fn digit_tail(value: f64) -> Result<[u8; LAYOUT.matrix_cols]> {
    let text = render(value);
    check_tail(&text)?;

    let window = &text.as_bytes()[text.len() - TAIL_LEN..text.len() - 1];
    let mut digits = [0u8; LAYOUT.matrix_cols];
    for (slot, &byte) in digits.iter_mut().zip(window) {
        *slot = byte - b'0';
    }
    Ok(digits)
}

/// A hosting float must render with at least six characters after the
/// decimal point, so the substitution window never crosses the point and
/// the final digit can be preserved as-is.
fn check_tail(text: &str) -> Result<()> {
    let point = text.find('.').ok_or_else(|| {
        MeshkeyError::UnsupportedDocument(format!("float {text} has no fractional digits"))
    })?;
    let fractional = text.len() - point - 1;
    if fractional < TAIL_LEN {
        return Err(MeshkeyError::UnsupportedDocument(format!(
            "float {text} has {fractional} fractional digits; at least {TAIL_LEN} are required"
        )));
    }
    Ok(())
}

/// Matrix row `r` lives in `max[r]` for rows 0..3 and `min[r-3]` above.
fn extent_path(row: usize) -> (&'static str, usize) {
    if row < LAYOUT.matrix_rows / 2 {
        ("max", row)
    } else {
        ("min", row - LAYOUT.matrix_rows / 2)
    }
}

fn extent_value(document: &Value, row: usize) -> Result<f64> {
    let (axis, index) = extent_path(row);
    accessor(document, 0)?
        .get(axis)
        .and_then(|extent| extent.get(index))
        .and_then(Value::as_f64)
        .ok_or_else(|| {
            MeshkeyError::UnsupportedDocument(format!(
                "accessors[0].{axis}[{index}] must be a number"
            ))
        })
}

fn extent_slot<'a>(document: &'a mut Value, row: usize) -> Result<&'a mut Value> {
    let (axis, index) = extent_path(row);
    document
        .get_mut("accessors")
        .and_then(|accessors| accessors.get_mut(0))
        .and_then(|accessor| accessor.get_mut(axis))
        .and_then(|extent| extent.get_mut(index))
        .ok_or_else(|| {
            MeshkeyError::UnsupportedDocument(format!(
                "accessors[0].{axis}[{index}] must be a number"
            ))
        })
}

fn count_value(document: &Value, index: usize) -> Result<u64> {
    accessor(document, index)?
        .get("count")
        .and_then(Value::as_u64)
        .ok_or_else(|| {
            MeshkeyError::UnsupportedDocument(format!(
                "accessors[{index}].count must be a non-negative integer"
            ))
        })
}

fn count_slot<'a>(document: &'a mut Value, index: usize) -> Result<&'a mut Value> {
    document
        .get_mut("accessors")
        .and_then(|accessors| accessors.get_mut(index))
        .and_then(|accessor| accessor.get_mut("count"))
        .ok_or_else(|| {
            MeshkeyError::UnsupportedDocument(format!("missing accessors[{index}].count"))
        })
}

fn accessor(document: &Value, index: usize) -> Result<&Value> {
    document
        .get("accessors")
        .and_then(|accessors| accessors.get(index))
        .ok_or_else(|| {
            MeshkeyError::UnsupportedDocument(format!("missing accessors[{index}]"))
        })
}

fn json_float(value: f64) -> Result<Value> {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| {
            MeshkeyError::UnsupportedDocument(format!("{value} is not a finite JSON number"))
        })
}
