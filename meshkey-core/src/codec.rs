//! The two contract operations: conceal a document's key behind a token,
//! and resolve a (document, token) pair back into the original.
//!
//! Both are pure transforms over in-memory values plus an injected
//! entropy source; callers that need files, uploads or storage sit on top.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::document;
use crate::entropy::EntropySource;
use crate::error::Result;
use crate::matrix::ShuffleMatrix;
use crate::token::{self, TokenFields};

/// Result of [`encode`]: the document with its key hidden, and the token
/// that can find it again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeOutcome {
    pub document: Value,
    pub token: String,
}

/// Result of [`decode`]: the restored document plus the four recovered
/// fields, as decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeOutcome {
    pub document: Value,
    pub key: String,
    pub uid: String,
    pub issued_at: String,
    pub validity_secs: String,
}

/// Hide the document's key and issue the matching token, stamped with the
/// current Unix time.
pub fn encode(
    document: &Value,
    uid: u64,
    sequence: &[u8],
    validity_secs: u32,
    entropy: &mut impl EntropySource,
) -> Result<EncodeOutcome> {
    let issued_at = Utc::now().timestamp().max(0) as u64;
    encode_at(document, uid, sequence, validity_secs, issued_at, entropy)
}

/// [`encode`] with an explicit issue timestamp, for callers that carry
/// their own clock (and for deterministic tests).
pub fn encode_at(
    document: &Value,
    uid: u64,
    sequence: &[u8],
    validity_secs: u32,
    issued_at: u64,
    entropy: &mut impl EntropySource,
) -> Result<EncodeOutcome> {
    let key = document::plaintext_key(document)?;

    let fields = TokenFields {
        uid,
        sequence: sequence.to_vec(),
        issued_at,
        validity_secs,
    };
    let token = token::build_token(&fields, entropy)?;

    let matrix = ShuffleMatrix::conceal(key, sequence, entropy)?;
    let encoded = document::embed(document, &matrix)?;

    debug!(uid, issued_at, validity_secs, "document encoded");
    Ok(EncodeOutcome {
        document: encoded,
        token,
    })
}

/// Resolve an encoded document with its token: recover the key, restore
/// the `count` fields, and surface the token's fields.
pub fn decode(document: &Value, token: &str) -> Result<DecodeOutcome> {
    let fields = token::parse_token(token)?;
    let matrix = document::extract(document)?;
    let key = matrix.recover_key(&fields.sequence)?;
    let restored = document::restore(document, key)?;

    debug!(uid = fields.uid, key, "document decoded");
    Ok(DecodeOutcome {
        document: restored,
        key: key.to_string(),
        uid: fields.uid.to_string(),
        issued_at: fields.issued_at.to_string(),
        validity_secs: fields.validity_secs.to_string(),
    })
}
