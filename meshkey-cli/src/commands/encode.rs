//! Encode command implementation.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use meshkey_core::{encode, EntropySource, OsEntropy, LAYOUT};
use rand::Rng;
use tracing::{debug, info};

use crate::utils;

/// Execute the encode command.
pub fn execute(
    file: PathBuf,
    uid: Option<u64>,
    validity: u32,
    sequence_len: usize,
    quiet: bool,
) -> Result<()> {
    if sequence_len == 0 || sequence_len > LAYOUT.seq_len {
        bail!(
            "sequence length must be between 1 and {}, got {sequence_len}",
            LAYOUT.seq_len
        );
    }

    let document = utils::load_document(&file)?;

    let uid = uid.unwrap_or_else(|| rand::thread_rng().gen_range(0..10_000_000_000));
    let mut entropy = OsEntropy::new();
    let sequence = entropy.sample_distinct(LAYOUT.matrix_size() as u32, sequence_len);
    debug!(uid, sequence_len, validity, "Drew encode parameters");

    let sealed = encode(&document, uid, &sequence, validity, &mut entropy)
        .context("Failed to encode document")?;

    let encoded_path = utils::encoded_path(&file);
    let content =
        serde_json::to_string(&sealed.document).context("Failed to serialize encoded document")?;
    std::fs::write(&encoded_path, content)
        .with_context(|| format!("Failed to write {}", encoded_path.display()))?;

    let token_path = utils::token_path(&file);
    std::fs::write(&token_path, &sealed.token)
        .with_context(|| format!("Failed to write {}", token_path.display()))?;

    info!(
        encoded = %encoded_path.display(),
        token = %token_path.display(),
        "Document encoded"
    );

    // Print success message (user-facing output)
    if !quiet {
        println!();
        println!("{}", "Key hidden, token issued!".green().bold());
        println!();
        println!("   {} {}", "Encoded:".dimmed(), encoded_path.display());
        println!("   {} {}", "Token:".dimmed(), token_path.display());
        println!("   {} {}", "UID:".dimmed(), uid);
        println!("   {} {} s", "Validity:".dimmed(), validity);
        println!();
        println!(
            "{}",
            "The key is only recoverable with both files - keep the token safe.".yellow()
        );
    }

    Ok(())
}
