//! Inspect command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use meshkey_core::{token::parse_token, LAYOUT};
use tracing::debug;

use crate::utils;

/// Execute the inspect command. `token` is either the raw 96-symbol
/// string or a path to a token file.
pub fn execute(token: String, quiet: bool) -> Result<()> {
    let token = if token.len() == LAYOUT.token_len() {
        token
    } else {
        let path = Path::new(&token);
        debug!(path = %path.display(), "Argument is not token-sized, treating as file");
        utils::load_token_file(path)?
    };

    let fields = parse_token(&token).context("Failed to parse token")?;

    if !quiet {
        let expires_at = fields.issued_at.saturating_add(fields.validity_secs as u64);
        let now = Utc::now().timestamp().max(0) as u64;
        let status = if now <= expires_at {
            "within validity window".green()
        } else {
            "validity window elapsed".yellow()
        };

        println!();
        println!("{}", "Token parsed".green().bold());
        println!();
        println!("   {} {}", "UID:".dimmed(), fields.uid);
        println!(
            "   {} {}",
            "Issued:".dimmed(),
            utils::format_timestamp(fields.issued_at)
        );
        println!(
            "   {} {} s, {}",
            "Validity:".dimmed(),
            fields.validity_secs,
            status
        );
        println!(
            "   {} {} of {}",
            "Sequence entries:".dimmed(),
            fields.sequence.len(),
            LAYOUT.seq_len
        );
    }

    Ok(())
}
