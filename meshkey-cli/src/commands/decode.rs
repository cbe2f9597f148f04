//! Decode command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use meshkey_core::decode;
use tracing::info;

use crate::utils;

/// Execute the decode command.
pub fn execute(file: PathBuf, token: Option<String>, quiet: bool) -> Result<()> {
    let document = utils::load_document(&file)?;

    let token = match token {
        Some(token) => token,
        None => utils::load_token_file(&utils::token_path(&file))?,
    };

    let opened = decode(&document, &token).context("Failed to decode document")?;

    let decoded_path = utils::decoded_path(&file);
    let content =
        serde_json::to_string(&opened.document).context("Failed to serialize decoded document")?;
    std::fs::write(&decoded_path, content)
        .with_context(|| format!("Failed to write {}", decoded_path.display()))?;

    info!(
        decoded = %decoded_path.display(),
        uid = %opened.uid,
        "Document decoded"
    );

    if !quiet {
        let issued_at: u64 = opened.issued_at.parse().unwrap_or(0);
        let validity: u64 = opened.validity_secs.parse().unwrap_or(0);

        println!();
        println!("{}", "Key recovered!".green().bold());
        println!();
        println!("   {} {}", "Decoded:".dimmed(), decoded_path.display());
        println!("   {} {}", "Key:".dimmed(), opened.key);
        println!("   {} {}", "UID:".dimmed(), opened.uid);
        println!(
            "   {} {}",
            "Issued:".dimmed(),
            utils::format_timestamp(issued_at)
        );
        println!(
            "   {} {} s ({})",
            "Validity:".dimmed(),
            opened.validity_secs,
            window_status(issued_at, validity)
        );
    }

    Ok(())
}

/// Whether the token is still inside its validity window.
fn window_status(issued_at: u64, validity_secs: u64) -> String {
    let expires_at = issued_at.saturating_add(validity_secs);
    let now = Utc::now().timestamp().max(0) as u64;
    if now <= expires_at {
        format!("until {}", utils::format_timestamp(expires_at)).green().to_string()
    } else {
        format!("expired {}", utils::format_timestamp(expires_at)).yellow().to_string()
    }
}
