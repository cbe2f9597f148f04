//! Common utility functions shared across CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tracing::debug;

/// Stem of `file` with any `_encoded` marker stripped, so encode/decode
/// pairs agree on sibling file names.
fn base_stem(file: &Path) -> &str {
    let stem = file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    stem.strip_suffix("_encoded").unwrap_or(stem)
}

/// Where the encoded document goes: `model.gltf` -> `model_encoded.gltf`.
pub fn encoded_path(file: &Path) -> PathBuf {
    let extension = file.extension().and_then(|e| e.to_str()).unwrap_or("gltf");
    file.with_file_name(format!("{}_encoded.{extension}", base_stem(file)))
}

/// Where the decoded document goes: `model_encoded.gltf` -> `model_decoded.gltf`.
pub fn decoded_path(file: &Path) -> PathBuf {
    let extension = file.extension().and_then(|e| e.to_str()).unwrap_or("gltf");
    file.with_file_name(format!("{}_decoded.{extension}", base_stem(file)))
}

/// The token file written next to a document: `model.gltf` and
/// `model_encoded.gltf` both map to `model_token.txt`.
pub fn token_path(file: &Path) -> PathBuf {
    file.with_file_name(format!("{}_token.txt", base_stem(file)))
}

/// Load and parse a glTF document as a JSON tree.
pub fn load_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let document: Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    debug!(path = %path.display(), bytes = content.len(), "Read document");
    Ok(document)
}

/// Read a token from a file, trimming surrounding whitespace.
pub fn load_token_file(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read token file: {}", path.display()))?;
    Ok(raw.trim().to_string())
}

/// Format a Unix timestamp (seconds) as a human-readable UTC string.
pub fn format_timestamp(timestamp_secs: u64) -> String {
    match Utc.timestamp_opt(timestamp_secs as i64, 0) {
        chrono::LocalResult::Single(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        _ => format!("{timestamp_secs}s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_path() {
        assert_eq!(
            encoded_path(Path::new("model.gltf")),
            PathBuf::from("model_encoded.gltf")
        );
        assert_eq!(
            encoded_path(Path::new("dir/scene.gltf")),
            PathBuf::from("dir/scene_encoded.gltf")
        );
    }

    #[test]
    fn test_decoded_path_strips_encoded_marker() {
        assert_eq!(
            decoded_path(Path::new("model_encoded.gltf")),
            PathBuf::from("model_decoded.gltf")
        );
        assert_eq!(
            decoded_path(Path::new("model.gltf")),
            PathBuf::from("model_decoded.gltf")
        );
    }

    #[test]
    fn test_token_path_pairs_encode_and_decode() {
        assert_eq!(
            token_path(Path::new("model.gltf")),
            PathBuf::from("model_token.txt")
        );
        assert_eq!(
            token_path(Path::new("dir/model_encoded.gltf")),
            PathBuf::from("dir/model_token.txt")
        );
    }

    #[test]
    fn test_format_timestamp() {
        // 2024-01-15 12:30:45 UTC
        let formatted = format_timestamp(1705321845);
        assert!(formatted.contains("2024-01-15"));
        assert!(formatted.contains("UTC"));
    }
}
