//! Chat export ingestion
//!
//! Loads a JSON chat export and prepares its messages for analysis.
//!
//! ## Design Principles
//!
//! 1. **Resilience**: a message that fails to deserialize is skipped with a
//!    warning; it never aborts the load
//! 2. **Explicit emptiness**: malformed JSON, a missing `messages` array or an
//!    export without messages yields [`Error::EmptyInput`]
//! 3. **Immutability**: parsed timestamps are attached through
//!    [`NormalizedMessage`], never written back into the records

mod normalize;
mod timestamp;

pub use normalize::{
    normalize, normalize_chat, normalize_messages, usable, NormalizedMessage, Stamp,
};
pub use timestamp::{format_timestamp, parse_timestamp, TIMESTAMP_FORMAT};

use crate::error::{Error, Result};
use crate::types::{Chat, Message};
use serde::Deserialize;
use std::path::Path;

/// Result of loading a chat export.
#[derive(Debug, Default)]
pub struct ParseResult {
    /// The loaded chat (only messages that deserialized cleanly)
    pub chat: Chat,
    /// Warnings encountered during loading (non-fatal)
    pub warnings: Vec<String>,
}

impl ParseResult {
    /// Number of records that were skipped.
    pub fn skipped(&self) -> usize {
        self.warnings.len()
    }
}

/// Load a chat export from a file.
pub fn load_chat(path: &Path) -> Result<ParseResult> {
    let content = std::fs::read_to_string(path)?;
    tracing::info!(path = %path.display(), bytes = content.len(), "Loading chat export");
    parse_chat(&content)
}

/// Parse a chat export from a JSON string.
pub fn parse_chat(content: &str) -> Result<ParseResult> {
    let root: serde_json::Value = serde_json::from_str(content).map_err(|e| {
        tracing::warn!(error = %e, "Chat export is not valid JSON");
        Error::EmptyInput(format!("malformed chat export: {}", e))
    })?;

    let name = root
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let raw_messages = root
        .get("messages")
        .and_then(|v| v.as_array())
        .ok_or_else(|| Error::EmptyInput("chat export has no messages array".to_string()))?;

    let mut warnings = Vec::new();
    let mut messages = Vec::with_capacity(raw_messages.len());

    for (index, raw) in raw_messages.iter().enumerate() {
        match Message::deserialize(raw) {
            Ok(message) => messages.push(message),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping malformed message");
                warnings.push(format!("message #{}: {}", index, e));
            }
        }
    }

    if messages.is_empty() {
        return Err(Error::EmptyInput(format!(
            "chat export {:?} contains no readable messages",
            name
        )));
    }

    tracing::debug!(
        chat = %name,
        messages = messages.len(),
        skipped = warnings.len(),
        "Parsed chat export"
    );

    Ok(ParseResult {
        chat: Chat { name, messages },
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat() {
        let result = parse_chat(
            r#"{"name": "Friends", "messages": [
                {"id": 1, "from": "Ann", "date": "2024-01-01T10:00:00", "text": "hi"},
                {"id": 2, "from": "Bob", "date": "2024-01-01T10:05:00", "text": ["yo ", {"type": "bold", "text": "Ann"}]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(result.chat.name, "Friends");
        assert_eq!(result.chat.messages.len(), 2);
        assert_eq!(result.skipped(), 0);
    }

    #[test]
    fn test_malformed_message_is_skipped() {
        let result = parse_chat(
            r#"{"name": "x", "messages": [
                {"id": "not-a-number", "from": "Ann"},
                {"id": 2, "from": "Bob", "date": "2024-01-01T10:05:00"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(result.chat.messages.len(), 1);
        assert_eq!(result.skipped(), 1);
        assert!(result.warnings[0].starts_with("message #0"));
    }

    #[test]
    fn test_malformed_json_is_empty_input() {
        let err = parse_chat("{not json").unwrap_err();
        assert!(err.is_no_data());
    }

    #[test]
    fn test_missing_messages_is_empty_input() {
        let err = parse_chat(r#"{"name": "x"}"#).unwrap_err();
        assert!(err.is_no_data());

        let err = parse_chat(r#"{"name": "x", "messages": []}"#).unwrap_err();
        assert!(err.is_no_data());
    }

    #[test]
    fn test_load_chat_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        std::fs::write(
            &path,
            r#"{"name": "f", "messages": [{"id": 1, "from": "Ann", "date": "2024-01-01T00:00:00"}]}"#,
        )
        .unwrap();
        let result = load_chat(&path).unwrap();
        assert_eq!(result.chat.messages.len(), 1);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_chat(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
