//! Core domain types for chatlens
//!
//! These types mirror the JSON chat export format (a Telegram-style
//! "Export chat history" dump) closely enough to deserialize it directly,
//! while modelling the loosely-typed parts as proper Rust enums.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Chat** | One exported conversation: a name plus its messages |
//! | **Message** | A single record from the export; every field may be absent |
//! | **Sender** | The display name in a message's `from` field |
//! | **Text payload** | Either a plain string or a list of spans (plain strings and labelled entities) |
//! | **Reaction** | An emoji with a total count and a partial list of recent reactors |
//!
//! Messages are never modified after loading. Parsed timestamps live in
//! [`crate::ingest::NormalizedMessage`] instead of on the record itself.

use serde::{Deserialize, Serialize};

/// Media type marking a voice message. Voice messages never contribute words.
pub const VOICE_MESSAGE: &str = "voice_message";

// ============================================
// Chat
// ============================================

/// An exported chat: a display name and its messages in source order.
///
/// Source order is not guaranteed to be chronological.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chat {
    /// Chat display name
    #[serde(default)]
    pub name: String,
    /// Messages as they appear in the export
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Chat {
    /// Display name, falling back to a generic label for unnamed exports.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Chat"
        } else {
            &self.name
        }
    }
}

// ============================================
// Message
// ============================================

/// A single message record.
///
/// Every field is optional in the export. Aggregations decide for themselves
/// which fields they need; records missing a sender or a parseable date are
/// excluded from all of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message id, unique within the chat
    #[serde(default)]
    pub id: Option<i64>,
    /// Sender display name
    #[serde(default)]
    pub from: Option<String>,
    /// Timestamp in `YYYY-MM-DDTHH:MM:SS` form
    #[serde(default)]
    pub date: Option<String>,
    /// Message text
    #[serde(default)]
    pub text: Option<TextPayload>,
    /// Media kind (e.g. `voice_message`, `sticker`)
    #[serde(default)]
    pub media_type: Option<String>,
    /// Id of the message this one replies to
    #[serde(default)]
    pub reply_to_message_id: Option<i64>,
    /// Reactions attached to this message
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

impl Message {
    /// Whether this is a voice message.
    pub fn is_voice(&self) -> bool {
        self.media_type.as_deref() == Some(VOICE_MESSAGE)
    }

    /// Sender name, treating an empty string as absent.
    pub fn sender(&self) -> Option<&str> {
        self.from.as_deref().filter(|s| !s.is_empty())
    }

    /// Canonical text of the message, or an empty string.
    pub fn plain_text(&self) -> String {
        self.text
            .as_ref()
            .map(TextPayload::canonical_text)
            .unwrap_or_default()
    }
}

// ============================================
// Text payload
// ============================================

/// Message text as found in the export.
///
/// Formatted messages are exported as a list mixing plain strings with
/// entity objects (`{"type": "bold", "text": "..."}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextPayload {
    /// Unformatted text
    Plain(String),
    /// Formatted text split into spans
    Spans(Vec<Span>),
}

impl TextPayload {
    /// Resolve to a single string. Span texts are joined with single spaces.
    pub fn canonical_text(&self) -> String {
        match self {
            TextPayload::Plain(text) => text.clone(),
            TextPayload::Spans(spans) => spans
                .iter()
                .map(Span::text)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl Default for TextPayload {
    fn default() -> Self {
        TextPayload::Plain(String::new())
    }
}

impl From<&str> for TextPayload {
    fn from(text: &str) -> Self {
        TextPayload::Plain(text.to_string())
    }
}

/// One element of a formatted text payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Span {
    /// Plain run of text
    Plain(String),
    /// Entity such as a link, mention or bold run
    Labeled(LabeledSpan),
}

impl Span {
    /// Textual content of the span.
    pub fn text(&self) -> &str {
        match self {
            Span::Plain(text) => text,
            Span::Labeled(span) => &span.text,
        }
    }
}

/// A text entity. Only `text` is required; extra keys (`href`, `user_id`, ...)
/// are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSpan {
    /// Entity kind (`bold`, `link`, `mention`, ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Visible text
    #[serde(default)]
    pub text: String,
}

// ============================================
// Reactions
// ============================================

/// A reaction on a message.
///
/// `count` is the total number of reactors. `recent` lists only some of
/// them, so per-user attribution built from it is partial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    /// Reaction emoji; absent for custom-emoji reactions
    #[serde(default)]
    pub emoji: Option<String>,
    /// Total number of users who reacted with this emoji
    #[serde(default)]
    pub count: u64,
    /// Subset of reactors, most recent first
    #[serde(default)]
    pub recent: Vec<Reactor>,
}

/// An attributed reactor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reactor {
    /// Reactor display name
    #[serde(default)]
    pub from: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_payload() {
        let msg: Message = serde_json::from_str(r#"{"text": "hello there"}"#).unwrap();
        assert_eq!(msg.text, Some(TextPayload::Plain("hello there".to_string())));
        assert_eq!(msg.plain_text(), "hello there");
    }

    #[test]
    fn test_span_payload() {
        let msg: Message = serde_json::from_str(
            r#"{"text": [{"type": "bold", "text": "a b"}, "c", {"type": "link", "text": "d", "href": "x"}]}"#,
        )
        .unwrap();
        assert_eq!(msg.plain_text(), "a b c d");
    }

    #[test]
    fn test_missing_fields_default() {
        let msg: Message = serde_json::from_str("{}").unwrap();
        assert!(msg.id.is_none());
        assert!(msg.sender().is_none());
        assert!(msg.reactions.is_empty());
        assert_eq!(msg.plain_text(), "");
    }

    #[test]
    fn test_null_sender_is_absent() {
        let msg: Message = serde_json::from_str(r#"{"from": null}"#).unwrap();
        assert!(msg.sender().is_none());

        let msg: Message = serde_json::from_str(r#"{"from": ""}"#).unwrap();
        assert!(msg.sender().is_none());
    }

    #[test]
    fn test_voice_detection() {
        let msg: Message =
            serde_json::from_str(r#"{"media_type": "voice_message", "text": "hi"}"#).unwrap();
        assert!(msg.is_voice());
    }

    #[test]
    fn test_reaction_parsing() {
        let msg: Message = serde_json::from_str(
            r#"{"reactions": [{"type": "emoji", "emoji": "👍", "count": 3, "recent": [{"from": "Ann", "date": "2024-01-01T00:00:00"}]}]}"#,
        )
        .unwrap();
        assert_eq!(msg.reactions.len(), 1);
        assert_eq!(msg.reactions[0].count, 3);
        assert_eq!(msg.reactions[0].recent[0].from.as_deref(), Some("Ann"));
    }

    #[test]
    fn test_chat_display_name() {
        let chat = Chat::default();
        assert_eq!(chat.display_name(), "Chat");
    }
}
