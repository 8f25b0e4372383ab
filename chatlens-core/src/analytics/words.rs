//! Word counting.

use crate::types::{Message, TextPayload};

/// Count whitespace-separated words in a text payload.
///
/// Span lists are resolved through [`TextPayload::canonical_text`] first.
pub fn count_words(text: Option<&TextPayload>) -> u64 {
    text.map(|payload| payload.canonical_text().split_whitespace().count() as u64)
        .unwrap_or(0)
}

/// Word count of a message. Voice messages count as zero words even when a
/// transcript is attached.
pub fn message_word_count(message: &Message) -> u64 {
    if message.is_voice() {
        0
    } else {
        count_words(message.text.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LabeledSpan, Span};

    #[test]
    fn test_plain_text() {
        assert_eq!(count_words(Some(&"a b c".into())), 3);
        assert_eq!(count_words(Some(&"  spaced\tout\nwords  ".into())), 3);
    }

    #[test]
    fn test_span_list() {
        let payload = TextPayload::Spans(vec![
            Span::Labeled(LabeledSpan {
                kind: Some("bold".to_string()),
                text: "a b".to_string(),
            }),
            Span::Plain("c".to_string()),
        ]);
        assert_eq!(count_words(Some(&payload)), 3);
    }

    #[test]
    fn test_spans_split_mid_word_are_joined_with_space() {
        let payload = TextPayload::Spans(vec![
            Span::Plain("hel".to_string()),
            Span::Plain("lo".to_string()),
        ]);
        assert_eq!(count_words(Some(&payload)), 2);
    }

    #[test]
    fn test_empty_and_absent() {
        assert_eq!(count_words(None), 0);
        assert_eq!(count_words(Some(&"".into())), 0);
        assert_eq!(count_words(Some(&TextPayload::Spans(vec![]))), 0);
    }

    #[test]
    fn test_voice_message_has_no_words() {
        let msg = Message {
            media_type: Some("voice_message".to_string()),
            text: Some("a transcript of several words".into()),
            ..Default::default()
        };
        assert_eq!(message_word_count(&msg), 0);
    }

    #[test]
    fn test_regular_message_words() {
        let msg = Message {
            media_type: Some("sticker".to_string()),
            text: Some("two words".into()),
            ..Default::default()
        };
        assert_eq!(message_word_count(&msg), 2);
    }
}
