//! Message normalization.
//!
//! Normalization pairs each borrowed [`Message`] with a [`Stamp`] holding
//! its parsed instant. Input records are never modified, and re-running
//! normalization on an already stamped message keeps the existing stamp.

use super::timestamp::parse_timestamp;
use crate::error::{Error, Result};
use crate::types::{Chat, Message};
use chrono::{NaiveDate, NaiveDateTime};

/// Derived timestamp state of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stamp {
    /// Not yet normalized
    Unprocessed,
    /// `date` parsed successfully
    Parsed {
        instant: NaiveDateTime,
        day: NaiveDate,
    },
    /// `date` was absent or malformed
    Unparseable,
}

impl Stamp {
    fn from_date(date: Option<&str>) -> Self {
        match date.map(parse_timestamp) {
            Some(Ok(instant)) => Stamp::Parsed {
                instant,
                day: instant.date(),
            },
            _ => Stamp::Unparseable,
        }
    }
}

/// A message together with its derived timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedMessage<'a> {
    pub message: &'a Message,
    pub stamp: Stamp,
}

impl<'a> NormalizedMessage<'a> {
    /// Wrap a message without parsing it yet.
    pub fn pending(message: &'a Message) -> Self {
        Self {
            message,
            stamp: Stamp::Unprocessed,
        }
    }

    /// Wrap and parse a message.
    pub fn new(message: &'a Message) -> Self {
        Self::pending(message).normalized()
    }

    /// Parse the message date if that has not happened yet.
    pub fn normalized(self) -> Self {
        match self.stamp {
            Stamp::Unprocessed => Self {
                stamp: Stamp::from_date(self.message.date.as_deref()),
                ..self
            },
            _ => self,
        }
    }

    /// Parsed instant, if any.
    pub fn instant(&self) -> Option<NaiveDateTime> {
        match self.stamp {
            Stamp::Parsed { instant, .. } => Some(instant),
            _ => None,
        }
    }

    /// Calendar day of the parsed instant, if any.
    pub fn day(&self) -> Option<NaiveDate> {
        match self.stamp {
            Stamp::Parsed { day, .. } => Some(day),
            _ => None,
        }
    }

    /// Sender name, if present.
    pub fn sender(&self) -> Option<&'a str> {
        self.message.sender()
    }

    /// Sender and instant, or the reason the message is excluded.
    pub fn require(&self) -> Result<(&'a str, NaiveDateTime)> {
        let sender = self.sender().ok_or(Error::MissingField("from"))?;
        match self.stamp {
            Stamp::Parsed { instant, .. } => Ok((sender, instant)),
            Stamp::Unprocessed | Stamp::Unparseable => match &self.message.date {
                Some(date) => Err(Error::InvalidTimestamp(date.clone())),
                None => Err(Error::MissingField("date")),
            },
        }
    }

    /// Sender and instant, when the message can take part in aggregations.
    pub fn usable(&self) -> Option<(&'a str, NaiveDateTime)> {
        self.require().ok()
    }
}

/// Normalize a batch of messages, keeping any stamps already attached.
pub fn normalize<'a>(messages: Vec<NormalizedMessage<'a>>) -> Vec<NormalizedMessage<'a>> {
    let normalized: Vec<_> = messages
        .into_iter()
        .map(NormalizedMessage::normalized)
        .collect();

    let unparseable = normalized
        .iter()
        .filter(|m| m.stamp == Stamp::Unparseable)
        .count();
    if unparseable > 0 {
        tracing::debug!(
            total = normalized.len(),
            unparseable,
            "Messages without a parseable date will be excluded"
        );
    }

    normalized
}

/// Normalize every message of a chat, in source order.
pub fn normalize_chat(chat: &Chat) -> Vec<NormalizedMessage<'_>> {
    normalize_messages(&chat.messages)
}

/// Normalize a slice of messages, in source order.
pub fn normalize_messages(messages: &[Message]) -> Vec<NormalizedMessage<'_>> {
    normalize(messages.iter().map(NormalizedMessage::pending).collect())
}

/// Iterate over messages usable for aggregation as `(message, sender, instant)`.
pub fn usable<'s, 'a>(
    messages: &'s [NormalizedMessage<'a>],
) -> impl Iterator<Item = (&'a Message, &'a str, NaiveDateTime)> + 's {
    messages.iter().filter_map(|m| {
        let (sender, instant) = m.usable()?;
        Some((m.message, sender, instant))
    })
}
