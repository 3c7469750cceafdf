use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use blackbox_core::{DomainError, DomainResult, Entity, RecordId};

/// Message identifier (rows are scoped to their owning user in storage).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub RecordId);

impl MessageId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for MessageId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// How many messages the dashboard inbox shows.
pub const DASHBOARD_MESSAGE_LIMIT: usize = 5;

/// An inbox message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for recording a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub sender_name: String,
    pub content: String,
}

impl Message {
    /// Validate and build a message from a payload.
    pub fn create(id: MessageId, new: NewMessage, now: DateTime<Utc>) -> DomainResult<Message> {
        let sender_name = new.sender_name.trim().to_string();
        if sender_name.is_empty() {
            return Err(DomainError::validation("sender name cannot be empty"));
        }
        let content = new.content.trim().to_string();
        if content.is_empty() {
            return Err(DomainError::validation("content cannot be empty"));
        }

        Ok(Message {
            id,
            sender_name,
            content,
            created_at: now,
        })
    }
}

impl Entity for Message {
    type Id = MessageId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// The `limit` most recent messages, newest first.
pub fn most_recent(mut messages: Vec<Message>, limit: usize) -> Vec<Message> {
    messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    messages.truncate(limit);
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn test_message_id() -> MessageId {
        MessageId::new(RecordId::new())
    }

    fn message_at(sender: &str, created_at: DateTime<Utc>) -> Message {
        Message {
            id: test_message_id(),
            sender_name: sender.to_string(),
            content: "hello".to_string(),
            created_at,
        }
    }

    #[test]
    fn create_trims_and_validates_fields() {
        let new = NewMessage {
            sender_name: " Grace Hopper ".to_string(),
            content: " Compilers are coming along. ".to_string(),
        };
        let message = Message::create(test_message_id(), new, Utc::now()).unwrap();
        assert_eq!(message.sender_name, "Grace Hopper");
        assert_eq!(message.content, "Compilers are coming along.");
    }

    #[test]
    fn create_rejects_blank_sender_or_content() {
        for (sender, content) in [("  ", "hi"), ("Grace", "  ")] {
            let new = NewMessage {
                sender_name: sender.to_string(),
                content: content.to_string(),
            };
            let err = Message::create(test_message_id(), new, Utc::now()).unwrap_err();
            match err {
                DomainError::Validation(_) => {}
                _ => panic!("Expected Validation error"),
            }
        }
    }

    #[test]
    fn most_recent_sorts_newest_first_and_truncates() {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let messages: Vec<Message> = (0..8)
            .map(|i| message_at(&format!("sender {i}"), base + Duration::minutes(i)))
            .collect();

        let recent = most_recent(messages, DASHBOARD_MESSAGE_LIMIT);
        assert_eq!(recent.len(), DASHBOARD_MESSAGE_LIMIT);
        assert_eq!(recent[0].sender_name, "sender 7");
        assert_eq!(recent[4].sender_name, "sender 3");
    }

    #[test]
    fn most_recent_handles_short_lists() {
        let recent = most_recent(vec![message_at("only", Utc::now())], 5);
        assert_eq!(recent.len(), 1);
        assert!(most_recent(Vec::new(), 5).is_empty());
    }
}
