//! Inbound message model
//!
//! Transport-neutral view of a user message as seen by skills.

use serde::{Deserialize, Serialize};

/// Author of an inbound message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageUser {
    pub id: i64,
    pub username: Option<String>,
    pub language_code: Option<String>,
}

/// A single inbound message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub user: MessageUser,
    pub chat_id: i64,
    pub text: String,
}

impl Message {
    /// Create a private-chat message for a user
    pub fn new(user_id: i64, text: impl Into<String>) -> Self {
        Self {
            user: MessageUser {
                id: user_id,
                username: None,
                language_code: None,
            },
            chat_id: user_id,
            text: text.into(),
        }
    }

    /// Trimmed message text
    pub fn sentence(&self) -> &str {
        self.text.trim()
    }

    /// Convert a Telegram message; `None` for messages without an author
    pub fn from_telegram(msg: &teloxide::types::Message) -> Option<Self> {
        let from = msg.from.as_ref()?;

        Some(Self {
            user: MessageUser {
                id: from.id.0 as i64,
                username: from.username.clone(),
                language_code: from.language_code.clone(),
            },
            chat_id: msg.chat.id.0,
            text: msg.text().unwrap_or_default().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_message() {
        let msg = Message::new(42, "  blue \n");
        assert_eq!(msg.user.id, 42);
        assert_eq!(msg.chat_id, 42);
        assert_eq!(msg.sentence(), "blue");
    }
}
