//! Session and turn types.

use chrono::{DateTime, Utc};
use openai_client::{Message, Role};
use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl From<TurnRole> for Role {
    fn from(role: TurnRole) -> Self {
        match role {
            TurnRole::User => Role::User,
            TurnRole::Assistant => Role::Assistant,
        }
    }
}

/// A single user or assistant message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn to_message(&self) -> Message {
        Message::text(self.role.into(), self.content.clone())
    }
}

/// A chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub turns: Vec<Turn>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            turns: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn add_turn(&mut self, role: TurnRole, content: &str) {
        self.turns.push(Turn::new(role, content));
        self.updated_at = Utc::now();
    }

    /// Trim to max turns, keeping most recent.
    pub fn trim(&mut self, max_turns: usize) {
        if self.turns.len() > max_turns {
            let start = self.turns.len() - max_turns;
            self.turns.drain(..start);
        }
    }

    /// Turns as chat-completion messages.
    pub fn messages(&self) -> Vec<Message> {
        self.turns.iter().map(Turn::to_message).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_add_turn() {
        let mut session = ChatSession::new("s1");
        session.add_turn(TurnRole::User, "Hello");
        session.add_turn(TurnRole::Assistant, "Hi!");

        assert_eq!(session.turns.len(), 2);
        assert_eq!(session.turns[0].role, TurnRole::User);
        assert_eq!(session.turns[1].content, "Hi!");
    }

    #[test]
    fn test_trim_keeps_most_recent() {
        let mut session = ChatSession::new("s1");
        for i in 1..=10 {
            session.add_turn(TurnRole::User, &format!("Message {}", i));
        }

        session.trim(5);

        assert_eq!(session.turns.len(), 5);
        assert_eq!(session.turns[0].content, "Message 6");
        assert_eq!(session.turns[4].content, "Message 10");
    }

    #[test]
    fn test_trim_under_limit_is_noop() {
        let mut session = ChatSession::new("s1");
        session.add_turn(TurnRole::User, "one");
        session.trim(10);
        assert_eq!(session.turns.len(), 1);
    }

    #[test]
    fn test_updated_at_changes() {
        let mut session = ChatSession::new("s1");
        let initial = session.updated_at;

        std::thread::sleep(std::time::Duration::from_millis(10));
        session.add_turn(TurnRole::User, "Hello");

        assert!(session.updated_at > initial);
    }

    #[test]
    fn test_turn_serialization() {
        let json = serde_json::to_string(&Turn::new(TurnRole::Assistant, "Hi there!")).unwrap();

        assert!(json.contains("\"role\":\"assistant\""));
        assert!(json.contains("\"content\":\"Hi there!\""));
        assert!(json.contains("\"timestamp\""));
    }

    #[test]
    fn test_messages_conversion() {
        let mut session = ChatSession::new("s1");
        session.add_turn(TurnRole::User, "Hello");
        session.add_turn(TurnRole::Assistant, "Hi");

        let messages = session.messages();
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content.as_deref(), Some("Hi"));
    }
}
