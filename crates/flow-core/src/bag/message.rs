use serde::{Deserialize, Serialize};

use crate::errors::MessageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    Information,
    Warning,
    Error,
}

/// Entrada del log de mensajes del `Bag`. El texto nunca está vacío.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMessage")]
pub struct Message {
    text: String,
    kind: MessageKind,
}

#[derive(Deserialize)]
struct RawMessage {
    text: String,
    kind: MessageKind,
}

impl TryFrom<RawMessage> for Message {
    type Error = MessageError;

    fn try_from(raw: RawMessage) -> Result<Self, Self::Error> {
        Message::new(raw.text, raw.kind)
    }
}

impl Message {
    pub fn new(text: impl Into<String>, kind: MessageKind) -> Result<Self, MessageError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(MessageError::EmptyText);
        }
        Ok(Self { text, kind })
    }

    pub fn info(text: impl Into<String>) -> Result<Self, MessageError> {
        Self::new(text, MessageKind::Information)
    }

    pub fn warning(text: impl Into<String>) -> Result<Self, MessageError> {
        Self::new(text, MessageKind::Warning)
    }

    pub fn error(text: impl Into<String>) -> Result<Self, MessageError> {
        Self::new(text, MessageKind::Error)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_rejected() {
        assert_eq!(Message::info("").unwrap_err(), MessageError::EmptyText);
        assert_eq!(Message::error("   ").unwrap_err(), MessageError::EmptyText);
    }

    #[test]
    fn deserializing_empty_text_fails() {
        let raw = serde_json::json!({"text": "", "kind": "Warning"});
        assert!(serde_json::from_value::<Message>(raw).is_err());
    }
}
