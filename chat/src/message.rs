use chrono::Local;
use serde::{Deserialize, Serialize};

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    /// Label shown next to the message
    pub fn label(self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Assistant => "Gemini",
        }
    }
}

/// One entry of the transcript. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
    /// Local wall-clock time of creation, `HH:MM:SS`
    pub timestamp: String,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender,
            timestamp: Local::now().format("%H:%M:%S").to_string(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text)
    }
}

/// Ordered, append-only log of a session's messages.
///
/// Serializes as a plain JSON array of [`Message`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.messages.clear();
    }
}

impl From<Vec<Message>> for Transcript {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_wire_form() {
        let message = Message {
            text: "hi".to_string(),
            sender: Sender::Assistant,
            timestamp: "10:11:12".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({ "text": "hi", "sender": "assistant", "timestamp": "10:11:12" })
        );
    }

    #[test]
    fn timestamp_is_clock_time() {
        let message = Message::user("hello");
        let parts: Vec<&str> = message.timestamp.split(':').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.len() == 2 && p.parse::<u8>().is_ok()));
    }

    #[test]
    fn transcript_serializes_as_array_in_order() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("first"));
        transcript.push(Message::assistant("second"));
        transcript.push(Message::user("third"));

        let encoded = serde_json::to_string(&transcript).unwrap();
        assert!(encoded.starts_with('['));

        let decoded: Transcript = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, transcript);
        let texts: Vec<&str> = decoded.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["first", "second", "third"]);
    }

    #[test]
    fn labels() {
        assert_eq!(Sender::User.label(), "You");
        assert_eq!(Sender::Assistant.label(), "Gemini");
    }
}
