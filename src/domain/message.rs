use serde::{Deserialize, Serialize};

/// Who authored a message in the dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry in the dialogue, in chat-completion wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Ordered message history for one session.
///
/// The log always begins with exactly one non-empty system message and is
/// never trimmed; user and assistant messages are appended in turn order.
/// Consecutive user messages are allowed (a submission may carry several
/// transcribed clips).
#[derive(Debug, Clone)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    /// Create a log seeded with the behavioral system message.
    ///
    /// An empty system prompt is replaced by a single space so the
    /// system-message-first invariant holds even for degenerate input.
    pub fn new(system_prompt: &str) -> Self {
        let content = if system_prompt.is_empty() {
            " ".to_string()
        } else {
            system_prompt.to_string()
        };
        Self {
            messages: vec![Message::new(Role::System, content)],
        }
    }

    /// Append one message. Empty user/assistant content is silently
    /// dropped. Returns whether a message was actually appended.
    pub fn append(&mut self, role: Role, content: impl Into<String>) -> bool {
        let content = content.into();
        if content.is_empty() {
            return false;
        }
        self.messages.push(Message::new(role, content));
        true
    }

    /// The full ordered history, used verbatim as the completion payload.
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Content of the most recent message, if any besides the system one.
    pub fn last_content(&self) -> Option<&str> {
        self.messages
            .last()
            .filter(|m| m.role != Role::System)
            .map(|m| m.content.as_str())
    }

    /// Roll the log back to a previous length, e.g. after a failed turn.
    /// The system message is never removed.
    pub fn truncate(&mut self, len: usize) {
        self.messages.truncate(len.max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_starts_with_system_message() {
        let log = ConversationLog::new("You are a helpful assistant.");
        assert_eq!(log.len(), 1);
        assert_eq!(log.snapshot()[0].role, Role::System);
        assert!(!log.snapshot()[0].content.is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let mut log = ConversationLog::new("system");
        log.append(Role::User, "first");
        log.append(Role::User, "second");
        log.append(Role::Assistant, "reply");

        let roles: Vec<Role> = log.snapshot().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::User, Role::Assistant]
        );
        assert_eq!(log.snapshot()[2].content, "second");
    }

    #[test]
    fn test_empty_content_is_dropped() {
        let mut log = ConversationLog::new("system");
        assert!(!log.append(Role::User, ""));
        assert!(log.append(Role::User, "hello"));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_truncate_keeps_system_message() {
        let mut log = ConversationLog::new("system");
        log.append(Role::User, "hello");
        log.append(Role::Assistant, "hi");

        log.truncate(1);
        assert_eq!(log.len(), 1);
        assert_eq!(log.snapshot()[0].role, Role::System);

        log.truncate(0);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_last_content_skips_system() {
        let mut log = ConversationLog::new("system");
        assert!(log.last_content().is_none());
        log.append(Role::User, "hello");
        assert_eq!(log.last_content(), Some("hello"));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let msg = Message::new(Role::Assistant, "hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
    }
}
