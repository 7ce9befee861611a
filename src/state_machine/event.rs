//! Events that can occur in a conversation

/// Events that trigger draft transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Direct message from the user, with any files attached to it
    UserMessage { text: String, file_ids: Vec<String> },
}

impl Event {
    #[cfg(test)]
    pub fn text(text: impl Into<String>) -> Self {
        Event::UserMessage {
            text: text.into(),
            file_ids: vec![],
        }
    }

    pub fn with_files(text: impl Into<String>, file_ids: Vec<String>) -> Self {
        Event::UserMessage {
            text: text.into(),
            file_ids,
        }
    }
}
