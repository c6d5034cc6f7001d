use crate::model_client::ChatMessage;

/// Ordered history of one chat, oldest first. Append-only for the lifetime
/// of the process; nothing is persisted.
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// An empty preamble starts the history with no system message.
    pub fn new(system_preamble: impl Into<String>) -> Self {
        let preamble = system_preamble.into();

        let mut messages = Vec::new();
        if !preamble.is_empty() {
            messages.push(ChatMessage::system(preamble));
        }

        Self { messages }
    }

    pub fn add_user_message(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::user(text));
    }

    /// Records the assistant's message verbatim, tool calls included, so the
    /// next request shows the model its own function invocations.
    pub fn add_assistant_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn add_tool_result(&mut self, tool_call_id: impl Into<String>, content: impl Into<String>) {
        self.messages
            .push(ChatMessage::tool_result(tool_call_id, content));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
