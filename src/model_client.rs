use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tools::ToolDefinition;

#[async_trait]
pub trait ModelClient {
    /// Requests one chat completion and returns the assistant's message.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatMessage, ClientError>;
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("chat completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("chat completion service answered {status}: {body}")]
    Api { status: u16, body: String },

    #[error("chat completion response contained no choices")]
    NoChoices,
}

/// One message on the chat-completions wire. The same shape is used in both
/// directions: requests carry the history, responses carry the assistant's
/// reply and any tool calls it decided to make.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self::with_role("system", text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::with_role("user", text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::with_role("assistant", text)
    }

    /// The result of one tool invocation, linked back to the call that
    /// requested it.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".into(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    fn with_role(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: Some(text.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,

    #[serde(rename = "type")]
    pub call_type: String,

    pub function: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,

    /// JSON-encoded argument object, exactly as the model produced it.
    pub arguments: String,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolDefinition>,

    /// `auto`: the model decides when to call a function.
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<String>,
}

impl ChatRequest {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

pub struct ChatRequestBuilder {
    model: String,
    messages: Vec<ChatMessage>,
    tools: Vec<ToolDefinition>,
}

impl ChatRequestBuilder {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            tools: Vec::new(),
        }
    }

    pub fn with_messages(mut self, messages: &[ChatMessage]) -> Self {
        self.messages.extend_from_slice(messages);

        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools.extend(tools);

        self
    }

    pub fn build(self) -> ChatRequest {
        let tool_choice = if self.tools.is_empty() {
            None
        } else {
            Some("auto".into())
        };

        ChatRequest {
            model: self.model,
            messages: self.messages,
            tools: self.tools,
            tool_choice,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
}

impl ChatResponse {
    /// Takes the first choice's message; the request never asks for more
    /// than one.
    pub fn into_message(self) -> Result<ChatMessage, ClientError> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or(ClientError::NoChoices)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ChatMessage, ChatRequestBuilder, ChatResponse, ClientError};
    use crate::tools::ToolTable;

    #[test]
    fn test_deserialize_tool_call_response() {
        let body = json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "model": "gpt-4.1-mini",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {
                            "name": "change_state",
                            "arguments": "{\"id\": 1, \"is_on\": true}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });

        let response: ChatResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.choices[0].finish_reason.as_deref(), Some("tool_calls"));

        let message = response.into_message().unwrap();

        assert_eq!(message.role, "assistant");
        assert_eq!(message.content, None);

        let calls = message.tool_calls.unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, "call_abc");
        assert_eq!(calls[0].function.name, "change_state");
        assert_eq!(calls[0].function.arguments, "{\"id\": 1, \"is_on\": true}");
    }

    #[test]
    fn test_deserialize_plain_text_response() {
        let body = json!({
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "All lights are off." },
                "finish_reason": "stop"
            }]
        });

        let response: ChatResponse = serde_json::from_value(body).unwrap();
        let message = response.into_message().unwrap();

        assert_eq!(message.content.as_deref(), Some("All lights are off."));
        assert!(message.tool_calls.is_none());
    }

    #[test]
    fn test_empty_choices_is_an_error() {
        let response: ChatResponse = serde_json::from_value(json!({ "choices": [] })).unwrap();

        assert!(matches!(
            response.into_message(),
            Err(ClientError::NoChoices)
        ));
    }

    #[test]
    fn test_serialize_request_with_tools() {
        let request = ChatRequestBuilder::new("gpt-4.1-mini")
            .with_messages(&[ChatMessage::user("turn on the lamp")])
            .with_tools(ToolTable::lights_control().definitions())
            .build();

        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "gpt-4.1-mini");
        assert_eq!(value["tool_choice"], "auto");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["tools"][0]["type"], "function");
        assert_eq!(value["tools"][0]["function"]["name"], "get_lights");
        assert_eq!(value["tools"][1]["function"]["name"], "change_state");
    }

    #[test]
    fn test_serialize_request_without_tools_omits_tool_fields() {
        let request = ChatRequestBuilder::new("gpt-4.1-mini")
            .with_messages(&[ChatMessage::user("hello")])
            .build();

        let value = serde_json::to_value(&request).unwrap();

        assert!(value.get("tools").is_none());
        assert!(value.get("tool_choice").is_none());
    }
}
