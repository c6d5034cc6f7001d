use std::io::Write;

use log::{debug, info, warn};
use serde_json::json;

use crate::{
    conversation::Conversation,
    lights::LightRegistry,
    model_client::{ChatRequestBuilder, ClientError, ModelClient, ToolCall},
    tools::ToolTable,
};

/// Upper bound on model round-trips within a single user turn.
const MAX_TOOL_ROUNDS: usize = 8;

const SYSTEM_PREAMBLE: &str = "You are a helpful assistant that controls the smart lights in a \
     home. Use the available functions to inspect or change the lights when the user asks, and \
     answer in plain language.";

/// A `Session` handles one conversation from beginning to end: the console
/// loop, the chat history, and the lights the model may touch.
pub struct Session {
    model_client: Box<dyn ModelClient>,
    tools: ToolTable,
    lights: LightRegistry,
    conversation: Conversation,
    model: String,
}

impl Session {
    pub fn new(
        model_client: Box<dyn ModelClient>,
        tools: ToolTable,
        lights: LightRegistry,
        model: impl Into<String>,
    ) -> Self {
        Self {
            model_client,
            tools,
            lights,
            conversation: Conversation::new(SYSTEM_PREAMBLE),
            model: model.into(),
        }
    }

    /// Runs the prompt/response loop until the user types `exit` or stdin
    /// closes.
    pub async fn run(&mut self) {
        loop {
            let Some(user_input) = read_user_line() else {
                break;
            };

            if user_input == "exit" {
                break;
            }

            self.conversation.add_user_message(user_input);

            match self.run_turn().await {
                Ok(reply) => println!("Assistant > {reply}"),
                Err(err) => {
                    warn!("Chat completion failed: {err}");
                    println!("Assistant > (the model service failed: {err})");
                }
            }
        }
    }

    /// One turn: request a completion, dispatch any tool calls the model
    /// makes, feed their results back, and repeat until the model answers in
    /// plain text.
    async fn run_turn(&mut self) -> Result<String, ClientError> {
        for _ in 0..MAX_TOOL_ROUNDS {
            let request = ChatRequestBuilder::new(&self.model)
                .with_messages(self.conversation.messages())
                .with_tools(self.tools.definitions())
                .build();

            let message = self.model_client.complete(&request).await?;

            let tool_calls = message.tool_calls.clone().unwrap_or_default();
            let reply = message.content.clone();
            self.conversation.add_assistant_message(message);

            if tool_calls.is_empty() {
                return Ok(reply.unwrap_or_default());
            }

            for call in &tool_calls {
                let output = self.dispatch(call);
                self.conversation.add_tool_result(&call.id, output);
            }
        }

        warn!("Gave up after {MAX_TOOL_ROUNDS} tool rounds within one turn");

        Ok("I could not finish that request.".to_owned())
    }

    /// Tool failures become a JSON error payload in the tool result, so the
    /// model can relay them conversationally instead of the turn dying.
    fn dispatch(&mut self, call: &ToolCall) -> String {
        let name = &call.function.name;
        info!("Model invoked {name}");

        match self
            .tools
            .invoke(&mut self.lights, name, &call.function.arguments)
        {
            Ok(value) => value.to_string(),
            Err(err) => {
                debug!("Tool {name} failed: {err}");
                json!({ "error": err.to_string() }).to_string()
            }
        }
    }
}

fn read_user_line() -> Option<String> {
    let mut line = String::new();

    print!("User > ");
    std::io::stdout().flush().ok()?;

    match std::io::stdin().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_owned()),
        Err(err) => {
            warn!("Failed to read from stdin: {err}");
            None
        }
    }
}
