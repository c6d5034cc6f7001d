use async_trait::async_trait;
use log::{debug, trace};

use crate::{
    config::Config,
    model_client::{ChatMessage, ChatRequest, ChatResponse, ClientError, ModelClient},
};

/// Speaks the OpenAI-compatible `/chat/completions` HTTP API. One request,
/// one JSON response; failures are surfaced verbatim, never retried.
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatMessage, ClientError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!("Sending chat completion request to {url}");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        trace!("Got chat completion response: {parsed:?}");

        parsed.into_message()
    }
}
