// Meaning analysis via an OpenAI chat completion

use super::{provider_failure, request_error, MeaningExplainer, StageError};
use crate::config::{Credentials, PipelineConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Single-turn prompt, embedding the transcript verbatim in quotes
pub fn meaning_prompt(text: &str) -> String {
    format!(
        "Analyze this phrase and explain what the speaker really means (context, emotion, intent):\n\"{}\"",
        text
    )
}

/// Client for `v1/chat/completions`. One user message, no streaming,
/// no multi-turn context; the top choice is the explanation.
pub struct OpenAiMeaningExplainer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiMeaningExplainer {
    pub fn new(config: &PipelineConfig, credentials: &Credentials) -> Self {
        Self {
            client: super::http_client(config),
            endpoint: config.openai_endpoint.clone(),
            api_key: credentials.openai_api_key.clone(),
            model: config.openai_model.clone(),
        }
    }
}

#[async_trait]
impl MeaningExplainer for OpenAiMeaningExplainer {
    async fn explain(&self, text: &str) -> Result<String, StageError> {
        let url = format!("{}/v1/chat/completions", self.endpoint);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: meaning_prompt(text),
            }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(provider_failure(response).await);
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| StageError::Parse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| StageError::Parse("no completion choices".to_string()))
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}
