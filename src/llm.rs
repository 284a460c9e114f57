use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GenerationConfig;

/// A collaborator that turns a prompt into generated text.
///
/// Implemented by [`GenerationClient`] in production and by fakes in router
/// tests. Failures are surfaced to the caller; whether they hard-fail or
/// soft-degrade is the dispatcher's decision, not the generator's.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for one generation pipeline: a fixed model behind an
/// OpenAI-compatible completions endpoint.
pub struct GenerationClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl GenerationClient {
    pub fn new(config: &GenerationConfig, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: model.into(),
            max_tokens: config.max_tokens,
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: self.max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!("Sending generation request to {} (model {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to generation backend")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Generation backend error ({}): {}", status, error_body);
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .context("Failed to parse generation response")?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .context("No completion returned by generation backend")
    }

    /// Question answering over a caller-supplied context passage.
    pub async fn answer(&self, question: &str, context: &str) -> Result<String> {
        let prompt = format!(
            "Answer the question using only the context below.\n\n\
             Context: {context}\n\nQuestion: {question}"
        );
        self.complete(&prompt).await
    }

    /// Abstractive summary of the given text.
    pub async fn summarize(&self, text: &str) -> Result<String> {
        let prompt = format!("Summarize the following text in a few sentences:\n\n{text}");
        self.complete(&prompt).await
    }
}

#[async_trait]
impl TextGenerator for GenerationClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.complete(prompt).await
    }
}
