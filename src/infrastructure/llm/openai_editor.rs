use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{PostProcessError, TranscriptEditor};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

const SYSTEM_PROMPT: &str =
    "You are an expert text editor specializing in correcting transcription errors.";
const USER_INSTRUCTION: &str = "Perform basic editing tasks on this speech transcript. \
Don't change wording, just update the punctuation and spelling and add paragraph breaks \
where necessary.";

/// Chat-completions cleanup pass. One attempt per transcript; the caller
/// decides what to do when it fails.
pub struct OpenAiEditor {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl OpenAiEditor {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            api_key,
            base_url: base_url.unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            model: model.unwrap_or_else(|| "gpt-4o-mini".to_string()),
            temperature: 0.7,
        }
    }
}

#[async_trait]
impl TranscriptEditor for OpenAiEditor {
    async fn clean(&self, raw_text: &str) -> Result<String, PostProcessError> {
        let url = format!("{}/chat/completions", self.base_url);
        let user_content = format!("{}\n\n{}", USER_INSTRUCTION, raw_text);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_content,
                },
            ],
            temperature: self.temperature,
        };

        tracing::debug!(model = %self.model, chars = raw_text.len(), "Post-processing transcript");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PostProcessError::Transport(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(PostProcessError::Api { status, body });
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| PostProcessError::MalformedResponse(format!("parse response: {}", e)))?;

        let content = result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| PostProcessError::MalformedResponse("no choices in response".into()))?;

        tracing::debug!(chars = content.len(), "Post-processing completed");

        Ok(content)
    }
}
