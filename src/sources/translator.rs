use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::models::config::MatcherConfig;
use crate::sources::Translator;

const SYSTEM_PROMPT: &str = "Translate the following text into English.";

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Translator backed by an OpenAI-compatible chat-completions endpoint.
///
/// Without an API key every text passes through untranslated.
pub struct OpenAiTranslator {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
    max_chars: usize,
    semaphore: Arc<Semaphore>,
}

impl OpenAiTranslator {
    pub fn new(client: reqwest::Client, config: &MatcherConfig) -> Self {
        Self {
            client,
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
            endpoint: format!(
                "{}/chat/completions",
                config.openai_base_url.trim_end_matches('/')
            ),
            max_chars: config.translation_max_chars,
            semaphore: Arc::new(Semaphore::new(config.fetch_concurrency.max(1))),
        }
    }

    async fn request_translation(&self, api_key: &str, text: &str) -> Result<String, String> {
        let _permit = self.semaphore.acquire().await.map_err(|e| e.to_string())?;
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?
            .json::<ChatResponse>()
            .await
            .map_err(|e| e.to_string())?;

        first_choice_content(response).ok_or_else(|| "response carried no content".to_string())
    }
}

#[async_trait]
impl Translator for OpenAiTranslator {
    async fn translate(&self, text: &str) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            return text.to_string();
        };
        if text.trim().is_empty() {
            return text.to_string();
        }

        let truncated = truncate_chars(text, self.max_chars);
        match self.request_translation(api_key, truncated).await {
            Ok(translated) => translated,
            Err(error) => {
                log::warn!("Translation error: {error}");
                text.to_string()
            }
        }
    }
}

fn first_choice_content(response: ChatResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
}

/// Returns the first `max_chars` characters of `text`.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
