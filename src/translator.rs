//! Statistical translator boundary
//!
//! Non-name text is handed to an opaque sentence translator. The core only
//! relies on [`StatisticalTranslator::translate`]; whatever error it returns
//! reaches the caller untouched.

use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use ollama_rs::generation::completion::request::GenerationRequest;
use ollama_rs::generation::options::GenerationOptions;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::prompts::translation_prompt;
use crate::{LLMClient, LLMParams, TARGET_LLM_REQUEST};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslatorError {
    #[error("{backend} translation request failed: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },

    #[error("Translation request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Translator returned an empty response")]
    EmptyResponse,
}

/// Sentence-to-sentence translation used for text that is not a name
#[async_trait]
pub trait StatisticalTranslator: Send + Sync {
    async fn translate(&self, source: &str) -> Result<String, TranslatorError>;
}

#[async_trait]
impl<T: StatisticalTranslator + ?Sized> StatisticalTranslator for std::sync::Arc<T> {
    async fn translate(&self, source: &str) -> Result<String, TranslatorError> {
        (**self).translate(source).await
    }
}

/// Translator backed by an Ollama or OpenAI model.
///
/// Each call is a single request bounded by `request_timeout`; retries are
/// left to the caller.
#[derive(Clone)]
pub struct LlmTranslator {
    params: LLMParams,
    request_timeout: Duration,
}

impl LlmTranslator {
    pub fn new(params: LLMParams, request_timeout: Duration) -> Self {
        Self {
            params,
            request_timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.params.model
    }

    async fn request(&self, prompt: String) -> Result<String, TranslatorError> {
        match &self.params.llm_client {
            LLMClient::Ollama(ollama) => {
                let mut request = GenerationRequest::new(self.params.model.clone(), prompt);
                request.options =
                    Some(GenerationOptions::default().temperature(self.params.temperature));

                ollama
                    .generate(request)
                    .await
                    .map(|response| response.response)
                    .map_err(|e| TranslatorError::Backend {
                        backend: "Ollama",
                        message: e.to_string(),
                    })
            }
            LLMClient::OpenAI(client) => {
                let openai_error = |message: String| TranslatorError::Backend {
                    backend: "OpenAI",
                    message,
                };

                let message = ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()
                    .map_err(|e| openai_error(e.to_string()))?;
                let messages: Vec<ChatCompletionRequestMessage> = vec![message.into()];

                let request = CreateChatCompletionRequestArgs::default()
                    .model(self.params.model.clone())
                    .temperature(self.params.temperature)
                    .messages(messages)
                    .build()
                    .map_err(|e| openai_error(e.to_string()))?;

                let response = client
                    .chat()
                    .create(request)
                    .await
                    .map_err(|e| openai_error(e.to_string()))?;

                Ok(response
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
                    .unwrap_or_default())
            }
        }
    }
}

#[async_trait]
impl StatisticalTranslator for LlmTranslator {
    async fn translate(&self, source: &str) -> Result<String, TranslatorError> {
        let prompt = translation_prompt(source);
        debug!(target: TARGET_LLM_REQUEST, "Sending translation request to {}: {}", self.params.model, prompt);

        let response = match timeout(self.request_timeout, self.request(prompt)).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(target: TARGET_LLM_REQUEST, "Translation request timed out after {:?}", self.request_timeout);
                return Err(TranslatorError::Timeout(self.request_timeout));
            }
        };

        let translated = clean_response(&response).map_err(|e| {
            warn!(target: TARGET_LLM_REQUEST, "Empty translation for '{}'", source);
            e
        })?;

        debug!(target: TARGET_LLM_REQUEST, "Translation received: {}", translated);
        Ok(translated)
    }
}

/// Trim a model reply; a blank reply is an error.
pub fn clean_response(response: &str) -> Result<String, TranslatorError> {
    let translated = response.trim();
    if translated.is_empty() {
        Err(TranslatorError::EmptyResponse)
    } else {
        Ok(translated.to_string())
    }
}
