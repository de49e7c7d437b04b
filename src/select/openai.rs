//! OpenAI chat completions as a [`Reasoner`].

use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;

use super::Reasoner;
use crate::config::LlmConfig;
use crate::FinderError;

/// Ranking is deterministic; the sampling temperature is not configurable
const TEMPERATURE: f32 = 0.0;

pub struct OpenAiReasoner {
    client: Client<OpenAIConfig>,
    model: String,
    max_tokens: u32,
}

impl OpenAiReasoner {
    pub fn new(api_key: &str, config: &LlmConfig) -> Self {
        Self {
            client: Client::with_config(OpenAIConfig::new().with_api_key(api_key)),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    /// Build a reasoner when the config enables one and a key is present
    pub fn from_config(config: &LlmConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        config.api_key.as_deref().map(|key| Self::new(key, config))
    }
}

#[async_trait]
impl Reasoner for OpenAiReasoner {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, FinderError> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()
                .map_err(|e| FinderError::Reasoning(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| FinderError::Reasoning(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(TEMPERATURE)
            .max_completion_tokens(self.max_tokens)
            .build()
            .map_err(|e| FinderError::Reasoning(e.to_string()))?;

        tracing::debug!("Requesting completion from {}", self.model);

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| FinderError::Reasoning(e.to_string()))?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .ok_or(FinderError::EmptyResponse)?;

        tracing::debug!("Model replied {:?}", content);
        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_key_and_enabled() {
        let mut config = LlmConfig::default();
        assert!(OpenAiReasoner::from_config(&config).is_none());

        config.api_key = Some("sk-test".to_string());
        assert!(OpenAiReasoner::from_config(&config).is_some());

        config.enabled = false;
        assert!(OpenAiReasoner::from_config(&config).is_none());
    }
}
