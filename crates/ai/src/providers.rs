//! OpenAI-compatible provider settings and the rig-core client factory.

use reqwest::Client as HttpClient;
use rig::providers::openai;

use crate::error::AiError;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const PROVIDER_LABEL: &str = "openai-compatible";

/// Where and how to reach the LLM. Any endpoint speaking the OpenAI chat
/// completions protocol works (OpenAI, OpenRouter, a local gateway, ...).
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Overrides the provider's default base url when set.
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl LlmConfig {
    /// The API key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    pub fn model(&self) -> &str {
        let model = self.model.trim();
        if model.is_empty() {
            DEFAULT_MODEL
        } else {
            model
        }
    }
}

/// Creates a chat-completions client. Uses the Completions API rather than
/// the Responses API so that compatible gateways work.
pub(crate) fn create_client(
    config: &LlmConfig,
) -> Result<openai::CompletionsClient<HttpClient>, AiError> {
    let key = config
        .api_key()
        .ok_or_else(|| AiError::MissingApiKey(PROVIDER_LABEL.to_string()))?;

    let mut builder = openai::CompletionsClient::builder().api_key(key);
    if let Some(url) = config.base_url.as_deref().filter(|u| !u.trim().is_empty()) {
        builder = builder.base_url(url.trim_end_matches('/'));
    }
    builder
        .build()
        .map_err(|e| AiError::Provider(e.to_string()))
}
