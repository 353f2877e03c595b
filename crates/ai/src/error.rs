//! Assistant error types.

use pocketpilot_core::Error as CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    /// Invalid input or request.
    #[error("{0}")]
    InvalidInput(String),

    /// No API key configured for the LLM provider.
    #[error("Missing API key for provider {0}")]
    MissingApiKey(String),

    /// Provider error (from rig-core or the HTTP API).
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Tool execution failed: {0}")]
    ToolExecutionFailed(String),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AiError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Wraps a domain failure raised inside a tool call.
    pub fn tool(err: impl std::fmt::Display) -> Self {
        Self::ToolExecutionFailed(err.to_string())
    }

    /// Stable code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AiError::InvalidInput(_) => "INVALID_INPUT",
            AiError::MissingApiKey(_) => "MISSING_API_KEY",
            AiError::Provider(_) => "PROVIDER_ERROR",
            AiError::ToolExecutionFailed(_) => "TOOL_EXECUTION_FAILED",
            AiError::Core(_) => "CORE_ERROR",
            AiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<AiError> for CoreError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::Core(inner) => inner,
            AiError::InvalidInput(msg) => CoreError::invalid(msg),
            other => CoreError::Unexpected(other.to_string()),
        }
    }
}
