//! Chat orchestration - model ↔ tools ↔ model loop using rig-core.
//!
//! Builds an agent on the configured OpenAI-compatible provider, registers the
//! finance tools bound to the requesting user and runs a bounded multi-turn
//! exchange until the model produces a final text answer.

use log::{debug, info, warn};
use rig::{
    client::CompletionClient,
    completion::{Message, Prompt},
    message::ToolChoice,
};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::sync::Arc;

use crate::env::AiEnvironment;
use crate::error::AiError;
use crate::providers::create_client;
use crate::tools::ToolSet;

/// Tool rounds allowed before the model must answer.
pub const MAX_TOOL_ROUNDS: usize = 5;

/// Older messages beyond this are dropped from the history sent to the model.
pub const MAX_HISTORY_MESSAGES: usize = 20;

const MAX_MESSAGE_CHARS: usize = 4000;

pub struct ChatConfig {
    /// Maximum number of tool call rounds before stopping.
    pub max_rounds: usize,
    pub max_tokens: Option<u64>,
    pub temperature: Option<f64>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_rounds: MAX_TOOL_ROUNDS,
            max_tokens: Some(2048),
            temperature: Some(0.2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self {
            role: ChatRole::User,
            content: content.to_string(),
        }
    }

    pub fn assistant(content: &str) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.to_string(),
        }
    }
}

/// Full conversation so far; the last message must come from the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub message: String,
}

/// Splits the conversation into the new prompt and the prior history.
fn split_conversation(messages: Vec<ChatMessage>) -> Result<(String, Vec<Message>), AiError> {
    let mut messages = messages;
    let last = messages
        .pop()
        .ok_or_else(|| AiError::invalid_input("At least one message is required"))?;
    if last.role != ChatRole::User {
        return Err(AiError::invalid_input("The last message must come from the user"));
    }
    let prompt = last.content.trim().to_string();
    if prompt.is_empty() {
        return Err(AiError::invalid_input("Message cannot be empty"));
    }
    if prompt.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AiError::invalid_input(format!(
            "Message is too long (max {} characters)",
            MAX_MESSAGE_CHARS
        )));
    }

    let skip = messages.len().saturating_sub(MAX_HISTORY_MESSAGES);
    let mut history = Vec::with_capacity(messages.len() - skip);
    for m in messages.into_iter().skip(skip) {
        if m.content.trim().is_empty() {
            continue;
        }
        if m.content.chars().count() > MAX_MESSAGE_CHARS {
            return Err(AiError::invalid_input(format!(
                "Earlier message is too long (max {} characters)",
                MAX_MESSAGE_CHARS
            )));
        }
        history.push(match m.role {
            ChatRole::User => Message::user(m.content),
            ChatRole::Assistant => Message::assistant(m.content),
        });
    }
    Ok((prompt, history))
}

/// System prompt plus today's date, the user's accounts and remembered facts.
pub fn build_preamble<E: AiEnvironment>(env: &E, user_id: &str) -> String {
    let mut preamble = include_str!("system_prompt.txt").trim().to_string();

    let accounts = env
        .account_service()
        .list_accounts(user_id, false)
        .unwrap_or_else(|e| {
            warn!("Preamble built without accounts for {}: {}", user_id, e);
            Vec::new()
        });
    let memories = env
        .memory_service()
        .list_memories(user_id)
        .unwrap_or_else(|e| {
            warn!("Preamble built without memories for {}: {}", user_id, e);
            Vec::new()
        });

    let _ = write!(
        preamble,
        "\n\n## Current Context\n- Current date: {}\n- Accounts:",
        env.today().format("%Y-%m-%d")
    );
    if accounts.is_empty() {
        preamble.push_str(" none yet");
    }
    for account in &accounts {
        let _ = write!(
            preamble,
            "\n  - {} ({}, {})",
            account.name,
            account.account_type.as_str(),
            account.currency
        );
    }

    if !memories.is_empty() {
        preamble.push_str("\n\n## What you know about the user");
        for memory in &memories {
            let _ = write!(preamble, "\n- {}: {}", memory.key, memory.value);
        }
    }
    preamble
}

pub struct ChatService<E: AiEnvironment> {
    env: Arc<E>,
    config: ChatConfig,
}

impl<E: AiEnvironment + 'static> ChatService<E> {
    pub fn new(env: Arc<E>, config: ChatConfig) -> Self {
        Self { env, config }
    }

    /// Runs one assistant turn and returns its final text.
    pub async fn chat(&self, user_id: &str, request: ChatRequest) -> Result<ChatResponse, AiError> {
        let (prompt, mut history) = split_conversation(request.messages)?;

        let llm = self.env.llm_config();
        let client = create_client(&llm)?;
        let model_id = llm.model().to_string();
        let preamble = build_preamble(self.env.as_ref(), user_id);

        debug!(
            "Starting chat: model={}, history={}, max_rounds={}",
            model_id,
            history.len(),
            self.config.max_rounds
        );

        let tools = ToolSet::new(self.env.clone(), user_id);
        let mut builder = client
            .agent(&model_id)
            .preamble(&preamble)
            .tool(tools.add_transaction)
            .tool(tools.add_bill)
            .tool(tools.spending_summary)
            .tool(tools.forecast)
            .tool(tools.upcoming_bills)
            .tool(tools.budget_status)
            .tool(tools.goals)
            .tool_choice(ToolChoice::Auto);
        if let Some(tokens) = self.config.max_tokens {
            builder = builder.max_tokens(tokens);
        }
        if let Some(temperature) = self.config.temperature {
            builder = builder.temperature(temperature);
        }
        let agent = builder.build();

        let reply = agent
            .prompt(prompt)
            .with_history(&mut history)
            .max_turns(self.config.max_rounds)
            .await
            .map_err(|e| AiError::provider(e.to_string()))?;

        info!("Chat reply generated for user {}", user_id);
        Ok(ChatResponse {
            message: reply.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::test_env::{MockAccountService, MockEnvironment, USER};

    #[test]
    fn test_split_conversation() {
        let (prompt, history) = split_conversation(vec![
            ChatMessage::user("How much did I spend?"),
            ChatMessage::assistant("About 900 so far."),
            ChatMessage::user("  And on groceries? "),
        ])
        .unwrap();
        assert_eq!(prompt, "And on groceries?");
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_split_conversation_rejects_bad_shapes() {
        assert!(matches!(
            split_conversation(vec![]),
            Err(AiError::InvalidInput(_))
        ));
        assert!(matches!(
            split_conversation(vec![ChatMessage::assistant("hi")]),
            Err(AiError::InvalidInput(_))
        ));
        assert!(matches!(
            split_conversation(vec![ChatMessage::user("   ")]),
            Err(AiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_history_is_capped() {
        let mut messages: Vec<ChatMessage> = (0..30)
            .map(|i| ChatMessage::user(&format!("message {}", i)))
            .collect();
        messages.push(ChatMessage::user("latest"));
        let (_, history) = split_conversation(messages).unwrap();
        assert_eq!(history.len(), MAX_HISTORY_MESSAGES);
    }

    #[test]
    fn test_history_messages_share_length_limit() {
        let long = "x".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(matches!(
            split_conversation(vec![
                ChatMessage::assistant(&long),
                ChatMessage::user("Summarise that"),
            ]),
            Err(AiError::InvalidInput(_))
        ));

        // Dropped by the history cap before the length check applies
        let mut messages = vec![ChatMessage::user(&long)];
        messages.extend((0..MAX_HISTORY_MESSAGES).map(|i| ChatMessage::user(&format!("m{}", i))));
        messages.push(ChatMessage::user("latest"));
        let (_, history) = split_conversation(messages).unwrap();
        assert_eq!(history.len(), MAX_HISTORY_MESSAGES);

        let at_limit = "y".repeat(MAX_MESSAGE_CHARS);
        let (_, history) =
            split_conversation(vec![ChatMessage::assistant(&at_limit), ChatMessage::user("ok")])
                .unwrap();
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_preamble_survives_account_failure() {
        let mut env = MockEnvironment::new();
        env.accounts = Arc::new(MockAccountService {
            accounts: Vec::new(),
            unavailable: true,
        });
        let preamble = build_preamble(&env, USER);
        assert!(preamble.contains("Current date: 2024-06-15"));
        assert!(preamble.contains("- Accounts: none yet"));
        assert!(preamble.contains("payday: Paid on the 1st"));
    }

    #[test]
    fn test_preamble_includes_context() {
        let env = MockEnvironment::new();
        let preamble = build_preamble(&env, USER);
        assert!(preamble.contains("Current date: 2024-06-15"));
        assert!(preamble.contains("Everyday Checking (checking, USD)"));
        assert!(!preamble.contains("Old Checking"));
        assert!(preamble.contains("payday: Paid on the 1st"));
    }

    #[tokio::test]
    async fn test_chat_without_api_key() {
        let env = Arc::new(MockEnvironment::new());
        let service = ChatService::new(env, ChatConfig::default());

        let result = service
            .chat(
                USER,
                ChatRequest {
                    messages: vec![ChatMessage::user("Hi")],
                },
            )
            .await;
        assert!(matches!(result, Err(AiError::MissingApiKey(_))));
    }
}
