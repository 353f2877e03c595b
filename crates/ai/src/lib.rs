//! Pocket Pilot assistant - LLM orchestration using rig-core.
//!
//! # Architecture
//!
//! - `chat`: Non-streaming chat service running the model ↔ tools ↔ model loop
//! - `providers`: OpenAI-compatible client settings and factory
//! - `tools`: Finance tools the model can call, bound to one user
//! - `summary`: LLM-backed monthly summary writer
//! - `env`: Environment abstraction over the core services
//!
//! # Example
//!
//! ```ignore
//! use pocketpilot_ai::{ChatConfig, ChatMessage, ChatRequest, ChatService};
//!
//! let service = ChatService::new(Arc::new(env), ChatConfig::default());
//! let reply = service
//!     .chat("user-1", ChatRequest { messages: vec![ChatMessage::user("How am I doing this month?")] })
//!     .await?;
//! println!("{}", reply.message);
//! ```

pub mod chat;
pub mod env;
pub mod error;
pub mod providers;
pub mod summary;
pub mod tools;

pub use chat::{ChatConfig, ChatMessage, ChatRequest, ChatResponse, ChatRole, ChatService};
pub use env::AiEnvironment;
pub use error::AiError;
pub use providers::{LlmConfig, DEFAULT_MODEL};
pub use summary::LlmSummaryWriter;
pub use tools::ToolSet;
