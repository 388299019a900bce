//! Agent module - orchestration, model client, and conversation handling
//!
//! This module contains the control loop that coordinates the model and the
//! tools:
//! - Chat completions client for Ollama (OpenAI-compatible API)
//! - Append-only conversation owned by one run
//! - Completion detection on free-form assistant text
//! - At-most-once tool admission
//! - The bounded orchestration state machine

mod client;
mod conversation;
mod dedup;
mod extractor;
mod orchestrator;
pub mod prompts;
mod types;

pub use client::{ModelClient, OllamaClient};
pub use conversation::Conversation;
pub use dedup::DedupPolicy;
pub use extractor::{last_top_level_object, FinalAnswer};
pub use orchestrator::{Orchestrator, OrchestratorConfig, RunReport};
pub use types::*;
