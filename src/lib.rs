//! # Valise
//!
//! An LLM-powered travel packing assistant built with Rust.
//!
//! ## Features
//!
//! - **Bounded orchestration:** An explicit state machine drives the
//!   model/tool conversation, capping re-ask cycles
//! - **At-most-once tools:** Each tool is admitted a single time per run
//! - **Ollama backend:** Speaks the OpenAI-compatible chat completions API
//! - **OpenWeatherMap integration:** Multi-day forecast digests for packing
//!   decisions

pub mod agent;
pub mod config;
pub mod error;
pub mod tools;
pub mod weather;

pub use config::Config;
pub use error::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const NAME: &str = env!("CARGO_PKG_NAME");
