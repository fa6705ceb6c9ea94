//! Easel AI - Text Generation
//!
//! This crate provides AI-assisted text generation for Easel:
//! - Provider: The `TextProvider` trait and request/response types
//! - OpenAI / Anthropic: Remote providers over their HTTP APIs
//! - Demo: Deterministic local generator and fallback wrapper
//! - Prompt: Prompt builders for script and narration flows
//! - Task: Cancellable background generation
//! - Error: Error types with sanitized, user-presentable messages
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use easel_ai::{
//!     prompt, FallbackProvider, GenerationRequest, GenerationTask,
//!     OpenAiProvider, TextKind,
//! };
//!
//! let provider = Arc::new(FallbackProvider::new(Arc::new(OpenAiProvider::from_env()?)));
//! let request = GenerationRequest::new(
//!     prompt::script_prompt("urban beekeeping", 90, "friendly"),
//!     TextKind::Script,
//! );
//!
//! let task = GenerationTask::spawn(provider, request);
//! let script = task.await_result().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod anthropic;
pub mod demo;
pub mod error;
pub mod openai;
pub mod prompt;
pub mod provider;
pub mod task;

// Re-export main types
pub use anthropic::{AnthropicConfig, AnthropicProvider};
pub use demo::{DemoProvider, FallbackProvider};
pub use error::{Error, Result};
pub use openai::{OpenAiConfig, OpenAiProvider};
pub use provider::{GenerationRequest, GenerationResponse, TextKind, TextProvider};
pub use task::GenerationTask;
