//! Client code for wwjs.
//!
//! This crate provides the upstream chat-completions client and the
//! analysis unit that sits between the HTTP layer and the model.

pub mod analysis;
pub mod generator;
pub mod openai;

pub use analysis::Analyzer;
pub use generator::{Generation, TextGenerator};
pub use openai::{ChatMessage, ChatRequest, OpenAiClient, OpenAiConfig, OpenAiError, Role};
