#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Session core for the ECA Bot chat widget.
//!
//! A [`SessionController`] owns one [`TranscriptStore`], stages user input,
//! sends the latest user turn to a [`CompletionProvider`] and appends the
//! reply (or a fixed fallback) once the request settles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod controller;
mod error;
pub mod prompt;
pub mod transcript;

pub use controller::{ReplyHandle, SessionController, SessionSettings};
pub use error::CompletionError;
pub use prompt::{FALLBACK_REPLY, GREETING, SUGGESTED_PROMPTS};
pub use transcript::{Transcript, TranscriptStore};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Assistant,
    User,
}

/// One entry of the transcript. Never mutated after it is appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }
}

/// Sampling parameters forwarded to the completion service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 500,
        }
    }
}

/// A single stateless completion request: one prompt, no prior turns.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub generation: GenerationConfig,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
    fn name(&self) -> &str;
}
