//! Generative-model chat passthrough
//!
//! Handlers talk to a [`ChatModel`]; [`GeminiClient`] is the production
//! implementation. Tests swap in a stub.

mod gemini;
pub mod prompts;

use async_trait::async_trait;

pub use gemini::GeminiClient;

/// Chat client error type
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    /// Transport or decode failure; the request URL is stripped
    #[error("{0}")]
    Http(reqwest::Error),

    /// Non-success status from the model API, with its error message
    #[error("[{status}] {message}")]
    Upstream { status: u16, message: String },

    #[error("model returned no text")]
    EmptyReply,
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.without_url())
    }
}

/// Single-turn text generation
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn send(&self, prompt: &str) -> Result<String, ChatError>;
}
