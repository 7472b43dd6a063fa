pub mod chat;
pub mod completion;

use std::time::Duration;
use thiserror::Error;

use crate::cli::Args;

pub const DEFAULT_RESPONSES_URL: &str = "https://api.openai.com/v1/responses";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl LlmConfig {
    pub fn from_args(args: &Args) -> Self {
        Self {
            api_key: args.llm_api_key.clone().filter(|k| !k.trim().is_empty()),
            model: args.llm_model.clone(),
            base_url: args.llm_base_url.clone(),
            timeout: Duration::from_secs(args.llm_timeout_secs),
        }
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    /// No credential configured. Reported on first use, not at startup.
    #[error("Missing LLM_API_KEY")]
    MissingApiKey,

    #[error("Invalid API key format: {0}")]
    InvalidApiKey(String),

    #[error("LLM error: {status} {body}")]
    Upstream {
        status: u16,
        body: String,
    },

    #[error("LLM request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid LLM response: {0}")]
    InvalidResponse(String),
}
