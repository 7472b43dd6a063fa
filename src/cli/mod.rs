use clap::Parser;
use log::warn;
use std::str::FromStr;

use crate::llm::{ DEFAULT_MODEL, DEFAULT_RESPONSES_URL };

pub const DEFAULT_TOPIC: &str = "the webinar topic";
pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:4000";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Upstream LLM Args ---
    /// API key for the upstream LLM provider. Requests that reach the model fail with 500 when unset.
    #[arg(long, env = "LLM_API_KEY")]
    pub llm_api_key: Option<String>,

    /// Model name used for both the topic classifier and the main completion.
    #[arg(long, env = "LLM_MODEL", default_value = DEFAULT_MODEL, value_parser = text_or(DEFAULT_MODEL))]
    pub llm_model: String,

    /// Full URL of the Responses-style completion endpoint.
    #[arg(
        long,
        env = "LLM_BASE_URL",
        default_value = DEFAULT_RESPONSES_URL,
        value_parser = text_or(DEFAULT_RESPONSES_URL)
    )]
    pub llm_base_url: String,

    /// Timeout in seconds applied to every upstream call.
    #[arg(long, env = "LLM_TIMEOUT_SECS", default_value = "30", value_parser = number_or(30u64))]
    pub llm_timeout_secs: u64,

    // --- Topic Args ---
    /// Topic the assistant is locked to.
    #[arg(long, env = "WEBINAR_TOPIC", default_value = DEFAULT_TOPIC, value_parser = text_or(DEFAULT_TOPIC))]
    pub topic: String,

    /// Classify every question against the topic before answering ("true" or blank enables it, anything else disables it).
    #[arg(
        long,
        env = "STRICT_TOPIC_MODE",
        default_value = "true",
        value_parser = parse_flag,
        action = clap::ArgAction::Set
    )]
    pub strict_topic_mode: bool,

    // --- Limits ---
    /// Requests allowed per client IP per minute.
    #[arg(long, env = "RATE_LIMIT_PER_MIN", default_value = "10", value_parser = number_or(10u32))]
    pub rate_limit_per_min: u32,

    /// Maximum number of user messages in one conversation.
    #[arg(long, env = "MAX_TURNS_PER_SESSION", default_value = "20", value_parser = number_or(20usize))]
    pub max_turns: usize,

    /// Maximum characters accepted in the latest user message.
    #[arg(long, env = "MAX_INPUT_CHARS", default_value = "1200", value_parser = number_or(1200usize))]
    pub max_input_chars: usize,

    /// Maximum characters returned to the client.
    #[arg(long, env = "MAX_OUTPUT_CHARS", default_value = "1200", value_parser = number_or(1200usize))]
    pub max_output_chars: usize,

    // --- General App Args ---
    /// Host address and port for the server to listen on.
    #[arg(
        long,
        env = "SERVER_ADDR",
        default_value = DEFAULT_SERVER_ADDR,
        value_parser = text_or(DEFAULT_SERVER_ADDR)
    )]
    pub server_addr: String,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

/// A blank value counts as unset, so the flag keeps its "true" default.
/// Otherwise only a case-insensitive "true" turns it on.
pub fn parse_flag(value: &str) -> Result<bool, String> {
    Ok(value.is_empty() || value.eq_ignore_ascii_case("true"))
}

/// Text setting where a blank value counts as unset.
fn text_or(default: &'static str) -> impl Fn(&str) -> Result<String, String> + Clone + Send + Sync + 'static {
    move |value: &str| {
        if value.is_empty() { Ok(default.to_string()) } else { Ok(value.to_string()) }
    }
}

/// Numeric setting that keeps `default` when the value is blank or not a number.
fn number_or<T>(default: T) -> impl Fn(&str) -> Result<T, String> + Clone + Send + Sync + 'static
    where T: FromStr + Copy + Send + Sync + 'static
{
    move |value: &str| {
        let trimmed = value.trim();
        match trimmed.parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(_) => {
                if !trimmed.is_empty() {
                    warn!("Ignoring non-numeric setting '{}', using the default.", value);
                }
                Ok(default)
            }
        }
    }
}
