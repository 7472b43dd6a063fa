pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod guardrails;
pub mod llm;
pub mod models;
pub mod rate_limit;
pub mod server;
pub mod validation;

use agent::OrbAgent;
use cli::Args;
use log::info;
use server::Server;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("LLM Model: {}", args.llm_model);
    info!("LLM Endpoint: {}", args.llm_base_url);
    info!("LLM API Key Set: {}", args.llm_api_key.as_deref().is_some_and(|k| !k.trim().is_empty()));
    info!("Topic: {}", args.topic);
    info!("Strict Topic Mode: {}", args.strict_topic_mode);
    info!("Rate Limit Per Minute: {}", args.rate_limit_per_min);
    info!("Max Turns Per Session: {}", args.max_turns);
    info!("Max Input Chars: {}", args.max_input_chars);
    info!("Max Output Chars: {}", args.max_output_chars);
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let agent = OrbAgent::from_args(&args)?;
    let server = Server::new(agent, args);
    server.run().await?;

    Ok(())
}
