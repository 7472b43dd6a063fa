use log::{ info, warn };
use std::sync::Arc;

use crate::cli::Args;
use crate::config::prompt::off_topic_response;
use crate::error::ChatError;
use crate::guardrails::is_on_topic;
use crate::llm::chat::{ new_client as new_chat_client, ChatClient };
use crate::llm::completion::{ finalize_reply, CompletionClient };
use crate::llm::{ LlmConfig, LlmError };
use crate::models::chat::{ ChatResponse, Message };
use crate::validation::{ validate_conversation, ConversationLimits };

#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub topic: String,
    pub strict_topic_mode: bool,
    pub limits: ConversationLimits,
    pub max_output_chars: usize,
}

impl AgentSettings {
    pub fn from_args(args: &Args) -> Self {
        Self {
            topic: args.topic.clone(),
            strict_topic_mode: args.strict_topic_mode,
            limits: ConversationLimits {
                max_turns: args.max_turns,
                max_input_chars: args.max_input_chars,
            },
            max_output_chars: args.max_output_chars,
        }
    }
}

/// Request-scoped pipeline: validate, classify (strict mode), complete, clamp.
#[derive(Clone)]
pub struct OrbAgent {
    chat_client: Arc<dyn ChatClient>,
    completion: CompletionClient,
    settings: AgentSettings,
}

impl OrbAgent {
    pub fn new(chat_client: Arc<dyn ChatClient>, settings: AgentSettings) -> Self {
        let completion = CompletionClient::new(chat_client.clone(), settings.topic.clone());
        Self { chat_client, completion, settings }
    }

    pub fn from_args(args: &Args) -> Result<Self, LlmError> {
        let llm_config = LlmConfig::from_args(args);
        let chat_client = new_chat_client(&llm_config)?;
        info!(
            "Chat client configured: Model={}, URL={}, Timeout={:?}",
            chat_client.get_model(),
            llm_config.base_url,
            llm_config.timeout
        );
        if llm_config.api_key.is_none() {
            warn!("LLM_API_KEY is not set. Chat requests reaching the model will fail.");
        }
        Ok(Self::new(chat_client, AgentSettings::from_args(args)))
    }

    pub async fn process_chat(
        &self,
        request_id: &str,
        messages: &[Message]
    ) -> Result<ChatResponse, ChatError> {
        let conversation = validate_conversation(messages, &self.settings.limits)?;

        if self.settings.strict_topic_mode {
            let on_topic = is_on_topic(
                self.chat_client.as_ref(),
                &conversation.latest_user.content,
                &self.settings.topic
            ).await?;
            if !on_topic {
                info!("[{}] Off-topic question refused", request_id);
                return Ok(off_topic_response(&self.settings.topic));
            }
        }

        let raw_text = self.completion.complete(conversation.messages).await?;
        let assistant_text = finalize_reply(&raw_text, self.settings.max_output_chars);
        info!(
            "[{}] Answered with {} characters (model returned {})",
            request_id,
            assistant_text.chars().count(),
            raw_text.chars().count()
        );

        Ok(ChatResponse { assistant_text, suggestions: Vec::new() })
    }
}
