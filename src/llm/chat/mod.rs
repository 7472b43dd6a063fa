pub mod openai;
pub mod response;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use super::{ LlmConfig, LlmError };
use crate::models::chat::Message;
use self::openai::OpenAIResponsesClient;
use self::response::ResponseShape;

/// One upstream call: the full message list plus sampling limits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

/// The single call primitive shared by the topic classifier and the main completion.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn create_response(&self, request: &CompletionRequest) -> Result<ResponseShape, LlmError>;

    fn get_model(&self) -> String;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, LlmError> {
    let client = OpenAIResponsesClient::new(config)?;
    Ok(Arc::new(client))
}
