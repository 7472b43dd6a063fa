use std::sync::Arc;

use super::chat::{ ChatClient, CompletionRequest };
use super::LlmError;
use crate::config::prompt::system_prompt;
use crate::models::chat::Message;

pub const COMPLETION_MAX_OUTPUT_TOKENS: u32 = 512;
pub const COMPLETION_TEMPERATURE: f32 = 0.4;
pub const NO_RESPONSE_PLACEHOLDER: &str = "(No response)";

/// Main answer path: topic system prompt + caller conversation → plain text.
#[derive(Clone)]
pub struct CompletionClient {
    client: Arc<dyn ChatClient>,
    topic: String,
}

impl CompletionClient {
    pub fn new(client: Arc<dyn ChatClient>, topic: impl Into<String>) -> Self {
        Self { client, topic: topic.into() }
    }

    pub fn build_request(&self, conversation: &[Message]) -> CompletionRequest {
        let mut messages = Vec::with_capacity(conversation.len() + 1);
        messages.push(Message::system(system_prompt(&self.topic)));
        messages.extend_from_slice(conversation);

        CompletionRequest {
            messages,
            max_output_tokens: COMPLETION_MAX_OUTPUT_TOKENS,
            temperature: COMPLETION_TEMPERATURE,
        }
    }

    pub async fn complete(&self, conversation: &[Message]) -> Result<String, LlmError> {
        let request = self.build_request(conversation);
        let shape = self.client.create_response(&request).await?;
        Ok(shape.text())
    }
}

/// Cuts `text` to `max_chars` characters. Only a cut text gets its trailing
/// whitespace trimmed.
pub fn clamp_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => text[..cut].trim_end().to_string(),
    }
}

/// Clamp plus the placeholder for an empty result.
pub fn finalize_reply(text: &str, max_chars: usize) -> String {
    let clamped = clamp_text(text, max_chars);
    if clamped.is_empty() {
        NO_RESPONSE_PLACEHOLDER.to_string()
    } else {
        clamped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::chat::response::ResponseShape;
    use crate::models::chat::Role;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingClient {
        seen: Mutex<Vec<CompletionRequest>>,
    }

    #[async_trait]
    impl ChatClient for RecordingClient {
        async fn create_response(&self, request: &CompletionRequest) -> Result<ResponseShape, LlmError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(ResponseShape::Nested(vec!["  Sure. ".into(), "Here you go.  ".into()]))
        }

        fn get_model(&self) -> String {
            "test-model".into()
        }
    }

    #[test]
    fn clamp_cuts_at_character_budget() {
        assert_eq!(clamp_text("HelloWorld", 5), "Hello");
        assert_eq!(clamp_text("héllo wörld", 7), "héllo w");
    }

    #[test]
    fn clamp_trims_only_trailing_whitespace_after_cut() {
        assert_eq!(clamp_text("Hello   World", 7), "Hello");
        assert_eq!(clamp_text("  Hi there", 5), "  Hi");
    }

    #[test]
    fn text_within_budget_is_untouched() {
        assert_eq!(clamp_text("Hello  ", 7), "Hello  ");
        assert_eq!(clamp_text("", 5), "");
    }

    #[test]
    fn empty_reply_becomes_placeholder() {
        assert_eq!(finalize_reply("", 10), "(No response)");
        assert_eq!(finalize_reply("     abc", 3), "(No response)");
        assert_eq!(finalize_reply("abc", 0), "(No response)");
        assert_eq!(finalize_reply("abc", 3), "abc");
    }

    #[tokio::test]
    async fn complete_prepends_system_prompt() {
        let recorder = Arc::new(RecordingClient::default());
        let completion = CompletionClient::new(recorder.clone(), "cooking");

        let conversation = vec![Message::user("How long do I boil an egg?")];
        let text = completion.complete(&conversation).await.unwrap();
        assert_eq!(text, "Sure. Here you go.");

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let request = &seen[0];
        assert_eq!(request.max_output_tokens, 512);
        assert_eq!(request.temperature, 0.4);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert!(request.messages[0].content.contains("directly related to: cooking."));
        assert_eq!(request.messages[1], conversation[0]);
    }
}
