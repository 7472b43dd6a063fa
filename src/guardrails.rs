use log::debug;

use crate::config::prompt::{ classifier_prompt, CLASSIFIER_SYSTEM_PROMPT };
use crate::llm::chat::{ ChatClient, CompletionRequest };
use crate::llm::LlmError;
use crate::models::chat::Message;

pub const CLASSIFIER_MAX_OUTPUT_TOKENS: u32 = 16;
pub const CLASSIFIER_TEMPERATURE: f32 = 0.2;

pub fn classifier_request(user_text: &str, topic: &str) -> CompletionRequest {
    CompletionRequest {
        messages: vec![
            Message::system(CLASSIFIER_SYSTEM_PROMPT),
            Message::user(classifier_prompt(topic, user_text))
        ],
        max_output_tokens: CLASSIFIER_MAX_OUTPUT_TOKENS,
        temperature: CLASSIFIER_TEMPERATURE,
    }
}

/// On-topic only when the answer contains "YES" and nowhere contains "NO".
/// Anything ambiguous counts as off-topic.
pub fn verdict_from_text(text: &str) -> bool {
    let upper = text.to_uppercase();
    upper.contains("YES") && !upper.contains("NO")
}

pub async fn is_on_topic(
    client: &dyn ChatClient,
    user_text: &str,
    topic: &str
) -> Result<bool, LlmError> {
    let request = classifier_request(user_text, topic);
    let answer = client.create_response(&request).await?.text();
    let on_topic = verdict_from_text(&answer);
    debug!("Topic classifier answered {:?} -> on_topic={}", answer, on_topic);
    Ok(on_topic)
}
