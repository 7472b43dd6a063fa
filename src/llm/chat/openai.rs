use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE } };
use serde::Serialize;

use super::response::ResponseShape;
use super::{ ChatClient, CompletionRequest };
use crate::llm::{ LlmConfig, LlmError };
use crate::models::chat::Message;

pub struct OpenAIResponsesClient {
    http: HttpClient,
    api_key: Option<String>,
    model: String,
    url: String,
}

#[derive(Serialize)]
struct OpenAIResponsesRequest<'a> {
    model: &'a str,
    input: &'a [Message],
    max_output_tokens: u32,
    temperature: f32,
}

impl OpenAIResponsesClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = HttpClient::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            url: config.base_url.clone(),
        })
    }

    fn bearer(&self) -> Result<HeaderValue, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e|
            LlmError::InvalidApiKey(e.to_string())
        )
    }
}

#[async_trait]
impl ChatClient for OpenAIResponsesClient {
    async fn create_response(&self, request: &CompletionRequest) -> Result<ResponseShape, LlmError> {
        let auth = self.bearer()?;

        let body = OpenAIResponsesRequest {
            model: &self.model,
            input: &request.messages,
            max_output_tokens: request.max_output_tokens,
            temperature: request.temperature,
        };

        debug!(
            "POST {} model={} messages={} max_output_tokens={}",
            self.url,
            self.model,
            request.messages.len(),
            request.max_output_tokens
        );

        let resp = self.http.post(&self.url).header(AUTHORIZATION, auth).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Upstream { status: status.as_u16(), body });
        }

        let text = resp.text().await?;
        ResponseShape::from_json(&text).map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }
}
