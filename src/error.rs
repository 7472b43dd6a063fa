use std::time::Duration;

use axum::{
    http::{ header::RETRY_AFTER, HeaderValue, StatusCode },
    response::{ IntoResponse, Response },
    Json,
};
use log::error;
use thiserror::Error;

use crate::llm::LlmError;
use crate::models::chat::ErrorBody;
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Rate limit exceeded. Please wait a minute and try again.")]
    RateLimited {
        retry_after: Option<Duration>,
    },

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl ChatError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::InvalidBody(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Llm(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn retry_after_header(&self) -> Option<HeaderValue> {
        match self {
            Self::RateLimited { retry_after: Some(wait) } => {
                // Whole seconds, rounded up, never zero.
                let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
                Some(HeaderValue::from(secs.max(1)))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Chat request failed ({}): {}", status.as_u16(), self);
        }

        let retry_after = self.retry_after_header();
        let mut response = (status, Json(ErrorBody { error: self.to_string() })).into_response();
        if let Some(value) = retry_after {
            response.headers_mut().insert(RETRY_AFTER, value);
        }
        response
    }
}
