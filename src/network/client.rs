use thiserror::Error;

use crate::common::{ChatReply, ChatRequest};

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid reply payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// HTTP client cho endpoint `/chat`.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ChatClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts `{"message": text}` and returns the reply's `response` field.
    ///
    /// The status code is not inspected: any body that decodes as a reply is accepted,
    /// anything else is a [`DeliveryError::Decode`].
    pub async fn deliver(&self, text: &str) -> Result<String, DeliveryError> {
        let request = ChatRequest {
            message: text.to_string(),
        };

        let response = self.http.post(&self.endpoint).json(&request).send().await?;
        log::debug!("POST {} -> {}", self.endpoint, response.status());

        let body = response.bytes().await?;
        let reply: ChatReply = serde_json::from_slice(&body)?;
        Ok(reply.response)
    }
}
