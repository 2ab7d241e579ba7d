//! Group chat messages

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::client::{ApiClient, ApiError, ApiResult};
use crate::models::{Message, NewMessage};

pub const MESSAGES_PATH: &str = "/api/chat/messages/";

/// Chat operations
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Full snapshot of the recent messages, oldest first
    async fn messages(&self) -> ApiResult<Vec<Message>>;

    /// Post a message; returns the stored message
    async fn send_message(&self, message: &NewMessage) -> ApiResult<Message>;
}

/// [`ChatApi`] over the REST client
#[derive(Debug, Clone)]
pub struct ChatService {
    client: Arc<ApiClient>,
}

impl ChatService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChatApi for ChatService {
    async fn messages(&self) -> ApiResult<Vec<Message>> {
        let body: Value = self.client.get(MESSAGES_PATH).await?;
        if !body.is_array() {
            tracing::warn!("Message snapshot is not a list, treating as empty");
            return Ok(Vec::new());
        }

        let messages: Vec<Message> =
            serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        tracing::debug!(count = messages.len(), "Fetched messages");
        Ok(messages)
    }

    async fn send_message(&self, message: &NewMessage) -> ApiResult<Message> {
        self.client.post(MESSAGES_PATH, message).await
    }
}
