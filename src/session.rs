use crate::{ChatResponse, ResilientClient, Result};

/// A chat conversation that remembers the server-issued conversation id.
#[derive(Debug)]
pub struct ChatSession<'a> {
    client: &'a ResilientClient,
    conversation_id: Option<String>,
}

impl<'a> ChatSession<'a> {
    pub fn new(client: &'a ResilientClient) -> Self {
        Self {
            client,
            conversation_id: None,
        }
    }

    /// Resumes a conversation started elsewhere.
    pub fn resume(client: &'a ResilientClient, conversation_id: impl Into<String>) -> Self {
        Self {
            client,
            conversation_id: Some(conversation_id.into()),
        }
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Sends `message` in this conversation.
    ///
    /// On success the returned conversation id replaces the stored one; on
    /// failure the stored id is kept.
    pub async fn send(&mut self, message: &str) -> Result<ChatResponse> {
        let response = self
            .client
            .chat(message, self.conversation_id.as_deref())
            .await?;
        self.conversation_id = Some(response.conversation_id.clone());
        Ok(response)
    }
}
