use std::time::Duration;

use crate::{
    config::ClientConfig,
    retry::{retry_with_backoff, RetryPolicy},
    upload::{validate_upload, UploadFile},
    ChatResponse, DocQaClient, DocumentsList, Health, Result, Stats, UploadResponse,
};

#[derive(Clone, Debug)]
/// The client a UI talks to: [`DocQaClient`] with retries.
///
/// Every operation except [`ResilientClient::health_check`] is retried with
/// exponential backoff. Local upload validation runs once, before the first
/// attempt, and is never retried. The default policy has no observer; the
/// executor logs retries under the `tracing` feature.
pub struct ResilientClient {
    inner: DocQaClient,
    policy: RetryPolicy,
}

impl ResilientClient {
    /// Creates a client for `base_url` with default timeout and retry policy.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::from_config(&ClientConfig::new(base_url)?)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            inner: DocQaClient::from_config(config),
            policy: config.options.retry_policy()?,
        })
    }

    /// Creates a client from `DOCQA_*` environment variables.
    ///
    /// **Not available on `wasm32` targets**; see [`ClientConfig::from_env`].
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self> {
        Self::from_config(&ClientConfig::from_env()?)
    }

    /// Replaces the retry policy, observer included.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.with_timeout(timeout);
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// The underlying single-attempt client.
    pub fn inner(&self) -> &DocQaClient {
        &self.inner
    }

    pub async fn chat(
        &self,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<ChatResponse> {
        retry_with_backoff(|| self.inner.chat(message, conversation_id), &self.policy).await
    }

    pub async fn upload_document(&self, file: &UploadFile) -> Result<UploadResponse> {
        validate_upload(file)?;
        retry_with_backoff(|| self.inner.send_upload(file), &self.policy).await
    }

    pub async fn list_documents(&self) -> Result<DocumentsList> {
        retry_with_backoff(|| self.inner.list_documents(), &self.policy).await
    }

    pub async fn get_stats(&self) -> Result<Stats> {
        retry_with_backoff(|| self.inner.get_stats(), &self.policy).await
    }

    pub async fn delete_document(&self, doc_id: &str) -> Result<()> {
        retry_with_backoff(|| self.inner.delete_document(doc_id), &self.policy).await
    }

    /// Single attempt: liveness checks must fail fast.
    pub async fn health_check(&self) -> Result<Health> {
        self.inner.health_check().await
    }
}
