//! `docqa-client` is an async, resilient HTTP client for a document
//! question-answering backend.
//!
//! [`ResilientClient`] is the entry point for UIs. It wraps the
//! single-attempt [`DocQaClient`] with request timeouts and retries:
//! - [`ResilientClient::chat`]
//! - [`ResilientClient::upload_document`]
//! - [`ResilientClient::list_documents`]
//! - [`ResilientClient::get_stats`]
//! - [`ResilientClient::delete_document`]
//! - [`ResilientClient::health_check`] (never retried)

mod client;
mod config;
pub mod endpoint;
mod error;
mod options;
mod resilient;
pub mod retry;
mod session;
mod timer;
pub mod transport;
mod types;
pub mod upload;

pub use client::DocQaClient;
pub use config::{normalize_base_url, ClientConfig, DEFAULT_BASE_URL};
pub use error::{DocQaError, NormalizedError};
pub use options::ClientOptions;
pub use resilient::ResilientClient;
pub use retry::{retry_with_backoff, RetryAttempt, RetryPolicy};
pub use session::ChatSession;
pub use types::{
    ChatRequest, ChatResponse, Document, DocumentsList, Health, Source, Stats, UploadResponse,
};
pub use upload::{validate_upload, UploadFile};

pub type Result<T> = std::result::Result<T, DocQaError>;
