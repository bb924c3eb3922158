use std::fmt;
use std::time::Duration;

use reqwest::{multipart, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::{
    config::ClientConfig,
    endpoint::{self, BodyEncoding, Endpoint},
    transport::fetch_with_timeout,
    upload::{validate_upload, UploadFile},
    ChatRequest, ChatResponse, DocQaError, DocumentsList, Health, Result, Stats, UploadResponse,
};

const UNKNOWN_ERROR: &str = "Unknown error";
const BACKEND_UNAVAILABLE: &str = "Backend is not available";

/// Request body, checked against the endpoint's [`BodyEncoding`].
enum Payload {
    Json(serde_json::Value),
    Multipart(multipart::Form),
    Empty,
}

impl Payload {
    fn encoding(&self) -> BodyEncoding {
        match self {
            Self::Json(_) => BodyEncoding::Json,
            Self::Multipart(_) => BodyEncoding::Multipart,
            Self::Empty => BodyEncoding::Empty,
        }
    }
}

#[derive(Clone)]
/// Single-attempt HTTP client for the document question-answering backend.
///
/// Every method makes exactly one request. Use
/// [`ResilientClient`](crate::ResilientClient) for retries.
pub struct DocQaClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl fmt::Debug for DocQaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocQaClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl DocQaClient {
    /// Creates a client for `base_url` with the default 30 s timeout.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self::from_config(&ClientConfig::new(base_url)?))
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            timeout: config.options.timeout(),
        }
    }

    /// Replaces the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Asks a question, optionally continuing an existing conversation.
    pub async fn chat(
        &self,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<ChatResponse> {
        let payload = serde_json::to_value(ChatRequest {
            message: message.to_owned(),
            conversation_id: conversation_id.map(str::to_owned),
        })
        .map_err(|err| DocQaError::Parse(format!("could not encode chat request: {err}")))?;
        let request = self.request(&endpoint::CHAT, Payload::Json(payload))?;
        let response = fetch_with_timeout(request, self.timeout).await?;
        read_json(response).await
    }

    /// Validates `file` locally, then uploads it as multipart field `file`.
    ///
    /// Validation failures return before any request is built.
    pub async fn upload_document(&self, file: &UploadFile) -> Result<UploadResponse> {
        validate_upload(file)?;
        self.send_upload(file).await
    }

    /// Uploads a file that has already passed [`validate_upload`].
    pub(crate) async fn send_upload(&self, file: &UploadFile) -> Result<UploadResponse> {
        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.filename.clone())
            .mime_str(file.content_type())
            .map_err(|err| {
                DocQaError::Validation(format!("invalid content type for {}: {err}", file.filename))
            })?;
        let form = multipart::Form::new().part("file", part);
        let request = self.request(&endpoint::UPLOAD_DOCUMENT, Payload::Multipart(form))?;
        let response = fetch_with_timeout(request, self.timeout).await?;
        read_json(response).await
    }

    pub async fn list_documents(&self) -> Result<DocumentsList> {
        let request = self.request(&endpoint::LIST_DOCUMENTS, Payload::Empty)?;
        let response = fetch_with_timeout(request, self.timeout).await?;
        read_json(response).await
    }

    pub async fn get_stats(&self) -> Result<Stats> {
        let request = self.request(&endpoint::STATS, Payload::Empty)?;
        let response = fetch_with_timeout(request, self.timeout).await?;
        read_json(response).await
    }

    /// Deletes a document. Any 2xx counts as success; the body is ignored.
    pub async fn delete_document(&self, doc_id: &str) -> Result<()> {
        let target = &endpoint::DELETE_DOCUMENT;
        let url = target.url_with_segment(&self.base_url, doc_id)?;
        let request = self.request_to(target, url, Payload::Empty)?;
        let response = fetch_with_timeout(request, self.timeout).await?;
        if !response.status().is_success() {
            return Err(read_http_error(response).await);
        }
        Ok(())
    }

    /// Checks backend liveness.
    pub async fn health_check(&self) -> Result<Health> {
        let request = self.request(&endpoint::HEALTH, Payload::Empty)?;
        let response = fetch_with_timeout(request, self.timeout).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DocQaError::Http {
                status: status.as_u16(),
                message: BACKEND_UNAVAILABLE.to_owned(),
            });
        }
        let body = read_body(response).await?;
        parse_body(&body)
    }

    fn request(&self, endpoint: &Endpoint, payload: Payload) -> Result<reqwest::RequestBuilder> {
        let url = endpoint.url(&self.base_url)?;
        self.request_to(endpoint, url, payload)
    }

    fn request_to(
        &self,
        endpoint: &Endpoint,
        url: Url,
        payload: Payload,
    ) -> Result<reqwest::RequestBuilder> {
        if payload.encoding() != endpoint.body {
            return Err(DocQaError::InvalidConfig(format!(
                "endpoint {} expects a {:?} body, got {:?}",
                endpoint.name,
                endpoint.body,
                payload.encoding()
            )));
        }
        let builder = self.http.request(endpoint.method.clone(), url);
        Ok(match payload {
            Payload::Json(body) => builder.json(&body),
            Payload::Multipart(form) => builder.multipart(form),
            Payload::Empty => builder,
        })
    }
}

async fn read_body(response: reqwest::Response) -> Result<String> {
    response.text().await.map_err(DocQaError::Network)
}

/// Reads a non-2xx response into [`DocQaError::Http`].
///
/// A body that cannot be read counts as empty; the status is never lost.
async fn read_http_error(response: reqwest::Response) -> DocQaError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    http_error(status, &body)
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    if !response.status().is_success() {
        return Err(read_http_error(response).await);
    }
    let body = read_body(response).await?;
    parse_body(&body)
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|err| DocQaError::Parse(format!("invalid response JSON: {err}; body: {body}")))
}

/// Normalizes a non-2xx response into [`DocQaError::Http`].
///
/// Message precedence: JSON `detail` → raw text of a non-JSON body →
/// `"Unknown error"` for an empty body. A JSON body without `detail` reports
/// the status code.
fn http_error(status: StatusCode, body: &str) -> DocQaError {
    let message = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => match json.get("detail") {
            Some(serde_json::Value::String(detail)) if !detail.is_empty() => detail.clone(),
            Some(detail) if !detail.is_null() && !detail.is_string() => detail.to_string(),
            _ => format!("HTTP error! status: {}", status.as_u16()),
        },
        Err(_) => {
            let text = body.trim();
            if text.is_empty() {
                UNKNOWN_ERROR.to_owned()
            } else {
                text.to_owned()
            }
        }
    };

    DocQaError::Http {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::{http_error, DocQaClient, Payload};
    use crate::endpoint::{CHAT, HEALTH};
    use crate::DocQaError;

    fn message(status: u16, body: &str) -> String {
        let status = StatusCode::from_u16(status).expect("valid status");
        match http_error(status, body) {
            DocQaError::Http { message, .. } => message,
            other => panic!("expected http error, got {other:?}"),
        }
    }

    #[test]
    fn uses_detail_when_present() {
        assert_eq!(message(404, r#"{"detail":"not found"}"#), "not found");
    }

    #[test]
    fn renders_structured_detail_as_json() {
        assert_eq!(
            message(422, r#"{"detail":[{"loc":["body","message"]}]}"#),
            r#"[{"loc":["body","message"]}]"#
        );
    }

    #[test]
    fn json_without_detail_reports_status() {
        assert_eq!(message(500, r#"{"error":"boom"}"#), "HTTP error! status: 500");
        assert_eq!(message(502, r#"{"detail":""}"#), "HTTP error! status: 502");
    }

    #[test]
    fn falls_back_to_raw_text_then_unknown() {
        assert_eq!(message(502, "  Bad Gateway\n"), "Bad Gateway");
        assert_eq!(message(500, ""), "Unknown error");
    }

    #[test]
    fn payload_must_match_endpoint_encoding() {
        let client = DocQaClient::new("http://localhost:8000").expect("valid base url");

        assert!(client.request(&HEALTH, Payload::Empty).is_ok());
        assert!(client
            .request(&CHAT, Payload::Json(serde_json::json!({"message": "hi"})))
            .is_ok());

        let err = client
            .request(&CHAT, Payload::Empty)
            .expect_err("chat needs a json body");
        assert!(matches!(err, DocQaError::InvalidConfig(_)), "got {err:?}");
        assert!(err.to_string().contains("chat"));
    }

    #[test]
    fn debug_shows_base_url() {
        let client = DocQaClient::new("http://localhost:8000").expect("valid base url");
        let debug = format!("{client:?}");
        assert!(debug.contains("http://localhost:8000"));
    }
}
