use reqwest::{Method, Url};

use crate::{DocQaError, Result};

/// How a request body is encoded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BodyEncoding {
    Json,
    Multipart,
    Empty,
}

/// Static mapping from a logical operation to its HTTP call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Endpoint {
    pub name: &'static str,
    pub method: Method,
    /// Path below the base URL. A trailing `{doc_id}` segment is filled per call.
    pub path: &'static str,
    pub body: BodyEncoding,
}

pub const CHAT: Endpoint = Endpoint {
    name: "chat",
    method: Method::POST,
    path: "/api/chat/message",
    body: BodyEncoding::Json,
};

pub const UPLOAD_DOCUMENT: Endpoint = Endpoint {
    name: "upload_document",
    method: Method::POST,
    path: "/api/upload/document",
    body: BodyEncoding::Multipart,
};

pub const LIST_DOCUMENTS: Endpoint = Endpoint {
    name: "list_documents",
    method: Method::GET,
    path: "/api/documents/list",
    body: BodyEncoding::Empty,
};

pub const STATS: Endpoint = Endpoint {
    name: "get_stats",
    method: Method::GET,
    path: "/api/documents/stats",
    body: BodyEncoding::Empty,
};

pub const DELETE_DOCUMENT: Endpoint = Endpoint {
    name: "delete_document",
    method: Method::DELETE,
    path: "/api/documents/{doc_id}",
    body: BodyEncoding::Empty,
};

pub const HEALTH: Endpoint = Endpoint {
    name: "health_check",
    method: Method::GET,
    path: "/health",
    body: BodyEncoding::Empty,
};

impl Endpoint {
    /// Resolves this endpoint's fixed path against `base_url`.
    pub fn url(&self, base_url: &str) -> Result<Url> {
        parse_url(&format!("{base_url}{}", self.path))
    }

    /// Resolves a templated path, substituting `segment` for `{doc_id}`.
    ///
    /// The segment is percent-encoded, so ids containing `/` or `?` stay a
    /// single path segment.
    pub fn url_with_segment(&self, base_url: &str, segment: &str) -> Result<Url> {
        let prefix = self.path.strip_suffix("/{doc_id}").ok_or_else(|| {
            DocQaError::InvalidConfig(format!("endpoint {} takes no path parameter", self.name))
        })?;
        let mut url = parse_url(&format!("{base_url}{prefix}"))?;
        url.path_segments_mut()
            .map_err(|()| {
                DocQaError::InvalidConfig(format!("base URL cannot carry a path: {base_url}"))
            })?
            .push(segment);
        Ok(url)
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|err| DocQaError::InvalidConfig(format!("invalid URL '{raw}': {err}")))
}

#[cfg(test)]
mod tests {
    use super::{CHAT, DELETE_DOCUMENT, HEALTH};

    #[test]
    fn joins_fixed_paths_onto_base() {
        let url = CHAT.url("http://localhost:8000").expect("valid url");
        assert_eq!(url.as_str(), "http://localhost:8000/api/chat/message");

        let url = HEALTH.url("https://qa.example.com/backend").expect("valid url");
        assert_eq!(url.as_str(), "https://qa.example.com/backend/health");
    }

    #[test]
    fn encodes_document_id_as_single_segment() {
        let url = DELETE_DOCUMENT
            .url_with_segment("http://localhost:8000", "reports/q1 final?.pdf")
            .expect("valid url");
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/documents/reports%2Fq1%20final%3F.pdf"
        );
    }

    #[test]
    fn fixed_endpoint_rejects_path_parameter() {
        assert!(CHAT.url_with_segment("http://localhost:8000", "x").is_err());
    }
}
