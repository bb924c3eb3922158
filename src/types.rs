use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    pub conversation_id: String,
}

/// A retrieved chunk the answer was grounded on.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Source {
    pub filename: String,
    pub text: String,
    #[serde(default)]
    pub chunk_id: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    pub doc_id: String,
    pub filename: String,
    pub chunks: u64,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DocumentsList {
    #[serde(default)]
    pub success: bool,
    pub count: u64,
    pub documents: Vec<Document>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Document {
    pub filename: String,
    pub file_type: String,
    pub chunks: u64,
    #[serde(default)]
    pub doc_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub success: bool,
    pub total_chunks: u64,
    pub unique_documents: u64,
    pub collection_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Health {
    pub status: String,
}
