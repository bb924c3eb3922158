//! Local checks applied to a document before it is uploaded.

use crate::{DocQaError, Result};

/// Largest accepted upload, in bytes (10 MiB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

pub const ALLOWED_EXTENSIONS: [&str; 4] = [".pdf", ".txt", ".md", ".docx"];

pub const ALLOWED_MIME_TYPES: [&str; 4] = [
    "application/pdf",
    "text/plain",
    "text/markdown",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

const INVALID_TYPE_MESSAGE: &str = "Invalid file type. Allowed: PDF, TXT, MD, DOCX";
const TOO_LARGE_MESSAGE: &str = "File size must be less than 10MB";
const MALFORMED_MIME_MESSAGE: &str = "Invalid file type: malformed MIME type";

/// A document held in memory, ready to be sent as the multipart `file` field.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub filename: String,
    /// MIME type reported by the picker, if any.
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Reads a file from disk, guessing its MIME type from the extension.
    ///
    /// **Not available on `wasm32` targets** — browser callers receive bytes
    /// from a file picker and use [`UploadFile::new`].
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                DocQaError::Validation(format!("path has no file name: {}", path.display()))
            })?
            .to_owned();
        let bytes = tokio::fs::read(path).await.map_err(|err| {
            DocQaError::Validation(format!("could not read {}: {err}", path.display()))
        })?;
        let mime_type = guess_mime_type(&filename).map(str::to_owned);
        Ok(Self {
            filename,
            mime_type,
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// MIME type sent with the multipart part.
    ///
    /// A reported type is forwarded only when it is one of
    /// [`ALLOWED_MIME_TYPES`]; otherwise the type is derived from the
    /// extension. The result is always a well-formed constant.
    pub(crate) fn content_type(&self) -> &'static str {
        self.mime_type
            .as_deref()
            .and_then(|mime| {
                ALLOWED_MIME_TYPES
                    .iter()
                    .copied()
                    .find(|allowed| *allowed == mime)
            })
            .or_else(|| guess_mime_type(&self.filename))
            .unwrap_or("application/octet-stream")
    }
}

/// Maps an allowed extension to its MIME type.
pub fn guess_mime_type(filename: &str) -> Option<&'static str> {
    let lower = filename.to_ascii_lowercase();
    ALLOWED_EXTENSIONS
        .iter()
        .zip(ALLOWED_MIME_TYPES)
        .find(|(ext, _)| lower.ends_with(*ext))
        .map(|(_, mime)| mime)
}

/// `type/subtype[; params]` with RFC 7230 token characters on both sides.
fn is_well_formed_mime(mime: &str) -> bool {
    let is_token = |part: &str| {
        !part.is_empty()
            && part.bytes().all(|byte| {
                byte.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&byte)
            })
    };
    let essence = mime.split(';').next().unwrap_or_default().trim();
    essence
        .split_once('/')
        .is_some_and(|(kind, subtype)| is_token(kind) && is_token(subtype))
}

/// Checks type, then size. A file passes the type check when either its MIME
/// type or its extension is allowed; a reported MIME type that is not
/// well-formed is rejected outright.
pub fn validate_upload(file: &UploadFile) -> Result<()> {
    if file
        .mime_type
        .as_deref()
        .is_some_and(|mime| !is_well_formed_mime(mime))
    {
        return Err(DocQaError::Validation(MALFORMED_MIME_MESSAGE.to_owned()));
    }

    let mime_allowed = file
        .mime_type
        .as_deref()
        .is_some_and(|mime| ALLOWED_MIME_TYPES.contains(&mime));
    let lower = file.filename.to_ascii_lowercase();
    let extension_allowed = ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext));

    if !mime_allowed && !extension_allowed {
        return Err(DocQaError::Validation(INVALID_TYPE_MESSAGE.to_owned()));
    }
    if file.size() > MAX_FILE_SIZE {
        return Err(DocQaError::Validation(TOO_LARGE_MESSAGE.to_owned()));
    }
    Ok(())
}
