//! Attachment validation and base64 encoding
//!
//! Documents are checked against the size and type rules before anything
//! touches their content, then encoded to standard base64 for embedding in the
//! submission JSON. Encoding runs under a time budget; the encoding future owns
//! the open file and its buffer, so both are released whether encoding
//! succeeds, fails, or is abandoned on timeout.

use base64::engine::general_purpose::STANDARD;
use base64::write::EncoderStringWriter;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use utoipa::ToSchema;

use crate::config::AttachmentLimits;
use crate::error::{Error, ErrorCode, Result};

/// MIME type of PDF documents
pub const PDF_MIME: &str = "application/pdf";

/// MIME type of Word (DOCX) documents
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// The only document types the provider accepts
pub const ALLOWED_MIME_TYPES: [&str; 2] = [PDF_MIME, DOCX_MIME];

// Multiple of 3 so each chunk encodes without carry-over padding
const ENCODE_CHUNK_SIZE: usize = 3 * 64 * 1024;

/// Where an attachment's bytes live
#[derive(Clone, Debug)]
pub enum AttachmentContent {
    /// Already in memory (e.g. a facade upload)
    Bytes(Vec<u8>),
    /// On disk; read only while encoding
    File(PathBuf),
}

/// A document to attach to a filing
#[derive(Clone, Debug)]
pub struct Attachment {
    /// File name shown to the court
    pub name: String,
    /// Declared size in bytes
    pub size_bytes: u64,
    /// Declared MIME type
    pub mime_type: String,
    /// Document content
    pub content: AttachmentContent,
}

impl Attachment {
    /// In-memory attachment; the size is the buffer length
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            size_bytes: bytes.len() as u64,
            mime_type: mime_type.into(),
            content: AttachmentContent::Bytes(bytes),
        }
    }

    /// File-backed attachment
    ///
    /// Reads only the file metadata. The MIME type is inferred from the
    /// extension when not given; unknown extensions get
    /// `application/octet-stream` and fail validation.
    pub async fn from_path(path: impl AsRef<Path>, mime_type: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| unreadable(&name, &e))?;

        let mime_type = mime_type
            .map(str::to_string)
            .or_else(|| mime_type_for(&name).map(str::to_string))
            .unwrap_or_else(|| "application/octet-stream".to_string());

        Ok(Self {
            name,
            size_bytes: metadata.len(),
            mime_type,
            content: AttachmentContent::File(path.to_path_buf()),
        })
    }
}

/// Infer the MIME type of an accepted document from its file name
pub fn mime_type_for(name: &str) -> Option<&'static str> {
    let extension = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "pdf" => Some(PDF_MIME),
        "docx" => Some(DOCX_MIME),
        _ => None,
    }
}

/// Result of validating one attachment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Validation {
    /// Whether the attachment may be submitted
    pub valid: bool,
    /// Why it may not
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Attachment after encoding, ready for the submission payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EncodedAttachment {
    /// File name
    pub name: String,
    /// Normalized MIME type
    pub mime_type: String,
    /// Size of the original content in bytes
    pub size_bytes: u64,
    /// Standard base64 of the content
    pub content_base64: String,
}

/// Check the size and type rules without touching the content
pub fn validate(attachment: &Attachment, limits: &AttachmentLimits) -> Validation {
    match ensure_valid(attachment, limits) {
        Ok(()) => Validation {
            valid: true,
            error: None,
        },
        Err(e) => Validation {
            valid: false,
            error: Some(e.message().to_string()),
        },
    }
}

/// Like [`validate`], as a typed `Submission` error
pub fn ensure_valid(attachment: &Attachment, limits: &AttachmentLimits) -> Result<()> {
    if attachment.size_bytes > limits.max_size_bytes {
        return Err(too_large(&attachment.name, limits.max_size_bytes));
    }

    let mime_type = normalize_mime(&attachment.mime_type);
    if !ALLOWED_MIME_TYPES.contains(&mime_type.as_str()) {
        return Err(Error::Submission {
            code: ErrorCode::Local("unsupported_file_type"),
            message: format!(
                "File \"{}\" has unsupported type \"{}\". Only PDF and DOCX files are allowed.",
                attachment.name, attachment.mime_type
            ),
        });
    }

    Ok(())
}

/// Validate, then encode within the configured time budget
pub async fn encode(attachment: &Attachment, limits: &AttachmentLimits) -> Result<EncodedAttachment> {
    ensure_valid(attachment, limits)?;

    let started = std::time::Instant::now();
    let content_base64 = tokio::time::timeout(
        limits.encode_timeout,
        encode_content(attachment, limits.max_size_bytes),
    )
    .await
    .map_err(|_| {
        tracing::warn!(
            file = %attachment.name,
            timeout_secs = limits.encode_timeout.as_secs(),
            "attachment encoding timed out"
        );
        Error::Submission {
            code: ErrorCode::Local("encode_timeout"),
            message: format!(
                "Encoding file \"{}\" exceeded the {} second time limit",
                attachment.name,
                limits.encode_timeout.as_secs()
            ),
        }
    })??;

    tracing::debug!(
        file = %attachment.name,
        size_bytes = attachment.size_bytes,
        encoded_len = content_base64.len(),
        elapsed_ms = started.elapsed().as_millis(),
        "attachment encoded"
    );

    Ok(EncodedAttachment {
        name: attachment.name.clone(),
        mime_type: normalize_mime(&attachment.mime_type),
        size_bytes: attachment.size_bytes,
        content_base64,
    })
}

/// Validate every attachment in order, then encode them concurrently
///
/// The first invalid attachment aborts the batch before any content is read.
pub async fn encode_all(
    attachments: &[Attachment],
    limits: &AttachmentLimits,
) -> Result<Vec<EncodedAttachment>> {
    for attachment in attachments {
        ensure_valid(attachment, limits)?;
    }
    try_join_all(attachments.iter().map(|a| encode(a, limits))).await
}

async fn encode_content(attachment: &Attachment, max_size_bytes: u64) -> Result<String> {
    let mut encoder = EncoderStringWriter::new(&STANDARD);

    match &attachment.content {
        AttachmentContent::Bytes(bytes) => {
            for chunk in bytes.chunks(ENCODE_CHUNK_SIZE) {
                write_chunk(&mut encoder, chunk, &attachment.name)?;
                // Give the timeout a chance to fire between chunks
                tokio::task::yield_now().await;
            }
        }
        AttachmentContent::File(path) => {
            let mut file = tokio::fs::File::open(path)
                .await
                .map_err(|e| unreadable(&attachment.name, &e))?;
            let mut buf = vec![0u8; ENCODE_CHUNK_SIZE];
            let mut total: u64 = 0;

            loop {
                let n = file
                    .read(&mut buf)
                    .await
                    .map_err(|e| unreadable(&attachment.name, &e))?;
                if n == 0 {
                    break;
                }
                total += n as u64;
                // The file may have grown since it was validated
                if total > max_size_bytes {
                    return Err(too_large(&attachment.name, max_size_bytes));
                }
                write_chunk(&mut encoder, &buf[..n], &attachment.name)?;
            }
        }
    }

    Ok(encoder.into_inner())
}

fn write_chunk(
    encoder: &mut EncoderStringWriter<'_, base64::engine::GeneralPurpose, String>,
    chunk: &[u8],
    name: &str,
) -> Result<()> {
    encoder.write_all(chunk).map_err(|e| Error::Submission {
        code: ErrorCode::Local("encode_failed"),
        message: format!("Failed to encode file \"{}\": {}", name, e),
    })
}

fn normalize_mime(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn too_large(name: &str, max_size_bytes: u64) -> Error {
    Error::Submission {
        code: ErrorCode::Local("file_too_large"),
        message: format!(
            "File \"{}\" is too large. Maximum size is {}.",
            name,
            format_limit(max_size_bytes)
        ),
    }
}

fn unreadable(name: &str, err: &std::io::Error) -> Error {
    Error::Submission {
        code: ErrorCode::Local("unreadable_file"),
        message: format!("Failed to read file \"{}\": {}", name, err),
    }
}

fn format_limit(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}
