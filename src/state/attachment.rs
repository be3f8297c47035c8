//! Receipt and signature attachment gate
//!
//! Files enter the form only through [`admit_file`] (or [`check_candidate`]
//! for already-known metadata). Rejected files never touch form state.

use std::fmt;
use std::path::Path;
use thiserror::Error;

/// MIME types accepted for receipts and signatures
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

/// Largest accepted attachment (5 MiB)
pub const MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;

/// Why a candidate file was refused
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("Invalid file type. Please upload only JPG, JPEG, or PNG images.")]
    UnsupportedType { mime_type: String },

    #[error("File size must be less than 5MB")]
    TooLarge { size: u64 },

    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Target slot for an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttachmentSlot {
    Receipt,
    Signature(usize),
}

impl AttachmentSlot {
    /// Confirmation shown once a file is stored
    pub fn accepted_message(&self) -> String {
        match self {
            Self::Receipt => "Receipt uploaded successfully".to_string(),
            Self::Signature(index) => format!("Signature {} uploaded successfully", index + 1),
        }
    }
}

/// A file admitted into form state
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

// Keep the payload out of debug output
impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Check MIME type first, then size
pub fn check_candidate(mime_type: &str, size: u64) -> Result<(), AttachmentError> {
    let normalized = mime_type.trim().to_ascii_lowercase();
    if !ALLOWED_MIME_TYPES.contains(&normalized.as_str()) {
        return Err(AttachmentError::UnsupportedType {
            mime_type: mime_type.to_string(),
        });
    }
    if size > MAX_ATTACHMENT_BYTES {
        return Err(AttachmentError::TooLarge { size });
    }
    Ok(())
}

/// MIME type for a path, guessed from its extension
pub fn guess_mime_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string()
}

/// Read a file from disk and run it through the gate.
///
/// The size check uses file metadata so oversized files are never read.
pub async fn admit_file(path: &Path) -> Result<Attachment, AttachmentError> {
    let io_err = |source| AttachmentError::Io {
        path: path.display().to_string(),
        source,
    };

    let mime_type = guess_mime_type(path);
    let metadata = tokio::fs::metadata(path).await.map_err(io_err)?;
    check_candidate(&mime_type, metadata.len())?;

    let bytes = tokio::fs::read(path).await.map_err(io_err)?;
    // The file may have grown between stat and read
    check_candidate(&mime_type, bytes.len() as u64)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());

    tracing::debug!(file = %file_name, mime = %mime_type, size = bytes.len(), "attachment admitted");

    Ok(Attachment {
        file_name,
        mime_type,
        bytes,
    })
}
