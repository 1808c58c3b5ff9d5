//! Input resolution: turn the selected file into bytes.
//!
//! The whole file is read into memory and handed to the decoder as a buffer;
//! nothing else validates type or size beyond the PDF signature check, which
//! turns "not a PDF at all" into a readable error rather than a decoder one.

use crate::error::ResumeError;
use std::path::Path;
use tracing::debug;

/// The signature may follow a little leading junk; readers accept it within
/// the first kilobyte.
const SIGNATURE_WINDOW: usize = 1024;

/// Read the selected file fully into memory.
///
/// `None` means nothing was selected and yields
/// [`ResumeError::NoFileSelected`]; the caller raises the alert.
pub async fn read_selected(file: Option<&Path>) -> Result<Vec<u8>, ResumeError> {
    let path = file.ok_or(ResumeError::NoFileSelected)?;

    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ResumeError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => ResumeError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ResumeError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    if !has_pdf_signature(&bytes) {
        return Err(ResumeError::NotAPdf {
            path: path.to_path_buf(),
            magic: bytes.iter().take(4).copied().collect(),
        });
    }

    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// True when `%PDF` occurs within the first kilobyte.
pub fn has_pdf_signature(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(SIGNATURE_WINDOW)];
    window.windows(4).any(|w| w == b"%PDF")
}
