//! Error type for the resume2json library.
//!
//! Every operation returns `Result<_, ResumeError>`. Two variants are
//! *user input* errors ([`ResumeError::NoFileSelected`] and
//! [`ResumeError::EmptyText`]): the operation has already raised an alert
//! through [`crate::ui::Alert`] before returning them, and nothing was
//! modified. Everything else is a failure the front end should report.

use std::path::PathBuf;
use thiserror::Error;

/// Alert text shown when extraction is triggered without a file.
pub const NO_FILE_MESSAGE: &str = "Please upload a PDF";

/// Alert text shown when submission is triggered with blank text.
pub const EMPTY_TEXT_MESSAGE: &str = "Resume text is empty";

/// All errors returned by the resume2json library.
#[derive(Debug, Error)]
pub enum ResumeError {
    // ── User input ────────────────────────────────────────────────────────
    /// Extraction was triggered with no file selected.
    #[error("{}", NO_FILE_MESSAGE)]
    NoFileSelected,

    /// Submission was triggered while the text was empty or whitespace.
    #[error("{}", EMPTY_TEXT_MESSAGE)]
    EmptyText,

    /// The same operation is already running.
    #[error("{operation} is already in progress")]
    Busy { operation: &'static str },

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file was read but does not start with the PDF signature.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: Vec<u8> },

    /// Reading the file failed for another reason.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The document could not be decoded.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The page selection matched no page of the document.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// Text content of a page could not be retrieved.
    #[error("Text extraction failed for page {page}: {detail}")]
    TextExtractionFailed { page: usize, detail: String },

    // ── Submission errors ─────────────────────────────────────────────────
    /// The request never produced a response (connection refused, timeout…).
    #[error("Request to '{endpoint}' failed: {reason}")]
    RequestFailed { endpoint: String, reason: String },

    /// The response body is not the expected JSON object.
    #[error("Endpoint returned HTTP {status} with an unreadable body: {detail}")]
    MalformedResponse { status: u16, detail: String },

    /// `success` was truthy but `reply` is missing or not a JSON string.
    #[error("Reply is not a JSON document: {detail}")]
    MalformedReply { detail: String },

    // ── Output ────────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
If the automatic download failed you can:\n\
  • Check your internet connection and try again.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResumeError {
    /// True for the errors that were reported through an alert.
    pub fn is_user_input(&self) -> bool {
        matches!(self, ResumeError::NoFileSelected | ResumeError::EmptyText)
    }
}

impl From<pdfium_loader::LoaderError> for ResumeError {
    fn from(e: pdfium_loader::LoaderError) -> Self {
        ResumeError::PdfiumBindingFailed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_messages_match_display() {
        assert_eq!(ResumeError::NoFileSelected.to_string(), "Please upload a PDF");
        assert_eq!(ResumeError::EmptyText.to_string(), "Resume text is empty");
    }

    #[test]
    fn only_alert_errors_are_user_input() {
        assert!(ResumeError::NoFileSelected.is_user_input());
        assert!(ResumeError::EmptyText.is_user_input());
        assert!(!ResumeError::Busy { operation: "extraction" }.is_user_input());
        assert!(!ResumeError::MalformedReply { detail: "x".into() }.is_user_input());
    }

    #[test]
    fn busy_display_names_operation() {
        let e = ResumeError::Busy { operation: "submission" };
        assert_eq!(e.to_string(), "submission is already in progress");
    }

    #[test]
    fn malformed_response_display() {
        let e = ResumeError::MalformedResponse {
            status: 502,
            detail: "expected value at line 1 column 1".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("HTTP 502"), "got: {msg}");
        assert!(msg.contains("line 1"), "got: {msg}");
    }

    #[test]
    fn loader_errors_become_binding_failures() {
        let e: ResumeError = pdfium_loader::LoaderError::Download("HTTP 404".into()).into();
        assert!(matches!(e, ResumeError::PdfiumBindingFailed(_)));
        assert!(e.to_string().contains("HTTP 404"));
    }
}
