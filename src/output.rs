//! Values produced by the extractor, the submitter and `inspect`.

use crate::error::ResumeError;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::Path;

/// Marker written to the output pane when the endpoint reports failure.
pub const PARSING_FAILED: &str = "Parsing failed";

/// Text of a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Text-content items joined by single spaces, without the trailing newline.
    pub text: String,
    /// Number of text-content items on the page.
    pub item_count: usize,
}

/// Result of an extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    /// Every page's text followed by `\n`, in ascending page order.
    pub text: String,
    /// Per-page breakdown, same order as `text`.
    pub pages: Vec<PageText>,
    /// Timing and counts.
    pub stats: ExtractionStats,
}

/// Counts and timing for an extraction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages in the document.
    pub total_pages: usize,
    /// Pages whose text was read.
    pub extracted_pages: usize,
    /// Text-content items across the extracted pages.
    pub total_items: usize,
    /// Wall-clock time, including the file read and decode.
    pub duration_ms: u64,
}

/// What the submitter wrote into the output pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rendered {
    /// `success` was truthy: the re-parsed reply, indented by two spaces.
    Json(String),
    /// `success` was falsy.
    ParsingFailed,
}

impl Rendered {
    /// The exact text shown in the output pane.
    pub fn as_text(&self) -> &str {
        match self {
            Rendered::Json(pretty) => pretty,
            Rendered::ParsingFailed => PARSING_FAILED,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Rendered::Json(_))
    }
}

/// Document information reported by [`crate::inspect`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}

/// Write `contents` to `path` atomically: temp file in the same directory,
/// then rename, so readers never see a partial file.
pub async fn write_output(path: impl AsRef<Path>, contents: &str) -> Result<(), ResumeError> {
    let path = path.as_ref();
    let failed = |source: std::io::Error| ResumeError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(failed)?;
    }

    let mut tmp_name = path.file_name().map(OsString::from).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp_path, contents).await.map_err(failed)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(failed)?;
    Ok(())
}
