//! # resume2json
//!
//! Extract the text of a PDF resume and hand it to a parsing endpoint.
//!
//! Two independent operations share one editable text area:
//!
//! ```text
//! PDF file ──▶ Extractor ──▶ TextArea ──(user may edit)──▶ Submitter ──▶ OutputPane
//!             (pdfium)                                    (POST JSON)
//! ```
//!
//! * [`Extractor`] reads the selected file, decodes it through pdfium and
//!   writes every page's text into the [`TextArea`]: items joined by single
//!   spaces, one newline after each page, pages in ascending order.
//! * [`Submitter`] posts `{"resumeText": …}` to the endpoint
//!   (`http://localhost:8080/api/parse` by default) and writes the
//!   pretty-printed reply, or `Parsing failed`, into the [`OutputPane`].
//!
//! Missing input is reported through an [`Alert`]; each operation runs at
//! most once at a time.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use resume2json::{ClientConfig, Extractor, LogAlert, OutputPane, Submitter, TextArea};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::default();
//!     let text = TextArea::new();
//!     let output = OutputPane::new();
//!
//!     Extractor::new(config.clone())
//!         .extract(Some(Path::new("resume.pdf")), &text, &LogAlert)
//!         .await?;
//!     Submitter::new(&config)?.submit(&text, &output, &LogAlert).await?;
//!
//!     println!("{}", output.content());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `resume2json` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod inflight;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod submit;
pub mod ui;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ClientConfig, ClientConfigBuilder, PageSelection, DEFAULT_ENDPOINT};
pub use error::{ResumeError, EMPTY_TEXT_MESSAGE, NO_FILE_MESSAGE};
pub use extract::{extract_from_source, inspect, Extractor};
pub use output::{
    write_output, DocumentInfo, Extraction, ExtractionStats, PageText, Rendered, PARSING_FAILED,
};
pub use pipeline::decode::{DocumentVisitor, PdfDecoder, PdfiumDecoder};
pub use pipeline::reply::render_reply;
pub use pipeline::source::{TextItem, TextSource};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use submit::Submitter;
pub use ui::{Alert, LogAlert, OutputPane, TextArea};
