//! Stages behind the two operations.
//!
//! ```text
//! extract:  input ──▶ decode ──▶ source (walk pages, join items)
//!           (bytes)   (pdfium)   (text)
//! submit:   reply (request body, response rendering)
//! ```
//!
//! 1. [`input`]  — presence check, read the selected file, PDF signature check
//! 2. [`decode`] — the [`decode::PdfDecoder`] seam and its pdfium
//!    implementation; runs on the blocking pool because pdfium is synchronous
//! 3. [`source`] — the [`source::TextSource`] seam and page-text assembly
//! 4. [`reply`]  — wire types for the parse endpoint and reply rendering

pub mod decode;
pub mod input;
pub mod reply;
pub mod source;
