//! PDF decoding via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! `pdfium-render` wraps the pdfium C++ library, which is synchronous and
//! keeps thread-local state. Callers run [`PdfDecoder::with_document`] inside
//! `tokio::task::spawn_blocking` so the page walk never stalls a runtime
//! worker thread.
//!
//! ## Text items
//!
//! A page's text-content items are its text objects in content-stream order,
//! each contributing the string it draws. Objects inside form XObjects count
//! at the point where the form is drawn.

use crate::error::ResumeError;
use crate::output::DocumentInfo;
use crate::pipeline::source::{TextItem, TextSource};
use pdfium_loader::LoadOptions;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Visitor run over a decoded document.
pub type DocumentVisitor<'v> = dyn FnMut(&dyn TextSource) -> Result<(), ResumeError> + 'v;

/// The external decoding capability: bytes in, paged document out.
///
/// The document only lives for the duration of `visit`; implementations are
/// free to tie it to a library handle created inside the call.
pub trait PdfDecoder: Send + Sync {
    fn with_document(
        &self,
        bytes: Vec<u8>,
        origin: &Path,
        password: Option<&str>,
        visit: &mut DocumentVisitor<'_>,
    ) -> Result<(), ResumeError>;
}

/// [`PdfDecoder`] backed by pdfium, bound through `pdfium-loader`.
#[derive(Debug, Clone, Default)]
pub struct PdfiumDecoder {
    load: LoadOptions,
}

impl PdfiumDecoder {
    pub fn new(load: LoadOptions) -> Self {
        Self { load }
    }

    fn bind(&self) -> Result<Pdfium, ResumeError> {
        Ok(pdfium_loader::bind_pdfium(&self.load)?)
    }
}

impl PdfDecoder for PdfiumDecoder {
    fn with_document(
        &self,
        bytes: Vec<u8>,
        origin: &Path,
        password: Option<&str>,
        visit: &mut DocumentVisitor<'_>,
    ) -> Result<(), ResumeError> {
        let pdfium = self.bind()?;
        let document = open_document(&pdfium, bytes, origin, password)?;
        info!("PDF loaded: {} pages", document.pages().len());
        // Bound to a local so the source drops before `pdfium`.
        let visited = visit(&PdfiumSource { document });
        visited
    }
}

/// A loaded pdfium document seen as a [`TextSource`].
struct PdfiumSource<'a> {
    document: PdfDocument<'a>,
}

impl TextSource for PdfiumSource<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_items(&self, page_num: usize) -> Result<Vec<TextItem>, ResumeError> {
        let failed = |detail: String| ResumeError::TextExtractionFailed {
            page: page_num,
            detail,
        };

        let index = page_num
            .checked_sub(1)
            .ok_or_else(|| failed("pages are 1-indexed".into()))?;
        let page = self
            .document
            .pages()
            .get(index as u16)
            .map_err(|e| failed(format!("{:?}", e)))?;

        let mut items = Vec::new();
        for object in page.objects().iter() {
            push_text_items(&object, &mut items);
        }

        debug!("Page {} → {} text objects", page_num, items.len());
        Ok(items)
    }
}

/// Append the text drawn by `object`, descending into form XObjects so text
/// wrapped in a form keeps its content-stream position.
fn push_text_items(object: &PdfPageObject<'_>, items: &mut Vec<TextItem>) {
    if let Some(text) = object.as_text_object() {
        items.push(TextItem::new(text.text()));
    } else if let Some(form) = object.as_x_object_form_object() {
        for inner in form.iter() {
            push_text_items(&inner, items);
        }
    }
}

/// Load `bytes` as a document, classifying password failures.
fn open_document<'a>(
    pdfium: &'a Pdfium,
    bytes: Vec<u8>,
    origin: &Path,
    password: Option<&str>,
) -> Result<PdfDocument<'a>, ResumeError> {
    pdfium.load_pdf_from_byte_vec(bytes, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                ResumeError::WrongPassword {
                    path: origin.to_path_buf(),
                }
            } else {
                ResumeError::PasswordRequired {
                    path: origin.to_path_buf(),
                }
            }
        } else {
            ResumeError::CorruptPdf {
                path: origin.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

/// Read document information without walking page content. Blocking.
pub fn inspect_blocking(
    load: &LoadOptions,
    bytes: Vec<u8>,
    origin: &Path,
    password: Option<&str>,
) -> Result<DocumentInfo, ResumeError> {
    let pdfium = PdfiumDecoder::new(load.clone()).bind()?;
    let document = open_document(&pdfium, bytes, origin, password)?;
    let metadata = document.metadata();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata
            .get(tag)
            .map(|t| t.value().to_string())
            .filter(|v| !v.is_empty())
    };

    Ok(DocumentInfo {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        page_count: document.pages().len() as usize,
        pdf_version: format!("{:?}", document.version()),
    })
}
