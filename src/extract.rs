//! The extractor: selected file → text area.
//!
//! [`Extractor::extract`] is the user-triggered operation. It checks that a
//! file was selected, reads it, decodes it on the blocking pool, assembles
//! the page text in ascending page order and replaces the text area's
//! content. The text area is only written after the whole document succeeded.

use crate::config::ClientConfig;
use crate::error::{ResumeError, NO_FILE_MESSAGE};
use crate::inflight::InFlight;
use crate::output::{DocumentInfo, Extraction};
use crate::pipeline::decode::{self, PdfDecoder, PdfiumDecoder};
use crate::pipeline::{input, source};
use crate::progress::NoopProgressCallback;
use crate::ui::{Alert, TextArea};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Runs extractions one at a time.
pub struct Extractor {
    config: ClientConfig,
    decoder: Arc<dyn PdfDecoder>,
    in_flight: InFlight,
}

impl Extractor {
    /// An extractor decoding through pdfium.
    pub fn new(config: ClientConfig) -> Self {
        let decoder = Arc::new(PdfiumDecoder::new(config.load_options()));
        Self::with_decoder(config, decoder)
    }

    /// An extractor using a caller-supplied decoding capability.
    pub fn with_decoder(config: ClientConfig, decoder: Arc<dyn PdfDecoder>) -> Self {
        Self {
            config,
            decoder,
            in_flight: InFlight::new("extraction"),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// True while an extraction is running.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_busy()
    }

    /// Extract `file` into `text`.
    ///
    /// With no file: alerts [`NO_FILE_MESSAGE`], leaves `text` untouched and
    /// returns [`ResumeError::NoFileSelected`]. While another extraction on
    /// this extractor is running: returns [`ResumeError::Busy`].
    pub async fn extract(
        &self,
        file: Option<&Path>,
        text: &TextArea,
        alert: &dyn Alert,
    ) -> Result<Extraction, ResumeError> {
        let _guard = self.in_flight.try_begin()?;

        let Some(path) = file else {
            alert.alert(NO_FILE_MESSAGE);
            return Err(ResumeError::NoFileSelected);
        };

        let extraction = self.extract_file(path).await?;
        text.set(extraction.text.as_str());
        Ok(extraction)
    }

    /// Read and decode `path` without touching any UI handle.
    pub async fn extract_file(&self, path: &Path) -> Result<Extraction, ResumeError> {
        let start = Instant::now();
        info!("Extracting text from {}", path.display());

        let bytes = input::read_selected(Some(path)).await?;

        let decoder = Arc::clone(&self.decoder);
        let origin = path.to_path_buf();
        let password = self.config.password.clone();
        let pages = self.config.pages.clone();
        let progress = self.config.progress_callback.clone();

        let mut extraction = tokio::task::spawn_blocking(move || {
            let progress = progress
                .as_deref()
                .unwrap_or(&NoopProgressCallback);
            let mut result = None;
            decoder.with_document(bytes, &origin, password.as_deref(), &mut |document| {
                result = Some(source::collect_pages(document, &pages, progress)?);
                Ok(())
            })?;
            result.ok_or_else(|| ResumeError::Internal("decoder never visited the document".into()))
        })
        .await
        .map_err(|e| ResumeError::Internal(format!("Extraction task panicked: {}", e)))??;

        extraction.stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Extracted {}/{} pages ({} chars) in {}ms",
            extraction.stats.extracted_pages,
            extraction.stats.total_pages,
            extraction.text.chars().count(),
            extraction.stats.duration_ms
        );
        Ok(extraction)
    }
}

/// Assemble text from an already-decoded document.
pub fn extract_from_source(
    document: &dyn source::TextSource,
    config: &ClientConfig,
) -> Result<Extraction, ResumeError> {
    let progress = config
        .progress_callback
        .as_deref()
        .unwrap_or(&NoopProgressCallback);
    source::collect_pages(document, &config.pages, progress)
}

/// Read document information for `path` without extracting text.
///
/// Always decodes through pdfium; needs no endpoint.
pub async fn inspect(path: &Path, config: &ClientConfig) -> Result<DocumentInfo, ResumeError> {
    let bytes = input::read_selected(Some(path)).await?;
    let load = config.load_options();
    let origin = path.to_path_buf();
    let password = config.password.clone();

    tokio::task::spawn_blocking(move || {
        decode::inspect_blocking(&load, bytes, &origin, password.as_deref())
    })
    .await
    .map_err(|e| ResumeError::Internal(format!("Inspect task panicked: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageSelection;
    use crate::pipeline::decode::DocumentVisitor;
    use crate::ui::LogAlert;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Decoder that ignores the bytes and serves fixed pages.
    struct FixedPages(Vec<Vec<&'static str>>);

    impl PdfDecoder for FixedPages {
        fn with_document(
            &self,
            _bytes: Vec<u8>,
            _origin: &Path,
            _password: Option<&str>,
            visit: &mut DocumentVisitor<'_>,
        ) -> Result<(), ResumeError> {
            visit(&self.0)
        }
    }

    struct RejectingDecoder;

    impl PdfDecoder for RejectingDecoder {
        fn with_document(
            &self,
            _bytes: Vec<u8>,
            origin: &Path,
            _password: Option<&str>,
            _visit: &mut DocumentVisitor<'_>,
        ) -> Result<(), ResumeError> {
            Err(ResumeError::CorruptPdf {
                path: origin.to_path_buf(),
                detail: "xref table missing".into(),
            })
        }
    }

    #[derive(Default)]
    struct CountingAlert(AtomicUsize);

    impl Alert for CountingAlert {
        fn alert(&self, _message: &str) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn pdf_file() -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"%PDF-1.7\n%%EOF\n").unwrap();
        tmp
    }

    fn hello_extractor() -> Extractor {
        Extractor::with_decoder(
            ClientConfig::default(),
            Arc::new(FixedPages(vec![vec!["Hello", "World"], vec!["Bye"]])),
        )
    }

    #[tokio::test]
    async fn fills_text_area() {
        let file = pdf_file();
        let text = TextArea::with_text("previous content");
        let extractor = hello_extractor();

        let extraction = extractor
            .extract(Some(file.path()), &text, &LogAlert)
            .await
            .unwrap();

        assert_eq!(text.value(), "Hello World\nBye\n");
        assert_eq!(extraction.text, text.value());
        assert!(!extractor.is_busy());
    }

    #[tokio::test]
    async fn no_file_alerts_and_leaves_text_untouched() {
        let text = TextArea::with_text("keep me");
        let alert = CountingAlert::default();

        let err = hello_extractor().extract(None, &text, &alert).await.unwrap_err();

        assert!(err.is_user_input());
        assert_eq!(alert.0.load(Ordering::SeqCst), 1);
        assert_eq!(text.value(), "keep me");
    }

    #[tokio::test]
    async fn decode_failure_leaves_text_untouched() {
        let file = pdf_file();
        let text = TextArea::with_text("keep me");
        let alert = CountingAlert::default();
        let extractor = Extractor::with_decoder(ClientConfig::default(), Arc::new(RejectingDecoder));

        let err = extractor.extract(Some(file.path()), &text, &alert).await.unwrap_err();

        assert!(matches!(err, ResumeError::CorruptPdf { .. }));
        assert_eq!(alert.0.load(Ordering::SeqCst), 0);
        assert_eq!(text.value(), "keep me");
    }

    #[tokio::test]
    async fn honours_page_selection() {
        let file = pdf_file();
        let config = ClientConfig::builder()
            .pages(PageSelection::Single(2))
            .build()
            .unwrap();
        let extractor = Extractor::with_decoder(
            config,
            Arc::new(FixedPages(vec![vec!["Hello", "World"], vec!["Bye"]])),
        );

        let extraction = extractor.extract_file(file.path()).await.unwrap();
        assert_eq!(extraction.text, "Bye\n");
    }

    #[test]
    fn extract_from_in_memory_document() {
        let doc = vec![vec!["Hello", "World"], vec!["Bye"]];
        let extraction = extract_from_source(&doc, &ClientConfig::default()).unwrap();
        assert_eq!(extraction.text, "Hello World\nBye\n");
    }
}
