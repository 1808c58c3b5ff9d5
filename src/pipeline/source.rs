//! Page text assembly over a decoded document.
//!
//! [`TextSource`] is the decoding capability as the extractor sees it: a page
//! count and, per 1-indexed page, the ordered text-content items. Assembly
//! joins a page's items with single spaces and terminates every page with a
//! newline, walking pages strictly in ascending order.

use crate::config::PageSelection;
use crate::error::ResumeError;
use crate::output::{Extraction, ExtractionStats, PageText};
use crate::progress::ExtractionProgressCallback;
use tracing::debug;

/// One decoded fragment of text on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextItem {
    pub text: String,
}

impl TextItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A decoded, paged document.
pub trait TextSource {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Text-content items of page `page_num` (1-indexed) in document order.
    fn page_items(&self, page_num: usize) -> Result<Vec<TextItem>, ResumeError>;
}

/// An in-memory document: page `n` holds the items in `self[n - 1]`.
impl<S: AsRef<str>> TextSource for Vec<Vec<S>> {
    fn page_count(&self) -> usize {
        self.len()
    }

    fn page_items(&self, page_num: usize) -> Result<Vec<TextItem>, ResumeError> {
        page_num
            .checked_sub(1)
            .and_then(|idx| self.get(idx))
            .map(|items| items.iter().map(|s| TextItem::new(s.as_ref())).collect())
            .ok_or(ResumeError::PageOutOfRange {
                page: page_num,
                total: self.len(),
            })
    }
}

/// Join a page's items with exactly one space between consecutive items.
pub fn join_items(items: &[TextItem]) -> String {
    items
        .iter()
        .map(|item| item.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Walk the selected pages of `source` and assemble the document text.
///
/// Returns [`ResumeError::PageOutOfRange`] when an explicit selection matches
/// no page. `All` over an empty document yields empty text.
pub fn collect_pages(
    source: &dyn TextSource,
    selection: &PageSelection,
    progress: &dyn ExtractionProgressCallback,
) -> Result<Extraction, ResumeError> {
    let total_pages = source.page_count();
    let page_numbers = selection.to_page_numbers(total_pages);
    if page_numbers.is_empty() && *selection != PageSelection::All {
        return Err(ResumeError::PageOutOfRange {
            page: selection.first_requested(),
            total: total_pages,
        });
    }

    let selected = page_numbers.len();
    progress.on_extraction_start(selected);

    let mut text = String::new();
    let mut pages = Vec::with_capacity(selected);

    for page_num in page_numbers {
        progress.on_page_start(page_num, selected);

        let items = source.page_items(page_num).inspect_err(|e| {
            progress.on_page_error(page_num, selected, &e.to_string());
        })?;
        let page_text = join_items(&items);
        debug!("Page {}: {} items, {} bytes", page_num, items.len(), page_text.len());

        text.push_str(&page_text);
        text.push('\n');
        progress.on_page_complete(page_num, selected, page_text.chars().count());

        pages.push(PageText {
            page_num,
            text: page_text,
            item_count: items.len(),
        });
    }

    progress.on_extraction_complete(selected, text.chars().count());

    let stats = ExtractionStats {
        total_pages,
        extracted_pages: pages.len(),
        total_items: pages.iter().map(|p| p.item_count).sum(),
        duration_ms: 0,
    };

    Ok(Extraction { text, pages, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopProgressCallback;
    use std::sync::Mutex;

    fn collect_all(doc: &Vec<Vec<&str>>) -> Extraction {
        collect_pages(doc, &PageSelection::All, &NoopProgressCallback).unwrap()
    }

    #[test]
    fn two_page_document() {
        let doc = vec![vec!["Hello", "World"], vec!["Bye"]];
        assert_eq!(collect_all(&doc).text, "Hello World\nBye\n");
    }

    #[test]
    fn one_newline_terminated_segment_per_page() {
        let doc: Vec<Vec<&str>> = (1..=7).map(|_| vec!["x"]).collect();
        let text = collect_all(&doc).text;
        assert!(text.ends_with('\n'));
        assert_eq!(text.split_terminator('\n').count(), 7);
    }

    #[test]
    fn items_keep_order_and_get_single_spaces() {
        let doc = vec![vec!["b", "a", "", "c "]];
        // Empty and space-carrying items are joined verbatim.
        assert_eq!(collect_all(&doc).text, "b a  c \n");
    }

    #[test]
    fn empty_pages_still_emit_newlines() {
        let doc: Vec<Vec<&str>> = vec![vec![], vec!["mid"], vec![]];
        assert_eq!(collect_all(&doc).text, "\nmid\n\n");
    }

    #[test]
    fn empty_document_is_empty_text() {
        let doc: Vec<Vec<&str>> = Vec::new();
        let extraction = collect_all(&doc);
        assert_eq!(extraction.text, "");
        assert!(extraction.pages.is_empty());
    }

    #[test]
    fn per_page_breakdown_and_stats() {
        let doc = vec![vec!["Hello", "World"], vec!["Bye"]];
        let extraction = collect_all(&doc);
        assert_eq!(
            extraction.pages,
            vec![
                PageText { page_num: 1, text: "Hello World".into(), item_count: 2 },
                PageText { page_num: 2, text: "Bye".into(), item_count: 1 },
            ]
        );
        assert_eq!(extraction.stats.total_pages, 2);
        assert_eq!(extraction.stats.extracted_pages, 2);
        assert_eq!(extraction.stats.total_items, 3);
    }

    #[test]
    fn selection_restricts_pages_in_ascending_order() {
        let doc = vec![vec!["one"], vec!["two"], vec!["three"]];
        let extraction =
            collect_pages(&doc, &PageSelection::Set(vec![3, 1]), &NoopProgressCallback).unwrap();
        assert_eq!(extraction.text, "one\nthree\n");
        assert_eq!(extraction.stats.total_pages, 3);
        assert_eq!(extraction.stats.extracted_pages, 2);
    }

    #[test]
    fn selection_outside_document_is_an_error() {
        let doc = vec![vec!["only"]];
        let err = collect_pages(&doc, &PageSelection::Single(4), &NoopProgressCallback).unwrap_err();
        assert!(matches!(err, ResumeError::PageOutOfRange { page: 4, total: 1 }));
    }

    struct FailingPage;

    impl TextSource for FailingPage {
        fn page_count(&self) -> usize {
            3
        }

        fn page_items(&self, page_num: usize) -> Result<Vec<TextItem>, ResumeError> {
            if page_num == 2 {
                return Err(ResumeError::TextExtractionFailed {
                    page: 2,
                    detail: "broken content stream".into(),
                });
            }
            Ok(vec![TextItem::new(format!("p{page_num}"))])
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl ExtractionProgressCallback for Recorder {
        fn on_page_complete(&self, page_num: usize, _total: usize, _chars: usize) {
            self.0.lock().unwrap().push(format!("ok {page_num}"));
        }

        fn on_page_error(&self, page_num: usize, _total: usize, _error: &str) {
            self.0.lock().unwrap().push(format!("err {page_num}"));
        }

        fn on_extraction_complete(&self, _total: usize, _chars: usize) {
            self.0.lock().unwrap().push("complete".into());
        }
    }

    #[test]
    fn page_failure_stops_the_walk() {
        let recorder = Recorder::default();
        let err = collect_pages(&FailingPage, &PageSelection::All, &recorder).unwrap_err();

        assert!(matches!(err, ResumeError::TextExtractionFailed { page: 2, .. }));
        assert_eq!(*recorder.0.lock().unwrap(), vec!["ok 1", "err 2"]);
    }

    #[test]
    fn in_memory_document_rejects_page_zero() {
        let doc = vec![vec!["a"]];
        assert!(doc.page_items(0).is_err());
        assert!(doc.page_items(2).is_err());
        assert_eq!(doc.page_items(1).unwrap(), vec![TextItem::new("a")]);
    }
}
