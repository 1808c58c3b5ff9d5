//! Progress-callback trait for per-page extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ClientConfigBuilder::progress_callback`]. Events arrive
//! from the blocking thread that walks the document, strictly in page order.
//!
//! ```rust
//! use resume2json::{ClientConfig, ExtractionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct PageCounter(AtomicUsize);
//!
//! impl ExtractionProgressCallback for PageCounter {
//!     fn on_page_complete(&self, _page_num: usize, _total_pages: usize, _chars: usize) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let config = ClientConfig::builder()
//!     .progress_callback(Arc::new(PageCounter(AtomicUsize::new(0))))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the extractor as it walks the selected pages.
///
/// All methods default to no-ops so implementors override only what they use.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once the document is decoded, before the first page.
    ///
    /// # Arguments
    /// * `total_pages` — number of pages that will be read
    fn on_extraction_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called before a page's text content is retrieved.
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called after a page's text has been appended.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — pages being read
    /// * `chars`       — characters in this page's text, excluding the newline
    fn on_page_complete(&self, page_num: usize, total_pages: usize, chars: usize) {
        let _ = (page_num, total_pages, chars);
    }

    /// Called when a page fails; extraction stops after this event.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called once after the last page.
    ///
    /// # Arguments
    /// * `total_pages` — pages read
    /// * `total_chars` — characters in the assembled text
    fn on_extraction_complete(&self, total_pages: usize, total_chars: usize) {
        let _ = (total_pages, total_chars);
    }
}

/// A no-op implementation, used when no callback is configured.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ClientConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct EventLog(Mutex<Vec<String>>);

    impl ExtractionProgressCallback for EventLog {
        fn on_extraction_start(&self, total_pages: usize) {
            self.0.lock().unwrap().push(format!("start {total_pages}"));
        }

        fn on_page_complete(&self, page_num: usize, _total_pages: usize, chars: usize) {
            self.0.lock().unwrap().push(format!("page {page_num} {chars}"));
        }

        fn on_extraction_complete(&self, total_pages: usize, total_chars: usize) {
            self.0
                .lock()
                .unwrap()
                .push(format!("done {total_pages} {total_chars}"));
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_extraction_start(2);
        cb.on_page_start(1, 2);
        cb.on_page_complete(1, 2, 10);
        cb.on_page_error(2, 2, "bad page");
        cb.on_extraction_complete(2, 10);
    }

    #[test]
    fn overridden_methods_receive_events_and_defaults_stay_silent() {
        let log = EventLog::default();
        log.on_extraction_start(2);
        log.on_page_start(1, 2);
        log.on_page_complete(1, 2, 11);
        log.on_page_error(2, 2, "ignored by default");
        log.on_extraction_complete(1, 12);

        assert_eq!(
            *log.0.lock().unwrap(),
            vec!["start 2", "page 1 11", "done 1 12"]
        );
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_extraction_start(3);
        cb.on_page_complete(1, 3, 0);
    }
}
