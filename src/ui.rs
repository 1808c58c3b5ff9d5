//! Handles for the three surfaces the operations read and write.
//!
//! The extractor fills a [`TextArea`], the user may edit it, and the submitter
//! reads it back and writes the rendered reply into an [`OutputPane`]. Input
//! problems are raised through an [`Alert`]. Operations receive these as
//! parameters, so a front end (terminal, GUI, test) owns them.

use std::sync::{Mutex, MutexGuard};
use tracing::warn;

/// Editable resume text: the extractor's sink and the submitter's source.
#[derive(Debug, Default)]
pub struct TextArea {
    value: Mutex<String>,
}

impl TextArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(text.into()),
        }
    }

    /// Current content.
    pub fn value(&self) -> String {
        lock(&self.value).clone()
    }

    /// Replace the content (extraction result or a user edit).
    pub fn set(&self, text: impl Into<String>) {
        *lock(&self.value) = text.into();
    }
}

/// Read-only display of the submitter's result.
#[derive(Debug, Default)]
pub struct OutputPane {
    content: Mutex<String>,
}

impl OutputPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> String {
        lock(&self.content).clone()
    }

    pub fn set(&self, text: impl Into<String>) {
        *lock(&self.content) = text.into();
    }
}

/// A blocking, user-visible notice.
pub trait Alert: Send + Sync {
    fn alert(&self, message: &str);
}

/// Alert that only logs; for callers without an interactive surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlert;

impl Alert for LogAlert {
    fn alert(&self, message: &str) {
        warn!("{message}");
    }
}

// A panic while holding the lock cannot leave a String half-written.
fn lock(m: &Mutex<String>) -> MutexGuard<'_, String> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_area_replaces_content() {
        let area = TextArea::with_text("old");
        area.set("new text");
        assert_eq!(area.value(), "new text");
    }

    #[test]
    fn output_pane_starts_empty() {
        let pane = OutputPane::new();
        assert!(pane.content().is_empty());
        pane.set("Parsing failed");
        assert_eq!(pane.content(), "Parsing failed");
    }

    #[test]
    fn log_alert_is_object_safe() {
        let alert: &dyn Alert = &LogAlert;
        alert.alert("Please upload a PDF");
    }
}
