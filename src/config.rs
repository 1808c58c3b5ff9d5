//! Configuration for extraction and submission.
//!
//! Everything an operation needs beyond its UI handles lives in
//! [`ClientConfig`], built through [`ClientConfigBuilder`]. Defaults
//! reproduce the plain behaviour: every page, the local parse endpoint, and
//! no request timeout.

use crate::error::ResumeError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Endpoint the submitter posts to unless configured otherwise.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/api/parse";

/// Configuration shared by the extractor and the submitter.
///
/// # Example
/// ```rust
/// use resume2json::{ClientConfig, PageSelection};
///
/// let config = ClientConfig::builder()
///     .endpoint("http://127.0.0.1:9000/api/parse")
///     .request_timeout_secs(30)
///     .pages(PageSelection::Range(1, 2))
///     .build()
///     .unwrap();
/// assert_eq!(config.request_timeout_secs, Some(30));
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// URL receiving `POST {"resumeText": …}`. Default: [`DEFAULT_ENDPOINT`].
    pub endpoint: String,

    /// Whole-request timeout in seconds. Default: none, the request may wait
    /// indefinitely.
    pub request_timeout_secs: Option<u64>,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Pages to extract. Default: all pages.
    pub pages: PageSelection,

    /// Explicit libpdfium file, checked before `PDFIUM_LIB_PATH` and the cache.
    pub pdfium_library: Option<PathBuf>,

    /// Download pdfium into the cache when no copy is found. Default: true.
    pub allow_pdfium_download: bool,

    /// Per-page extraction events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: None,
            password: None,
            pages: PageSelection::default(),
            pdfium_library: None,
            allow_pdfium_download: true,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("pages", &self.pages)
            .field("pdfium_library", &self.pdfium_library)
            .field("allow_pdfium_download", &self.allow_pdfium_download)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Options handed to `pdfium-loader`.
    pub(crate) fn load_options(&self) -> pdfium_loader::LoadOptions {
        pdfium_loader::LoadOptions {
            library_path: self.pdfium_library.clone(),
            allow_download: self.allow_pdfium_download,
        }
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn pdfium_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library = Some(path.into());
        self
    }

    pub fn allow_pdfium_download(mut self, v: bool) -> Self {
        self.config.allow_pdfium_download = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, ResumeError> {
        let c = &self.config;

        let url = reqwest::Url::parse(&c.endpoint).map_err(|e| {
            ResumeError::InvalidConfig(format!("endpoint '{}' is not a URL: {}", c.endpoint, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ResumeError::InvalidConfig(format!(
                "endpoint must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if c.request_timeout_secs == Some(0) {
            return Err(ResumeError::InvalidConfig(
                "request timeout must be ≥ 1 second".into(),
            ));
        }

        c.pages.validate()?;
        Ok(self.config)
    }
}

/// Which pages of the PDF to extract. Page numbers are 1-indexed.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PageSelection {
    /// Every page (default).
    #[default]
    All,
    /// A single page.
    Single(usize),
    /// A contiguous inclusive range.
    Range(usize, usize),
    /// Specific pages; order and duplicates in the input do not matter.
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand into ascending, deduplicated 1-indexed page numbers that exist
    /// in a document of `total_pages` pages.
    pub fn to_page_numbers(&self, total_pages: usize) -> Vec<usize> {
        let in_range = |p: &usize| (1..=total_pages).contains(p);
        let mut pages: Vec<usize> = match self {
            PageSelection::All => (1..=total_pages).collect(),
            PageSelection::Single(p) => Some(*p).filter(in_range).into_iter().collect(),
            PageSelection::Range(start, end) => ((*start).max(1)..=(*end).min(total_pages)).collect(),
            PageSelection::Set(pages) => pages.iter().copied().filter(in_range).collect(),
        };
        pages.sort_unstable();
        pages.dedup();
        pages
    }

    /// The first page number the selection asks for, used in range errors.
    pub fn first_requested(&self) -> usize {
        match self {
            PageSelection::All => 1,
            PageSelection::Single(p) | PageSelection::Range(p, _) => *p,
            PageSelection::Set(pages) => pages.iter().copied().min().unwrap_or(0),
        }
    }

    fn validate(&self) -> Result<(), ResumeError> {
        match self {
            PageSelection::All => Ok(()),
            PageSelection::Single(0) => Err(ResumeError::InvalidConfig(
                "pages are 1-indexed, minimum is 1".into(),
            )),
            PageSelection::Range(start, end) if *start == 0 || start > end => {
                Err(ResumeError::InvalidConfig(format!(
                    "invalid page range {start}-{end}: pages are 1-indexed and start must be <= end"
                )))
            }
            PageSelection::Set(pages) if pages.is_empty() || pages.contains(&0) => Err(
                ResumeError::InvalidConfig("page set must be non-empty and 1-indexed".into()),
            ),
            _ => Ok(()),
        }
    }
}

impl std::str::FromStr for PageSelection {
    type Err = ResumeError;

    /// Parse `all`, `5`, `3-15` or `1,3,5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let number = |p: &str| {
            p.trim()
                .parse::<usize>()
                .map_err(|_| ResumeError::InvalidConfig(format!("invalid page number '{}'", p.trim())))
        };

        let selection = if s == "all" {
            PageSelection::All
        } else if let Some((start, end)) = s.split_once('-') {
            PageSelection::Range(number(start)?, number(end)?)
        } else if s.contains(',') {
            PageSelection::Set(s.split(',').map(number).collect::<Result<_, _>>()?)
        } else {
            PageSelection::Single(number(&s)?)
        };

        selection.validate()?;
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_plain_behaviour() {
        let c = ClientConfig::default();
        assert_eq!(c.endpoint, "http://localhost:8080/api/parse");
        assert_eq!(c.request_timeout_secs, None);
        assert_eq!(c.pages, PageSelection::All);
        assert!(c.allow_pdfium_download);
    }

    #[test]
    fn builder_rejects_non_http_endpoint() {
        let err = ClientConfig::builder()
            .endpoint("ftp://localhost/api/parse")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("http or https"), "got: {err}");
    }

    #[test]
    fn builder_rejects_garbage_endpoint() {
        assert!(ClientConfig::builder().endpoint("not a url").build().is_err());
    }

    #[test]
    fn builder_rejects_zero_timeout() {
        assert!(ClientConfig::builder().request_timeout_secs(0).build().is_err());
    }

    #[test]
    fn debug_redacts_password() {
        let c = ClientConfig::builder().password("hunter2").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn selection_expands_ascending_and_clipped() {
        assert_eq!(PageSelection::All.to_page_numbers(3), vec![1, 2, 3]);
        assert_eq!(PageSelection::All.to_page_numbers(0), Vec::<usize>::new());
        assert_eq!(PageSelection::Single(2).to_page_numbers(3), vec![2]);
        assert_eq!(PageSelection::Single(9).to_page_numbers(3), Vec::<usize>::new());
        assert_eq!(PageSelection::Range(2, 10).to_page_numbers(4), vec![2, 3, 4]);
        assert_eq!(
            PageSelection::Set(vec![3, 1, 3, 7]).to_page_numbers(5),
            vec![1, 3]
        );
    }

    #[test]
    fn parses_page_arguments() {
        assert_eq!("all".parse::<PageSelection>().unwrap(), PageSelection::All);
        assert_eq!(" ALL ".parse::<PageSelection>().unwrap(), PageSelection::All);
        assert_eq!("4".parse::<PageSelection>().unwrap(), PageSelection::Single(4));
        assert_eq!("2-5".parse::<PageSelection>().unwrap(), PageSelection::Range(2, 5));
        assert_eq!(
            "1, 3,5".parse::<PageSelection>().unwrap(),
            PageSelection::Set(vec![1, 3, 5])
        );
    }

    #[test]
    fn rejects_bad_page_arguments() {
        for bad in ["0", "5-2", "0-3", "a", "1,x", "1,0", ""] {
            assert!(bad.parse::<PageSelection>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn first_requested_page() {
        assert_eq!(PageSelection::All.first_requested(), 1);
        assert_eq!(PageSelection::Range(4, 6).first_requested(), 4);
        assert_eq!(PageSelection::Set(vec![9, 2]).first_requested(), 2);
    }
}
