//! The submitter: text area → parse endpoint → output pane.
//!
//! One POST per trigger, no retries. The body is interpreted whatever the
//! HTTP status. A falsy `success` renders the failure marker; transport and
//! decoding problems come back as errors and leave the output pane as it was.

use crate::config::ClientConfig;
use crate::error::{ResumeError, EMPTY_TEXT_MESSAGE};
use crate::inflight::InFlight;
use crate::output::Rendered;
use crate::pipeline::reply::{self, ParseRequest};
use crate::ui::{Alert, OutputPane, TextArea};
use reqwest::header::CONTENT_TYPE;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Sends resume text to the parse endpoint, one request at a time.
#[derive(Debug)]
pub struct Submitter {
    client: reqwest::Client,
    endpoint: String,
    in_flight: InFlight,
}

impl Submitter {
    pub fn new(config: &ClientConfig) -> Result<Self, ResumeError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ResumeError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            in_flight: InFlight::new("submission"),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// True while a submission is running.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_busy()
    }

    /// Submit the current content of `text` and render the reply into `output`.
    ///
    /// Blank text alerts [`EMPTY_TEXT_MESSAGE`] and returns
    /// [`ResumeError::EmptyText`] without any network traffic.
    pub async fn submit(
        &self,
        text: &TextArea,
        output: &OutputPane,
        alert: &dyn Alert,
    ) -> Result<Rendered, ResumeError> {
        let _guard = self.in_flight.try_begin()?;

        let resume_text = text.value();
        if reply::is_blank(&resume_text) {
            alert.alert(EMPTY_TEXT_MESSAGE);
            return Err(ResumeError::EmptyText);
        }

        let rendered = self.send(&resume_text).await?;
        output.set(rendered.as_text());
        Ok(rendered)
    }

    /// POST `resume_text` and render the reply, without touching any UI handle.
    pub async fn send(&self, resume_text: &str) -> Result<Rendered, ResumeError> {
        let start = Instant::now();
        info!("Submitting {} chars to {}", resume_text.chars().count(), self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&ParseRequest { resume_text })
            .send()
            .await
            .map_err(|e| self.request_failed(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Endpoint answered HTTP {}", status);
        }

        let body = response.bytes().await.map_err(|e| self.request_failed(e))?;
        debug!(
            "HTTP {} with {} byte body after {}ms",
            status.as_u16(),
            body.len(),
            start.elapsed().as_millis()
        );

        let rendered = reply::render_reply(status.as_u16(), &body)?;
        info!(
            "Reply rendered ({})",
            if rendered.is_success() { "parsed" } else { "parsing failed" }
        );
        Ok(rendered)
    }

    fn request_failed(&self, e: reqwest::Error) -> ResumeError {
        let reason = if e.is_timeout() {
            "timed out".to_string()
        } else if e.is_connect() {
            format!("could not connect ({e})")
        } else {
            e.to_string()
        };
        ResumeError::RequestFailed {
            endpoint: self.endpoint.clone(),
            reason,
        }
    }
}
