//! The submit-and-download component.
//!
//! [`SubmitAndDownload::trigger`] runs one full cycle: show progress, build
//! the body, post it, stage the document, show the outcome. Each trigger
//! takes a token from a monotonically increasing counter; a cycle whose token
//! is no longer the latest leaves the status display and the sink alone, so
//! overlapping triggers cannot end with a stale result on screen.
//!
//! Staging is the commit point. A cycle that was still the latest when it
//! handed its document to the sink reports where it went even if a newer
//! trigger started meanwhile; it only skips the success render.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, instrument};

use super::client::SubmitClient;
use super::constants::{MSG_IN_PROGRESS, MSG_SUCCESS};
use super::error::SubmitError;
use super::payload::{FormPayload, RequestBody, Variant};
use super::sink::{ArtifactLocation, ArtifactSink};
use super::status::{StatusDisplay, failure_message};

/// How a single trigger ended.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The document was staged at the given location. Also returned when a
    /// newer trigger started while staging was already under way.
    Downloaded(ArtifactLocation),
    /// The submission failed; the status display shows why.
    Failed(SubmitError),
    /// A newer trigger started before this one reached staging; nothing was
    /// applied.
    Superseded,
}

impl SubmitOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Downloaded(_))
    }
}

/// Binds triggers to the request/response/download cycle.
pub struct SubmitAndDownload {
    client: SubmitClient,
    variant: Variant,
    status: Arc<dyn StatusDisplay>,
    sink: Arc<dyn ArtifactSink>,
    latest_token: AtomicU64,
}

impl SubmitAndDownload {
    #[must_use]
    pub fn new(
        client: SubmitClient,
        variant: Variant,
        status: Arc<dyn StatusDisplay>,
        sink: Arc<dyn ArtifactSink>,
    ) -> Self {
        Self {
            client,
            variant,
            status,
            sink,
            latest_token: AtomicU64::new(0),
        }
    }

    /// Runs one submission with the form state as it is now.
    ///
    /// Errors never escape: they are rendered on the status display and
    /// returned inside [`SubmitOutcome::Failed`].
    #[instrument(skip(self, form), fields(variant = self.variant.as_str(), fields = form.len()))]
    pub async fn trigger(&self, form: &FormPayload) -> SubmitOutcome {
        let token = self.latest_token.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(token, "submission triggered");
        self.status.show_status(MSG_IN_PROGRESS);

        match self.run(form, token).await {
            Ok(Some(location)) => {
                if !self.is_latest(token) {
                    debug!(
                        token,
                        location = %location,
                        "staged before a newer trigger; skipping success render"
                    );
                    return SubmitOutcome::Downloaded(location);
                }
                info!(token, location = %location, "submission succeeded");
                self.status.show_success(MSG_SUCCESS);
                SubmitOutcome::Downloaded(location)
            }
            Ok(None) => self.superseded(token),
            Err(error) => {
                if !self.is_latest(token) {
                    debug!(token, error = %error, "dropping error of superseded submission");
                    return self.superseded(token);
                }
                info!(token, error = %error, "submission failed");
                self.status.show_error(&failure_message(&error));
                SubmitOutcome::Failed(error)
            }
        }
    }

    /// Returns `Ok(None)` when a newer trigger took over before staging.
    async fn run(
        &self,
        form: &FormPayload,
        token: u64,
    ) -> Result<Option<ArtifactLocation>, SubmitError> {
        let body = RequestBody::build(self.variant, form)?;
        let artifact = self.client.post(self.variant, body).await?;

        if !self.is_latest(token) {
            return Ok(None);
        }
        self.sink.save(&artifact).await.map(Some)
    }

    fn is_latest(&self, token: u64) -> bool {
        self.latest_token.load(Ordering::SeqCst) == token
    }

    fn superseded(&self, token: u64) -> SubmitOutcome {
        debug!(
            token,
            latest = self.latest_token.load(Ordering::SeqCst),
            "submission superseded by a newer trigger"
        );
        SubmitOutcome::Superseded
    }
}
