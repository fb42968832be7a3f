//! Upload orchestration
//!
//! One submission is two strictly sequential network calls: fetch a
//! credential, then upload with it. Any failure ends the submission with a
//! single `Failed` outcome and nothing is retried.

use async_trait::async_trait;
use photopress_core::{
    ErrorMetadata, LogLevel, Milestone, NoOpProgressReporter, ProgressReporter, SelectedFile,
    SubmissionOutcome, UploadCredential, UploadError, UploadRequest,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::ApiClient;

/// The two network calls a submission needs.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn request_credential(
        &self,
        request: &UploadRequest,
    ) -> Result<UploadCredential, UploadError>;

    async fn upload(
        &self,
        credential: UploadCredential,
        file: &SelectedFile,
    ) -> Result<(), UploadError>;
}

#[async_trait]
impl UploadTransport for ApiClient {
    async fn request_credential(
        &self,
        request: &UploadRequest,
    ) -> Result<UploadCredential, UploadError> {
        ApiClient::request_credential(self, request).await
    }

    async fn upload(
        &self,
        credential: UploadCredential,
        file: &SelectedFile,
    ) -> Result<(), UploadError> {
        self.upload_to_storage(credential, file).await
    }
}

/// Released when dropped, whether the submission succeeded or not.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, UploadError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| UploadError::InProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct UploadOrchestrator<T = ApiClient> {
    transport: T,
    progress: Arc<dyn ProgressReporter>,
    in_flight: AtomicBool,
}

impl<T: UploadTransport> UploadOrchestrator<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            progress: Arc::new(NoOpProgressReporter),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Whether a submission is currently outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run one submission, reporting milestones to the configured reporter.
    pub async fn submit(&self, request: UploadRequest) -> SubmissionOutcome {
        let progress = Arc::clone(&self.progress);
        self.submit_with_progress(request, progress.as_ref()).await
    }

    /// Run one submission, reporting milestones to `progress` instead.
    pub async fn submit_with_progress(
        &self,
        request: UploadRequest,
        progress: &dyn ProgressReporter,
    ) -> SubmissionOutcome {
        let submission_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "submission",
            %submission_id,
            email = %request.email,
            quality = request.quality.level(),
            file_name = %request.file.name(),
        );

        async move {
            match self.run(request, progress).await {
                Ok(email) => {
                    tracing::info!("Upload complete");
                    SubmissionOutcome::succeeded(email)
                }
                Err(err) => {
                    log_failure(&err);
                    SubmissionOutcome::failed(err.user_message())
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        request: UploadRequest,
        progress: &dyn ProgressReporter,
    ) -> Result<String, UploadError> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        progress.report(Milestone::CredentialRequested);
        let credential = self.transport.request_credential(&request).await?;
        tracing::debug!(
            upload_url = %credential.upload_url,
            fields = credential.fields.len(),
            "Upload credential issued"
        );

        progress.report(Milestone::UploadStarted);
        self.transport.upload(credential, &request.file).await?;

        progress.report(Milestone::Complete);
        Ok(request.email)
    }
}

fn log_failure(err: &UploadError) {
    match err.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %err, kind = ?err.kind(), "Submission failed")
        }
        LogLevel::Warn => {
            tracing::warn!(error = %err, kind = ?err.kind(), status = ?err.status(), "Submission failed")
        }
        LogLevel::Error => {
            tracing::error!(error = %err, kind = ?err.kind(), "Submission failed")
        }
    }
}
