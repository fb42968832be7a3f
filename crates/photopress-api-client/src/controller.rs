//! Form controller
//!
//! Owns the submission state and drives it through
//! [`SubmissionState::apply`] while the validator and the orchestrator do the
//! work. The selected file is never stored here: the caller passes it in with
//! each submission.

use photopress_core::{
    validate_file, validate_form, ErrorMetadata, FormInput, Milestone, NoOpProgressReporter,
    NoOpStateObserver, ProgressReporter, SelectedFile, StateObserver, SubmissionEvent,
    SubmissionOutcome, SubmissionState, TransitionError, UploadError, UploadLimits,
};
use std::sync::{Arc, Mutex};

use crate::orchestrator::{UploadOrchestrator, UploadTransport};
use crate::ApiClient;

pub struct FormController<T = ApiClient> {
    orchestrator: UploadOrchestrator<T>,
    limits: UploadLimits,
    state: Mutex<SubmissionState>,
    observer: Arc<dyn StateObserver>,
    progress: Arc<dyn ProgressReporter>,
}

impl<T: UploadTransport> FormController<T> {
    pub fn new(orchestrator: UploadOrchestrator<T>, limits: UploadLimits) -> Self {
        Self {
            orchestrator,
            limits,
            state: Mutex::new(SubmissionState::Idle),
            observer: Arc::new(NoOpStateObserver),
            progress: Arc::new(NoOpProgressReporter),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn StateObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn limits(&self) -> &UploadLimits {
        &self.limits
    }

    pub fn orchestrator(&self) -> &UploadOrchestrator<T> {
        &self.orchestrator
    }

    pub fn state(&self) -> SubmissionState {
        self.lock_state().clone()
    }

    /// False while a submission is outstanding.
    pub fn is_submittable(&self) -> bool {
        !self.lock_state().is_in_flight()
    }

    /// Check a newly chosen file. Selecting a file starts a fresh attempt, so
    /// the state is reset either way; on failure the caller should drop the file.
    /// `None` clears the selection. Fails with `InProgress` while a submission
    /// is outstanding.
    pub fn select_file(
        &self,
        file: Option<SelectedFile>,
    ) -> Result<Option<SelectedFile>, UploadError> {
        self.reset()?;
        let Some(file) = file else {
            return Ok(None);
        };

        match validate_file(&file, &self.limits) {
            Ok(()) => {
                tracing::debug!(file_name = %file.name(), size = file.size(), "File selected");
                Ok(Some(file))
            }
            Err(err) => {
                tracing::debug!(file_name = %file.name(), error = %err, "File rejected");
                Err(err.into())
            }
        }
    }

    /// The caller has dropped its file; the form starts over.
    pub fn remove_file(&self) -> Result<(), UploadError> {
        self.reset()?;
        tracing::debug!("File removed");
        Ok(())
    }

    /// Back to `Idle`, as after "upload another" or "retry". Not allowed
    /// while a submission is outstanding.
    pub fn reset(&self) -> Result<(), UploadError> {
        self.transition(SubmissionEvent::Reset)
            .map(|_| ())
            .map_err(|err| {
                tracing::debug!(error = %err, "Reset rejected");
                UploadError::InProgress
            })
    }

    /// Validate the form and, if it passes, run the upload.
    pub async fn submit(&self, input: FormInput) -> SubmissionOutcome {
        if let Err(err) = self.transition(SubmissionEvent::Submit) {
            tracing::debug!(error = %err, "Submission rejected");
            return SubmissionOutcome::failed(UploadError::InProgress.user_message());
        }

        let request = match validate_form(input, &self.limits) {
            Ok(request) => request,
            Err(err) => {
                let message = err.to_string();
                self.advance(SubmissionEvent::ValidationFailed(message.clone()));
                return SubmissionOutcome::failed(message);
            }
        };
        self.advance(SubmissionEvent::ValidationPassed);

        let progress = |milestone: Milestone| {
            if milestone == Milestone::UploadStarted {
                self.advance(SubmissionEvent::CredentialIssued);
            }
            self.progress.report(milestone);
        };

        let outcome = self
            .orchestrator
            .submit_with_progress(request, &progress)
            .await;

        match &outcome {
            SubmissionOutcome::Succeeded { email, .. } => {
                self.advance(SubmissionEvent::UploadCompleted {
                    email: email.clone(),
                })
            }
            SubmissionOutcome::Failed { message } => {
                self.advance(SubmissionEvent::Failed(message.clone()))
            }
        }

        outcome
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SubmissionState> {
        // A panic while holding the lock cannot leave a half-written state
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn transition(&self, event: SubmissionEvent) -> Result<SubmissionState, TransitionError> {
        let next = {
            let mut state = self.lock_state();
            let next = state.apply(event)?;
            *state = next.clone();
            next
        };
        tracing::debug!(state = %next, "Submission state changed");
        self.observer.state_changed(&next);
        Ok(next)
    }

    fn advance(&self, event: SubmissionEvent) {
        if let Err(err) = self.transition(event) {
            tracing::error!(error = %err, "Unexpected submission state transition");
        }
    }
}
