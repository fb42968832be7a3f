//! Coarse progress milestones emitted while a submission runs.
//!
//! Milestones are UI feedback only and say nothing about bytes actually sent.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    CredentialRequested,
    UploadStarted,
    Complete,
}

impl Milestone {
    pub fn label(self) -> &'static str {
        match self {
            Milestone::CredentialRequested => "Getting upload URL...",
            Milestone::UploadStarted => "Uploading image...",
            Milestone::Complete => "Processing complete!",
        }
    }

    pub fn percent(self) -> u8 {
        match self {
            Milestone::CredentialRequested => 20,
            Milestone::UploadStarted => 40,
            Milestone::Complete => 100,
        }
    }
}

/// Receives milestones from the orchestrator.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, milestone: Milestone);
}

impl<F> ProgressReporter for F
where
    F: Fn(Milestone) + Send + Sync,
{
    fn report(&self, milestone: Milestone) {
        self(milestone)
    }
}

/// No-op implementation for callers that do not render progress
pub struct NoOpProgressReporter;

impl ProgressReporter for NoOpProgressReporter {
    fn report(&self, _milestone: Milestone) {}
}
