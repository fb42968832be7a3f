use chrono::{DateTime, Utc};
use serde::Serialize;

/// Terminal result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Succeeded {
        email: String,
        completed_at: DateTime<Utc>,
    },
    Failed {
        message: String,
    },
}

impl SubmissionOutcome {
    pub fn succeeded(email: impl Into<String>) -> Self {
        SubmissionOutcome::Succeeded {
            email: email.into(),
            completed_at: Utc::now(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        SubmissionOutcome::Failed {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Succeeded { .. })
    }

    /// Email shown on the confirmation screen.
    pub fn email(&self) -> Option<&str> {
        match self {
            SubmissionOutcome::Succeeded { email, .. } => Some(email),
            SubmissionOutcome::Failed { .. } => None,
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self {
            SubmissionOutcome::Succeeded { .. } => None,
            SubmissionOutcome::Failed { message } => Some(message),
        }
    }
}
