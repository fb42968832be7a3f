//! Submission state machine
//!
//! `SubmissionState::apply` is a pure transition function. Rendering code
//! observes states; it never mutates them directly.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    AwaitingCredential,
    Uploading,
    Succeeded {
        email: String,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionEvent {
    Submit,
    ValidationPassed,
    ValidationFailed(String),
    CredentialIssued,
    UploadCompleted { email: String },
    Failed(String),
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot apply '{event}' while {from}")]
pub struct TransitionError {
    pub from: &'static str,
    pub event: &'static str,
}

impl SubmissionState {
    pub fn apply(&self, event: SubmissionEvent) -> Result<SubmissionState, TransitionError> {
        use SubmissionEvent as E;
        use SubmissionState as S;

        let next = match (self, event) {
            (S::Idle | S::Succeeded { .. } | S::Failed { .. }, E::Reset) => S::Idle,
            (S::Idle | S::Succeeded { .. } | S::Failed { .. }, E::Submit) => S::Validating,
            (S::Validating, E::ValidationPassed) => S::AwaitingCredential,
            (S::Validating, E::ValidationFailed(reason)) => S::Failed { reason },
            (S::AwaitingCredential, E::CredentialIssued) => S::Uploading,
            (S::AwaitingCredential | S::Uploading, E::Failed(reason)) => S::Failed { reason },
            (S::Uploading, E::UploadCompleted { email }) => S::Succeeded { email },
            (from, event) => {
                return Err(TransitionError {
                    from: from.name(),
                    event: event.name(),
                })
            }
        };
        Ok(next)
    }

    /// True between `Submit` and a terminal state. Submission is disabled meanwhile.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            SubmissionState::Validating
                | SubmissionState::AwaitingCredential
                | SubmissionState::Uploading
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::Succeeded { .. } | SubmissionState::Failed { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Validating => "validating",
            SubmissionState::AwaitingCredential => "awaiting_credential",
            SubmissionState::Uploading => "uploading",
            SubmissionState::Succeeded { .. } => "succeeded",
            SubmissionState::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl SubmissionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SubmissionEvent::Submit => "submit",
            SubmissionEvent::ValidationPassed => "validation_passed",
            SubmissionEvent::ValidationFailed(_) => "validation_failed",
            SubmissionEvent::CredentialIssued => "credential_issued",
            SubmissionEvent::UploadCompleted { .. } => "upload_completed",
            SubmissionEvent::Failed(_) => "failed",
            SubmissionEvent::Reset => "reset",
        }
    }
}

/// Notified after every state change.
pub trait StateObserver: Send + Sync {
    fn state_changed(&self, state: &SubmissionState);
}

impl<F> StateObserver for F
where
    F: Fn(&SubmissionState) + Send + Sync,
{
    fn state_changed(&self, state: &SubmissionState) {
        self(state)
    }
}

pub struct NoOpStateObserver;

impl StateObserver for NoOpStateObserver {
    fn state_changed(&self, _state: &SubmissionState) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(events: Vec<SubmissionEvent>) -> Result<SubmissionState, TransitionError> {
        events
            .into_iter()
            .try_fold(SubmissionState::Idle, |state, event| state.apply(event))
    }

    #[test]
    fn test_happy_path() {
        let state = run(vec![
            SubmissionEvent::Submit,
            SubmissionEvent::ValidationPassed,
            SubmissionEvent::CredentialIssued,
            SubmissionEvent::UploadCompleted {
                email: "a@b.com".to_string(),
            },
        ])
        .unwrap();
        assert_eq!(
            state,
            SubmissionState::Succeeded {
                email: "a@b.com".to_string()
            }
        );
        assert!(state.is_terminal());
    }

    #[test]
    fn test_validation_failure_is_terminal() {
        let state = run(vec![
            SubmissionEvent::Submit,
            SubmissionEvent::ValidationFailed("Please enter your email address".to_string()),
        ])
        .unwrap();
        assert_eq!(
            state,
            SubmissionState::Failed {
                reason: "Please enter your email address".to_string()
            }
        );
    }

    #[test]
    fn test_network_failures() {
        let from_credential = run(vec![
            SubmissionEvent::Submit,
            SubmissionEvent::ValidationPassed,
            SubmissionEvent::Failed("HTTP error! status: 500".to_string()),
        ])
        .unwrap();
        assert_eq!(from_credential.name(), "failed");

        let from_upload = run(vec![
            SubmissionEvent::Submit,
            SubmissionEvent::ValidationPassed,
            SubmissionEvent::CredentialIssued,
            SubmissionEvent::Failed("Storage upload failed: 403".to_string()),
        ])
        .unwrap();
        assert_eq!(from_upload.name(), "failed");
    }

    #[test]
    fn test_submit_rejected_while_in_flight() {
        for state in [
            SubmissionState::Validating,
            SubmissionState::AwaitingCredential,
            SubmissionState::Uploading,
        ] {
            assert!(state.is_in_flight());
            let err = state.apply(SubmissionEvent::Submit).unwrap_err();
            assert_eq!(err.event, "submit");
            assert_eq!(err.from, state.name());
        }
    }

    #[test]
    fn test_retry_after_terminal_state() {
        let failed = SubmissionState::Failed {
            reason: "x".to_string(),
        };
        assert_eq!(
            failed.apply(SubmissionEvent::Submit),
            Ok(SubmissionState::Validating)
        );
    }

    #[test]
    fn test_reset_from_settled_states() {
        for state in [
            SubmissionState::Idle,
            SubmissionState::Succeeded {
                email: "a@b.com".to_string(),
            },
            SubmissionState::Failed {
                reason: "x".to_string(),
            },
        ] {
            assert_eq!(
                state.apply(SubmissionEvent::Reset),
                Ok(SubmissionState::Idle)
            );
        }
    }

    #[test]
    fn test_reset_rejected_while_in_flight() {
        for state in [
            SubmissionState::Validating,
            SubmissionState::AwaitingCredential,
            SubmissionState::Uploading,
        ] {
            let err = state.apply(SubmissionEvent::Reset).unwrap_err();
            assert_eq!(err.event, "reset");
            assert_eq!(err.from, state.name());
        }
    }

    #[test]
    fn test_out_of_order_events_rejected() {
        assert!(SubmissionState::Idle
            .apply(SubmissionEvent::CredentialIssued)
            .is_err());
        assert!(SubmissionState::Validating
            .apply(SubmissionEvent::UploadCompleted {
                email: "a@b.com".to_string()
            })
            .is_err());
        assert!(SubmissionState::Idle
            .apply(SubmissionEvent::Failed("x".to_string()))
            .is_err());
    }

    #[test]
    fn test_error_message() {
        let err = SubmissionState::Uploading
            .apply(SubmissionEvent::Submit)
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot apply 'submit' while uploading");
    }
}
