//! Photopress Core Library
//!
//! This crate provides the domain models, validation rules, error types,
//! configuration and submission state machine shared by the API client and
//! the command-line front end.

pub mod config;
pub mod error;
pub mod models;
pub mod progress;
pub mod state;
pub mod validation;

// Re-export commonly used types
pub use config::{ClientConfig, UploadLimits};
pub use error::{
    ErrorKind, ErrorMetadata, FileLoadError, LogLevel, UploadError, ValidationError,
};
pub use models::{
    CredentialRequest, FormFields, FormInput, QualityLevel, SelectedFile, SubmissionOutcome,
    UploadCredential, UploadRequest,
};
pub use progress::{Milestone, NoOpProgressReporter, ProgressReporter};
pub use state::{
    NoOpStateObserver, StateObserver, SubmissionEvent, SubmissionState, TransitionError,
};
pub use validation::{
    format_file_size, is_valid_email, validate_file, validate_file_metadata, validate_form,
};
