//! Domain models for a single upload submission.

pub mod credential;
pub mod outcome;
pub mod quality;
pub mod upload;

pub use credential::{ApiErrorBody, CredentialRequest, FormFields, UploadCredential};
pub use outcome::SubmissionOutcome;
pub use quality::QualityLevel;
pub use upload::{content_type_for_path, FormInput, SelectedFile, UploadRequest};
