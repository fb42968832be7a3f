//! Error types module
//!
//! Every failure of a submission ends up as an `UploadError`. Validation
//! failures happen before any network call; credential failures abort before
//! the upload; transfer failures happen after the credential was consumed.
//! All of them are terminal and are shown to the user as a single message.

/// Message shown when a failure carries no usable text of its own.
pub const FALLBACK_FAILURE_MESSAGE: &str = "Failed to upload image. Please try again.";

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for failures reported by a remote service
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Which stage of a submission produced the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Credential,
    Transfer,
    Client,
}

/// Metadata describing how an error should be presented.
pub trait ErrorMetadata {
    /// Stage that failed
    fn kind(&self) -> ErrorKind;

    /// Text shown to the user
    fn user_message(&self) -> String;

    /// Whether submitting again unchanged could succeed
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// A form rule that did not hold. Rules are checked in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter your email address")]
    MissingEmail,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please select image quality")]
    MissingQuality,

    #[error("Please select an image to upload")]
    MissingFile,

    #[error("Please select a valid image file (PNG, JPG, or JPEG)")]
    UnsupportedFileType { content_type: String },

    #[error("File size must be less than {}MB", .max_bytes / crate::config::MIB)]
    FileTooLarge { size: u64, max_bytes: u64 },
}

/// Why a file on disk could not become a `SelectedFile`.
#[derive(Debug, thiserror::Error)]
pub enum FileLoadError {
    #[error(transparent)]
    Rejected(#[from] ValidationError),

    #[error("Failed to read file: {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid file name: {0}")]
    InvalidName(String),
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{message}")]
    Credential {
        message: String,
        status: Option<u16>,
    },

    #[error("{message}")]
    Transfer {
        message: String,
        status: Option<u16>,
    },

    #[error("An upload is already in progress")]
    InProgress,
}

impl UploadError {
    /// Non-2xx from the credential service. The server's message wins when present.
    pub fn credential_status(status: u16, server_message: Option<String>) -> Self {
        let message = server_message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP error! status: {}", status));
        UploadError::Credential {
            message,
            status: Some(status),
        }
    }

    /// The credential service could not be reached.
    pub fn credential_transport(err: impl std::fmt::Display) -> Self {
        UploadError::Credential {
            message: format!("Failed to reach upload service: {}", err),
            status: None,
        }
    }

    /// The credential service answered 2xx with a body that is not a credential.
    pub fn malformed_credential(err: impl std::fmt::Display) -> Self {
        UploadError::Credential {
            message: format!("Failed to parse upload credential: {}", err),
            status: None,
        }
    }

    /// Non-2xx from the storage endpoint.
    pub fn transfer_status(status: u16) -> Self {
        UploadError::Transfer {
            message: format!("Storage upload failed: {}", status),
            status: Some(status),
        }
    }

    /// The storage endpoint could not be reached, or the upload could not be built.
    pub fn transfer_transport(err: impl std::fmt::Display) -> Self {
        UploadError::Transfer {
            message: format!("Failed to reach storage: {}", err),
            status: None,
        }
    }

    /// HTTP status attached to the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            UploadError::Credential { status, .. } | UploadError::Transfer { status, .. } => {
                *status
            }
            _ => None,
        }
    }
}

impl ErrorMetadata for UploadError {
    fn kind(&self) -> ErrorKind {
        match self {
            UploadError::Validation(_) => ErrorKind::Validation,
            UploadError::Credential { .. } => ErrorKind::Credential,
            UploadError::Transfer { .. } => ErrorKind::Transfer,
            UploadError::InProgress => ErrorKind::Client,
        }
    }

    fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            FALLBACK_FAILURE_MESSAGE.to_string()
        } else {
            message
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            UploadError::Validation(_) => false,
            // 4xx means the request itself was rejected
            UploadError::Credential { status, .. } | UploadError::Transfer { status, .. } => {
                !matches!(status, Some(400..=499))
            }
            UploadError::InProgress => true,
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            UploadError::Validation(_) | UploadError::InProgress => LogLevel::Debug,
            // A transfer without a status never reached storage
            UploadError::Transfer { status: None, .. } => LogLevel::Error,
            UploadError::Credential { .. } | UploadError::Transfer { .. } => LogLevel::Warn,
        }
    }
}
