//! Form validation
//!
//! Rules run in a fixed order and the first failing rule is reported. The
//! checks are pure: no network, no file content inspection beyond the
//! declared content type and size.

use regex::Regex;
use std::sync::LazyLock;

use crate::config::UploadLimits;
use crate::error::ValidationError;
use crate::models::{FormInput, QualityLevel, SelectedFile, UploadRequest};

/// `local@domain.tld`: one "@", a dot inside the domain, no whitespace.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Check the selected file against the declared type and the size limit.
pub fn validate_file(file: &SelectedFile, limits: &UploadLimits) -> Result<(), ValidationError> {
    validate_file_metadata(file.content_type(), file.size(), limits)
}

/// Type rule, then size rule, on metadata alone. Lets a file on disk be
/// rejected before its contents are read.
pub fn validate_file_metadata(
    content_type: &str,
    size: u64,
    limits: &UploadLimits,
) -> Result<(), ValidationError> {
    if !limits.allows_content_type(content_type) {
        return Err(ValidationError::UnsupportedFileType {
            content_type: content_type.to_string(),
        });
    }

    if size > limits.max_file_size_bytes {
        return Err(ValidationError::FileTooLarge {
            size,
            max_bytes: limits.max_file_size_bytes,
        });
    }

    Ok(())
}

/// Validate the whole form and produce a request ready for submission.
pub fn validate_form(
    input: FormInput,
    limits: &UploadLimits,
) -> Result<UploadRequest, ValidationError> {
    let email = input.email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }

    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }

    let quality = input
        .quality
        .as_deref()
        .filter(|q| !q.trim().is_empty())
        .and_then(|q| q.parse::<QualityLevel>().ok())
        .ok_or(ValidationError::MissingQuality)?;

    let file = input.file.ok_or(ValidationError::MissingFile)?;
    validate_file(&file, limits)?;

    Ok(UploadRequest {
        email: email.to_string(),
        quality,
        file,
    })
}

/// Human-readable file size, e.g. `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;

    format!("{} {}", rounded, UNITS[unit])
}
