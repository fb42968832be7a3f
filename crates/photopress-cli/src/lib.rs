use photopress_api_client::{FormController, UploadTransport};
use photopress_core::{
    format_file_size, ClientConfig, FileLoadError, FormInput, Milestone, ProgressReporter,
    SelectedFile, SubmissionOutcome, SubmissionState, UploadLimits, UploadRequest,
};
use serde::Serialize;
use std::env;
use std::path::PathBuf;

/// Longest file name shown in the preview line.
pub const PREVIEW_NAME_LEN: usize = 40;

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// One-line preview of the selected file, e.g. `photo.png (1.5 KB, image/png)`.
pub fn file_preview(file: &SelectedFile) -> String {
    format!(
        "{} ({}, {})",
        truncate_string(file.name(), PREVIEW_NAME_LEN),
        format_file_size(file.size()),
        file.content_type()
    )
}

/// Human-readable line for a finished submission.
pub fn render_outcome(outcome: &SubmissionOutcome) -> String {
    match outcome {
        SubmissionOutcome::Succeeded { email, .. } => format!(
            "Upload successful! Your processed image will be sent to {}",
            email
        ),
        SubmissionOutcome::Failed { message } => format!("Upload failed: {}", message),
    }
}

/// Form values as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct FormSource {
    pub email: String,
    pub quality: Option<String>,
    pub file: Option<PathBuf>,
    pub content_type: Option<String>,
}

impl FormSource {
    /// Load the named file, rejecting it from metadata before it is read.
    pub fn load_file(&self, limits: &UploadLimits) -> Result<Option<SelectedFile>, FileLoadError> {
        self.file
            .as_deref()
            .map(|path| SelectedFile::from_path(path, self.content_type.clone(), limits))
            .transpose()
    }

    pub fn into_input(self, file: Option<SelectedFile>) -> FormInput {
        FormInput {
            email: self.email,
            quality: self.quality,
            file,
        }
    }
}

/// Select the file, then submit. A rejected file ends the run with its own
/// validation message, exactly as a failed submission would.
pub async fn submit_form<T: UploadTransport>(
    controller: &FormController<T>,
    source: FormSource,
) -> anyhow::Result<SubmissionOutcome> {
    let file = match source.load_file(controller.limits()) {
        Ok(file) => file,
        Err(FileLoadError::Rejected(err)) => return Ok(reject_file(err.to_string())),
        Err(err) => return Err(err.into()),
    };

    let file = match controller.select_file(file) {
        Ok(file) => file,
        Err(err) => return Ok(reject_file(err.to_string())),
    };
    if let Some(file) = &file {
        tracing::info!(file = %file_preview(file), "File selected");
    }

    Ok(controller.submit(source.into_input(file)).await)
}

fn reject_file(message: String) -> SubmissionOutcome {
    tracing::debug!(reason = %message, "File rejected");
    SubmissionOutcome::failed(message)
}

/// Result of `photopress check`.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub email: String,
    pub quality: u8,
    pub file_name: String,
    pub file_size: u64,
    pub file_size_label: String,
    pub content_type: String,
}

impl From<&UploadRequest> for CheckReport {
    fn from(request: &UploadRequest) -> Self {
        Self {
            email: request.email.clone(),
            quality: request.quality.level(),
            file_name: request.file.name().to_string(),
            file_size: request.file.size(),
            file_size_label: format_file_size(request.file.size()),
            content_type: request.file.content_type().to_string(),
        }
    }
}

/// Prints each milestone as `[ 40%] Uploading image...`.
pub struct ConsoleProgress;

impl ProgressReporter for ConsoleProgress {
    fn report(&self, milestone: Milestone) {
        println!("{}", format_milestone(milestone));
    }
}

pub fn format_milestone(milestone: Milestone) -> String {
    format!("[{:>3}%] {}", milestone.percent(), milestone.label())
}

pub fn log_state_change(state: &SubmissionState) {
    tracing::debug!(state = %state, "Form state");
}

/// Load client configuration, letting `--api-url` take precedence over the
/// environment.
pub fn load_config(api_url: Option<String>) -> anyhow::Result<ClientConfig> {
    dotenvy::dotenv().ok();
    ClientConfig::from_lookup(|key| match (key, &api_url) {
        ("PHOTOPRESS_API_URL", Some(url)) => Some(url.clone()),
        _ => env::var(key).ok(),
    })
}

/// Initialize tracing for the CLI. Logs go to stderr so `--json` output stays clean.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
