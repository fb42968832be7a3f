//! Test doubles for the upload flow.

use async_trait::async_trait;
use photopress_core::{
    FormFields, Milestone, ProgressReporter, QualityLevel, SelectedFile, UploadCredential,
    UploadError, UploadRequest,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::orchestrator::UploadTransport;

pub fn png_file() -> SelectedFile {
    SelectedFile::new("x.png", "image/png", vec![7u8; 1024])
}

pub fn request(email: &str) -> UploadRequest {
    UploadRequest {
        email: email.to_string(),
        quality: QualityLevel::High,
        file: png_file(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedUpload {
    pub upload_url: String,
    pub fields: Vec<(String, String)>,
    pub file_name: String,
}

/// In-memory transport that records every call.
pub struct FakeTransport {
    credential_status: Option<u16>,
    upload_status: Option<u16>,
    gate: Arc<Notify>,
    gated: AtomicBool,
    calls: Mutex<Vec<&'static str>>,
    qualities: Mutex<Vec<u8>>,
    uploads: Mutex<Vec<RecordedUpload>>,
}

impl FakeTransport {
    fn with_statuses(credential_status: Option<u16>, upload_status: Option<u16>) -> Self {
        Self {
            credential_status,
            upload_status,
            gate: Arc::new(Notify::new()),
            gated: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
            qualities: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn ok() -> Self {
        Self::with_statuses(None, None)
    }

    pub fn credential_fails(status: u16) -> Self {
        Self::with_statuses(Some(status), None)
    }

    pub fn upload_fails(status: u16) -> Self {
        Self::with_statuses(None, Some(status))
    }

    /// The first credential request waits until `gate()` is notified.
    pub fn gated(self) -> Self {
        self.gated.store(true, Ordering::SeqCst);
        self
    }

    pub fn gate(&self) -> Arc<Notify> {
        Arc::clone(&self.gate)
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn qualities(&self) -> Vec<u8> {
        self.qualities.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl UploadTransport for FakeTransport {
    async fn request_credential(
        &self,
        request: &UploadRequest,
    ) -> Result<UploadCredential, UploadError> {
        self.calls.lock().unwrap().push("credential");
        self.qualities.lock().unwrap().push(request.quality.level());

        if self.gated.swap(false, Ordering::SeqCst) {
            self.gate.notified().await;
        }

        if let Some(status) = self.credential_status {
            return Err(UploadError::credential_status(status, None));
        }

        let mut fields = FormFields::new();
        fields.push("key", "k1");
        Ok(UploadCredential {
            upload_url: "https://store/x".to_string(),
            fields,
        })
    }

    async fn upload(
        &self,
        credential: UploadCredential,
        file: &SelectedFile,
    ) -> Result<(), UploadError> {
        self.calls.lock().unwrap().push("upload");
        self.uploads.lock().unwrap().push(RecordedUpload {
            upload_url: credential.upload_url,
            fields: credential.fields.into_iter().collect(),
            file_name: file.name().to_string(),
        });

        match self.upload_status {
            Some(status) => Err(UploadError::transfer_status(status)),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct RecordingProgress {
    milestones: Mutex<Vec<Milestone>>,
}

impl RecordingProgress {
    pub fn milestones(&self) -> Vec<Milestone> {
        self.milestones.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, milestone: Milestone) {
        self.milestones.lock().unwrap().push(milestone);
    }
}
