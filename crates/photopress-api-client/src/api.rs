//! The two network calls of a submission.

use photopress_core::models::ApiErrorBody;
use photopress_core::{
    CredentialRequest, FormFields, SelectedFile, UploadCredential, UploadError, UploadRequest,
};
use reqwest::multipart::{Form, Part};

use crate::{ApiClient, CREDENTIAL_PATH, FILE_FIELD};

impl ApiClient {
    /// Ask the credential service for a one-shot upload credential.
    pub async fn request_credential(
        &self,
        request: &UploadRequest,
    ) -> Result<UploadCredential, UploadError> {
        let url = self.build_url(CREDENTIAL_PATH);
        let body = CredentialRequest::from(request);

        tracing::debug!(
            url = %url,
            file_name = %body.file_name,
            file_type = %body.file_type,
            quality = request.quality.level(),
            "Requesting upload credential"
        );

        let response = self
            .apply_auth(self.client().post(&url).json(&body))
            .send()
            .await
            .map_err(UploadError::credential_transport)?;

        let status = response.status();
        if !status.is_success() {
            // Error bodies are optional and may not be JSON
            let server_message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message);
            return Err(UploadError::credential_status(
                status.as_u16(),
                server_message,
            ));
        }

        response
            .json::<UploadCredential>()
            .await
            .map_err(UploadError::malformed_credential)
    }

    /// Upload the file straight to storage. Consumes the credential.
    pub async fn upload_to_storage(
        &self,
        credential: UploadCredential,
        file: &SelectedFile,
    ) -> Result<(), UploadError> {
        let UploadCredential { upload_url, fields } = credential;

        tracing::debug!(
            upload_url = %upload_url,
            fields = fields.len(),
            size = file.size(),
            "Uploading to storage"
        );

        let form = build_upload_form(fields, file)?;

        let response = self
            .client()
            .post(&upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(UploadError::transfer_transport)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %error_text, "Storage rejected upload");
            return Err(UploadError::transfer_status(status.as_u16()));
        }

        Ok(())
    }
}

/// Credential fields first, in order, then the file under [`FILE_FIELD`].
pub fn build_upload_form(fields: FormFields, file: &SelectedFile) -> Result<Form, UploadError> {
    let mut form = Form::new();
    for (key, value) in fields {
        form = form.text(key, value);
    }

    let part = Part::bytes(file.data().to_vec())
        .file_name(file.name().to_string())
        .mime_str(file.content_type())
        .map_err(UploadError::transfer_transport)?;

    Ok(form.part(FILE_FIELD, part))
}
