#![allow(dead_code)]

use mockito::{Matcher, Mock, Server, ServerGuard};
use photopress_api_client::{ApiClient, FormController, UploadOrchestrator, CREDENTIAL_PATH};
use photopress_core::{FormInput, SelectedFile, UploadLimits};
use std::time::Duration;

pub const TEST_API_KEY: &str = "test-api-key";
pub const STORAGE_PATH: &str = "/store/x";

pub fn client_for(server: &ServerGuard) -> ApiClient {
    ApiClient::new(
        server.url(),
        Some(TEST_API_KEY.to_string()),
        Duration::from_secs(5),
    )
    .expect("client builds")
}

pub fn controller_for(server: &ServerGuard) -> FormController {
    FormController::new(
        UploadOrchestrator::new(client_for(server)),
        UploadLimits::default(),
    )
}

pub fn png_file() -> SelectedFile {
    SelectedFile::new("x.png", "image/png", vec![7u8; 1024])
}

pub fn form(email: &str, quality: &str) -> FormInput {
    FormInput {
        email: email.to_string(),
        quality: Some(quality.to_string()),
        file: Some(png_file()),
    }
}

/// Credential endpoint handing out a credential for [`STORAGE_PATH`].
pub async fn mock_credential(server: &mut ServerGuard) -> Mock {
    let body = serde_json::json!({
        "uploadUrl": format!("{}{}", server.url(), STORAGE_PATH),
        "fields": { "key": "k1", "policy": "p1" }
    });

    server
        .mock("POST", CREDENTIAL_PATH)
        .match_header("x-api-key", TEST_API_KEY)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

pub async fn mock_storage(server: &mut ServerGuard, status: usize) -> Mock {
    server
        .mock("POST", STORAGE_PATH)
        .match_header("x-api-key", Matcher::Missing)
        .with_status(status)
        .create_async()
        .await
}

pub async fn server() -> ServerGuard {
    Server::new_async().await
}
