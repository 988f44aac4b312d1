//! Shared fixtures for handler and router tests.

use axum_test::TestServer;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::{CloudinaryConfig, Config};
use crate::{AppState, build_router, install_crypto_provider};

/// Configuration pointing the media client at `api_base`, usually a wiremock server.
pub fn create_test_config(api_base: &str) -> Config {
    Config {
        cloudinary: CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "1234".to_string(),
            api_secret: "shh".to_string(),
            api_base: api_base.to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn create_test_app(config: Config) -> TestServer {
    install_crypto_provider();
    let state = AppState::from_config(config).expect("Failed to create test state");
    let router = build_router(&state).expect("Failed to build router");
    TestServer::new(router).expect("Failed to create test server")
}

/// Accept any upload for the `demo` cloud and acknowledge it as `public_id`.
pub async fn mock_upload_success(mock_server: &MockServer, public_id: &str) {
    Mock::given(method("POST"))
        .and(path("/v1_1/demo/image/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "public_id": public_id,
            "secure_url": format!("https://res.cloudinary.com/demo/image/upload/v1712345/{public_id}.png"),
        })))
        .mount(mock_server)
        .await;
}
