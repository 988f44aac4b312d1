use axum::Json;

use crate::api::models::status::StatusResponse;

#[utoipa::path(
    get,
    path = "/",
    tag = "status",
    summary = "Liveness check",
    responses(
        (status = 200, description = "Server is up", body = StatusResponse),
    )
)]
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "Backend server is running!".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{create_test_app, create_test_config};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_root_reports_running() {
        let app = create_test_app(create_test_config("http://127.0.0.1:9"));

        let response = app.get("/").await;

        response.assert_status(StatusCode::OK);
        response.assert_json(&json!({"message": "Backend server is running!"}));
    }
}
