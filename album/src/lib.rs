//! # album: photo album upload backend
//!
//! A small HTTP service that accepts image uploads from a browser front-end, stores them with a
//! managed media service (Cloudinary) and hands back direct and optimized delivery URLs.
//!
//! ## Endpoints
//!
//! - `GET /`: liveness message
//! - `POST /api/upload`: multipart upload of a single `image` part
//! - `GET /api/pictures`: picture listing (no catalog yet, always empty)
//! - `GET /api/test-cloudinary`: end-to-end connectivity probe against the media service
//! - `GET /api-docs/openapi.json` and `GET /docs`: API documentation
//! - `GET /internal/metrics`: Prometheus metrics, when `enable_metrics` is set
//!
//! ## Architecture
//!
//! - [`api`]: request handlers and response models
//! - [`media`]: the [`media::MediaStore`] seam, its Cloudinary implementation and delivery URL
//!   derivation
//! - [`payload`]: turning an uploaded file into an inline data URI
//! - [`config`]: layered configuration (YAML file, then environment)
//! - [`errors`]: the HTTP error type and its JSON rendering
//!
//! Uploads are never written to disk. The whole file is held in memory, bounded by
//! `upload.max_file_size`, and forwarded inline.
//!
//! ## Running
//!
//! ```bash
//! export CLOUDINARY_URL=cloudinary://<api_key>:<api_secret>@<cloud_name>
//! album -f config.yaml
//! ```

pub mod api;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod media;
pub mod openapi;
pub mod payload;
pub mod telemetry;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{self, HeaderValue},
    routing::{get, post},
};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use crate::config::Config;

use crate::catalog::{PictureCatalog, UnimplementedCatalog};
use crate::config::CorsOrigin;
use crate::media::{DeliveryUrls, MediaStore};
use crate::openapi::ApiDoc;

/// Room left in the request body limit for multipart boundaries and part headers.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Install the process-wide TLS crypto provider used by the outbound HTTP client.
///
/// Safe to call more than once; later calls are no-ops.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

/// Application state shared across all request handlers.
///
/// # Fields
///
/// - `config`: Immutable configuration loaded at startup
/// - `media`: Remote media store that uploads are forwarded to
/// - `urls`: Delivery URL builder for the configured cloud
/// - `catalog`: Source for picture listings
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .config(Arc::new(config))
///     .media(media)
///     .urls(urls)
///     .catalog(Arc::new(UnimplementedCatalog))
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Arc<Config>,
    pub media: Arc<dyn MediaStore>,
    pub urls: DeliveryUrls,
    pub catalog: Arc<dyn PictureCatalog>,
}

impl AppState {
    /// Wire up the production collaborators for `config`.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let media = media::create_store(&config.cloudinary)?;
        let urls = DeliveryUrls::from_config(&config.cloudinary);

        Ok(Self::builder()
            .config(Arc::new(config))
            .media(media)
            .urls(urls)
            .catalog(Arc::new(UnimplementedCatalog))
            .build())
    }
}

/// Build the CORS layer. A wildcard anywhere in the origin list allows any origin.
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.cors;

    let allow_origin = if cors_config.allowed_origins.iter().any(|o| matches!(o, CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &cors_config.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                // Origins never carry a trailing slash, unlike a serialized `Url`.
                origins.push(url.as_str().trim_end_matches('/').parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(cors_config.allow_credentials)
        .expose_headers(vec![http::header::CONTENT_TYPE]);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router with all endpoints and middleware.
///
/// # Errors
///
/// Returns an error if the CORS configuration cannot be turned into header values.
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    let upload_body_limit = usize::try_from(state.config.upload.max_file_size)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let api_routes = Router::new()
        .route(
            "/upload",
            post(api::handlers::uploads::upload_image).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route("/pictures", get(api::handlers::pictures::list_pictures))
        .route("/test-cloudinary", get(api::handlers::diagnostics::test_cloudinary));

    let router = Router::new()
        .route("/", get(api::handlers::status::root))
        .nest("/api", api_routes)
        .with_state(state.clone())
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    let mut router = router.layer(create_cors_layer(&state.config)?);

    if state.config.enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router = router
            .route("/internal/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer);
    }

    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// The assembled service, ready to bind.
pub struct Application {
    router: Router,
    config: Arc<Config>,
}

impl Application {
    /// Create a new application instance with all collaborators initialized
    pub fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting album with configuration: {:#?}", config);

        let state = AppState::from_config(config)?;
        let router = build_router(&state)?;

        Ok(Self {
            router,
            config: state.config,
        })
    }

    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("Server is running on port {} (listening on http://{})", self.config.port, bind_addr);

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_config;
    use axum::http::StatusCode;
    use url::Url;

    #[tokio::test]
    async fn test_application_serves_root() {
        install_crypto_provider();
        let server = Application::new(create_test_config("http://127.0.0.1:9"))
            .expect("application should build")
            .into_test_server();

        let response = server.get("/").await;

        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_openapi_document_served() {
        install_crypto_provider();
        let server = Application::new(create_test_config("http://127.0.0.1:9"))
            .expect("application should build")
            .into_test_server();

        let response = server.get("/api-docs/openapi.json").await;

        response.assert_status(StatusCode::OK);
        let doc: serde_json::Value = response.json();
        assert!(doc["paths"]["/api/upload"]["post"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        install_crypto_provider();
        let server = Application::new(create_test_config("http://127.0.0.1:9"))
            .expect("application should build")
            .into_test_server();

        server.get("/api/nope").await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin_by_default() {
        install_crypto_provider();
        let server = Application::new(create_test_config("http://127.0.0.1:9"))
            .expect("application should build")
            .into_test_server();

        let response = server.get("/").add_header("origin", "http://localhost:3000").await;

        assert_eq!(
            response.headers().get("access-control-allow-origin").and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }

    #[tokio::test]
    async fn test_cors_restricted_origins() {
        install_crypto_provider();
        let mut config = create_test_config("http://127.0.0.1:9");
        config.cors.allowed_origins = vec![CorsOrigin::Url(Url::parse("http://localhost:3000").unwrap())];
        let server = Application::new(config).expect("application should build").into_test_server();

        let allowed = server.get("/").add_header("origin", "http://localhost:3000").await;
        assert_eq!(
            allowed.headers().get("access-control-allow-origin").and_then(|v| v.to_str().ok()),
            Some("http://localhost:3000")
        );

        let denied = server.get("/").add_header("origin", "http://evil.example").await;
        assert!(denied.headers().get("access-control-allow-origin").is_none());
    }
}
