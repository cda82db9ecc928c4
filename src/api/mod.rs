//! HTTP facade module
//!
//! Exposes the e-filing workflow to the case-management UI as a small REST
//! API with an OpenAPI description.

use crate::{Config, Result, SubmissionService};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Request body limit for the submit endpoint
///
/// Well above the per-file limit so oversized documents reach attachment
/// validation and get a proper `file_too_large` response.
pub const UPLOAD_BODY_LIMIT: usize = 64 * 1024 * 1024;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Tyler e-filing
/// - `POST /api/tyler/authenticate` - Obtain a provider token
/// - `GET /api/tyler/payment-accounts` - List payment accounts (falls back to the demo account)
/// - `POST /api/tyler/submit` - Submit a filing (multipart: `case` JSON + `file` parts)
///
/// ## System
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled)
pub fn create_router(service: Arc<SubmissionService>, config: Arc<Config>) -> Router {
    let state = AppState::new(service, config.clone());

    let router = Router::new()
        .route("/api/tyler/authenticate", post(routes::authenticate))
        .route("/api/tyler/payment-accounts", get(routes::payment_accounts))
        .route(
            "/api/tyler/submit",
            post(routes::submit_filing).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec));

    // Swagger UI serves its own copy of the document so it cannot collide with /openapi.json
    let router = if config.api.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    } else {
        router
    };

    let router = router.with_state(state).layer(TraceLayer::new_for_http());

    if config.api.cors_enabled {
        let cors = build_cors_layer(&config.api.cors_origins);
        router.layer(cors)
    } else {
        router
    }
}

/// Build a CORS layer based on configured origins
///
/// `"*"` (or an empty list) allows any origin; otherwise only the listed
/// origins are allowed. All methods and headers are permitted.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address
///
/// Runs until the server fails. Use [`start_api_server_with_shutdown`] to
/// stop it gracefully.
///
/// # Example
///
/// ```no_run
/// use evict_efile::{Config, SubmissionService};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::from_env()?);
/// let service = Arc::new(SubmissionService::from_config(&config)?);
///
/// evict_efile::api::start_api_server(service, config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(service: Arc<SubmissionService>, config: Arc<Config>) -> Result<()> {
    start_api_server_with_shutdown(service, config, std::future::pending()).await
}

/// Start the API server and stop it once `shutdown` completes
///
/// In-flight requests are allowed to finish before this returns.
pub async fn start_api_server_with_shutdown<F>(
    service: Arc<SubmissionService>,
    config: Arc<Config>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let bind_address = config.api.bind_address;

    tracing::info!(address = %bind_address, "Starting API server");

    let app = create_router(service, config);

    let listener = TcpListener::bind(bind_address).await.map_err(|e| {
        crate::error::Error::ApiServerError(format!("failed to bind {}: {}", bind_address, e))
    })?;

    tracing::info!(address = %bind_address, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
