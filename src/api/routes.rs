//! Shared state and router construction.
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::handlers;
use crate::provider::ImageProvider;
use crate::status::StatusStore;
use crate::studio::GenerationPolicy;

/// Three base64 reference images easily exceed axum's 2 MB default.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

pub struct AppState {
    pub provider: Arc<dyn ImageProvider>,
    pub store: Arc<dyn StatusStore>,
    pub policy: GenerationPolicy,
    pub motif_max_count: u32,
}

pub fn router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/api", get(handlers::root))
        .route("/api/", get(handlers::root))
        .route("/api/status", get(handlers::list_status).post(handlers::create_status))
        .route("/api/generate-motifs", post(handlers::generate_motifs))
        .route("/api/finalize-design", post(handlers::finalize_design))
        .route("/api/generate-saree-preview", post(handlers::generate_saree_preview))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

/// `*` mirrors the caller's origin so credentials stay allowed.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
