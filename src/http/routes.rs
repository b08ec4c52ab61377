use crate::http::handlers::{api, ops};
use crate::http::middleware::vault_auth::require_vault_key;
use crate::AppState;
use axum::http::{header, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let endpoint = get(api::get_action)
        .post(api::post_action)
        .options(api::preflight);

    Router::new()
        .route("/health", get(ops::health))
        .route("/ops/liveness", get(ops::liveness))
        .route("/ops/readiness", get(ops::readiness))
        .route("/api", endpoint.clone())
        .route("/api/index.php", endpoint)
        .layer(from_fn_with_state(state.vault_api_key.clone(), require_vault_key))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
