use axum::body::Body;
use crate::http::handlers::api::ActionQuery;
use axum::extract::{Query, State};
use axum::http::{Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

pub const VAULT_KEY_HEADER: &str = "X-Vault-Api-Key";

/// Guards `GET ?action=vault` when a key is configured; with no key the vault stays public.
pub async fn require_vault_key(
    State(expected): State<Option<String>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = expected else {
        return next.run(request).await;
    };

    // Decoded exactly like the handler's `Query<ActionQuery>`, percent-escapes included.
    let is_vault_read = request.method() == Method::GET
        && Query::<ActionQuery>::try_from_uri(request.uri()).is_ok_and(|Query(q)| q.action == "vault");
    if !is_vault_read {
        return next.run(request).await;
    }

    let provided = request
        .headers()
        .get(VAULT_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");

    if !constant_time_compare(provided, &expected) {
        tracing::warn!("vault read rejected: missing or wrong api key");
        return Response::builder()
            .status(StatusCode::UNAUTHORIZED)
            .body(Body::from("unauthorized"))
            .unwrap_or_else(|_| Response::new(Body::from("unauthorized")));
    }

    next.run(request).await
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}
