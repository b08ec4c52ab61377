use crate::domain::wire::{CheckoutPayload, CheckoutReply, VaultReply};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

pub const UNKNOWN_ACTION_MESSAGE: &str = "Endpoint desconhecido";
pub const INVALID_BODY_MESSAGE: &str = "Requisição inválida";
pub const DB_ERROR_PREFIX: &str = "Erro de conexão com BD: ";

#[derive(Debug, Default, Deserialize)]
pub struct ActionQuery {
    #[serde(default)]
    pub action: String,
}

pub async fn post_action(
    State(state): State<AppState>,
    Query(query): Query<ActionQuery>,
    body: Bytes,
) -> impl IntoResponse {
    if query.action != "checkout" {
        return Json(CheckoutReply::failure(UNKNOWN_ACTION_MESSAGE));
    }

    let req: CheckoutPayload = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => {
            tracing::warn!("checkout body rejected: {}", e);
            return Json(CheckoutReply::failure(INVALID_BODY_MESSAGE));
        }
    };

    match state.checkout_service.checkout(req).await {
        Ok(reply) => Json(reply),
        Err(e) => {
            tracing::error!("checkout storage failure: {}", e);
            Json(CheckoutReply::failure(format!("{}{}", DB_ERROR_PREFIX, e)))
        }
    }
}

pub async fn get_action(
    State(state): State<AppState>,
    Query(query): Query<ActionQuery>,
) -> axum::response::Response {
    if query.action != "vault" {
        return Json(CheckoutReply::failure(UNKNOWN_ACTION_MESSAGE)).into_response();
    }

    match state.checkout_service.vault_entries().await {
        Ok(entries) => Json(VaultReply::entries(entries)).into_response(),
        Err(e) => {
            tracing::error!("vault read failure: {}", e);
            Json(VaultReply::failure(format!("{}{}", DB_ERROR_PREFIX, e))).into_response()
        }
    }
}

pub async fn preflight() -> impl IntoResponse {
    axum::http::StatusCode::OK
}
