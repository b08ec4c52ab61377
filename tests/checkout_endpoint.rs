use axum::body::Body;
use axum::http::{Request, StatusCode};
use market_checkout::http::routes::build_router;
use market_checkout::vault::MemoryVaultStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

mod common;

async fn call(app: axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn card_checkout_vaults_last4_and_records_order() {
    let (state, vault, orders) = common::memory_state();
    let app = build_router(state);

    let (status, body) = call(
        app,
        post_json(
            "/api/index.php?action=checkout",
            json!({
                "type": "CREDIT_CARD",
                "amount": 216.81,
                "card_number": "5555444433331111",
                "card_holder": "MARIA SILVA",
                "card_expiry": "12/30"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["order_id"].as_str().unwrap().starts_with("ORD-"));
    assert!(body["tx_id"].as_str().unwrap().starts_with("tx_"));

    let entries = market_checkout::vault::VaultStore::list_newest_first(&vault).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].cc_last4, "1111");
    assert_eq!(entries[0].brand, "mastercard");
    assert!(!serde_json::to_string(&entries).unwrap().contains("5555444433331111"));

    let recorded = orders.orders.lock().await;
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].total_cents, 21681);
    assert_eq!(recorded[0].status.as_str(), "approved");
}

#[tokio::test]
async fn pix_checkout_returns_code_and_pending_order() {
    let (state, vault, orders) = common::memory_state();
    let (status, body) = call(
        build_router(state),
        post_json("/api?action=checkout", json!({"type": "PIX", "amount": 100})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["pix_code"].as_str().unwrap().contains("BR.GOV.BCB.PIX"));
    assert!(body["order_id"].as_str().unwrap().starts_with("ORD-PIX-"));
    assert_eq!(vault.len().await, 0);

    let recorded = orders.orders.lock().await;
    assert_eq!(recorded[0].total_cents, 10_000);
    assert_eq!(recorded[0].status.as_str(), "pending");
}

#[tokio::test]
async fn card_checkout_without_number_is_refused() {
    let (state, vault, _) = common::memory_state();
    let (status, body) = call(
        build_router(state),
        post_json("/api/index.php?action=checkout", json!({"type": "CREDIT_CARD", "amount": 10})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Dados do cartão inválidos");
    assert_eq!(vault.len().await, 0);
}

#[tokio::test]
async fn vault_lists_newest_first_verbatim() {
    let (state, _, _) = common::memory_state();
    let app = build_router(state);

    for number in ["4111111111111111", "5555444433332222"] {
        let (_, body) = call(
            app.clone(),
            post_json(
                "/api/index.php?action=checkout",
                json!({"type": "CREDIT_CARD", "amount": 1, "card_number": number}),
            ),
        )
        .await;
        assert_eq!(body["success"], true);
    }

    let req = Request::get("/api/index.php?action=vault").body(Body::empty()).unwrap();
    let (status, body) = call(app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["cc_last4"], "2222");
    assert_eq!(data[1]["cc_last4"], "1111");
    assert!(data[0]["cc_hash"].as_str().unwrap().starts_with("enc_aes256_"));
    assert!(data[0].get("cvv").is_none());
}

#[tokio::test]
async fn unknown_action_is_a_json_failure() {
    let (state, _, _) = common::memory_state();
    let app = build_router(state);

    let (status, body) = call(app.clone(), Request::get("/api/index.php?action=refund").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": false, "message": "Endpoint desconhecido"}));

    let (status, body) = call(app, post_json("/api/index.php", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn storage_outage_reported_in_body_not_status() {
    let state = common::app_state(
        Arc::new(common::DownVaultStore),
        Arc::new(common::MemoryOrderStore::default()),
        None,
    );
    let app = build_router(state);

    let (status, body) = call(
        app.clone(),
        post_json(
            "/api/index.php?action=checkout",
            json!({"type": "CREDIT_CARD", "amount": 1, "card_number": "4111111111111111"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().starts_with("Erro de conexão com BD: "));

    let (status, body) = call(app, Request::get("/api/index.php?action=vault").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn failed_order_write_leaves_vault_untouched() {
    let vault = MemoryVaultStore::new();
    let state = common::app_state(Arc::new(vault.clone()), Arc::new(common::DownOrderStore), None);
    let app = build_router(state);

    let (status, body) = call(
        app,
        post_json(
            "/api/index.php?action=checkout",
            json!({"type": "CREDIT_CARD", "amount": 216.81, "card_number": "5555444433331111"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().starts_with("Erro de conexão com BD: "));
    assert_eq!(vault.len().await, 0);
}

#[tokio::test]
async fn vault_key_guards_only_the_vault_read() {
    let state = common::app_state(
        Arc::new(MemoryVaultStore::new()),
        Arc::new(common::MemoryOrderStore::default()),
        Some("s3cret".to_string()),
    );
    let app = build_router(state);

    let denied = app
        .clone()
        .oneshot(Request::get("/api/index.php?action=vault").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

    for uri in ["/api/index.php?action=%76ault", "/api/index.php?foo=1&action=vault", "/api?action=vault"] {
        let resp = app.clone().oneshot(Request::get(uri).body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }

    let wrong = Request::get("/api/index.php?action=vault")
        .header("X-Vault-Api-Key", "s3creT")
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.clone().oneshot(wrong).await.unwrap().status(), StatusCode::UNAUTHORIZED);

    let req = Request::get("/api/index.php?action=vault")
        .header("X-Vault-Api-Key", "s3cret")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(app.clone(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = call(app, post_json("/api/index.php?action=checkout", json!({"type": "PIX"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn cors_is_open_and_options_succeeds() {
    let (state, _, _) = common::memory_state();
    let app = build_router(state);

    let resp = app
        .clone()
        .oneshot(
            Request::get("/api/index.php?action=vault")
                .header("origin", "https://loja.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        resp.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );

    let resp = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/index.php?action=checkout")
                .header("origin", "https://loja.example")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn liveness_and_health() {
    let (state, _, _) = common::memory_state();
    let app = build_router(state);
    let resp = app.clone().oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let (status, body) = call(app, Request::get("/ops/liveness").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["alive"], true);
}
