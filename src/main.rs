use market_checkout::config::AppConfig;
use market_checkout::http::routes::build_router;
use market_checkout::repo::checkout_ledger::PgCheckoutLedger;
use market_checkout::service::checkout_service::CheckoutService;
use market_checkout::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    // Lazy pool: a database outage is reported per request as a JSON body.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(std::time::Duration::from_secs(3))
        .connect_lazy(&cfg.database_url)?;

    if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
        tracing::warn!("migrations not applied: {}", e);
    }

    let checkout_service = CheckoutService {
        ledger: Arc::new(PgCheckoutLedger { pool: pool.clone() }),
        customer_email: cfg.customer_email.clone(),
        brand: cfg.card_brand.clone(),
    };

    if cfg.vault_api_key.is_none() {
        tracing::warn!("VAULT_API_KEY not set, vault endpoint is publicly readable");
    }

    let state = AppState {
        checkout_service,
        pool,
        vault_api_key: cfg.vault_api_key.clone(),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
