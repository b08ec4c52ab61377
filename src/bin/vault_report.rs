use anyhow::Result;
use market_checkout::backend::{build_backend, BackendMode};
use market_checkout::config::AppConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = AppConfig::from_env();
    let backend = build_backend(&cfg);

    let entries = backend.get_vault_data().await?;
    let mode = match backend.mode() {
        BackendMode::Live => "live",
        BackendMode::Simulated => "simulated",
    };
    tracing::info!("vault mode={} entries={}", mode, entries.len());

    for e in entries {
        tracing::info!(
            "id={} email={} last4={} brand={} hash={} created_at={}",
            e.id,
            e.customer_email,
            e.cc_last4,
            e.brand,
            e.cc_hash,
            e.created_at.to_rfc3339()
        );
    }
    Ok(())
}
