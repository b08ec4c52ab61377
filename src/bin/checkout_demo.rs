use anyhow::{bail, Result};
use market_checkout::backend::build_backend;
use market_checkout::checkout::session::CheckoutSession;
use market_checkout::config::AppConfig;
use market_checkout::domain::checkout::{CardData, CheckoutStep, PaymentMethod};
use market_checkout::domain::product::demo_catalog;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Walks one checkout through the configured backend:
/// `checkout_demo <cep> pix` or `checkout_demo <cep> card <number> <cvv> [holder] [expiry]`.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (cep, method) = match (args.first(), args.get(1).map(String::as_str)) {
        (Some(cep), Some("pix")) => (cep.clone(), PaymentMethod::Pix),
        (Some(cep), Some("card")) => (cep.clone(), PaymentMethod::CreditCard),
        _ => bail!("usage: checkout_demo <cep> pix|card [number cvv holder expiry]"),
    };

    let cfg = AppConfig::from_env();
    let delay = Duration::from_millis(cfg.pix_confirm_delay_ms);
    let session = CheckoutSession::new(build_backend(&cfg), delay);

    let Some(product) = demo_catalog().into_iter().next() else {
        bail!("demo catalog is empty");
    };
    session.open(product).await;
    session.set_cep(&cep).await;
    session.commit_cep().await;
    session.set_payment_method(method).await;
    if method == PaymentMethod::CreditCard {
        session
            .set_card_data(CardData {
                number: args.get(2).cloned().unwrap_or_default(),
                cvv: args.get(3).cloned().unwrap_or_default(),
                holder: args.get(4).cloned().unwrap_or_else(|| "CLIENTE DEMO".to_string()),
                expiry: args.get(5).cloned().unwrap_or_else(|| "12/30".to_string()),
            })
            .await;
    }

    let view = session.view().await;
    tracing::info!("total {} (shipping {:?})", view.total_label, view.shipping_label);

    let outcome = session.pay().await;
    tracing::info!("pay outcome: {:?}", outcome);

    if method == PaymentMethod::Pix && session.state().await.step == CheckoutStep::Payment {
        if let Some(code) = session.view().await.pix_code {
            tracing::info!("pix code: {}", code);
        }
        tokio::time::sleep(delay + Duration::from_millis(100)).await;
    }

    let state = session.state().await;
    match (state.step, state.order_id, session.error().await) {
        (CheckoutStep::Success, Some(order_id), _) => tracing::info!("order {} confirmed", order_id),
        (_, _, Some(error)) => tracing::warn!("checkout failed: {}", error),
        (step, _, None) => tracing::warn!("checkout ended at {:?}", step),
    }
    session.close().await;
    Ok(())
}
