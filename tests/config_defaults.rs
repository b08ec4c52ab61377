use market_checkout::backend::BackendMode;
use market_checkout::config::AppConfig;

#[test]
fn defaults_are_usable_without_environment() {
    let cfg = AppConfig::from_env();
    assert!(!cfg.bind_addr.is_empty());
    assert!(cfg.api_base_url.contains("index.php") || std::env::var("API_BASE_URL").is_ok());
    if std::env::var("CHECKOUT_BACKEND").is_err() {
        assert_eq!(cfg.backend_mode, BackendMode::Simulated);
    }
    if std::env::var("PIX_CONFIRM_DELAY_MS").is_err() {
        assert_eq!(cfg.pix_confirm_delay_ms, 5000);
    }
}
