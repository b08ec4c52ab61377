pub mod backend;
pub mod checkout {
    pub mod session;
    pub mod view;
}
pub mod config;
pub mod domain {
    pub mod checkout;
    pub mod money;
    pub mod product;
    pub mod vault;
    pub mod wire;
}
pub mod http {
    pub mod handlers {
        pub mod api;
        pub mod ops;
    }
    pub mod middleware {
        pub mod vault_auth;
    }
    pub mod routes;
}
pub mod repo {
    pub mod checkout_ledger;
    pub mod orders_repo;
    pub mod vault_repo;
}
pub mod service {
    pub mod checkout_service;
}
pub mod vault;

#[derive(Clone)]
pub struct AppState {
    pub checkout_service: service::checkout_service::CheckoutService,
    pub pool: sqlx::PgPool,
    pub vault_api_key: Option<String>,
}
