use crate::domain::checkout::PaymentMethod;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Approved,
    Pending,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Approved => "approved",
            OrderStatus::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub order_uuid: String,
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
}

#[async_trait::async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert(&self, order: &NewOrder) -> Result<()>;
}

const INSERT_ORDER: &str =
    "INSERT INTO orders (order_uuid, total_cents, payment_method, status) VALUES ($1, $2, $3, $4)";

#[derive(Clone)]
pub struct OrdersRepo {
    pub pool: PgPool,
}

impl OrdersRepo {
    pub async fn insert_tx(tx: &mut Transaction<'_, Postgres>, order: &NewOrder) -> Result<()> {
        sqlx::query(INSERT_ORDER)
            .bind(&order.order_uuid)
            .bind(order.total_cents)
            .bind(order.payment_method.as_str())
            .bind(order.status.as_str())
            .execute(tx.as_mut())
            .await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl OrderStore for OrdersRepo {
    async fn insert(&self, order: &NewOrder) -> Result<()> {
        sqlx::query(INSERT_ORDER)
            .bind(&order.order_uuid)
            .bind(order.total_cents)
            .bind(order.payment_method.as_str())
            .bind(order.status.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
