use crate::domain::vault::{NewVaultEntry, VaultEntry};
use anyhow::Result;
use sqlx::{PgPool, Postgres, Row, Transaction};

#[derive(Clone)]
pub struct VaultRepo {
    pub pool: PgPool,
}

impl VaultRepo {
    pub async fn insert_tx(tx: &mut Transaction<'_, Postgres>, entry: NewVaultEntry) -> Result<VaultEntry> {
        let row = sqlx::query(
            r#"
            INSERT INTO vault (customer_email, cc_last4, cc_hash, brand)
            VALUES ($1, $2, $3, $4)
            RETURNING id::text AS id, created_at
            "#,
        )
        .bind(&entry.customer_email)
        .bind(&entry.cc_last4)
        .bind(&entry.cc_hash)
        .bind(&entry.brand)
        .fetch_one(tx.as_mut())
        .await?;

        Ok(VaultEntry {
            id: row.get("id"),
            customer_email: entry.customer_email,
            cc_last4: entry.cc_last4,
            cc_hash: entry.cc_hash,
            brand: entry.brand,
            created_at: row.get("created_at"),
        })
    }

    pub async fn list_newest_first(&self) -> Result<Vec<VaultEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id::text AS id, customer_email, cc_last4, cc_hash, brand, created_at
            FROM vault
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| VaultEntry {
                id: r.get("id"),
                customer_email: r.get("customer_email"),
                cc_last4: r.get("cc_last4"),
                cc_hash: r.get("cc_hash"),
                brand: r.get("brand"),
                created_at: r.get("created_at"),
            })
            .collect())
    }
}
