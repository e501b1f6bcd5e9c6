use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    Money, OrderNumber, OrderStoreError, PurchaseRecord, Result,
    store::OrderStore,
};

/// PostgreSQL-backed order store implementation.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_record(row: PgRow) -> Result<PurchaseRecord> {
        let raw_number: i64 = row.try_get("order_number")?;
        let order_number = u64::try_from(raw_number)
            .ok()
            .and_then(OrderNumber::new)
            .ok_or_else(|| {
                OrderStoreError::InvalidRecord(format!("order_number {raw_number} is not positive"))
            })?;

        let raw_quantity: i64 = row.try_get("quantity")?;
        let quantity = u32::try_from(raw_quantity).map_err(|_| {
            OrderStoreError::InvalidRecord(format!(
                "quantity {raw_quantity} out of range for order {order_number}"
            ))
        })?;

        Ok(PurchaseRecord {
            order_number,
            buyer_name: row.try_get("buyer_name")?,
            event_name: row.try_get("event_name")?,
            unit_price: Money::from_cents(row.try_get("unit_price_cents")?),
            quantity,
            purchased_at: row.try_get::<DateTime<Utc>, _>("purchased_at")?,
            artifact_path: row.try_get("artifact_path")?,
        })
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchases")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn next_order_number(&self) -> Result<OrderNumber> {
        let highest: Option<i64> = sqlx::query_scalar("SELECT MAX(order_number) FROM purchases")
            .fetch_one(&self.pool)
            .await?;

        match highest {
            Some(n) => u64::try_from(n)
                .ok()
                .and_then(OrderNumber::new)
                .map(|n| n.next())
                .ok_or_else(|| {
                    OrderStoreError::InvalidRecord(format!("order_number {n} is not positive"))
                }),
            None => Ok(OrderNumber::FIRST),
        }
    }

    #[tracing::instrument(skip(self, record), fields(order_number = %record.order_number))]
    async fn create(&self, record: PurchaseRecord) -> Result<PurchaseRecord> {
        let order_number = record.order_number;

        sqlx::query(
            r#"
            INSERT INTO purchases (order_number, buyer_name, event_name, unit_price_cents, quantity, purchased_at, artifact_path)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(order_number.as_i64())
        .bind(&record.buyer_name)
        .bind(&record.event_name)
        .bind(record.unit_price.cents())
        .bind(i64::from(record.quantity))
        .bind(record.purchased_at)
        .bind(&record.artifact_path)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // Primary key violation means another writer took this number first
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
                && db_err.constraint() == Some("purchases_pkey")
            {
                return OrderStoreError::DuplicateOrder(order_number);
            }
            OrderStoreError::Database(e)
        })?;

        Ok(record)
    }

    async fn list_descending_by_order(&self) -> Result<Vec<PurchaseRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT order_number, buyer_name, event_name, unit_price_cents, quantity, purchased_at, artifact_path
            FROM purchases
            ORDER BY order_number DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_record).collect()
    }

    async fn find_by_order_number(
        &self,
        order_number: OrderNumber,
    ) -> Result<Option<PurchaseRecord>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT order_number, buyer_name, event_name, unit_price_cents, quantity, purchased_at, artifact_path
            FROM purchases
            WHERE order_number = $1
            "#,
        )
        .bind(order_number.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_record).transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn delete_by_order_number(
        &self,
        order_number: OrderNumber,
    ) -> Result<Option<PurchaseRecord>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            DELETE FROM purchases
            WHERE order_number = $1
            RETURNING order_number, buyer_name, event_name, unit_price_cents, quantity, purchased_at, artifact_path
            "#,
        )
        .bind(order_number.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_record).transpose()
    }
}
