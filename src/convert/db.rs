use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use crate::chunked::RangeQuery;
use crate::identity::{LookupError, PaymentIdLookup, PaymentLookup};
use crate::legacy::{self, LegacyDonationRow};
use crate::payment::Payment;
use crate::sink::PaymentStore;

use super::converter::DonationSource;

/// Legacy donations read through a plain `SELECT` over the source table.
/// Columns are cast to the types `LegacyDonationRow` expects so numeric
/// amounts and `date` columns load as well.
#[derive(Clone)]
pub struct PgDonationSource {
    pool: PgPool,
    base: String,
}

impl PgDonationSource {
    pub fn for_table(pool: PgPool, table: &str) -> Result<Self> {
        if !is_table_name(table) {
            bail!("source table {table:?} is not a plain (schema-qualified) table name");
        }
        let base = format!(
            "SELECT id::bigint AS id, amount::text AS amount, COALESCE(interval_months, 0)::int4 AS interval_months, \
             payment_type, transfer_code, data, status, donation_date::timestamp AS donation_date, \
             valuation_date::timestamp AS valuation_date FROM {table}"
        );
        Ok(Self { pool, base })
    }
}

#[async_trait]
impl RangeQuery for PgDonationSource {
    type Row = LegacyDonationRow;

    fn is_read_only(&self) -> bool {
        let head = self.base.trim_start().to_ascii_uppercase();
        (head.starts_with("SELECT") || head.starts_with("WITH")) && !self.base.contains(';')
    }

    async fn fetch_range(&self, field: &str, after: i64, up_to: i64) -> Result<Vec<LegacyDonationRow>> {
        let sql = format!("SELECT * FROM ({}) AS q WHERE q.{field} > $1 AND q.{field} <= $2 ORDER BY q.{field}", self.base);
        let rows = sqlx::query_as::<_, LegacyDonationRow>(&sql)
            .bind(after)
            .bind(up_to)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("fetch donations in ({after}, {up_to}]"))?;
        Ok(rows)
    }
}

#[async_trait]
impl DonationSource for PgDonationSource {
    async fn max_donation_id(&self) -> Result<i64> {
        let sql = format!("SELECT COALESCE(MAX(q.id), 0)::bigint FROM ({}) AS q", self.base);
        let max: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(max)
    }

    async fn unconverted_donation_ids(&self, after: i64, up_to: i64, limit: i64) -> Result<Vec<i64>> {
        let sql = format!(
            "SELECT q.id FROM ({}) AS q \
             LEFT JOIN donation_payment dp ON dp.donation_id = q.id \
             WHERE q.id > $1 AND q.id <= $2 AND dp.donation_id IS NULL AND q.payment_type <> $3 \
             ORDER BY q.id LIMIT $4",
            self.base
        );
        let ids: Vec<i64> = sqlx::query_scalar(&sql)
            .bind(after)
            .bind(up_to)
            .bind(legacy::TYPE_MANUALLY_BOOKED)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }
}

/// `payment` and `donation_payment` tables created by `donmig init`.
#[derive(Clone)]
pub struct PgPaymentStore {
    pool: PgPool,
}

impl PgPaymentStore {
    pub fn new(pool: PgPool) -> Self { Self { pool } }

    /// First id after the highest stored payment id.
    pub async fn next_payment_id(&self) -> Result<i64> {
        let next: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(id), 0)::bigint + 1 FROM payment")
            .fetch_one(&self.pool)
            .await?;
        Ok(next)
    }
}

#[async_trait]
impl PaymentStore for PgPaymentStore {
    async fn insert_batch(&self, batch: &[(i64, Payment)]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for (donation_id, payment) in batch {
            let details = serde_json::to_value(payment)?;
            sqlx::query(
                r#"
                INSERT INTO payment
                    (id, method, amount_cents, interval_months, parent_payment_id, anonymised, cancelled, booked, details)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(payment.id())
            .bind(payment.kind().as_str())
            .bind(payment.amount().cents())
            .bind(payment.interval().months())
            .bind(payment.parent_payment_id())
            .bind(payment.is_anonymised())
            .bind(payment.is_cancelled())
            .bind(payment.is_booked())
            .bind(details)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("insert payment {}", payment.id()))?;

            sqlx::query("INSERT INTO donation_payment (donation_id, payment_id) VALUES ($1, $2)")
                .bind(*donation_id)
                .bind(payment.id())
                .execute(&mut *tx)
                .await
                .with_context(|| format!("map donation {donation_id} to payment {}", payment.id()))?;
        }
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl PaymentIdLookup for PgPaymentStore {
    async fn payment_id_for_donation(&self, donation_id: i64) -> Result<Option<i64>> {
        let id: Option<i64> = sqlx::query_scalar("SELECT payment_id FROM donation_payment WHERE donation_id = $1")
            .bind(donation_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }
}

#[async_trait]
impl PaymentLookup for PgPaymentStore {
    async fn payment_by_id(&self, payment_id: i64) -> Result<Payment, LookupError> {
        let details: Option<serde_json::Value> = sqlx::query_scalar("SELECT details FROM payment WHERE id = $1")
            .bind(payment_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(anyhow::Error::from)?;
        let details = details.ok_or(LookupError::PaymentNotFound(payment_id))?;
        serde_json::from_value(details)
            .with_context(|| format!("decode stored payment {payment_id}"))
            .map_err(LookupError::Backend)
    }
}

fn is_table_name(s: &str) -> bool {
    let parts: Vec<&str> = s.split('.').collect();
    parts.len() <= 2
        && parts.iter().all(|p| {
            let mut chars = p.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}
