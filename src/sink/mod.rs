pub mod batching;

use anyhow::Result;
use async_trait::async_trait;

use crate::payment::Payment;

pub use batching::BatchingPaymentWriter;

/// Receives finished payments. `flush_remaining` is called exactly once
/// after the last row so nothing buffered is lost.
#[async_trait]
pub trait PaymentWriter: Send {
    async fn handle_payment(&mut self, donation_id: i64, payment: Payment) -> Result<()>;
    async fn flush_remaining(&mut self) -> Result<()>;
    fn written(&self) -> u64;
}

/// Durable storage for payments and the donation -> payment mapping.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn insert_batch(&self, batch: &[(i64, Payment)]) -> Result<()>;
}

/// Counts payments and discards them; used for dry runs.
#[derive(Debug, Default)]
pub struct NullPaymentWriter {
    seen: u64,
}

#[async_trait]
impl PaymentWriter for NullPaymentWriter {
    async fn handle_payment(&mut self, _donation_id: i64, _payment: Payment) -> Result<()> {
        self.seen += 1;
        Ok(())
    }

    async fn flush_remaining(&mut self) -> Result<()> { Ok(()) }

    fn written(&self) -> u64 { self.seen }
}
