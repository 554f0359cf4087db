use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::payment::Payment;

use super::{PaymentStore, PaymentWriter};

/// Buffers payments and writes them to the store `batch_size` at a time,
/// clearing the buffer after every flush.
pub struct BatchingPaymentWriter<S> {
    store: S,
    batch_size: usize,
    pending: Vec<(i64, Payment)>,
    written: u64,
}

impl<S: PaymentStore> BatchingPaymentWriter<S> {
    pub fn new(store: S, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self { store, batch_size, pending: Vec::with_capacity(batch_size), written: 0 }
    }

    async fn flush(&mut self) -> Result<()> {
        if self.pending.is_empty() { return Ok(()); }
        let n = self.pending.len();
        let first = self.pending.first().map(|(d, _)| *d);
        self.store
            .insert_batch(&self.pending)
            .await
            .with_context(|| format!("write batch of {} payments starting at donation {:?}", n, first))?;
        self.written += n as u64;
        self.pending.clear();
        tracing::debug!(batch = n, total = self.written, "flushed payment batch");
        Ok(())
    }
}

#[async_trait]
impl<S: PaymentStore> PaymentWriter for BatchingPaymentWriter<S> {
    async fn handle_payment(&mut self, donation_id: i64, payment: Payment) -> Result<()> {
        self.pending.push((donation_id, payment));
        if self.pending.len() >= self.batch_size {
            self.flush().await?;
        }
        Ok(())
    }

    async fn flush_remaining(&mut self) -> Result<()> { self.flush().await }

    fn written(&self) -> u64 { self.written }
}
