pub mod collection;
pub mod generator;

use async_trait::async_trait;
use thiserror::Error;

use crate::payment::Payment;

pub use collection::{DonationPaymentIdCollection, MintedPayment};
pub use generator::{IdGenerator, NullIdGenerator, OneTimeIdGenerator, SequentialIdGenerator};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no payment found for donation {0}")]
    PaymentIdNotFound(i64),
    #[error("payment {0} not found")]
    PaymentNotFound(i64),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Persisted donation -> payment id mapping.
#[async_trait]
pub trait PaymentIdLookup: Send + Sync {
    async fn payment_id_for_donation(&self, donation_id: i64) -> anyhow::Result<Option<i64>>;
}

/// Persisted payments.
#[async_trait]
pub trait PaymentLookup: Send + Sync {
    async fn payment_by_id(&self, payment_id: i64) -> Result<Payment, LookupError>;
}

/// Resolves the payment id of a donation, preferring ids minted earlier in
/// the current run (not yet durable) over the persisted mapping.
pub struct PaymentIdFinder<L> {
    persisted: L,
}

impl<L: PaymentIdLookup> PaymentIdFinder<L> {
    pub fn new(persisted: L) -> Self { Self { persisted } }

    pub async fn find_payment_id(
        &self,
        in_run: &DonationPaymentIdCollection,
        donation_id: i64,
    ) -> Result<i64, LookupError> {
        if let Some(id) = in_run.get(donation_id) {
            return Ok(id);
        }
        self.persisted
            .payment_id_for_donation(donation_id)
            .await?
            .ok_or(LookupError::PaymentIdNotFound(donation_id))
    }
}
