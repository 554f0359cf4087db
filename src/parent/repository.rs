use async_trait::async_trait;

use crate::identity::{DonationPaymentIdCollection, LookupError, PaymentIdFinder, PaymentIdLookup, PaymentLookup};
use crate::legacy::LegacyBlob;
use crate::payment::{Payment, PaymentKind};

use super::{parent_donation_id, ParentLookup, PaypalParentFinder};

/// Resolves the parent through the donation -> payment mapping and checks it
/// is a PayPal payment. Parents minted in the current run are checked by
/// their recorded kind since they may not be written yet; persisted parents
/// are loaded from the store.
pub struct RepositoryPaypalParentFinder<I, P> {
    ids: PaymentIdFinder<I>,
    payments: P,
}

impl<I: PaymentIdLookup, P: PaymentLookup> RepositoryPaypalParentFinder<I, P> {
    pub fn new(ids: I, payments: P) -> Self {
        Self { ids: PaymentIdFinder::new(ids), payments }
    }
}

#[async_trait]
impl<I: PaymentIdLookup, P: PaymentLookup> PaypalParentFinder for RepositoryPaypalParentFinder<I, P> {
    async fn find_parent(
        &self,
        blob: &LegacyBlob,
        in_run: &DonationPaymentIdCollection,
    ) -> anyhow::Result<ParentLookup> {
        let Some(parent_donation_id) = parent_donation_id(blob) else { return Ok(ParentLookup::NoParent) };

        if let Some(minted) = in_run.minted(parent_donation_id) {
            return Ok(match minted.kind {
                PaymentKind::PayPal => ParentLookup::Found { payment_id: minted.payment_id },
                kind => ParentLookup::NotPayPal { parent_donation_id, payment_id: minted.payment_id, kind },
            });
        }

        let payment_id = match self.ids.find_payment_id(in_run, parent_donation_id).await {
            Ok(id) => id,
            Err(LookupError::Backend(e)) => return Err(e),
            Err(e) => return Ok(ParentLookup::Unresolved { parent_donation_id, reason: e.to_string() }),
        };

        match self.payments.payment_by_id(payment_id).await {
            Ok(Payment::PayPal(_)) => Ok(ParentLookup::Found { payment_id }),
            Ok(other) => Ok(ParentLookup::NotPayPal { parent_donation_id, payment_id, kind: other.kind() }),
            Err(LookupError::Backend(e)) => Err(e),
            Err(e) => Ok(ParentLookup::Unresolved { parent_donation_id, reason: e.to_string() }),
        }
    }
}
