pub mod repository;

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use crate::identity::DonationPaymentIdCollection;
use crate::legacy::LegacyBlob;
use crate::payment::PaymentKind;

pub use repository::RepositoryPaypalParentFinder;

/// Outcome of looking for the parent of a PayPal follow-up notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentLookup {
    /// The log names no parent donation.
    NoParent,
    Found { payment_id: i64 },
    /// Named parent donation has no (loadable) payment.
    Unresolved { parent_donation_id: i64, reason: String },
    /// Parent payment exists but is not a PayPal payment.
    NotPayPal { parent_donation_id: i64, payment_id: i64, kind: PaymentKind },
}

#[async_trait]
pub trait PaypalParentFinder: Send + Sync {
    async fn find_parent(
        &self,
        blob: &LegacyBlob,
        in_run: &DonationPaymentIdCollection,
    ) -> anyhow::Result<ParentLookup>;
}

/// Finder for runs that do not link follow-ups.
#[derive(Debug, Default)]
pub struct NullPaypalParentFinder;

#[async_trait]
impl PaypalParentFinder for NullPaypalParentFinder {
    async fn find_parent(&self, _blob: &LegacyBlob, _in_run: &DonationPaymentIdCollection) -> anyhow::Result<ParentLookup> {
        Ok(ParentLookup::NoParent)
    }
}

/// Parent donation id referenced by the PayPal notification handler in the
/// donation's log.
pub fn parent_donation_id(blob: &LegacyBlob) -> Option<i64> {
    static PARENT_RE: OnceLock<Regex> = OnceLock::new();
    let re = PARENT_RE.get_or_init(|| {
        Regex::new(r"^paypal_handler: new transaction id to corresponding parent donation: (\d+)$")
            .expect("parent donation pattern")
    });
    blob.log_entries()
        .find_map(|(_, msg)| re.captures(msg.trim()).and_then(|c| c[1].parse().ok()))
}
