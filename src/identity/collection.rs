use indexmap::IndexMap;

use crate::payment::PaymentKind;

/// Payment minted in the current run for one donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintedPayment {
    pub payment_id: i64,
    pub kind: PaymentKind,
}

/// Donation id -> payment minted in the current run, kept in insertion
/// order. The kind is kept so follow-ups can be checked against payments
/// that are not written yet.
#[derive(Debug, Clone, Default)]
pub struct DonationPaymentIdCollection {
    ids: IndexMap<i64, MintedPayment>,
}

impl DonationPaymentIdCollection {
    pub fn new() -> Self { Self::default() }

    pub fn add(&mut self, donation_id: i64, payment_id: i64, kind: PaymentKind) {
        self.ids.insert(donation_id, MintedPayment { payment_id, kind });
    }

    pub fn get(&self, donation_id: i64) -> Option<i64> { self.ids.get(&donation_id).map(|m| m.payment_id) }

    pub fn minted(&self, donation_id: i64) -> Option<MintedPayment> { self.ids.get(&donation_id).copied() }

    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ { self.ids.iter().map(|(d, m)| (*d, m.payment_id)) }

    pub fn len(&self) -> usize { self.ids.len() }

    pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    pub fn clear(&mut self) { self.ids.clear(); }
}
