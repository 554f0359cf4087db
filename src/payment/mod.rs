pub mod interval;
pub mod money;

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub use interval::PaymentInterval;
pub use money::Euro;

/// Normalized payment produced by the migration, one variant per provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Payment {
    #[serde(rename = "paypal")]
    PayPal(PayPalPayment),
    CreditCard(CreditCardPayment),
    Sofort(SofortPayment),
    DirectDebit(DirectDebitPayment),
    BankTransfer(BankTransferPayment),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    #[serde(rename = "paypal")]
    PayPal,
    CreditCard,
    Sofort,
    DirectDebit,
    BankTransfer,
}

impl PaymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::PayPal => "paypal",
            PaymentKind::CreditCard => "credit_card",
            PaymentKind::Sofort => "sofort",
            PaymentKind::DirectDebit => "direct_debit",
            PaymentKind::BankTransfer => "bank_transfer",
        }
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl Payment {
    pub fn id(&self) -> i64 {
        match self {
            Payment::PayPal(p) => p.id,
            Payment::CreditCard(p) => p.id,
            Payment::Sofort(p) => p.id,
            Payment::DirectDebit(p) => p.id,
            Payment::BankTransfer(p) => p.id,
        }
    }

    pub fn kind(&self) -> PaymentKind {
        match self {
            Payment::PayPal(_) => PaymentKind::PayPal,
            Payment::CreditCard(_) => PaymentKind::CreditCard,
            Payment::Sofort(_) => PaymentKind::Sofort,
            Payment::DirectDebit(_) => PaymentKind::DirectDebit,
            Payment::BankTransfer(_) => PaymentKind::BankTransfer,
        }
    }

    pub fn amount(&self) -> Euro {
        match self {
            Payment::PayPal(p) => p.amount,
            Payment::CreditCard(p) => p.amount,
            Payment::Sofort(p) => p.amount,
            Payment::DirectDebit(p) => p.amount,
            Payment::BankTransfer(p) => p.amount,
        }
    }

    pub fn interval(&self) -> PaymentInterval {
        match self {
            Payment::PayPal(p) => p.interval,
            Payment::CreditCard(p) => p.interval,
            // Sofort transfers are always one-off
            Payment::Sofort(_) => PaymentInterval::OneTime,
            Payment::DirectDebit(p) => p.interval,
            Payment::BankTransfer(p) => p.interval,
        }
    }

    pub fn is_booked(&self) -> bool {
        match self {
            Payment::PayPal(p) => p.booking.is_some(),
            Payment::CreditCard(p) => p.booking.is_some(),
            Payment::Sofort(p) => p.booking.is_some(),
            Payment::DirectDebit(_) | Payment::BankTransfer(_) => false,
        }
    }

    pub fn is_anonymised(&self) -> bool {
        match self {
            Payment::Sofort(p) => p.anonymised,
            Payment::DirectDebit(p) => p.anonymised,
            Payment::BankTransfer(p) => p.anonymised,
            Payment::PayPal(_) | Payment::CreditCard(_) => false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        match self {
            Payment::DirectDebit(p) => p.cancelled,
            Payment::BankTransfer(p) => p.cancelled,
            _ => false,
        }
    }

    pub fn parent_payment_id(&self) -> Option<i64> {
        match self {
            Payment::PayPal(p) => p.parent_payment_id,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayPalPayment {
    pub id: i64,
    pub amount: Euro,
    pub interval: PaymentInterval,
    pub booking: Option<PayPalBookingData>,
    pub parent_payment_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayPalBookingData {
    pub payer_id: String,
    pub payment_date: String,
    pub txn_id: Option<String>,
    pub subscr_id: Option<String>,
    pub payer_status: Option<String>,
    pub address_name: Option<String>,
    pub address_status: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub mc_gross: Option<String>,
    pub mc_currency: Option<String>,
    pub mc_fee: Option<String>,
    pub settle_amount: Option<String>,
    pub payment_type: Option<String>,
    pub payment_status: Option<String>,
}

impl PayPalBookingData {
    /// Builds booking data from renamed legacy fields. `payer_id` and
    /// `payment_date` are required.
    pub fn from_fields(mut f: BTreeMap<&'static str, String>) -> Result<Self, &'static str> {
        Ok(Self {
            payer_id: f.remove("payer_id").ok_or("payer_id")?,
            payment_date: f.remove("payment_date").ok_or("payment_date")?,
            txn_id: f.remove("txn_id"),
            subscr_id: f.remove("subscr_id"),
            payer_status: f.remove("payer_status"),
            address_name: f.remove("address_name"),
            address_status: f.remove("address_status"),
            first_name: f.remove("first_name"),
            last_name: f.remove("last_name"),
            mc_gross: f.remove("mc_gross"),
            mc_currency: f.remove("mc_currency"),
            mc_fee: f.remove("mc_fee"),
            settle_amount: f.remove("settle_amount"),
            payment_type: f.remove("payment_type"),
            payment_status: f.remove("payment_status"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCardPayment {
    pub id: i64,
    pub amount: Euro,
    pub interval: PaymentInterval,
    pub booking: Option<CreditCardBookingData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCardBookingData {
    pub transaction_id: String,
    pub customer_id: Option<String>,
    pub payment_status: Option<String>,
    pub session_id: Option<String>,
    pub auth_id: Option<String>,
    pub title: Option<String>,
    pub country: Option<String>,
    pub currency: Option<String>,
    pub amount: Option<String>,
    pub expiry_date: Option<String>,
}

impl CreditCardBookingData {
    pub fn from_fields(mut f: BTreeMap<&'static str, String>) -> Result<Self, &'static str> {
        Ok(Self {
            transaction_id: f.remove("transaction_id").ok_or("transaction_id")?,
            customer_id: f.remove("customer_id"),
            payment_status: f.remove("payment_status"),
            session_id: f.remove("session_id"),
            auth_id: f.remove("auth_id"),
            title: f.remove("title"),
            country: f.remove("country"),
            currency: f.remove("currency"),
            amount: f.remove("amount"),
            expiry_date: f.remove("expiry_date"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SofortPayment {
    pub id: i64,
    pub amount: Euro,
    pub payment_reference_code: String,
    pub anonymised: bool,
    pub booking: Option<SofortBookingData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SofortBookingData {
    pub transaction_id: Option<String>,
    pub valuation_date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectDebitPayment {
    pub id: i64,
    pub amount: Euro,
    pub interval: PaymentInterval,
    pub iban: String,
    pub bic: String,
    pub anonymised: bool,
    pub cancelled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankTransferPayment {
    pub id: i64,
    pub amount: Euro,
    pub interval: PaymentInterval,
    pub payment_reference_code: String,
    pub anonymised: bool,
    pub cancelled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paypal_booking_requires_payer_id() {
        let mut f = BTreeMap::new();
        f.insert("payment_date", "10:00:00 May 01, 2014 PDT".to_string());
        assert_eq!(PayPalBookingData::from_fields(f.clone()), Err("payer_id"));
        f.insert("payer_id", "P1".to_string());
        assert_eq!(PayPalBookingData::from_fields(f).unwrap().payer_id, "P1");
    }

    #[test]
    fn payment_round_trips_through_json_with_method_tag() {
        let p = Payment::BankTransfer(BankTransferPayment {
            id: 3,
            amount: Euro::from_cents(500),
            interval: PaymentInterval::Monthly,
            payment_reference_code: "XW-DAR-E99-X".into(),
            anonymised: false,
            cancelled: true,
        });
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["method"], "bank_transfer");
        assert_eq!(v["interval"], 1);
        let back: Payment = serde_json::from_value(v).unwrap();
        assert_eq!(back, p);
        assert!(back.is_cancelled());
        assert_eq!(back.kind(), PaymentKind::BankTransfer);
    }
}
