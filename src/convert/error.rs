use thiserror::Error;

use crate::payment::money::AmountError;
use crate::payment::PaymentKind;
use crate::report::Category;

/// Why a single donation row could not become a payment. The message is the
/// report category, so it must not contain per-row values other than the
/// ones that define a category (like an unknown type code).
#[derive(Debug, Error, PartialEq)]
pub enum ConversionError {
    #[error("unknown payment type {0:?}")]
    UnknownPaymentType(String),
    #[error("invalid amount")]
    InvalidAmount(#[source] AmountError),
    #[error("invalid payment interval {0}")]
    InvalidInterval(i32),
    #[error("{provider} booking data is missing {field}")]
    MissingBookingField { provider: PaymentKind, field: &'static str },
    #[error("paypal parent payment is a {0} payment")]
    ParentTypeMismatch(PaymentKind),
}

impl ConversionError {
    pub fn category(&self) -> Category { Category::new(self.to_string()) }
}
