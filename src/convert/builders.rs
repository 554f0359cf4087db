use chrono::NaiveDateTime;

use crate::legacy::fields::{self, CREDIT_CARD_KEYS, DIRECT_DEBIT_KEYS, PAYPAL_KEYS, SOFORT_KEYS};
use crate::legacy::{self, LegacyBlob, LegacyDonationRow};
use crate::payment::{
    BankTransferPayment, CreditCardBookingData, CreditCardPayment, DirectDebitPayment, Euro, PayPalBookingData,
    PayPalPayment, Payment, PaymentInterval, PaymentKind, SofortBookingData, SofortPayment,
};
use crate::report::Category;

use super::categories;
use super::error::ConversionError;
use super::heuristics::{self, ReferenceCode};

/// Payment kind for a legacy type code. `MBK` is not a payment and must be
/// filtered out before calling this.
pub fn payment_kind(code: &str) -> Result<PaymentKind, ConversionError> {
    match code {
        legacy::TYPE_PAYPAL => Ok(PaymentKind::PayPal),
        legacy::TYPE_CREDIT_CARD => Ok(PaymentKind::CreditCard),
        legacy::TYPE_SOFORT => Ok(PaymentKind::Sofort),
        legacy::TYPE_DIRECT_DEBIT => Ok(PaymentKind::DirectDebit),
        legacy::TYPE_BANK_TRANSFER => Ok(PaymentKind::BankTransfer),
        other => Err(ConversionError::UnknownPaymentType(other.to_string())),
    }
}

/// Builds one payment from one legacy row and collects the warnings raised
/// while repairing it. Warnings stay valid even when the build fails.
pub struct PaymentDraft<'r> {
    row: &'r LegacyDonationRow,
    blob: &'r LegacyBlob,
    warnings: Vec<Category>,
}

impl<'r> PaymentDraft<'r> {
    pub fn new(row: &'r LegacyDonationRow, blob: &'r LegacyBlob) -> Self {
        Self { row, blob, warnings: Vec::new() }
    }

    pub fn warn(&mut self, category: Category) { self.warnings.push(category); }

    pub fn into_warnings(self) -> Vec<Category> { self.warnings }

    pub fn build(&mut self, kind: PaymentKind, id: i64, parent_payment_id: Option<i64>) -> Result<Payment, ConversionError> {
        match kind {
            PaymentKind::PayPal => self.paypal(id, parent_payment_id),
            PaymentKind::CreditCard => self.credit_card(id),
            PaymentKind::Sofort => self.sofort(id),
            PaymentKind::DirectDebit => self.direct_debit(id),
            PaymentKind::BankTransfer => self.bank_transfer(id),
        }
    }

    fn amount(&mut self) -> Result<Euro, ConversionError> {
        match self.row.amount.as_deref().map(str::trim) {
            None | Some("") => {
                self.warn(categories::EMPTY_AMOUNT);
                Ok(Euro::ZERO)
            }
            Some(text) => Euro::parse_decimal(text).map_err(ConversionError::InvalidAmount),
        }
    }

    fn interval(&self) -> Result<PaymentInterval, ConversionError> {
        PaymentInterval::try_from(self.row.interval_months)
            .map_err(|_| ConversionError::InvalidInterval(self.row.interval_months))
    }

    fn bookable(&self) -> bool { legacy::is_bookable_status(&self.row.status) }

    fn cancelled(&self) -> bool { self.row.status == legacy::STATUS_CANCELLED }

    fn reference_code(&mut self) -> ReferenceCode {
        let code = heuristics::reference_code(self.row.transfer_code.as_deref());
        if code.replaced {
            self.warn(categories::LEGACY_TRANSFER_CODE);
        }
        code
    }

    fn paypal(&mut self, id: i64, parent_payment_id: Option<i64>) -> Result<Payment, ConversionError> {
        let amount = self.amount()?;
        let interval = self.interval()?;
        let booking = if self.bookable() {
            let mut f = fields::remap(self.blob, PAYPAL_KEYS);
            if !f.contains_key("payer_id") && heuristics::in_error_period(self.row) {
                f.insert("payer_id", heuristics::PAYPAL_PLACEHOLDER_PAYER_ID.to_string());
                self.warn(categories::PAYPAL_ERROR_PERIOD_PAYER_ID);
            }
            let date = self.paypal_payment_date(f.remove("payment_date"));
            f.insert("payment_date", date);
            let data = PayPalBookingData::from_fields(f)
                .map_err(|field| ConversionError::MissingBookingField { provider: PaymentKind::PayPal, field })?;
            Some(data)
        } else {
            None
        };
        Ok(Payment::PayPal(PayPalPayment { id, amount, interval, booking, parent_payment_id }))
    }

    fn paypal_payment_date(&mut self, existing: Option<String>) -> String {
        let from_donation_date = |dt: NaiveDateTime| heuristics::format_paypal_date(dt, heuristics::PAYPAL_DATE_DEFAULT_ZONE);
        match existing {
            None => match heuristics::booked_timestamp_from_log(self.blob) {
                Some(ts) => {
                    self.warn(categories::PAYPAL_DATE_RESTORED_FROM_LOG);
                    heuristics::reformat_paypal_date(&ts).unwrap_or(ts)
                }
                None => {
                    self.warn(categories::PAYPAL_DATE_ASSUMED_DONATION_DATE);
                    from_donation_date(self.row.donation_date)
                }
            },
            Some(date) if heuristics::is_strict_paypal_date(&date) => date,
            Some(date) => match heuristics::reformat_paypal_date(&date) {
                Some(fixed) => {
                    self.warn(categories::PAYPAL_DATE_REFORMATTED);
                    fixed
                }
                None => {
                    self.warn(categories::PAYPAL_DATE_FROM_DONATION_DATE);
                    from_donation_date(self.row.donation_date)
                }
            },
        }
    }

    fn credit_card(&mut self, id: i64) -> Result<Payment, ConversionError> {
        let amount = self.amount()?;
        let interval = self.interval()?;
        let booking = if self.bookable() {
            let mut f = fields::remap(self.blob, CREDIT_CARD_KEYS);
            if !f.contains_key("transaction_id") && heuristics::in_error_period(self.row) {
                f.insert("transaction_id", heuristics::CREDIT_CARD_PLACEHOLDER_TRANSACTION_ID.to_string());
                self.warn(categories::CREDIT_CARD_ERROR_PERIOD_TRANSACTION_ID);
            }
            let data = CreditCardBookingData::from_fields(f)
                .map_err(|field| ConversionError::MissingBookingField { provider: PaymentKind::CreditCard, field })?;
            Some(data)
        } else {
            None
        };
        Ok(Payment::CreditCard(CreditCardPayment { id, amount, interval, booking }))
    }

    fn sofort(&mut self, id: i64) -> Result<Payment, ConversionError> {
        let amount = self.amount()?;
        if self.row.interval_months != 0 {
            self.warn(categories::SOFORT_RECURRING_INTERVAL);
        }
        let code = self.reference_code();
        let booking = if self.bookable() {
            let mut f = fields::remap(self.blob, SOFORT_KEYS);
            let valuation_date = match self.row.valuation_date {
                Some(d) => d,
                None => {
                    self.warn(categories::SOFORT_VALUATION_DATE_MISSING);
                    self.row.donation_date
                }
            };
            Some(SofortBookingData { transaction_id: f.remove("transaction_id"), valuation_date })
        } else {
            None
        };
        Ok(Payment::Sofort(SofortPayment {
            id,
            amount,
            anonymised: code.is_anonymous(),
            payment_reference_code: code.code,
            booking,
        }))
    }

    fn direct_debit(&mut self, id: i64) -> Result<Payment, ConversionError> {
        let amount = self.amount()?;
        let interval = self.interval()?;
        let mut f = fields::remap(self.blob, DIRECT_DEBIT_KEYS);
        let (iban, bic, anonymised) = match (f.remove("iban"), f.remove("bic")) {
            (Some(iban), Some(bic)) => (iban, bic, false),
            _ => (heuristics::DUMMY_IBAN.to_string(), heuristics::DUMMY_BIC.to_string(), true),
        };
        Ok(Payment::DirectDebit(DirectDebitPayment { id, amount, interval, iban, bic, anonymised, cancelled: self.cancelled() }))
    }

    fn bank_transfer(&mut self, id: i64) -> Result<Payment, ConversionError> {
        let amount = self.amount()?;
        let interval = self.interval()?;
        let code = self.reference_code();
        Ok(Payment::BankTransfer(BankTransferPayment {
            id,
            amount,
            interval,
            anonymised: code.is_anonymous(),
            payment_reference_code: code.code,
            cancelled: self.cancelled(),
        }))
    }
}
