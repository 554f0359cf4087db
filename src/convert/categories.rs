//! Report categories recorded by the converter. Error categories for
//! rejected rows carry the error's message instead and are built from
//! `ConversionError`.

use crate::report::Category;

pub const MANUALLY_BOOKED: Category = Category::from_static("manually booked donation, no payment created");
pub const EMPTY_AMOUNT: Category = Category::from_static("converted empty amount to 0");

pub const PAYPAL_ERROR_PERIOD_PAYER_ID: Category =
    Category::from_static("paypal payer id missing in 2015 error period, using placeholder");
pub const CREDIT_CARD_ERROR_PERIOD_TRANSACTION_ID: Category =
    Category::from_static("credit card transaction id missing in 2015 error period, using placeholder");

pub const PAYPAL_DATE_RESTORED_FROM_LOG: Category =
    Category::from_static("paypal payment date missing, restored from log");
pub const PAYPAL_DATE_ASSUMED_DONATION_DATE: Category =
    Category::from_static("paypal payment date missing, assumed donation date");
pub const PAYPAL_DATE_REFORMATTED: Category =
    Category::from_static("paypal payment date malformed, reformatted existing date");
pub const PAYPAL_DATE_FROM_DONATION_DATE: Category =
    Category::from_static("paypal payment date malformed, created from donation date");
pub const PAYPAL_PARENT_NOT_FOUND: Category =
    Category::from_static("paypal parent payment not found, converted without parent");

pub const SOFORT_RECURRING_INTERVAL: Category =
    Category::from_static("sofort payment had recurring interval, set to one-time");
pub const SOFORT_VALUATION_DATE_MISSING: Category =
    Category::from_static("sofort valuation date missing, using donation date");

pub const LEGACY_TRANSFER_CODE: Category =
    Category::from_static("legacy transfer code pattern, replaced with anonymous code");
