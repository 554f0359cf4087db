use std::collections::BTreeMap;

use super::blob::LegacyBlob;

/// Legacy blob key -> booking field name.
pub type KeyMap = &'static [(&'static str, &'static str)];

pub const PAYPAL_KEYS: KeyMap = &[
    ("paypal_payer_id", "payer_id"),
    ("paypal_subscr_id", "subscr_id"),
    ("paypal_payer_status", "payer_status"),
    ("paypal_address_name", "address_name"),
    ("paypal_address_status", "address_status"),
    ("paypal_first_name", "first_name"),
    ("paypal_last_name", "last_name"),
    ("paypal_mc_gross", "mc_gross"),
    ("paypal_mc_currency", "mc_currency"),
    ("paypal_mc_fee", "mc_fee"),
    ("paypal_settle_amount", "settle_amount"),
    ("ext_payment_id", "txn_id"),
    ("ext_payment_type", "payment_type"),
    ("ext_payment_status", "payment_status"),
    ("ext_payment_timestamp", "payment_date"),
];

pub const CREDIT_CARD_KEYS: KeyMap = &[
    ("ext_payment_id", "transaction_id"),
    ("ext_payment_account", "customer_id"),
    ("ext_payment_status", "payment_status"),
    ("mcp_sessionid", "session_id"),
    ("mcp_auth", "auth_id"),
    ("mcp_title", "title"),
    ("mcp_country", "country"),
    ("mcp_currency", "currency"),
    ("mcp_amount", "amount"),
    ("mcp_cc_expiry_date", "expiry_date"),
];

pub const SOFORT_KEYS: KeyMap = &[
    ("ext_payment_id", "transaction_id"),
];

pub const DIRECT_DEBIT_KEYS: KeyMap = &[
    ("iban", "iban"),
    ("bic", "bic"),
];

/// Booking fields renamed through `table`. Keys absent or empty in the blob
/// are left out.
pub fn remap(blob: &LegacyBlob, table: KeyMap) -> BTreeMap<&'static str, String> {
    table
        .iter()
        .filter_map(|(legacy, new)| blob.text(legacy).map(|v| (*new, v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::blob::{encode, BlobValue};
    use indexmap::IndexMap;

    fn blob(pairs: &[(&str, &str)]) -> LegacyBlob {
        let fields: IndexMap<String, BlobValue> =
            pairs.iter().map(|(k, v)| (k.to_string(), BlobValue::Str(v.to_string()))).collect();
        LegacyBlob::decode(Some(&encode(&fields)))
    }

    #[test]
    fn paypal_keys_are_renamed() {
        let b = blob(&[("paypal_payer_id", "P1"), ("ext_payment_id", "TX9"), ("unrelated", "x")]);
        let fields = remap(&b, PAYPAL_KEYS);
        assert_eq!(fields.get("payer_id").map(String::as_str), Some("P1"));
        assert_eq!(fields.get("txn_id").map(String::as_str), Some("TX9"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn same_legacy_key_maps_per_provider() {
        let b = blob(&[("ext_payment_id", "ID")]);
        assert!(remap(&b, CREDIT_CARD_KEYS).contains_key("transaction_id"));
        assert!(remap(&b, PAYPAL_KEYS).contains_key("txn_id"));
    }

    #[test]
    fn empty_values_are_dropped() {
        let b = blob(&[("iban", ""), ("bic", "BFSWDE33BER")]);
        let fields = remap(&b, DIRECT_DEBIT_KEYS);
        assert!(!fields.contains_key("iban"));
        assert!(fields.contains_key("bic"));
    }
}
