//! Repairs for known corruption in historical donation data. The constants
//! here mirror what finance and the admins agreed on when the legacy data was
//! audited; changing them changes migrated payments.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::legacy::{LegacyBlob, LegacyDonationRow};

/// Donations the admins confirmed as paid even though the provider ids were
/// never stored.
pub const ADMIN_ALLOW_LIST: &[i64] = &[
    1_658_237, 1_659_504, 1_663_095, 1_669_828, 1_672_454, 1_674_166, 1_676_389,
];

pub const PAYPAL_PLACEHOLDER_PAYER_ID: &str = "UNKNOWN_PAYER_2015";
pub const CREDIT_CARD_PLACEHOLDER_TRANSACTION_ID: &str = "UNKNOWN_TRANSACTION_2015";

pub const BOOKED_LOG_MARKER: &str = "paypal_handler: booked";

pub const ANONYMOUS_REFERENCE_CODE: &str = "AN-ONY-MOU-S";

pub const DUMMY_IBAN: &str = "DE00000000000000000000";
pub const DUMMY_BIC: &str = "XXXXXXXXXXX";

/// Zone suffix written when a PayPal date is rebuilt from a value that
/// carried none.
pub const PAYPAL_DATE_DEFAULT_ZONE: &str = "UTC";

/// Window in which the PayPal/credit card notification handlers dropped
/// provider ids, `[start, end)`.
pub fn error_period() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(2015, 9, 28).unwrap_or_default(),
        NaiveDate::from_ymd_opt(2015, 10, 8).unwrap_or_default(),
    )
}

pub fn in_error_period(row: &LegacyDonationRow) -> bool {
    if ADMIN_ALLOW_LIST.contains(&row.id) { return true; }
    let (start, end) = error_period();
    let day = row.donation_date.date();
    day >= start && day < end
}

/// Key of the first log entry whose message is exactly the booking marker.
pub fn booked_timestamp_from_log(blob: &LegacyBlob) -> Option<String> {
    blob.log_entries()
        .find(|(_, msg)| msg.trim() == BOOKED_LOG_MARKER)
        .map(|(ts, _)| ts.to_string())
}

fn strict_paypal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{2}:\d{2}:\d{2} [A-Z][a-z]{2} \d{2}, \d{4}) ([A-Z]{3,4})$").expect("strict paypal date pattern")
    })
}

fn zone_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.*\S)\s+([A-Z]{3,4})$").expect("zone suffix pattern"))
}

/// PayPal's own notation, e.g. `10:54:49 Dec 02, 2012 PST`.
pub fn is_strict_paypal_date(text: &str) -> bool {
    strict_paypal_re()
        .captures(text)
        .is_some_and(|c| NaiveDateTime::parse_from_str(&c[1], "%H:%M:%S %b %d, %Y").is_ok())
}

pub fn format_paypal_date(dt: NaiveDateTime, zone: &str) -> String {
    format!("{} {}", dt.format("%H:%M:%S %b %d, %Y"), zone)
}

const LENIENT_FORMATS: &[&str] = &[
    "%H:%M:%S %b %d, %Y",
    "%H:%M:%S %b %d %Y",
    "%H:%M:%S %d %b %Y",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

/// Re-reads a malformed PayPal date with looser formats and renders it in
/// PayPal notation, keeping a trailing zone name when there is one.
pub fn reformat_paypal_date(text: &str) -> Option<String> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(format_paypal_date(dt.naive_utc(), PAYPAL_DATE_DEFAULT_ZONE));
    }
    let (body, zone) = match zone_suffix_re().captures(text) {
        Some(c) => (c.get(1).map_or(text, |m| m.as_str()), c.get(2).map_or(PAYPAL_DATE_DEFAULT_ZONE, |m| m.as_str())),
        None => (text, PAYPAL_DATE_DEFAULT_ZONE),
    };
    for candidate in [body, text] {
        for fmt in LENIENT_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(candidate, fmt) {
                let zone = if candidate == body { zone } else { PAYPAL_DATE_DEFAULT_ZONE };
                return Some(format_paypal_date(dt, zone));
            }
        }
    }
    None
}

fn reference_code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\w{2}-\w{3}-\w{3}-\w$").expect("reference code pattern"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceCode {
    pub code: String,
    /// A non-empty legacy code was thrown away.
    pub replaced: bool,
}

impl ReferenceCode {
    pub fn is_anonymous(&self) -> bool { self.code == ANONYMOUS_REFERENCE_CODE }
}

pub fn reference_code(legacy: Option<&str>) -> ReferenceCode {
    let code = legacy.map(str::trim).unwrap_or_default();
    if code.is_empty() {
        return ReferenceCode { code: ANONYMOUS_REFERENCE_CODE.to_string(), replaced: false };
    }
    if reference_code_re().is_match(code) {
        return ReferenceCode { code: code.to_string(), replaced: false };
    }
    ReferenceCode { code: ANONYMOUS_REFERENCE_CODE.to_string(), replaced: true }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::row::tests::{date, row_with_id};
    use crate::parent::tests::blob_with_log;

    #[test]
    fn error_period_is_half_open() {
        let mut row = row_with_id(1);
        for (d, expected) in [
            (date(2015, 9, 27), false),
            (date(2015, 9, 28), true),
            (date(2015, 10, 1), true),
            (date(2015, 10, 7), true),
            (date(2015, 10, 8), false),
        ] {
            row.donation_date = d;
            assert_eq!(in_error_period(&row), expected, "{d}");
        }
    }

    #[test]
    fn allow_listed_ids_count_as_error_period() {
        let mut row = row_with_id(ADMIN_ALLOW_LIST[0]);
        row.donation_date = date(2019, 1, 1);
        assert!(in_error_period(&row));
    }

    #[test]
    fn strict_dates_need_paypal_notation() {
        assert!(is_strict_paypal_date("10:54:49 Dec 02, 2012 PST"));
        assert!(!is_strict_paypal_date("10:54:49 Dec 2, 2012 PST"));
        assert!(!is_strict_paypal_date("2012-12-02 10:54:49"));
        assert!(!is_strict_paypal_date("25:54:49 Dec 02, 2012 PST"));
    }

    #[test]
    fn reformat_accepts_common_variants() {
        assert_eq!(reformat_paypal_date("10:54:49 Dec 2, 2012 PST").as_deref(), Some("10:54:49 Dec 02, 2012 PST"));
        assert_eq!(reformat_paypal_date("2012-12-02 10:54:49").as_deref(), Some("10:54:49 Dec 02, 2012 UTC"));
        assert_eq!(reformat_paypal_date("02.12.2012 10:54:49").as_deref(), Some("10:54:49 Dec 02, 2012 UTC"));
        assert_eq!(reformat_paypal_date("garbage"), None);
    }

    #[test]
    fn booked_marker_must_match_exactly() {
        let blob = blob_with_log(&[
            ("2014-01-01 09:00:00", "paypal_handler: booked twice"),
            ("2014-01-02 09:00:00", "paypal_handler: booked"),
        ]);
        assert_eq!(booked_timestamp_from_log(&blob).as_deref(), Some("2014-01-02 09:00:00"));
    }

    #[test]
    fn reference_codes() {
        assert_eq!(reference_code(Some("XW-DAR-E99-X")), ReferenceCode { code: "XW-DAR-E99-X".into(), replaced: false });
        let bogus = reference_code(Some("bogus"));
        assert!(bogus.replaced && bogus.is_anonymous());
        let empty = reference_code(Some(""));
        assert!(!empty.replaced && empty.is_anonymous());
        assert!(reference_code(None).is_anonymous());
        assert!(!reference_code(Some("XW-DAR-E99-X")).is_anonymous());
    }
}
