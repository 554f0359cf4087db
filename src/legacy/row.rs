use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use crate::chunked::PaginationKey;

/// One row of the legacy donation table, exactly as stored. `data` stays
/// the opaque base64 blob so samples show what the converter saw.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct LegacyDonationRow {
    pub id: i64,
    pub amount: Option<String>,
    pub interval_months: i32,
    pub payment_type: String,
    pub transfer_code: Option<String>,
    pub data: Option<String>,
    pub status: String,
    pub donation_date: NaiveDateTime,
    pub valuation_date: Option<NaiveDateTime>,
}

impl PaginationKey for LegacyDonationRow {
    fn pagination_key(&self) -> i64 { self.id }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;

    pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(12, 30, 0).unwrap()
    }

    pub(crate) fn row_with_id(id: i64) -> LegacyDonationRow {
        LegacyDonationRow {
            id,
            amount: Some("5.00".into()),
            interval_months: 0,
            payment_type: "UEB".into(),
            transfer_code: Some("XW-DAR-E99-X".into()),
            data: None,
            status: "Z".into(),
            donation_date: date(2016, 3, 1) + chrono::Duration::days(id % 300),
            valuation_date: None,
        }
    }
}
