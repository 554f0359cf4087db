use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid amount {0:?}")]
pub struct AmountError(pub String);

/// Money amount in euro cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Euro {
    cents: i64,
}

impl Euro {
    pub const ZERO: Euro = Euro { cents: 0 };

    pub fn from_cents(cents: i64) -> Self { Euro { cents } }

    pub fn cents(&self) -> i64 { self.cents }

    /// Parses legacy decimal strings like `12`, `12.5` or `12.50`.
    pub fn parse_decimal(text: &str) -> Result<Self, AmountError> {
        let err = || AmountError(text.to_string());
        let t = text.trim();
        let (whole, frac) = match t.split_once('.') {
            Some((w, f)) => (w, f),
            None => (t, ""),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) { return Err(err()); }
        if !frac.bytes().all(|b| b.is_ascii_digit()) { return Err(err()); }
        // trailing zeros beyond cents are harmless (`12.500`), anything else is not
        let frac_trimmed = if frac.len() > 2 { &frac[..2] } else { frac };
        if frac.len() > 2 && frac[2..].bytes().any(|b| b != b'0') { return Err(err()); }

        let whole: i64 = whole.parse().map_err(|_| err())?;
        let mut frac_cents: i64 = if frac_trimmed.is_empty() { 0 } else { frac_trimmed.parse().map_err(|_| err())? };
        if frac_trimmed.len() == 1 { frac_cents *= 10; }
        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac_cents))
            .map(Euro::from_cents)
            .ok_or_else(err)
    }
}

impl fmt::Display for Euro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}
