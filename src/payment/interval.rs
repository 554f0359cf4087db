use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum PaymentInterval {
    OneTime,
    Monthly,
    Quarterly,
    HalfYearly,
    Yearly,
}

impl PaymentInterval {
    pub fn months(self) -> i32 {
        match self {
            PaymentInterval::OneTime => 0,
            PaymentInterval::Monthly => 1,
            PaymentInterval::Quarterly => 3,
            PaymentInterval::HalfYearly => 6,
            PaymentInterval::Yearly => 12,
        }
    }

    pub fn is_recurring(self) -> bool { self != PaymentInterval::OneTime }
}

impl From<PaymentInterval> for i32 {
    fn from(i: PaymentInterval) -> i32 { i.months() }
}

impl TryFrom<i32> for PaymentInterval {
    type Error = String;

    fn try_from(months: i32) -> Result<Self, Self::Error> {
        match months {
            0 => Ok(PaymentInterval::OneTime),
            1 => Ok(PaymentInterval::Monthly),
            3 => Ok(PaymentInterval::Quarterly),
            6 => Ok(PaymentInterval::HalfYearly),
            12 => Ok(PaymentInterval::Yearly),
            other => Err(format!("invalid payment interval {other}")),
        }
    }
}
