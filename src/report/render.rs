use chrono::NaiveDateTime;
use serde::Serialize;

use crate::legacy::LegacyDonationRow;

use super::{Category, ConversionResult, ResultObject};

#[derive(Debug, Clone, Serialize)]
pub struct Range<T> {
    pub from: T,
    pub to: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub count: u64,
    pub percent: f64,
    pub donation_ids: Range<i64>,
    pub donation_dates: Range<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_sample: Option<LegacyDonationRow>,
}

impl CategorySummary {
    fn new(category: &Category, obj: &ResultObject, total: u64, with_sample: bool) -> Self {
        let ids = obj.donation_id_range();
        let dates = obj.donation_date_range();
        Self {
            category: category.clone(),
            count: obj.item_count(),
            percent: percent(obj.item_count(), total),
            donation_ids: Range { from: *ids.lower_bound(), to: *ids.upper_bound() },
            donation_dates: Range { from: *dates.lower_bound(), to: *dates.upper_bound() },
            first_sample: with_sample.then(|| obj.first_item().clone()),
        }
    }
}

/// Printable digest of a `ConversionResult`.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub donations: u64,
    pub payments: u64,
    pub rejected: u64,
    pub warnings: Vec<CategorySummary>,
    pub errors: Vec<CategorySummary>,
}

impl ReportSummary {
    pub fn new(result: &ConversionResult, payments: u64) -> Self {
        let total = result.donation_count();
        Self {
            donations: total,
            payments,
            rejected: result.error_count(),
            warnings: result.warnings().iter().map(|(c, o)| CategorySummary::new(c, o, total, false)).collect(),
            errors: result.errors().iter().map(|(c, o)| CategorySummary::new(c, o, total, true)).collect(),
        }
    }

    pub fn has_errors(&self) -> bool { !self.errors.is_empty() }

    pub fn lines(&self) -> Vec<String> {
        let mut out = vec![format!(
            "Processed {} donations: {} payments ({:.1}%), {} rejected ({:.1}%)",
            self.donations,
            self.payments,
            percent(self.payments, self.donations),
            self.rejected,
            percent(self.rejected, self.donations),
        )];
        if !self.warnings.is_empty() {
            out.push("Warnings:".to_string());
            out.extend(self.warnings.iter().map(category_line));
        }
        if !self.errors.is_empty() {
            out.push("Errors:".to_string());
            for e in &self.errors {
                out.push(category_line(e));
                if let Some(row) = &e.first_sample {
                    out.push(format!("    first sample: {}", sample_line(row)));
                }
            }
        }
        out
    }
}

fn category_line(c: &CategorySummary) -> String {
    format!(
        "  {}: {} ({:.1}%) ids {}..{} dates {}..{}",
        c.category,
        c.count,
        c.percent,
        c.donation_ids.from,
        c.donation_ids.to,
        c.donation_dates.from.date(),
        c.donation_dates.to.date(),
    )
}

fn sample_line(row: &LegacyDonationRow) -> String {
    format!(
        "id={} type={} amount={} interval={} status={} date={} transfer_code={}",
        row.id,
        row.payment_type,
        row.amount.as_deref().unwrap_or("NULL"),
        row.interval_months,
        row.status,
        row.donation_date,
        row.transfer_code.as_deref().unwrap_or("NULL"),
    )
}

fn percent(n: u64, total: u64) -> f64 {
    if total == 0 { 0.0 } else { n as f64 * 100.0 / total as f64 }
}
