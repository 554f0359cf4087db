use chrono::NaiveDateTime;
use serde::Serialize;

use crate::legacy::LegacyDonationRow;

use super::bounded::BoundedValue;

pub const DEFAULT_SAMPLE_SIZE: usize = 20;

/// Aggregate for one diagnostic category: true count, id/date ranges and
/// a small ring buffer of sample rows.
#[derive(Debug, Clone, Serialize)]
pub struct ResultObject {
    item_count: u64,
    #[serde(skip)]
    capacity: usize,
    #[serde(skip)]
    sample_index: usize,
    #[serde(skip)]
    first_item: LegacyDonationRow,
    item_sample: Vec<LegacyDonationRow>,
    donation_id_range: BoundedValue<i64>,
    donation_date_range: BoundedValue<NaiveDateTime>,
}

impl ResultObject {
    pub fn new(capacity: usize, first: LegacyDonationRow) -> Self {
        let capacity = capacity.max(1);
        let mut item_sample = Vec::with_capacity(capacity);
        let donation_id_range = BoundedValue::new(first.id);
        let donation_date_range = BoundedValue::new(first.donation_date);
        item_sample.push(first.clone());
        Self {
            item_count: 1,
            capacity,
            sample_index: 1 % capacity,
            first_item: first,
            item_sample,
            donation_id_range,
            donation_date_range,
        }
    }

    pub fn add(&mut self, row: LegacyDonationRow) {
        self.item_count += 1;
        self.donation_id_range.set(row.id);
        self.donation_date_range.set(row.donation_date);
        if self.sample_index < self.item_sample.len() {
            self.item_sample[self.sample_index] = row;
        } else {
            self.item_sample.push(row);
        }
        self.sample_index = (self.sample_index + 1) % self.capacity;
    }

    pub fn item_count(&self) -> u64 { self.item_count }

    /// Buffer contents in slot order. Once the ring has wrapped this is a
    /// round-robin snapshot, not the most recent N rows.
    pub fn item_sample(&self) -> &[LegacyDonationRow] { &self.item_sample }

    /// Row that opened the category; survives wrapping of the sample ring.
    pub fn first_item(&self) -> &LegacyDonationRow { &self.first_item }

    pub fn donation_id_range(&self) -> &BoundedValue<i64> { &self.donation_id_range }

    pub fn donation_date_range(&self) -> &BoundedValue<NaiveDateTime> { &self.donation_date_range }
}
