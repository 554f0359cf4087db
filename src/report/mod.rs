pub mod bounded;
pub mod category;
pub mod render;
pub mod result_object;

use indexmap::IndexMap;
use serde::Serialize;

use crate::legacy::LegacyDonationRow;

pub use category::Category;
pub use result_object::{ResultObject, DEFAULT_SAMPLE_SIZE};

/// Report of one conversion pass. Append-only while the pass runs.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    #[serde(skip)]
    sample_size: usize,
    donation_count: u64,
    errors: IndexMap<Category, ResultObject>,
    warnings: IndexMap<Category, ResultObject>,
}

impl Default for ConversionResult {
    fn default() -> Self { Self::new(DEFAULT_SAMPLE_SIZE) }
}

impl ConversionResult {
    pub fn new(sample_size: usize) -> Self {
        Self { sample_size, donation_count: 0, errors: IndexMap::new(), warnings: IndexMap::new() }
    }

    pub fn add_row(&mut self) -> &mut Self {
        self.donation_count += 1;
        self
    }

    pub fn add_error(&mut self, category: Category, row: &LegacyDonationRow) -> &mut Self {
        record(&mut self.errors, self.sample_size, category, row);
        self
    }

    pub fn add_warning(&mut self, category: Category, row: &LegacyDonationRow) -> &mut Self {
        record(&mut self.warnings, self.sample_size, category, row);
        self
    }

    pub fn errors(&self) -> &IndexMap<Category, ResultObject> { &self.errors }

    pub fn warnings(&self) -> &IndexMap<Category, ResultObject> { &self.warnings }

    /// Every processed row, including skipped and failed ones.
    pub fn donation_count(&self) -> u64 { self.donation_count }

    pub fn error_count(&self) -> u64 { self.errors.values().map(ResultObject::item_count).sum() }
}

fn record(
    map: &mut IndexMap<Category, ResultObject>,
    sample_size: usize,
    category: Category,
    row: &LegacyDonationRow,
) {
    match map.get_mut(&category) {
        Some(obj) => obj.add(row.clone()),
        None => { map.insert(category, ResultObject::new(sample_size, row.clone())); }
    }
}
