use serde::Serialize;

/// Running min/max of an observed ordered value. Seeded by the first
/// observation, only ever widens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundedValue<T> {
    lower_bound: T,
    upper_bound: T,
}

impl<T: PartialOrd + Clone> BoundedValue<T> {
    pub fn new(value: T) -> Self {
        Self { lower_bound: value.clone(), upper_bound: value }
    }

    pub fn set(&mut self, value: T) {
        if value < self.lower_bound {
            self.lower_bound = value;
        } else if value > self.upper_bound {
            self.upper_bound = value;
        }
    }

    pub fn lower_bound(&self) -> &T { &self.lower_bound }
    pub fn upper_bound(&self) -> &T { &self.upper_bound }
}
