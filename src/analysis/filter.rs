//! Record filtering.
//!
//! Every active bound must hold for a record to pass; unset bounds are open.

use serde::{Deserialize, Serialize};

/// Inclusive range bound on one field.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<T>,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    pub fn between(min: T, max: T) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn contains(&self, value: T) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// A predicate over one record type.
pub trait RecordFilter<R> {
    fn matches(&self, record: &R) -> bool;

    /// Records passing the filter, in input order.
    fn apply(&self, records: &[R]) -> Vec<R>
    where
        R: Clone,
    {
        records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }
}
