//! Fixed-edge binning of continuous values into ordered categories.
//!
//! Bins are half-open `[lower, next_lower)`. The lowest bin also takes every
//! value below its lower edge and the highest bin is unbounded above, so the
//! partition covers the whole real line.

use crate::error::BinningError;
use std::borrow::Cow;

/// An ordered partition of the real line with one label per bin.
#[derive(Debug, Clone)]
pub struct Binning<C: Copy + 'static> {
    lower_edges: Cow<'static, [f64]>,
    labels: Cow<'static, [C]>,
}

impl<C: Copy + 'static> Binning<C> {
    /// Build a binning from user-supplied lower edges and labels.
    pub fn new(lower_edges: Vec<f64>, labels: Vec<C>) -> Result<Self, BinningError> {
        let binning = Self {
            lower_edges: Cow::Owned(lower_edges),
            labels: Cow::Owned(labels),
        };
        binning.validate()?;
        Ok(binning)
    }

    /// Wrap a compile-time table. Tables are checked by unit tests.
    pub(crate) const fn fixed(lower_edges: &'static [f64], labels: &'static [C]) -> Self {
        Self {
            lower_edges: Cow::Borrowed(lower_edges),
            labels: Cow::Borrowed(labels),
        }
    }

    /// Check the edge set: non-empty, finite, strictly increasing, one label per edge.
    pub fn validate(&self) -> Result<(), BinningError> {
        if self.lower_edges.is_empty() {
            return Err(BinningError::Empty);
        }
        if self.lower_edges.len() != self.labels.len() {
            return Err(BinningError::LabelCountMismatch {
                edges: self.lower_edges.len(),
                labels: self.labels.len(),
            });
        }
        for (index, edge) in self.lower_edges.iter().enumerate() {
            if !edge.is_finite() {
                return Err(BinningError::NonFiniteEdge { index });
            }
            if index > 0 && *edge <= self.lower_edges[index - 1] {
                return Err(BinningError::NotIncreasing { index });
            }
        }
        Ok(())
    }

    /// Map a value to its bin label.
    ///
    /// A value equal to an edge belongs to the bin starting at that edge.
    pub fn classify(&self, value: f64) -> C {
        let idx = self.lower_edges.partition_point(|&edge| edge <= value);
        self.labels[idx.saturating_sub(1)]
    }
}
