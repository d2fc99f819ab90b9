//! Analysis building blocks.
//!
//! Binning, filtering, grouping and summary statistics shared by the
//! report variants.

pub mod aggregator;
pub mod binning;
pub mod filter;
pub mod stats;

pub use aggregator::{group_means, to_table, Group, Measure};
pub use binning::Binning;
pub use filter::{Bounds, RecordFilter};
