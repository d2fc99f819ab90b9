//! SpendScope - customer spend analytics.
//!
//! Loads a customer dataset into typed record sets, filters them, groups
//! them into categories and produces aggregate tables plus a narrative
//! summary for three report variants: family size vs. spend, campaign
//! acceptance by demographics, and income vs. product spend.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dashboards;
pub mod error;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod session;

pub use error::{BinningError, LoadError};
pub use loader::{load_records, read_records, DatasetCache, Schema};
pub use models::{Insight, Notice, NoticeKind, Outcome};
pub use pipeline::{Pipeline, Request};
