//! Report rendering.

pub mod generator;
pub mod narrator;

pub use generator::{generate_json_report, generate_markdown_report, write_report, ReportMetadata};
