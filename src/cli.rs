//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and the mapping onto report selections.

use crate::dashboards::EducationFilter;
use crate::models::{FamilyMeasure, ReportKind, SpendMeasure};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// SpendScope - customer spend analytics
///
/// Computes grouped spend and campaign-acceptance reports from a customer
/// CSV dataset, with filters and a narrative summary.
///
/// Examples:
///   spendscope --report family --spend gold --min-children 1
///   spendscope --report campaign --min-age 30 --max-age 50 --education graduates
///   spendscope --report income --product meat --format json -o income.json
///   spendscope --session < requests.jsonl
///   spendscope --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the customer dataset (CSV)
    ///
    /// Defaults to data/processed/ifood_df_atualizado.csv or the value in
    /// .spendscope.toml.
    #[arg(short, long, value_name = "FILE", env = "SPENDSCOPE_DATA")]
    pub data: Option<PathBuf>,

    /// Report to compute
    #[arg(
        short,
        long,
        value_name = "REPORT",
        required_unless_present_any = ["init_config", "session"]
    )]
    pub report: Option<ReportArg>,

    /// Spend column highlighted by the family report
    #[arg(long, value_name = "MEASURE")]
    pub spend: Option<SpendArg>,

    /// Product analysed by the income report
    #[arg(long, value_name = "PRODUCT")]
    pub product: Option<ProductArg>,

    /// Minimum number of children (family report)
    #[arg(long, value_name = "N")]
    pub min_children: Option<u32>,

    /// Maximum number of children (family report)
    #[arg(long, value_name = "N")]
    pub max_children: Option<u32>,

    /// Minimum age (campaign report)
    #[arg(long, value_name = "YEARS", allow_negative_numbers = true)]
    pub min_age: Option<i32>,

    /// Maximum age (campaign report)
    #[arg(long, value_name = "YEARS", allow_negative_numbers = true)]
    pub max_age: Option<i32>,

    /// Education groups to include (campaign report)
    #[arg(long, value_name = "GROUP")]
    pub education: Option<EducationArg>,

    /// Minimum annual income (income report)
    #[arg(long, value_name = "AMOUNT", allow_negative_numbers = true)]
    pub min_income: Option<f64>,

    /// Maximum annual income (income report)
    #[arg(long, value_name = "AMOUNT", allow_negative_numbers = true)]
    pub max_income: Option<f64>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Output file path for the report
    ///
    /// The report is printed to stdout when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .spendscope.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Read JSON requests from stdin, one per line, and answer each on stdout
    ///
    /// The dataset cache is kept for the whole session. Fields a request
    /// leaves out take the values from the config file and flags.
    #[arg(long, conflicts_with_all = ["report", "output"])]
    pub session: bool,

    /// Generate a default .spendscope.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Report variant selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportArg {
    /// Family size vs. spend
    Family,
    /// Campaign acceptance by age and education
    Campaign,
    /// Income vs. product spend
    Income,
}

impl From<ReportArg> for ReportKind {
    fn from(arg: ReportArg) -> Self {
        match arg {
            ReportArg::Family => ReportKind::Family,
            ReportArg::Campaign => ReportKind::Campaign,
            ReportArg::Income => ReportKind::Income,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SpendArg {
    Total,
    Sweets,
    Gold,
}

impl From<SpendArg> for FamilyMeasure {
    fn from(arg: SpendArg) -> Self {
        match arg {
            SpendArg::Total => FamilyMeasure::Total,
            SpendArg::Sweets => FamilyMeasure::Sweets,
            SpendArg::Gold => FamilyMeasure::Gold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProductArg {
    Wines,
    Fruits,
    Meat,
}

impl From<ProductArg> for SpendMeasure {
    fn from(arg: ProductArg) -> Self {
        match arg {
            ProductArg::Wines => SpendMeasure::Wines,
            ProductArg::Fruits => SpendMeasure::Fruits,
            ProductArg::Meat => SpendMeasure::Meat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EducationArg {
    All,
    Graduates,
    NonGraduates,
}

impl From<EducationArg> for EducationFilter {
    fn from(arg: EducationArg) -> Self {
        match arg {
            EducationArg::All => EducationFilter::All,
            EducationArg::Graduates => EducationFilter::Graduates,
            EducationArg::NonGraduates => EducationFilter::NonGraduates,
        }
    }
}

fn check_range<T: PartialOrd + std::fmt::Display>(
    name: &str,
    min: Option<T>,
    max: Option<T>,
) -> Result<(), String> {
    match (min, max) {
        (Some(lo), Some(hi)) if lo > hi => Err(format!(
            "--min-{name} ({lo}) must not be greater than --max-{name} ({hi})"
        )),
        _ => Ok(()),
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        check_range("children", self.min_children, self.max_children)?;
        check_range("age", self.min_age, self.max_age)?;
        check_range("income", self.min_income, self.max_income)?;

        for income in [self.min_income, self.max_income].into_iter().flatten() {
            if !income.is_finite() || income < 0.0 {
                return Err(format!("Income bounds must be non-negative, got {income}"));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
