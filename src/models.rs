//! Data models for the spend analytics pipeline.
//!
//! This module contains the typed record schemas read from the customer
//! dataset, the derived category types, and the presenter-facing output
//! structures (aggregate tables, metrics, insights).

use crate::analysis::binning::Binning;
use crate::loader::Schema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Record schemas
// ---------------------------------------------------------------------------

/// Household composition and spend, used by the family report.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct FamilyRecord {
    #[serde(rename = "Kidhome")]
    pub kidhome: u32,
    #[serde(rename = "Teenhome")]
    pub teenhome: u32,
    #[serde(rename = "MntTotal")]
    pub mnt_total: f64,
    #[serde(rename = "MntSweetProducts")]
    pub mnt_sweet_products: f64,
    #[serde(rename = "MntGoldProds")]
    pub mnt_gold_prods: f64,
}

impl FamilyRecord {
    /// Number of children in the household (`Total_Filhos`).
    ///
    /// Widened so that any pair of loaded counts sums without overflow.
    pub fn total_children(&self) -> u64 {
        u64::from(self.kidhome) + u64::from(self.teenhome)
    }

    pub fn spend(&self, measure: FamilyMeasure) -> f64 {
        match measure {
            FamilyMeasure::Total => self.mnt_total,
            FamilyMeasure::Sweets => self.mnt_sweet_products,
            FamilyMeasure::Gold => self.mnt_gold_prods,
        }
    }
}

impl Schema for FamilyRecord {
    const COLUMNS: &'static [&'static str] = &[
        "Kidhome",
        "Teenhome",
        "MntTotal",
        "MntSweetProducts",
        "MntGoldProds",
    ];

    fn is_complete(&self) -> bool {
        self.mnt_total.is_finite()
            && self.mnt_sweet_products.is_finite()
            && self.mnt_gold_prods.is_finite()
    }
}

/// Campaign acceptance with the demographic fields it is sliced by.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct CampaignRecord {
    #[serde(rename = "AcceptedCmpOverall")]
    pub accepted_cmp_overall: u32,
    #[serde(rename = "Age")]
    pub age: i32,
    #[serde(rename = "education_Graduation")]
    pub education_graduation: u8,
}

impl CampaignRecord {
    pub fn education(&self) -> EducationLevel {
        EducationLevel(self.education_graduation)
    }
}

impl Schema for CampaignRecord {
    const COLUMNS: &'static [&'static str] = &["AcceptedCmpOverall", "Age", "education_Graduation"];
}

/// Income and per-category spend, used by the income report.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SpendRecord {
    #[serde(rename = "Income")]
    pub income: f64,
    #[serde(rename = "MntWines")]
    pub mnt_wines: f64,
    #[serde(rename = "MntFruits")]
    pub mnt_fruits: f64,
    #[serde(rename = "MntMeatProducts")]
    pub mnt_meat_products: f64,
    #[serde(rename = "Age")]
    pub age: i32,
}

impl SpendRecord {
    pub fn spend(&self, product: SpendMeasure) -> f64 {
        match product {
            SpendMeasure::Wines => self.mnt_wines,
            SpendMeasure::Fruits => self.mnt_fruits,
            SpendMeasure::Meat => self.mnt_meat_products,
        }
    }
}

impl Schema for SpendRecord {
    const COLUMNS: &'static [&'static str] =
        &["Income", "MntWines", "MntFruits", "MntMeatProducts", "Age"];

    fn is_complete(&self) -> bool {
        self.income.is_finite()
            && self.mnt_wines.is_finite()
            && self.mnt_fruits.is_finite()
            && self.mnt_meat_products.is_finite()
    }
}

// ---------------------------------------------------------------------------
// Derived categories
// ---------------------------------------------------------------------------

/// Age bracket used to slice campaign acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBracket {
    UpTo30,
    From31To40,
    From41To50,
    From51To60,
    Over60,
}

impl AgeBracket {
    const LOWER_EDGES: &'static [f64] = &[0.0, 30.0, 40.0, 50.0, 60.0];
    const ALL: &'static [AgeBracket] = &[
        AgeBracket::UpTo30,
        AgeBracket::From31To40,
        AgeBracket::From41To50,
        AgeBracket::From51To60,
        AgeBracket::Over60,
    ];

    pub fn binning() -> Binning<AgeBracket> {
        Binning::fixed(Self::LOWER_EDGES, Self::ALL)
    }

    pub fn of(age: i32) -> Self {
        Self::binning().classify(f64::from(age))
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgeBracket::UpTo30 => write!(f, "≤30"),
            AgeBracket::From31To40 => write!(f, "31-40"),
            AgeBracket::From41To50 => write!(f, "41-50"),
            AgeBracket::From51To60 => write!(f, "51-60"),
            AgeBracket::Over60 => write!(f, ">60"),
        }
    }
}

/// Income bracket used by the income report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IncomeBracket {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl IncomeBracket {
    const LOWER_EDGES: &'static [f64] = &[0.0, 30_000.0, 60_000.0, 90_000.0];
    const ALL: &'static [IncomeBracket] = &[
        IncomeBracket::Low,
        IncomeBracket::Medium,
        IncomeBracket::High,
        IncomeBracket::VeryHigh,
    ];

    pub fn binning() -> Binning<IncomeBracket> {
        Binning::fixed(Self::LOWER_EDGES, Self::ALL)
    }

    pub fn of(income: f64) -> Self {
        Self::binning().classify(income)
    }
}

impl fmt::Display for IncomeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncomeBracket::Low => write!(f, "Baixa"),
            IncomeBracket::Medium => write!(f, "Média"),
            IncomeBracket::High => write!(f, "Alta"),
            IncomeBracket::VeryHigh => write!(f, "Muito Alta"),
        }
    }
}

/// Education group keyed by the `education_Graduation` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EducationLevel(pub u8);

impl EducationLevel {
    pub const NON_GRADUATE: EducationLevel = EducationLevel(0);
    pub const GRADUATE: EducationLevel = EducationLevel(1);
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => write!(f, "Não Graduados"),
            1 => write!(f, "Graduados"),
            other => write!(f, "Educação {}", other),
        }
    }
}

// ---------------------------------------------------------------------------
// Measures
// ---------------------------------------------------------------------------

/// Spend measure highlighted by the family report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyMeasure {
    #[default]
    Total,
    Sweets,
    Gold,
}

impl FamilyMeasure {
    pub const ALL: [FamilyMeasure; 3] =
        [FamilyMeasure::Total, FamilyMeasure::Sweets, FamilyMeasure::Gold];

    pub fn column(&self) -> &'static str {
        match self {
            FamilyMeasure::Total => "MntTotal",
            FamilyMeasure::Sweets => "MntSweetProducts",
            FamilyMeasure::Gold => "MntGoldProds",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FamilyMeasure::Total => "Gasto Total",
            FamilyMeasure::Sweets => "Gastos com Produtos Doces",
            FamilyMeasure::Gold => "Gastos com Produtos Premium",
        }
    }

    /// Position of this measure within the family aggregate table.
    pub fn index(&self) -> usize {
        match self {
            FamilyMeasure::Total => 0,
            FamilyMeasure::Sweets => 1,
            FamilyMeasure::Gold => 2,
        }
    }
}

/// Product category analysed against income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendMeasure {
    #[default]
    Wines,
    Fruits,
    Meat,
}

impl SpendMeasure {
    pub fn column(&self) -> &'static str {
        match self {
            SpendMeasure::Wines => "MntWines",
            SpendMeasure::Fruits => "MntFruits",
            SpendMeasure::Meat => "MntMeatProducts",
        }
    }

    /// Product name shown to the analyst (column name without `Mnt`/`Products`).
    pub fn product_name(&self) -> &'static str {
        match self {
            SpendMeasure::Wines => "Wines",
            SpendMeasure::Fruits => "Fruits",
            SpendMeasure::Meat => "Meat",
        }
    }
}

// ---------------------------------------------------------------------------
// Output structures
// ---------------------------------------------------------------------------

/// Which report variant produced an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Family,
    Campaign,
    Income,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Family => write!(f, "family"),
            ReportKind::Campaign => write!(f, "campaign"),
            ReportKind::Income => write!(f, "income"),
        }
    }
}

/// One observed category with its per-measure means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    /// Category label (e.g. `"Média"` or `"3"`).
    pub category: String,
    /// Number of records in the group.
    pub count: usize,
    /// One value per measure, in the table's measure order.
    pub values: Vec<f64>,
}

/// A grouped table ready for bar rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateTable {
    /// Chart/table title.
    pub title: String,
    /// Display label of the category column.
    pub category: String,
    /// Display labels of the measure columns.
    pub measures: Vec<String>,
    /// Rows in ascending category order.
    pub rows: Vec<AggregateRow>,
}

impl AggregateTable {
    pub fn new(title: impl Into<String>, category: impl Into<String>, measures: Vec<String>) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            measures,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row with the largest value of `measure`; the first one wins on ties.
    pub fn max_row(&self, measure: usize) -> Option<&AggregateRow> {
        self.rows.iter().fold(None, |best, row| match best {
            Some(b) if b.values[measure] >= row.values[measure] => Some(b),
            _ => Some(row),
        })
    }

    /// Row with the smallest value of `measure`; the first one wins on ties.
    pub fn min_row(&self, measure: usize) -> Option<&AggregateRow> {
        self.rows.iter().fold(None, |best, row| match best {
            Some(b) if b.values[measure] <= row.values[measure] => Some(b),
            _ => Some(row),
        })
    }

    /// Spread between the largest and smallest value of `measure`.
    pub fn spread(&self, measure: usize) -> Option<f64> {
        let max = self.max_row(measure)?;
        let min = self.min_row(measure)?;
        Some(max.values[measure] - min.values[measure])
    }

    pub fn row(&self, category: &str) -> Option<&AggregateRow> {
        self.rows.iter().find(|r| r.category == category)
    }
}

/// A headline number shown as a card above the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub title: String,
    pub value: String,
}

impl Metric {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
        }
    }
}

/// One filtered record for the income-vs-spend scatter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub income: f64,
    pub spend: f64,
    pub bracket: IncomeBracket,
}

/// Range control domain and initial selection, taken from the unfiltered data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderDomain {
    /// Field the slider bounds.
    pub field: String,
    pub min: f64,
    pub max: f64,
    /// Initial `(low, high)` selection.
    pub default: (f64, f64),
}

/// Everything the presenter needs for one report render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: ReportKind,
    pub title: String,
    /// Records in the loaded dataset.
    pub records_loaded: usize,
    /// Records left after filtering.
    pub records_matched: usize,
    pub tables: Vec<AggregateTable>,
    pub metrics: Vec<Metric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub scatter: Vec<ScatterPoint>,
    pub controls: Vec<SliderDomain>,
    /// Markdown narrative produced by the narrator.
    pub narrative: String,
}

impl Insight {
    /// True when the filters matched no records.
    pub fn is_empty(&self) -> bool {
        self.records_matched == 0
    }
}

/// Why a pipeline run stopped before computing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    LoadFailed,
    EmptyDataset,
}

/// Operator-facing message surfaced instead of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Ready(Insight),
    Halted(Notice),
}
