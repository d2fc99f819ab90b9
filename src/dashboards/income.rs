//! Income vs. spend.
//!
//! Customers are binned into income brackets and the mean spend on the
//! selected product is reported per bracket, alongside the Pearson
//! correlation between raw income and raw spend.

use crate::analysis::{group_means, stats, to_table, Bounds, Measure, RecordFilter};
use crate::models::{
    AggregateTable, IncomeBracket, Insight, Metric, ReportKind, ScatterPoint, SliderDomain,
    SpendMeasure, SpendRecord,
};
use crate::report::narrator;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const TITLE: &str = "Análise Renda vs Gastos";

/// Income range selection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IncomeFilter {
    #[serde(default)]
    pub income: Bounds<f64>,
}

impl RecordFilter<SpendRecord> for IncomeFilter {
    fn matches(&self, record: &SpendRecord) -> bool {
        self.income.contains(record.income)
    }
}

fn measure_for(product: SpendMeasure) -> Measure<SpendRecord> {
    match product {
        SpendMeasure::Wines => |r| r.mnt_wines,
        SpendMeasure::Fruits => |r| r.mnt_fruits,
        SpendMeasure::Meat => |r| r.mnt_meat_products,
    }
}

/// Mean spend on `product` per observed income bracket.
pub fn aggregate(records: &[SpendRecord], product: SpendMeasure) -> AggregateTable {
    let groups = group_means(records, |r| IncomeBracket::of(r.income), &[measure_for(product)]);
    to_table(
        "Gastos Médios por Categoria de Renda",
        "Categoria de Renda",
        &["Gastos Médios (USD)"],
        groups,
    )
}

/// Pearson correlation between raw income and raw spend on `product`.
pub fn income_correlation(records: &[SpendRecord], product: SpendMeasure) -> Option<f64> {
    let incomes: Vec<f64> = records.iter().map(|r| r.income).collect();
    let spends: Vec<f64> = records.iter().map(|r| r.spend(product)).collect();
    stats::pearson(&incomes, &spends)
}

/// Run the income report over an already loaded record set.
pub fn compute(records: &[SpendRecord], filter: &IncomeFilter, product: SpendMeasure) -> Insight {
    let filtered = filter.apply(records);
    let table = aggregate(&filtered, product);
    let correlation = income_correlation(&filtered, product);
    debug!(
        "Income report ({}): {} of {} records, {} brackets, r={:?}",
        product.column(),
        filtered.len(),
        records.len(),
        table.rows.len(),
        correlation
    );

    let scatter = filtered
        .iter()
        .map(|r| ScatterPoint {
            income: r.income,
            spend: r.spend(product),
            bracket: IncomeBracket::of(r.income),
        })
        .collect();

    Insight {
        kind: ReportKind::Income,
        title: TITLE.to_string(),
        records_loaded: records.len(),
        records_matched: filtered.len(),
        metrics: metrics(&table, correlation),
        narrative: narrate(&table, correlation, product),
        tables: vec![table],
        correlation,
        scatter,
        controls: controls(records),
    }
}

fn metrics(table: &AggregateTable, correlation: Option<f64>) -> Vec<Metric> {
    let (Some(max), Some(min)) = (table.max_row(0), table.min_row(0)) else {
        return Vec::new();
    };

    vec![
        Metric::new("Correlação", narrator::correlation(correlation)),
        Metric::new("Máximo Gasto", narrator::currency(max.values[0])),
        Metric::new("Mínimo Gasto", narrator::currency(min.values[0])),
    ]
}

/// Text report for an income aggregate table.
pub fn narrate(table: &AggregateTable, correlation: Option<f64>, product: SpendMeasure) -> String {
    let heading = format!("🍷 Insights Estratégicos - {}", product.product_name());
    let (Some(max), Some(min)) = (table.max_row(0), table.min_row(0)) else {
        return narrator::no_data(&heading);
    };

    let mut text = format!("### {}\n\n", heading);

    text.push_str("**Padrões de Consumo:**\n");
    text.push_str(&format!(
        "- Categoria com maior gasto: **{}** ({})\n",
        max.category,
        narrator::currency(max.values[0])
    ));
    text.push_str(&format!(
        "- Categoria com menor gasto: **{}** ({})\n",
        min.category,
        narrator::currency(min.values[0])
    ));
    text.push_str(&format!(
        "- Diferença entre maior e menor categoria: **{}**\n",
        narrator::currency(max.values[0] - min.values[0])
    ));
    text.push_str(&format!(
        "- Correlação Renda-Gastos: **{}**\n\n",
        narrator::correlation(correlation)
    ));

    text.push_str("**Gastos Médios por Categoria:**\n");
    for row in &table.rows {
        text.push_str(&format!(
            "- {}: {}\n",
            row.category,
            narrator::currency(row.values[0])
        ));
    }
    text.push('\n');

    text.push_str("**Recomendações:**\n");
    text.push_str("- Desenvolver bundles premium para clientes de **alta renda**\n");
    text.push_str(&format!(
        "- Criar campanhas segmentadas para categoria **{}**\n",
        max.category
    ));
    text.push_str("- Implementar programa de fidelidade com benefícios progressivos\n");

    text
}

/// Income slider domain over the unfiltered records.
///
/// Bounds are truncated to whole currency units; the initial selection is the
/// interquartile range.
pub fn controls(records: &[SpendRecord]) -> Vec<SliderDomain> {
    let incomes: Vec<f64> = records.iter().map(|r| r.income).collect();
    let (Some((min, max)), Some(q1), Some(q3)) = (
        stats::min_max(incomes.iter().copied()),
        stats::quantile(&incomes, 0.25),
        stats::quantile(&incomes, 0.75),
    ) else {
        return Vec::new();
    };

    vec![SliderDomain {
        field: "Income".to_string(),
        min: min.trunc(),
        max: max.trunc(),
        default: (q1.trunc(), q3.trunc()),
    }]
}
