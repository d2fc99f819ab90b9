//! Family size vs. spend.
//!
//! Households are grouped by total number of children (`Kidhome` +
//! `Teenhome`) and the mean of each spend column is reported per group.

use crate::analysis::{group_means, stats, to_table, Bounds, Measure, RecordFilter};
use crate::models::{
    AggregateTable, FamilyMeasure, FamilyRecord, Insight, Metric, ReportKind, SliderDomain,
};
use crate::report::narrator;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const TITLE: &str = "Análise de Família vs. Comportamento de Compra";
const TABLE_TITLE: &str = "Média de Gastos por Número Total de Filhos";
const CATEGORY: &str = "Número Total de Filhos";

/// Spend columns in table order; matches [`FamilyMeasure::index`].
const MEASURES: [Measure<FamilyRecord>; 3] = [
    |r| r.mnt_total,
    |r| r.mnt_sweet_products,
    |r| r.mnt_gold_prods,
];

/// Filter on the derived number of children.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FamilyFilter {
    #[serde(default)]
    pub children: Bounds<u64>,
}

impl RecordFilter<FamilyRecord> for FamilyFilter {
    fn matches(&self, record: &FamilyRecord) -> bool {
        self.children.contains(record.total_children())
    }
}

/// Mean spend per observed number of children.
pub fn aggregate(records: &[FamilyRecord]) -> AggregateTable {
    let labels = FamilyMeasure::ALL.map(|m| m.label());
    let groups = group_means(records, FamilyRecord::total_children, &MEASURES);
    to_table(TABLE_TITLE, CATEGORY, &labels, groups)
}

/// Run the family report over an already loaded record set.
pub fn compute(records: &[FamilyRecord], filter: &FamilyFilter, spend: FamilyMeasure) -> Insight {
    let filtered = filter.apply(records);
    let table = aggregate(&filtered);
    debug!(
        "Family report ({}): {} of {} records, {} groups",
        spend.column(),
        filtered.len(),
        records.len(),
        table.rows.len()
    );

    Insight {
        kind: ReportKind::Family,
        title: TITLE.to_string(),
        records_loaded: records.len(),
        records_matched: filtered.len(),
        metrics: metrics(&table, spend),
        narrative: narrate(&table, spend),
        tables: vec![table],
        correlation: None,
        scatter: Vec::new(),
        controls: controls(records),
    }
}

fn children_label(category: &str) -> String {
    if category == "1" {
        "1 filho".to_string()
    } else {
        format!("{} filhos", category)
    }
}

fn metrics(table: &AggregateTable, spend: FamilyMeasure) -> Vec<Metric> {
    let idx = spend.index();
    let (Some(max), Some(min)) = (table.max_row(idx), table.min_row(idx)) else {
        return Vec::new();
    };

    vec![
        Metric::new(
            "Maior Média",
            format!(
                "{} ({})",
                children_label(&max.category),
                narrator::currency(max.values[idx])
            ),
        ),
        Metric::new(
            "Menor Média",
            format!(
                "{} ({})",
                children_label(&min.category),
                narrator::currency(min.values[idx])
            ),
        ),
        Metric::new(
            "Diferença",
            narrator::currency(max.values[idx] - min.values[idx]),
        ),
    ]
}

/// Text report for a family aggregate table.
pub fn narrate(table: &AggregateTable, spend: FamilyMeasure) -> String {
    let idx = spend.index();
    let (Some(max), Some(min), Some(first), Some(last)) = (
        table.max_row(idx),
        table.min_row(idx),
        table.rows.first(),
        table.rows.last(),
    ) else {
        return narrator::no_data(TITLE);
    };

    let mut text = format!("### {}\n\n", TITLE);
    text.push_str("Média de gastos por número total de filhos:\n\n");

    for row in &table.rows {
        text.push_str(&format!("**Número total de filhos: {}**\n", row.category));
        for (label, value) in table.measures.iter().zip(&row.values) {
            text.push_str(&format!("- {}: {}\n", label, narrator::decimal(*value)));
        }
        text.push('\n');
    }

    text.push_str(&format!("**Destaques - {}:**\n", spend.label()));
    text.push_str(&format!(
        "- Maior média: **{}** ({})\n",
        children_label(&max.category),
        narrator::currency(max.values[idx])
    ));
    text.push_str(&format!(
        "- Menor média: **{}** ({})\n",
        children_label(&min.category),
        narrator::currency(min.values[idx])
    ));
    text.push_str(&format!(
        "- Diferença entre famílias com {} e com {}: {}\n\n",
        children_label(&last.category),
        children_label(&first.category),
        narrator::currency(last.values[idx] - first.values[idx])
    ));

    text.push_str("**Recomendações:**\n");
    text.push_str(&format!(
        "- Priorizar ofertas de {} para famílias com **{}**\n",
        spend.label().to_lowercase(),
        children_label(&max.category)
    ));
    text.push_str(&format!(
        "- Criar pacotes de incentivo para famílias com **{}**\n",
        children_label(&min.category)
    ));
    text.push_str("- Acompanhar a evolução dos gastos conforme a composição familiar muda\n");

    text
}

/// Slider domain for the number of children, over the unfiltered records.
pub fn controls(records: &[FamilyRecord]) -> Vec<SliderDomain> {
    stats::min_max(records.iter().map(|r| r.total_children() as f64))
        .map(|(min, max)| SliderDomain {
            field: "Total_Filhos".to_string(),
            min,
            max,
            default: (min, max),
        })
        .into_iter()
        .collect()
}
