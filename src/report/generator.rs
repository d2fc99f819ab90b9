//! Markdown and JSON report generation.
//!
//! Renders a pipeline [`Outcome`] for the terminal or a file. The narrative
//! text comes from the report variant; this module only lays it out.

use crate::models::{AggregateTable, Insight, Metric, Notice, NoticeKind, Outcome};
use crate::report::narrator;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Run details printed alongside a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetadata {
    /// Dataset the report was computed from.
    pub data_path: String,
    pub generated_at: DateTime<Utc>,
    pub duration_seconds: f64,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    metadata: &'a ReportMetadata,
    #[serde(flatten)]
    outcome: &'a Outcome,
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(outcome: &Outcome, metadata: &ReportMetadata) -> String {
    let mut output = String::new();

    match outcome {
        Outcome::Ready(insight) => {
            output.push_str(&format!("# {}\n\n", insight.title));
            output.push_str(&generate_metadata_section(metadata, Some(insight)));
            output.push_str(&generate_metrics_section(&insight.metrics));
            for table in &insight.tables {
                output.push_str(&generate_table_section(table));
            }
            if let Some(r) = insight.correlation {
                output.push_str(&format!(
                    "**Correlação Renda-Gastos:** {}\n\n",
                    narrator::decimal(r)
                ));
            }
            output.push_str(&insight.narrative);
            output.push('\n');
        }
        Outcome::Halted(notice) => {
            output.push_str("# SpendScope\n\n");
            output.push_str(&generate_metadata_section(metadata, None));
            output.push_str(&generate_notice_section(notice));
        }
    }

    output.push_str(&generate_footer());
    output
}

fn generate_metadata_section(metadata: &ReportMetadata, insight: Option<&Insight>) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Dataset:** `{}`\n", metadata.data_path));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(insight) = insight {
        section.push_str(&format!("- **Report:** {}\n", insight.kind));
        section.push_str(&format!(
            "- **Records:** {} of {} matched the filters\n",
            insight.records_matched, insight.records_loaded
        ));
    }
    section.push_str(&format!(
        "- **Duration:** {:.2}s\n\n",
        metadata.duration_seconds
    ));

    section
}

fn generate_metrics_section(metrics: &[Metric]) -> String {
    if metrics.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str(&format!(
        "| {} |\n",
        metrics
            .iter()
            .map(|m| m.title.as_str())
            .collect::<Vec<_>>()
            .join(" | ")
    ));
    section.push_str(&format!("|{}\n", ":---:|".repeat(metrics.len())));
    section.push_str(&format!(
        "| {} |\n\n",
        metrics
            .iter()
            .map(|m| m.value.as_str())
            .collect::<Vec<_>>()
            .join(" | ")
    ));

    section
}

fn generate_table_section(table: &AggregateTable) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", table.title));
    if table.is_empty() {
        section.push_str(narrator::NO_DATA);
        section.push_str("\n\n");
        return section;
    }

    section.push_str(&format!("| {} | Registros |", table.category));
    for measure in &table.measures {
        section.push_str(&format!(" {} |", measure));
    }
    section.push('\n');
    section.push_str(&format!("|:---|:---:|{}\n", "---:|".repeat(table.measures.len())));

    for row in &table.rows {
        section.push_str(&format!("| {} | {} |", row.category, row.count));
        for value in &row.values {
            section.push_str(&format!(" {} |", narrator::decimal(*value)));
        }
        section.push('\n');
    }
    section.push('\n');

    section
}

fn generate_notice_section(notice: &Notice) -> String {
    let badge = match notice.kind {
        NoticeKind::LoadFailed => "❌ **Erro ao carregar dados**",
        NoticeKind::EmptyDataset => "⚠️ **Conjunto de dados vazio**",
    };
    format!("{}\n\n> {}\n\n", badge, notice.message)
}

fn generate_footer() -> String {
    "---\n\n*Report generated by SpendScope*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(outcome: &Outcome, metadata: &ReportMetadata) -> Result<String> {
    serde_json::to_string_pretty(&JsonReport { metadata, outcome }).map_err(Into::into)
}

/// Write rendered report text to `path`.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AggregateRow, ReportKind};

    fn metadata() -> ReportMetadata {
        ReportMetadata {
            data_path: "data/customers.csv".to_string(),
            generated_at: Utc::now(),
            duration_seconds: 0.25,
        }
    }

    fn insight() -> Insight {
        let mut table = AggregateTable::new(
            "Gastos Médios por Categoria de Renda",
            "Categoria de Renda",
            vec!["Gastos Médios (USD)".to_string()],
        );
        table.rows = vec![
            AggregateRow {
                category: "Baixa".to_string(),
                count: 2,
                values: vec![10.0],
            },
            AggregateRow {
                category: "Alta".to_string(),
                count: 1,
                values: vec![150.5],
            },
        ];

        Insight {
            kind: ReportKind::Income,
            title: "Análise Renda vs Gastos".to_string(),
            records_loaded: 5,
            records_matched: 3,
            tables: vec![table],
            metrics: vec![
                Metric::new("Correlação", "0.87"),
                Metric::new("Máximo Gasto", "USD 150.50"),
            ],
            correlation: Some(0.8712),
            scatter: Vec::new(),
            controls: Vec::new(),
            narrative: "### 🍷 Insights Estratégicos - Wines\n\nTexto.\n".to_string(),
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let markdown = generate_markdown_report(&Outcome::Ready(insight()), &metadata());

        assert!(markdown.starts_with("# Análise Renda vs Gastos"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("`data/customers.csv`"));
        assert!(markdown.contains("- **Records:** 3 of 5 matched the filters"));
        assert!(markdown.contains("| Correlação | Máximo Gasto |"));
        assert!(markdown.contains("| 0.87 | USD 150.50 |"));
        assert!(markdown.contains("| Alta | 1 | 150.50 |"));
        assert!(markdown.contains("**Correlação Renda-Gastos:** 0.87"));
        assert!(markdown.contains("Insights Estratégicos - Wines"));
        assert!(markdown.contains("*Report generated by SpendScope*"));
    }

    #[test]
    fn test_empty_table_section() {
        let table = AggregateTable::new("Aceitação por Educação", "Educação", vec![]);
        let section = generate_table_section(&table);

        assert!(section.contains("## Aceitação por Educação"));
        assert!(section.contains(narrator::NO_DATA));
        assert!(!section.contains('|'));
    }

    #[test]
    fn test_notice_report() {
        let outcome = Outcome::Halted(Notice {
            kind: NoticeKind::LoadFailed,
            message: "Failed to read missing.csv".to_string(),
        });
        let markdown = generate_markdown_report(&outcome, &metadata());

        assert!(markdown.contains("Erro ao carregar dados"));
        assert!(markdown.contains("> Failed to read missing.csv"));
        assert!(!markdown.contains("- **Records:**"));
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&Outcome::Ready(insight()), &metadata()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["status"], "ready");
        assert_eq!(value["kind"], "income");
        assert_eq!(value["metadata"]["data_path"], "data/customers.csv");
        assert_eq!(value["tables"][0]["rows"][1]["category"], "Alta");
    }
}
