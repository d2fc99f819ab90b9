//! Campaign acceptance by demographics.
//!
//! Acceptance (`AcceptedCmpOverall`) is averaged per age bracket and per
//! education group after the age and education filters are applied.

use crate::analysis::{group_means, stats, to_table, Bounds, Measure, RecordFilter};
use crate::models::{
    AgeBracket, AggregateTable, CampaignRecord, EducationLevel, Insight, Metric, ReportKind,
    SliderDomain,
};
use crate::report::narrator;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const TITLE: &str = "Eficácia de Campanhas por Demografia";
const INSIGHTS_HEADING: &str = "🔍 Insights Estratégicos";
const MEASURE_LABEL: &str = "Taxa de Aceitação";

/// Initial age selection of the range control.
const DEFAULT_AGE_RANGE: (f64, f64) = (25.0, 55.0);

const ACCEPTANCE: [Measure<CampaignRecord>; 1] = [|r| f64::from(r.accepted_cmp_overall)];

/// Which education groups to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationFilter {
    #[default]
    All,
    Graduates,
    NonGraduates,
}

impl EducationFilter {
    fn admits(&self, level: EducationLevel) -> bool {
        match self {
            EducationFilter::All => true,
            EducationFilter::Graduates => level == EducationLevel::GRADUATE,
            EducationFilter::NonGraduates => level == EducationLevel::NON_GRADUATE,
        }
    }
}

/// Age range plus education selection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CampaignFilter {
    #[serde(default)]
    pub age: Bounds<i32>,
    #[serde(default)]
    pub education: EducationFilter,
}

impl RecordFilter<CampaignRecord> for CampaignFilter {
    fn matches(&self, record: &CampaignRecord) -> bool {
        self.age.contains(record.age) && self.education.admits(record.education())
    }
}

/// Mean acceptance per observed age bracket.
pub fn aggregate_by_age(records: &[CampaignRecord]) -> AggregateTable {
    let groups = group_means(records, |r| AgeBracket::of(r.age), &ACCEPTANCE);
    to_table(
        "Aceitação por Faixa Etária",
        "Faixa Etária",
        &[MEASURE_LABEL],
        groups,
    )
}

/// Mean acceptance per observed education group.
pub fn aggregate_by_education(records: &[CampaignRecord]) -> AggregateTable {
    let groups = group_means(records, CampaignRecord::education, &ACCEPTANCE);
    to_table("Aceitação por Educação", "Educação", &[MEASURE_LABEL], groups)
}

/// Run the campaign report over an already loaded record set.
pub fn compute(records: &[CampaignRecord], filter: &CampaignFilter) -> Insight {
    let filtered = filter.apply(records);
    let by_age = aggregate_by_age(&filtered);
    let by_education = aggregate_by_education(&filtered);
    debug!(
        "Campaign report: {} of {} records, {} age groups, {} education groups",
        filtered.len(),
        records.len(),
        by_age.rows.len(),
        by_education.rows.len()
    );

    Insight {
        kind: ReportKind::Campaign,
        title: TITLE.to_string(),
        records_loaded: records.len(),
        records_matched: filtered.len(),
        metrics: metrics(&by_age, &by_education),
        narrative: narrate(&by_age, &by_education),
        tables: vec![by_age, by_education],
        correlation: None,
        scatter: Vec::new(),
        controls: controls(records),
    }
}

fn graduate_rate(by_education: &AggregateTable) -> Option<f64> {
    by_education
        .row(&EducationLevel::GRADUATE.to_string())
        .map(|r| r.values[0])
}

/// Graduates minus non-graduates, when both groups are present.
fn education_delta(by_education: &AggregateTable) -> Option<f64> {
    let non_graduate = by_education
        .row(&EducationLevel::NON_GRADUATE.to_string())
        .map(|r| r.values[0])?;
    Some(graduate_rate(by_education)? - non_graduate)
}

fn optional_percent(rate: Option<f64>) -> String {
    rate.map(narrator::percent).unwrap_or_else(|| "n/d".to_string())
}

fn metrics(by_age: &AggregateTable, by_education: &AggregateTable) -> Vec<Metric> {
    let Some(best_age) = by_age.max_row(0) else {
        return Vec::new();
    };
    let graduates = graduate_rate(by_education);

    vec![
        Metric::new(
            "Melhor Faixa Etária",
            format!(
                "{} ({})",
                best_age.category,
                narrator::percent(best_age.values[0])
            ),
        ),
        Metric::new("Aceitação Graduados", optional_percent(graduates)),
        Metric::new(
            "Diferença",
            optional_percent(graduates.map(|g| best_age.values[0] - g)),
        ),
    ]
}

/// Text report for the age and education tables.
pub fn narrate(by_age: &AggregateTable, by_education: &AggregateTable) -> String {
    let (Some(best_age), Some(age_spread)) = (by_age.max_row(0), by_age.spread(0)) else {
        return narrator::no_data(INSIGHTS_HEADING);
    };

    let mut text = format!("### {}\n\n", INSIGHTS_HEADING);

    text.push_str("**Performance por Faixa Etária:**\n");
    text.push_str(&format!(
        "- Faixa com maior aceitação: **{}** ({})\n",
        best_age.category,
        narrator::percent(best_age.values[0])
    ));
    text.push_str(&format!(
        "- Variação entre faixas: **{}**\n\n",
        narrator::percent(age_spread)
    ));

    text.push_str("**Análise Educacional:**\n");
    for row in &by_education.rows {
        text.push_str(&format!(
            "- {}: **{}** de aceitação\n",
            row.category,
            narrator::percent(row.values[0])
        ));
    }
    text.push_str(&format!(
        "- Diferença educacional (graduados - não graduados): **{}**\n\n",
        optional_percent(education_delta(by_education))
    ));

    text.push_str("**Recomendações:**\n");
    text.push_str(&format!(
        "- Desenvolver campanhas personalizadas para faixa **{}**\n",
        best_age.category
    ));
    text.push_str("- Criar conteúdo exclusivo para graduados\n");
    text.push_str("- Implementar testes A/B entre diferentes grupos\n");

    text
}

/// Age slider domain over the unfiltered records.
pub fn controls(records: &[CampaignRecord]) -> Vec<SliderDomain> {
    stats::min_max(records.iter().map(|r| f64::from(r.age)))
        .map(|(min, max)| SliderDomain {
            field: "Age".to_string(),
            min,
            max,
            default: (
                DEFAULT_AGE_RANGE.0.clamp(min, max),
                DEFAULT_AGE_RANGE.1.clamp(min, max),
            ),
        })
        .into_iter()
        .collect()
}
