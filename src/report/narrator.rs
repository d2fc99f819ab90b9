//! Number formatting shared by the report narratives.

/// Narrative body used when the filters match no records.
pub const NO_DATA: &str = "Nenhum dado disponível para os filtros selecionados.";

/// Rate in `[0, 1]` as a percentage with one decimal (`0.123` -> `12.3%`).
pub fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Monetary amount with two decimals.
pub fn currency(amount: f64) -> String {
    format!("USD {:.2}", amount)
}

/// Plain value with two decimals.
pub fn decimal(value: f64) -> String {
    format!("{:.2}", value)
}

/// Correlation coefficient with two decimals, or `n/d` when undefined.
pub fn correlation(r: Option<f64>) -> String {
    r.map(decimal).unwrap_or_else(|| "n/d".to_string())
}

/// Heading plus the no-data line.
pub fn no_data(heading: &str) -> String {
    format!("### {}\n\n{}\n", heading, NO_DATA)
}
