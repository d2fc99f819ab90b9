//! Grouping and per-group statistics.
//!
//! This module groups records by a derived category and computes the mean
//! of one or more measures per observed category.

use crate::models::{AggregateRow, AggregateTable};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Extracts one numeric measure from a record.
pub type Measure<R> = fn(&R) -> f64;

/// Per-category means, keyed by the typed category.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<K> {
    pub key: K,
    pub count: usize,
    pub means: Vec<f64>,
}

/// Group records by `key` and average each measure per group.
///
/// Only categories present in `records` produce a group; groups come out in
/// ascending key order regardless of input order.
pub fn group_means<R, K, F>(records: &[R], key: F, measures: &[Measure<R>]) -> Vec<Group<K>>
where
    K: Ord + Copy,
    F: Fn(&R) -> K,
{
    let mut sums: BTreeMap<K, (usize, Vec<f64>)> = BTreeMap::new();

    for record in records {
        let (count, totals) = sums
            .entry(key(record))
            .or_insert_with(|| (0, vec![0.0; measures.len()]));
        *count += 1;
        for (total, measure) in totals.iter_mut().zip(measures) {
            *total += measure(record);
        }
    }

    sums.into_iter()
        .map(|(key, (count, totals))| Group {
            key,
            count,
            means: totals.into_iter().map(|t| t / count as f64).collect(),
        })
        .collect()
}

/// Build a presenter table from typed groups, labelling keys with `Display`.
pub fn to_table<K: Display>(
    title: &str,
    category: &str,
    measures: &[&str],
    groups: Vec<Group<K>>,
) -> AggregateTable {
    let mut table = AggregateTable::new(
        title,
        category,
        measures.iter().map(|m| m.to_string()).collect(),
    );
    table.rows = groups
        .into_iter()
        .map(|g| AggregateRow {
            category: g.key.to_string(),
            count: g.count,
            values: g.means,
        })
        .collect();
    table
}
