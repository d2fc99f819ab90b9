//! Dataset loading.
//!
//! Records are read from a comma-delimited file with a header row and
//! projected onto a typed schema. Rows with a missing value in any projected
//! column are dropped; a missing column or an unparsable value fails the load.

pub mod cache;

pub use cache::DatasetCache;

use crate::error::LoadError;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Cell values treated as missing.
const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL"];

/// A typed record projected from the dataset.
pub trait Schema: DeserializeOwned + Send + Sync + 'static {
    /// Header names of the projected columns.
    const COLUMNS: &'static [&'static str];

    /// Whether the parsed record is usable downstream.
    fn is_complete(&self) -> bool {
        true
    }
}

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell)
}

/// Read and project records from any reader.
pub fn read_records<R: Schema, Rd: Read>(reader: Rd) -> Result<Vec<R>, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let positions = R::COLUMNS
        .iter()
        .map(|&column| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or(LoadError::MissingColumn { column })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let projected_headers = StringRecord::from(R::COLUMNS.to_vec());

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for result in rdr.records() {
        let row = result?;
        let line = row.position().map_or(0, |p| p.line());

        let cells: Vec<&str> = positions.iter().map(|&i| row.get(i).unwrap_or("")).collect();
        if cells.iter().any(|c| is_missing(c)) {
            dropped += 1;
            continue;
        }

        let record: R = StringRecord::from(cells)
            .deserialize(Some(&projected_headers))
            .map_err(|e| LoadError::Parse {
                line,
                message: e.to_string(),
            })?;

        if !record.is_complete() {
            dropped += 1;
            continue;
        }
        records.push(record);
    }

    if dropped > 0 {
        debug!("Dropped {} incomplete records", dropped);
    }

    Ok(records)
}

/// Load and project records from a file.
pub fn load_records<R: Schema>(path: &Path) -> Result<Vec<R>, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
    let records = read_records::<R, _>(file)?;
    info!(
        "Loaded {} records ({}) from {}",
        records.len(),
        R::COLUMNS.join(", "),
        path.display()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CampaignRecord, FamilyRecord, SpendRecord};

    #[test]
    fn test_projection_ignores_extra_columns() {
        let csv = "ID,Income,MntWines,MntFruits,MntMeatProducts,Age,Extra\n\
                   1,58138.0,635,88,546,63,x\n\
                   2,46344.0,11,1,6,66,y\n";
        let records: Vec<SpendRecord> = read_records(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].income, 58138.0);
        assert_eq!(records[0].mnt_wines, 635.0);
        assert_eq!(records[1].age, 66);
    }

    #[test]
    fn test_incomplete_rows_are_dropped() {
        let csv = "Kidhome,Teenhome,MntTotal,MntSweetProducts,MntGoldProds\n\
                   1,0,100,5,10\n\
                   0,1,,5,10\n\
                   0,0,NA,1,1\n\
                   2,1,300,0,0\n";
        let records: Vec<FamilyRecord> = read_records(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].total_children(), 3);
    }

    #[test]
    fn test_non_finite_values_are_dropped() {
        let csv = "Income,MntWines,MntFruits,MntMeatProducts,Age\n\
                   inf,1,1,1,30\n\
                   50000,1,1,1,30\n";
        let records: Vec<SpendRecord> = read_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_missing_column_fails() {
        let csv = "AcceptedCmpOverall,Age\n1,40\n";
        let err = read_records::<CampaignRecord, _>(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingColumn {
                column: "education_Graduation"
            }
        ));
    }

    #[test]
    fn test_unparsable_value_fails_with_line() {
        let csv = "AcceptedCmpOverall,Age,education_Graduation\n\
                   1,40,1\n\
                   0,forty,0\n";
        let err = read_records::<CampaignRecord, _>(csv.as_bytes()).unwrap_err();
        match err {
            LoadError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ragged_row_fails() {
        let csv = "AcceptedCmpOverall,Age,education_Graduation\n1,40\n";
        let err = read_records::<CampaignRecord, _>(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_records::<CampaignRecord>(Path::new("/nonexistent/ifood.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
