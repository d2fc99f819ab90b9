//! Load, filter, aggregate and narrate in one call.
//!
//! A [`Pipeline`] owns the dataset cache for its process. Each [`Request`]
//! names a report variant with its filter selection; [`Pipeline::run`] returns
//! either the computed insight or a notice explaining why nothing was computed.

use crate::dashboards::{campaign, family, income, CampaignFilter, FamilyFilter, IncomeFilter};
use crate::error::LoadError;
use crate::loader::{DatasetCache, Schema};
use crate::models::{
    CampaignRecord, FamilyMeasure, FamilyRecord, Insight, Notice, NoticeKind, Outcome,
    ReportKind, SpendMeasure, SpendRecord,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// One report render: variant plus filter selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum Request {
    Family {
        #[serde(default)]
        filter: FamilyFilter,
        #[serde(default)]
        spend: FamilyMeasure,
    },
    Campaign {
        #[serde(default)]
        filter: CampaignFilter,
    },
    Income {
        #[serde(default)]
        filter: IncomeFilter,
        #[serde(default)]
        product: SpendMeasure,
    },
}

impl Request {
    pub fn kind(&self) -> ReportKind {
        match self {
            Request::Family { .. } => ReportKind::Family,
            Request::Campaign { .. } => ReportKind::Campaign,
            Request::Income { .. } => ReportKind::Income,
        }
    }
}

/// Report runner bound to one dataset path.
pub struct Pipeline {
    data_path: PathBuf,
    cache: DatasetCache,
}

impl Pipeline {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            cache: DatasetCache::new(),
        }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut DatasetCache {
        &mut self.cache
    }

    /// Run one request against the dataset.
    pub fn run(&mut self, request: &Request) -> Outcome {
        info!("Running {} report", request.kind());
        match request {
            Request::Family { filter, spend } => self.compute_with(|records: &[FamilyRecord]| {
                family::compute(records, filter, *spend)
            }),
            Request::Campaign { filter } => self.compute_with(|records: &[CampaignRecord]| {
                campaign::compute(records, filter)
            }),
            Request::Income { filter, product } => self.compute_with(|records: &[SpendRecord]| {
                income::compute(records, filter, *product)
            }),
        }
    }

    fn load<R: Schema>(&mut self) -> Result<Arc<Vec<R>>, LoadError> {
        self.cache.get_or_load::<R>(&self.data_path)
    }

    /// Load the `R` projection and hand it to `compute` unless the load
    /// failed or produced no usable records.
    fn compute_with<R: Schema>(&mut self, compute: impl FnOnce(&[R]) -> Insight) -> Outcome {
        let records = match self.load::<R>() {
            Ok(records) => records,
            Err(e) => {
                error!("Failed to load {}: {}", self.data_path.display(), e);
                return Outcome::Halted(Notice {
                    kind: NoticeKind::LoadFailed,
                    message: format!("Erro ao carregar dados: {}", e),
                });
            }
        };

        if records.is_empty() {
            warn!("No usable records in {}", self.data_path.display());
            return Outcome::Halted(Notice {
                kind: NoticeKind::EmptyDataset,
                message: format!(
                    "Nenhum registro válido encontrado em {}",
                    self.data_path.display()
                ),
            });
        }

        let insight = compute(records.as_slice());
        info!(
            "{} report ready: {} of {} records matched",
            insight.kind, insight.records_matched, insight.records_loaded
        );
        Outcome::Ready(insight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Bounds;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CSV: &str = "\
Kidhome,Teenhome,MntTotal,MntSweetProducts,MntGoldProds,AcceptedCmpOverall,Age,education_Graduation,Income,MntWines,MntFruits,MntMeatProducts
0,0,1000,50,80,1,28,1,20000,10,5,100
1,2,100,2,10,0,45,0,45000,50,8,120
2,1,300,4,20,1,52,1,95000,200,20,300
";

    const FAMILY_HEADER: &str = "Kidhome,Teenhome,MntTotal,MntSweetProducts,MntGoldProds";

    fn dataset(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_request_json_shape() {
        let request: Request =
            serde_json::from_str(r#"{"report":"income","product":"meat"}"#).unwrap();
        assert_eq!(
            request,
            Request::Income {
                filter: IncomeFilter::default(),
                product: SpendMeasure::Meat,
            }
        );

        let request: Request = serde_json::from_str(
            r#"{"report":"family","filter":{"children":{"min":1,"max":3}},"spend":"gold"}"#,
        )
        .unwrap();
        assert_eq!(request.kind(), ReportKind::Family);
    }

    #[test]
    fn test_run_family() {
        let file = dataset(CSV);
        let mut pipeline = Pipeline::new(file.path());

        let request = Request::Family {
            filter: FamilyFilter {
                children: Bounds::between(3, 3),
            },
            spend: FamilyMeasure::Total,
        };
        let Outcome::Ready(insight) = pipeline.run(&request) else {
            panic!("expected a report");
        };

        assert_eq!(insight.records_loaded, 3);
        assert_eq!(insight.records_matched, 2);
        assert_eq!(insight.tables[0].row("3").unwrap().values[0], 200.0);
        assert!(pipeline.cache().contains::<FamilyRecord>(file.path()));
    }

    #[test]
    fn test_load_failure_becomes_notice() {
        let mut pipeline = Pipeline::new("/nonexistent/customers.csv");
        let outcome = pipeline.run(&Request::Campaign {
            filter: CampaignFilter::default(),
        });

        let Outcome::Halted(notice) = outcome else {
            panic!("expected a notice");
        };
        assert_eq!(notice.kind, NoticeKind::LoadFailed);
        assert!(notice.message.contains("customers.csv"));
        assert!(pipeline.cache().is_empty());
    }

    #[test]
    fn test_missing_column_becomes_notice() {
        let file = dataset("Income,MntWines\n1000,10\n");
        let mut pipeline = Pipeline::new(file.path());

        let Outcome::Halted(notice) = pipeline.run(&Request::Campaign {
            filter: CampaignFilter::default(),
        }) else {
            panic!("expected a notice");
        };
        assert_eq!(notice.kind, NoticeKind::LoadFailed);
        assert!(notice.message.contains("AcceptedCmpOverall"));
    }

    #[test]
    fn test_children_sum_does_not_overflow() {
        let file = dataset(&format!("{}\n4294967295,1,100,1,1\n", FAMILY_HEADER));
        let mut pipeline = Pipeline::new(file.path());

        let Outcome::Ready(insight) = pipeline.run(&Request::Family {
            filter: FamilyFilter::default(),
            spend: FamilyMeasure::Total,
        }) else {
            panic!("expected a report");
        };
        assert_eq!(insight.records_matched, 1);
        assert_eq!(insight.tables[0].row("4294967296").unwrap().values[0], 100.0);
        assert_eq!(insight.controls[0].max, 4294967296.0);
    }

    #[test]
    fn test_incomplete_rows_only_is_empty_dataset() {
        let file = dataset(&format!("{}\nNA,1,100,1,1\n0,,50,1,1\n", FAMILY_HEADER));
        let mut pipeline = Pipeline::new(file.path());

        let Outcome::Halted(notice) = pipeline.run(&Request::Family {
            filter: FamilyFilter::default(),
            spend: FamilyMeasure::Total,
        }) else {
            panic!("expected a notice");
        };
        assert_eq!(notice.kind, NoticeKind::EmptyDataset);
        assert!(pipeline.cache().contains::<FamilyRecord>(file.path()));
    }

    #[test]
    fn test_empty_dataset() {
        let header = CSV.lines().next().unwrap();
        let file = dataset(&format!("{}\n", header));
        let mut pipeline = Pipeline::new(file.path());

        let Outcome::Halted(notice) = pipeline.run(&Request::Income {
            filter: IncomeFilter::default(),
            product: SpendMeasure::Wines,
        }) else {
            panic!("expected a notice");
        };
        assert_eq!(notice.kind, NoticeKind::EmptyDataset);
    }
}
