//! JSON-lines request loop.
//!
//! Each input line is one request object tagged by `report`, answered by one
//! output line. Fields a request leaves out take the merged config values,
//! so a session started with `--min-age 30` keeps that bound until a request
//! names its own `age`. A line that is not a valid request is answered with
//! `{"status":"error","message":...}` and the loop continues.

use crate::analysis::Bounds;
use crate::config::Config;
use crate::dashboards::{CampaignFilter, EducationFilter, FamilyFilter, IncomeFilter};
use crate::models::{FamilyMeasure, SpendMeasure};
use crate::pipeline::{Pipeline, Request};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use std::io::{BufRead, Write};
use tracing::{debug, warn};

/// Request as read from the wire, before config defaults are applied.
#[derive(Debug, Deserialize)]
#[serde(tag = "report", rename_all = "snake_case")]
enum SessionRequest {
    Family {
        #[serde(default)]
        filter: Option<FamilyFilter>,
        #[serde(default)]
        spend: Option<FamilyMeasure>,
    },
    Campaign {
        #[serde(default)]
        filter: Option<CampaignSelection>,
    },
    Income {
        #[serde(default)]
        filter: Option<IncomeFilter>,
        #[serde(default)]
        product: Option<SpendMeasure>,
    },
}

#[derive(Debug, Deserialize)]
struct CampaignSelection {
    #[serde(default)]
    age: Option<Bounds<i32>>,
    #[serde(default)]
    education: Option<EducationFilter>,
}

impl SessionRequest {
    fn resolve(self, config: &Config) -> Request {
        match self {
            SessionRequest::Family { filter, spend } => Request::Family {
                filter: filter.unwrap_or_else(|| config.family_filter()),
                spend: spend.unwrap_or(config.family.spend),
            },
            SessionRequest::Campaign { filter } => {
                let defaults = config.campaign_filter();
                let filter = match filter {
                    Some(selection) => CampaignFilter {
                        age: selection.age.unwrap_or(defaults.age),
                        education: selection.education.unwrap_or(defaults.education),
                    },
                    None => defaults,
                };
                Request::Campaign { filter }
            }
            SessionRequest::Income { filter, product } => Request::Income {
                filter: filter.unwrap_or_else(|| config.income_filter()),
                product: product.unwrap_or(config.income.product),
            },
        }
    }
}

/// Answer one request line.
pub fn answer(pipeline: &mut Pipeline, config: &Config, line: &str) -> Result<Value> {
    match serde_json::from_str::<SessionRequest>(line) {
        Ok(request) => {
            let request = request.resolve(config);
            debug!("Request: {:?}", request);
            serde_json::to_value(pipeline.run(&request)).context("Failed to serialize response")
        }
        Err(e) => {
            warn!("Rejected request: {}", e);
            Ok(json!({ "status": "error", "message": e.to_string() }))
        }
    }
}

/// Answer every non-blank line of `input` on `output`.
///
/// Returns the number of responses written.
pub fn serve<I: BufRead, O: Write>(
    pipeline: &mut Pipeline,
    config: &Config,
    input: I,
    mut output: O,
) -> Result<usize> {
    let mut answered = 0usize;

    for line in input.lines() {
        let line = line.context("Failed to read request")?;
        if line.trim().is_empty() {
            continue;
        }

        let response = answer(pipeline, config, &line)?;
        serde_json::to_writer(&mut output, &response)?;
        output.write_all(b"\n")?;
        output.flush()?;
        answered += 1;
    }

    Ok(answered)
}
