//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.spendscope.toml` files. Command-line flags win over file values.

use crate::analysis::Bounds;
use crate::cli::{Args, OutputFormat};
use crate::dashboards::{CampaignFilter, EducationFilter, FamilyFilter, IncomeFilter};
use crate::models::{FamilyMeasure, ReportKind, SpendMeasure};
use crate::pipeline::Request;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".spendscope.toml";

/// Dataset used when neither the flags nor the config name one.
pub const DEFAULT_DATA_PATH: &str = "data/processed/ifood_df_atualizado.csv";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    /// Family report defaults.
    #[serde(default)]
    pub family: FamilyConfig,

    /// Campaign report defaults.
    #[serde(default)]
    pub campaign: CampaignConfig,

    /// Income report defaults.
    #[serde(default)]
    pub income: IncomeConfig,
}

/// General application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Path to the customer dataset.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Report output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            format: OutputFormat::default(),
            verbose: false,
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyConfig {
    /// Spend column highlighted in the narrative.
    #[serde(default)]
    pub spend: FamilyMeasure,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_children: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_children: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_age: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i32>,

    #[serde(default)]
    pub education: EducationFilter,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeConfig {
    /// Product analysed against income.
    #[serde(default)]
    pub product: SpendMeasure,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_income: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_income: Option<f64>,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values the user passed explicitly override the file.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref data) = args.data {
            self.general.data_path = data.clone();
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if args.verbose {
            self.general.verbose = true;
        }

        if let Some(spend) = args.spend {
            self.family.spend = spend.into();
        }
        self.family.min_children = args.min_children.or(self.family.min_children);
        self.family.max_children = args.max_children.or(self.family.max_children);

        self.campaign.min_age = args.min_age.or(self.campaign.min_age);
        self.campaign.max_age = args.max_age.or(self.campaign.max_age);
        if let Some(education) = args.education {
            self.campaign.education = education.into();
        }

        if let Some(product) = args.product {
            self.income.product = product.into();
        }
        self.income.min_income = args.min_income.or(self.income.min_income);
        self.income.max_income = args.max_income.or(self.income.max_income);
    }

    pub fn family_filter(&self) -> FamilyFilter {
        FamilyFilter {
            children: Bounds::new(
                self.family.min_children.map(u64::from),
                self.family.max_children.map(u64::from),
            ),
        }
    }

    pub fn campaign_filter(&self) -> CampaignFilter {
        CampaignFilter {
            age: Bounds::new(self.campaign.min_age, self.campaign.max_age),
            education: self.campaign.education,
        }
    }

    pub fn income_filter(&self) -> IncomeFilter {
        IncomeFilter {
            income: Bounds::new(self.income.min_income, self.income.max_income),
        }
    }

    /// Build the pipeline request for `kind` from the merged settings.
    pub fn to_request(&self, kind: ReportKind) -> Request {
        match kind {
            ReportKind::Family => Request::Family {
                filter: self.family_filter(),
                spend: self.family.spend,
            },
            ReportKind::Campaign => Request::Campaign {
                filter: self.campaign_filter(),
            },
            ReportKind::Income => Request::Income {
                filter: self.income_filter(),
                product: self.income.product,
            },
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(
            config.general.data_path,
            PathBuf::from("data/processed/ifood_df_atualizado.csv")
        );
        assert_eq!(config.general.format, OutputFormat::Markdown);
        assert_eq!(config.family.spend, FamilyMeasure::Total);
        assert_eq!(config.income.product, SpendMeasure::Wines);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
data_path = "customers.csv"
format = "json"

[family]
spend = "sweets"
min_children = 1

[campaign]
min_age = 30
max_age = 50
education = "graduates"

[income]
product = "meat"
max_income = 80000.0
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.data_path, PathBuf::from("customers.csv"));
        assert_eq!(config.general.format, OutputFormat::Json);
        assert!(!config.general.verbose);
        assert_eq!(config.family.spend, FamilyMeasure::Sweets);
        assert_eq!(config.family.min_children, Some(1));
        assert_eq!(config.family.max_children, None);
        assert_eq!(config.campaign.education, EducationFilter::Graduates);
        assert_eq!(config.income.product, SpendMeasure::Meat);
        assert_eq!(config.income.max_income, Some(80000.0));
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut config: Config = toml::from_str(
            r#"
[campaign]
min_age = 30
max_age = 50
"#,
        )
        .unwrap();
        let args = Args::try_parse_from([
            "spendscope",
            "--report",
            "campaign",
            "--max-age",
            "60",
            "--data",
            "other.csv",
        ])
        .unwrap();

        config.merge_with_args(&args);

        assert_eq!(config.general.data_path, PathBuf::from("other.csv"));
        assert_eq!(
            config.to_request(ReportKind::Campaign),
            Request::Campaign {
                filter: CampaignFilter {
                    age: Bounds::between(30, 60),
                    education: EducationFilter::All,
                },
            }
        );
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[family]"));
        assert!(toml_str.contains("[campaign]"));
        assert!(toml_str.contains("[income]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
