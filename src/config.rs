use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The 50 U.S. states, official names. No territories, no District of Columbia.
pub const US_STATES: [&str; 50] = [
    "Alabama",
    "Alaska",
    "Arizona",
    "Arkansas",
    "California",
    "Colorado",
    "Connecticut",
    "Delaware",
    "Florida",
    "Georgia",
    "Hawaii",
    "Idaho",
    "Illinois",
    "Indiana",
    "Iowa",
    "Kansas",
    "Kentucky",
    "Louisiana",
    "Maine",
    "Maryland",
    "Massachusetts",
    "Michigan",
    "Minnesota",
    "Mississippi",
    "Missouri",
    "Montana",
    "Nebraska",
    "Nevada",
    "New Hampshire",
    "New Jersey",
    "New Mexico",
    "New York",
    "North Carolina",
    "North Dakota",
    "Ohio",
    "Oklahoma",
    "Oregon",
    "Pennsylvania",
    "Rhode Island",
    "South Carolina",
    "South Dakota",
    "Tennessee",
    "Texas",
    "Utah",
    "Vermont",
    "Virginia",
    "Washington",
    "West Virginia",
    "Wisconsin",
    "Wyoming",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub global: Global,
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub report: Report,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Global {
    pub print_summary: bool,
}
impl Default for Global {
    fn default() -> Self {
        Self {
            print_summary: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Source {
    pub base_url: String,
    pub dataset: String,
    /// Upper bound on returned rows; the dataset is assumed to stay below it.
    pub limit: u64,
    pub app_token_env: String,
    pub timeout_seconds: u64,
    /// Read rows from this JSON file instead of the HTTP endpoint.
    pub input_path: String,
}
impl Default for Source {
    fn default() -> Self {
        Self {
            base_url: "https://healthdata.gov".into(),
            dataset: "j8mb-icvb".into(),
            limit: 1_000_000_000,
            app_token_env: "SOCRATA_APP_TOKEN".into(),
            timeout_seconds: 600,
            input_path: "".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    pub heading: String,
    pub section_heading: String,
    pub date_label: String,
    pub recent_days: usize,
    pub missing_value: String,
    pub font: String,
    pub font_size_pt: u32,
    pub date_font_size_pt: u32,
    pub states: Vec<String>,
}
impl Default for Report {
    fn default() -> Self {
        Self {
            heading: "The current status of COVID-19 testing".into(),
            section_heading: "Data for the 5 most recent days\u{2019} worth of lab test results available"
                .into(),
            date_label: "Date of the Report: ".into(),
            recent_days: 5,
            missing_value: "N/A".into(),
            font: "Arial".into(),
            font_size_pt: 12,
            date_font_size_pt: 9,
            states: US_STATES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    pub out_dir: String,
    pub name_prefix: String,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            out_dir: ".".into(),
            name_prefix: "US_COVID-19_Testing".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}
