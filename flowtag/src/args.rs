use clap::{Args, Parser};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, VariantNames};

pub const DEFAULT_FLOW_LOG_PATH: &str = "flow_logs.txt";
pub const DEFAULT_LOOKUP_TABLE_PATH: &str = "lookup_table.csv";

#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct Cli {
    /// Load input and output options from this TOML file instead of the command line
    #[clap(long)]
    pub config_file: Option<String>,

    /// Input files
    #[clap(flatten)]
    pub input: InputConfig,

    /// Report options
    #[clap(flatten)]
    pub output: OutputConfig,
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// The space-delimited flow log to scan
    #[clap(long = "flow-logs", default_value = DEFAULT_FLOW_LOG_PATH)]
    pub flow_log_path: String,

    /// The comma-separated lookup table (dstport,protocol,tag)
    #[clap(long = "lookup-table", default_value = DEFAULT_LOOKUP_TABLE_PATH)]
    pub lookup_table_path: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            flow_log_path: String::from(DEFAULT_FLOW_LOG_PATH),
            lookup_table_path: String::from(DEFAULT_LOOKUP_TABLE_PATH),
        }
    }
}

#[derive(Args, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// The order in which report entries are printed
    #[clap(long, value_enum, default_value_t = ReportOrder::Unordered)]
    pub order: ReportOrder,
}

#[derive(
    clap::ValueEnum,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportOrder {
    /// Entries are printed in hash map iteration order.
    #[default]
    Unordered,

    /// Entries are printed in lexicographic order.
    Sorted,
}

/// Everything a run needs, either read from a config file or built from
/// the command line.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ConfigFile {
    pub input: InputConfig,
    pub output: OutputConfig,
}

impl From<Cli> for ConfigFile {
    fn from(cli: Cli) -> Self {
        ConfigFile {
            input: cli.input,
            output: cli.output,
        }
    }
}
