mod args;
mod flow_counts;
mod flow_log;
mod lookup_table;
mod output;
mod parsers;
mod tests;

use std::io;
use std::time::Instant;

use anyhow::Context;
use args::{Cli, ConfigFile, ReportOrder};
use clap::Parser;
use flow_counts::FlowCounts;
use flow_log::{scan_flow_logs, UNTAGGED};
use log::{debug, error, info, warn};
use lookup_table::LookupTable;
use output::ReportWriter;
use strum::VariantNames;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    // If a config file is provided, it replaces the command line options
    let config: ConfigFile = if let Some(config_path) = cli.config_file.clone() {
        match confy::load_path::<ConfigFile>(&config_path) {
            Ok(cfg_file) => cfg_file,
            Err(e) => {
                error!(
                    "Error loading configuration file {}: {:?} (valid report orders: {})",
                    config_path,
                    e,
                    ReportOrder::VARIANTS.join(", ")
                );
                std::process::exit(1);
            }
        }
    } else {
        ConfigFile::from(cli)
    };
    debug!("Running with {:?}", config);

    let start = Instant::now();
    if let Err(err) = run(&config) {
        error!("Error: {:?}", err);
        std::process::exit(1);
    }

    info!(
        "Duration: {:.4} seconds",
        Instant::now().duration_since(start).as_secs_f64()
    );
}

/// Loads the lookup table, scans the flow log and prints the report.
///
/// Nothing is printed unless both inputs were read completely.
fn run(config: &ConfigFile) -> anyhow::Result<()> {
    let lookup_path = &config.input.lookup_table_path;
    let table = LookupTable::from_path(lookup_path)
        .with_context(|| format!("Failed to load lookup table {}", lookup_path))?;
    if table.is_empty() {
        warn!(
            "Lookup table {} has no usable rows, every record will be {}",
            lookup_path, UNTAGGED
        );
    }
    let index = table.reverse();
    debug!("{} tags in reverse index", index.len());

    let flow_log_path = &config.input.flow_log_path;
    let mut counts = FlowCounts::new();
    let summary = scan_flow_logs(flow_log_path, &table, &mut counts)
        .with_context(|| format!("Failed to scan flow log {}", flow_log_path))?;
    debug!(
        "{} of {} records counted, {} tag hits",
        counts.total_records(),
        summary.records_read,
        counts.total_tag_hits()
    );

    let mut writer = ReportWriter::new(io::stdout().lock(), config.output.order);
    writer
        .write_report(&counts, &index)
        .context("Failed to write report")?;
    writer.flush_and_close().context("Failed to flush report")?;

    Ok(())
}
