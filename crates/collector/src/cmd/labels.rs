//! Labels command - Drop label sets that exceed admission limits
//!
//! Each input line is a JSON array of `{"name": ..., "value": ...}` labels.
//! Admitted sets are written back out unchanged; rejected sets are counted
//! per reason and reported through the gauge registry at the end.
//!
//! # Usage
//!
//! ```bash
//! collector labels --input series.jsonl > admitted.jsonl
//! collector labels --config configs/config.toml < series.jsonl
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tell_config::{Config, MetricsFormat};
use tell_ingest::{Label, LabelLimits, LabelsValidator};
use tell_metrics::{GaugeRegistry, HumanFormatter, JsonFormatter, MetricsFormatter};

use super::open_input;

/// Labels command arguments
#[derive(Args, Debug)]
pub struct LabelsArgs {
    /// Input file (reads stdin when omitted)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,
}

/// Line counts for one labels run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LabelsStats {
    pub admitted: u64,
    pub rejected: u64,
    pub invalid: u64,
}

/// Run the labels command
pub fn run(args: LabelsArgs, config: &Config) -> Result<()> {
    let registry = GaugeRegistry::new();
    let validator = LabelsValidator::init(LabelLimits::from(&config.limits), &registry);

    let reader = open_input(args.input.as_deref())?;
    let mut writer = io::BufWriter::new(io::stdout().lock());
    let stats = admit_lines(reader, &mut writer, &validator)?;
    writer.flush().context("failed to flush output")?;

    tracing::info!(
        admitted = stats.admitted,
        rejected = stats.rejected,
        invalid = stats.invalid,
        "label admission complete"
    );

    if config.metrics.enabled {
        let formatter: Box<dyn MetricsFormatter> = match config.metrics.format {
            MetricsFormat::Human => Box::new(HumanFormatter::new()),
            MetricsFormat::Json => Box::new(JsonFormatter::new()),
        };
        eprintln!("{}", formatter.format_gauges(&registry.snapshot()));
    }

    Ok(())
}

/// Check every label set of `reader`, writing admitted sets to `writer`
pub fn admit_lines<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    validator: &LabelsValidator,
) -> Result<LabelsStats> {
    let mut stats = LabelsStats::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let labels: Vec<Label> = match serde_json::from_str(&line) {
            Ok(labels) => labels,
            Err(e) => {
                stats.invalid += 1;
                tracing::warn!(line = index + 1, error = %e, "skipping invalid label set");
                continue;
            }
        };

        if validator.exceeds(&labels) {
            stats.rejected += 1;
            continue;
        }

        serde_json::to_writer(&mut *writer, &labels).context("failed to write output")?;
        writeln!(writer)?;
        stats.admitted += 1;
    }

    Ok(stats)
}
