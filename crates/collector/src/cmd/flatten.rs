//! Flatten command - Flatten JSON log lines into name/value fields
//!
//! Each input line is one JSON object. Output is one JSON array of
//! `[name, value]` pairs per accepted line, in flattening order.
//!
//! # Usage
//!
//! ```bash
//! collector flatten --input logs.jsonl              # read a file
//! cat logs.jsonl | collector flatten --prefix app.  # read stdin
//! collector flatten --rename msg=_msg --rename ts=_time
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tell_ingest::{FieldExtractor, acquire, parser_pool};

use super::open_input;

/// Flatten command arguments
#[derive(Args, Debug)]
pub struct FlattenArgs {
    /// Input file (reads stdin when omitted)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Prefix prepended to every field name
    #[arg(short, long, default_value = "")]
    prefix: String,

    /// Rename a field after flattening (repeatable)
    #[arg(short, long, value_name = "OLD=NEW", value_parser = parse_rename)]
    rename: Vec<(String, String)>,

    /// Keep the extractor buffer between lines, resetting it every
    /// `KEEP_BUFFER_LINES` lines
    #[arg(long)]
    keep_buffer: bool,
}

/// Lines parsed into one buffer before it is reset under `--keep-buffer`
pub const KEEP_BUFFER_LINES: u64 = 256;

/// Line counts for one flatten run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlattenStats {
    pub lines: u64,
    pub flattened: u64,
    pub skipped: u64,
    pub fields: u64,
}

/// Run the flatten command
///
/// The extractor comes from the process-wide pool, sized from
/// `[parser] pool_capacity` at startup.
pub fn run(args: FlattenArgs) -> Result<()> {
    let reader = open_input(args.input.as_deref())?;
    let mut writer = io::BufWriter::new(io::stdout().lock());

    let stats = {
        let mut parser = acquire();
        flatten_lines(reader, &mut writer, &mut parser, &args)?
    };
    writer.flush().context("failed to flush output")?;

    tracing::info!(
        lines = stats.lines,
        flattened = stats.flattened,
        skipped = stats.skipped,
        fields = stats.fields,
        "flatten complete"
    );
    tracing::debug!(pool = ?parser_pool().metrics().snapshot(), "parser pool");

    Ok(())
}

/// Flatten every line of `reader` into `writer`
///
/// Blank lines are ignored. Lines that fail to parse are counted as
/// skipped and logged; they never abort the run.
pub fn flatten_lines<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    parser: &mut FieldExtractor,
    args: &FlattenArgs,
) -> Result<FlattenStats> {
    let mut stats = FlattenStats::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }
        stats.lines += 1;

        let parsed = if args.keep_buffer {
            // Output is written per line, so older bytes are never read again
            if stats.lines % KEEP_BUFFER_LINES == 0 {
                parser.reset();
            }
            parser.parse_no_reset_buf(line.as_bytes(), &args.prefix)
        } else {
            parser.parse(line.as_bytes(), &args.prefix)
        };
        if let Err(e) = parsed {
            stats.skipped += 1;
            tracing::warn!(line = index + 1, error = %e, "skipping line");
            continue;
        }

        for (old_name, new_name) in &args.rename {
            parser.rename_field(old_name, new_name);
        }

        let pairs: Vec<[&str; 2]> = parser.fields().map(|f| [f.name, f.value]).collect();
        serde_json::to_writer(&mut *writer, &pairs).context("failed to write output")?;
        writeln!(writer)?;

        stats.flattened += 1;
        stats.fields += pairs.len() as u64;
    }

    Ok(stats)
}

fn parse_rename(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((old, new)) if !old.is_empty() && !new.is_empty() => {
            Ok((old.to_string(), new.to_string()))
        }
        _ => Err(format!("expected OLD=NEW, got '{s}'")),
    }
}
