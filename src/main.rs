//! sqlfilter - test a JSON record against a SQL WHERE condition

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use sqlfilter::{Record, RowFilter};
use std::io::{self, Read, Write};
use std::process::ExitCode;

/// Test one JSON record against a SQL filter.
///
/// Exits with 0 when the record matches, 1 when it does not and 2 on error.
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Query such as "SELECT * FROM t WHERE a = 1", or a bare condition with --where
    query: String,

    /// Treat QUERY as a bare WHERE condition
    #[arg(short, long = "where")]
    where_only: bool,

    /// JSON object to test; read from stdin when omitted
    #[arg(short, long)]
    record: Option<String>,

    /// Print true/false instead of echoing matching records
    #[arg(short, long)]
    verdict: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let result = run(&args, io::stdin().lock(), io::stdout().lock());
    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }
    ExitCode::from(exit_status(&result))
}

/// 0 matched, 1 not matched, 2 error
fn exit_status(result: &Result<bool>) -> u8 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

/// Evaluate the query against one record, reading it from `input` unless
/// `--record` was given, and write the outcome to `output`.
fn run(args: &Args, mut input: impl Read, mut output: impl Write) -> Result<bool> {
    let filter = if args.where_only {
        RowFilter::from_condition(&args.query)?
    } else {
        RowFilter::compile(&args.query)?
    };

    let json = match &args.record {
        Some(json) => json.clone(),
        None => {
            let mut buf = String::new();
            input
                .read_to_string(&mut buf)
                .context("Failed to read record from stdin")?;
            buf
        }
    };
    let record = Record::from_json_str(&json).context("Failed to parse record")?;

    let matched = filter.matches(&record).context("eval condition")?;

    if args.verdict {
        writeln!(output, "{}", matched)?;
    } else if matched {
        writeln!(output, "{}", serde_json::to_string(&record)?)?;
    }

    Ok(matched)
}
