//! # pointcsv
//!
//! Replays a recorded point-data stream and writes a horizontal CSV report.
//!
//! ## Overview
//!
//! pointcsv is built on top of pointcsvlib. It reads a JSON-lines recording
//! (one point or value event per line), lays each point out as a block of
//! five columns (name, time, value, rendered, annotation) and writes the
//! resulting table as CSV.
//!
//! ## Usage
//!
//! ```bash
//! # Read a recording, write CSV to stdout
//! pointcsv report.jsonl
//!
//! # Read from stdin, write to a file
//! cat report.jsonl | pointcsv - --output report.csv
//!
//! # Localized headers, local time, semicolon separated
//! pointcsv report.jsonl --headers de.json --time-zone local --delimiter ';'
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use console::style;
use pointcsvlib::{
    replay, CsvReportStreamer, DefaultHeaders, HeaderBundle, LineTerminator, MapHeaders,
    StreamOptions, StreamSummary, TimeZone, WriterSink,
};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("pointcsv")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Lay out recorded point data side by side in one CSV table")
        .arg(
            Arg::new("input")
                .help("JSON-lines recording to read ('-' for stdin)")
                .default_value("-"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Write the CSV to this file instead of stdout"),
        )
        .arg(
            Arg::new("headers")
                .long("headers")
                .help("JSON file mapping header bundle keys to text"),
        )
        .arg(
            Arg::new("time-zone")
                .short('z')
                .long("time-zone")
                .value_parser(["utc", "local"])
                .default_value("utc")
                .help("Zone used to print timestamps"),
        )
        .arg(
            Arg::new("delimiter")
                .short('d')
                .long("delimiter")
                .default_value(",")
                .help("Field delimiter (single ASCII character)"),
        )
        .arg(
            Arg::new("line-ending")
                .long("line-ending")
                .value_parser(["crlf", "lf"])
                .default_value("crlf")
                .help("Row terminator"),
        )
        .arg(
            Arg::new("summary")
                .long("summary")
                .action(ArgAction::SetTrue)
                .help("Print a JSON summary of the run to stderr"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v debug, -vv trace)"),
        )
}

/// Install the stderr log subscriber. RUST_LOG takes precedence over -v.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Build stream options from matches
fn build_options(matches: &ArgMatches) -> Result<StreamOptions, anyhow::Error> {
    let time_zone: TimeZone = matches
        .get_one::<String>("time-zone")
        .map(|s| s.parse())
        .transpose()
        .map_err(|e: String| anyhow!(e))?
        .unwrap_or_default();
    let terminator: LineTerminator = matches
        .get_one::<String>("line-ending")
        .map(|s| s.parse())
        .transpose()
        .map_err(|e: String| anyhow!(e))?
        .unwrap_or_default();

    let mut options = StreamOptions::new()
        .time_zone(time_zone)
        .terminator(terminator);

    if let Some(delimiter) = matches.get_one::<String>("delimiter") {
        let mut chars = delimiter.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return Err(anyhow!(
                "delimiter must be exactly one character, got {:?}",
                delimiter
            ));
        };
        options = options.delimiter(c)?;
    }

    Ok(options)
}

/// Load the header bundle, falling back to the built-in English texts
fn load_headers(matches: &ArgMatches) -> Result<Box<dyn HeaderBundle>, anyhow::Error> {
    match matches.get_one::<String>("headers") {
        Some(path) => {
            let bundle = MapHeaders::from_path(path)
                .with_context(|| format!("failed to load headers from '{}'", path))?;
            Ok(Box::new(bundle))
        }
        None => Ok(Box::new(DefaultHeaders)),
    }
}

fn open_input(path: &str) -> Result<Box<dyn BufRead>, anyhow::Error> {
    if path == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).with_context(|| format!("failed to open '{}'", path))?;
    Ok(Box::new(BufReader::new(file)))
}

fn open_output(path: Option<&String>) -> Result<Box<dyn Write>, anyhow::Error> {
    match path {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("failed to create '{}'", path))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

/// Counters printed by `--summary`.
#[derive(Debug, Serialize)]
struct RunSummary {
    /// Events replayed from the input
    events: usize,
    #[serde(flatten)]
    stream: StreamSummary,
}

fn run(matches: &ArgMatches) -> Result<(), anyhow::Error> {
    let options = build_options(matches)?;
    let headers = load_headers(matches)?;
    let input_path = matches
        .get_one::<String>("input")
        .map(|s| s.as_str())
        .unwrap_or("-");
    debug!(input = input_path, ?options, "starting report");

    let input = open_input(input_path)?;
    let output = open_output(matches.get_one::<String>("output"))?;

    let mut streamer =
        CsvReportStreamer::new(WriterSink::new(output), headers.as_ref(), options);
    let stats = replay(input, &mut streamer)
        .with_context(|| format!("failed to build report from '{}'", input_path))?;

    if matches.get_flag("summary") {
        let summary = RunSummary {
            events: stats.events,
            stream: streamer.summary(),
        };
        eprintln!("{}", serde_json::to_string(&summary)?);
    }
    Ok(())
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_logging(matches.get_count("verbose"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
