//! xmldiff - structural XML diff from the command line
//!
//! Prints a report of how FILE2 differs from FILE1, treating both as trees.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing::{info, Level};
use xmldiff::{xml_diff, DiffOptions, ParserOptions, TagFilter, XmlParser, DEFAULT_NAMESPACES};

/// Structural XML diff
#[derive(Parser, Debug)]
#[command(name = "xmldiff")]
#[command(version)]
#[command(about = "Structural XML diff rendered as an annotated report", long_about = None)]
struct Cli {
    /// Original document
    file1: String,
    /// Changed document
    file2: String,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Bind PREFIX to URI in the report (repeatable)
    #[arg(short = 'n', long = "namespace", value_name = "PREFIX=URI", value_parser = parse_namespace)]
    namespaces: Vec<(String, String)>,

    /// Do not seed the built-in office namespace prefix
    #[arg(long)]
    no_default_namespaces: bool,

    /// Ignore elements with this tag, plain or as {uri}local (repeatable)
    #[arg(long = "skip", value_name = "TAG")]
    skipped: Vec<String>,

    /// Spaces of indentation per nesting level
    #[arg(long, default_value = "2")]
    indent: usize,

    /// Ignore the documents' own prefixes and use seeded or generated ones
    #[arg(long)]
    minimal: bool,

    /// Keep text that consists only of whitespace
    #[arg(long)]
    keep_blank_text: bool,

    /// More logging on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

/// Parses a `PREFIX=URI` argument.
fn parse_namespace(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((prefix, uri)) if !prefix.is_empty() && !uri.is_empty() => {
            Ok((prefix.to_string(), uri.to_string()))
        }
        _ => Err(format!("expected PREFIX=URI, got '{}'", s)),
    }
}

fn parser_options(cli: &Cli) -> ParserOptions {
    let base = if cli.minimal {
        ParserOptions::minimal()
    } else {
        ParserOptions::default()
    };
    ParserOptions {
        keep_blank_text: cli.keep_blank_text,
        ..base
    }
}

fn diff_options(cli: &Cli) -> DiffOptions {
    let mut options = DiffOptions::new().with_indent_width(cli.indent);
    if !cli.no_default_namespaces {
        options = options.with_namespaces(DEFAULT_NAMESPACES);
    }
    options = options.with_namespaces(cli.namespaces.iter().cloned());
    if !cli.skipped.is_empty() {
        options = options.with_filter(TagFilter::new(cli.skipped.iter().cloned()));
    }
    options
}

/// Runs the diff and writes the report.
fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let parser = XmlParser::new(parser_options(cli));

    info!("Parsing {}", cli.file1);
    let a = parser.parse_file(&cli.file1)?;

    info!("Parsing {}", cli.file2);
    let b = parser.parse_file(&cli.file2)?;

    let options = diff_options(cli);
    info!(?options, "Diffing");

    // Get output writer
    let output: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    let mut output = xml_diff(&a, &b, &options, output)?;
    output.flush()?;

    info!("Diff complete.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_namespace() {
        assert_eq!(
            parse_namespace("p=urn:x=y").unwrap(),
            ("p".to_string(), "urn:x=y".to_string())
        );
        assert!(parse_namespace("p").is_err());
        assert!(parse_namespace("=urn:x").is_err());
    }

    #[test]
    fn test_cli_maps_onto_options() {
        let cli = Cli::parse_from([
            "xmldiff",
            "a.xml",
            "b.xml",
            "--no-default-namespaces",
            "-n",
            "t=urn:t",
            "--indent",
            "4",
            "--minimal",
        ]);
        let options = diff_options(&cli);
        assert_eq!(options.indent, "    ");
        assert_eq!(options.namespaces.len(), 1);
        assert_eq!(options.namespaces["t"], "urn:t");
        assert!(options.filter.is_none());
        assert!(!parser_options(&cli).expose_namespaces);
    }

    #[test]
    fn test_default_namespaces_seeded() {
        let cli = Cli::parse_from(["xmldiff", "a.xml", "b.xml", "--skip", "meta"]);
        let options = diff_options(&cli);
        assert_eq!(options.indent, "  ");
        assert!(options.namespaces.contains_key("office"));
        assert!(options.filter.is_some());
    }
}
