//! Example: print a structural diff of two XML documents
//!
//! This example demonstrates the library API: parse both documents, choose
//! options, and stream the report to stdout.
//!
//! Usage: cargo run --example diff <a.xml> <b.xml> [SKIPPED_TAG...]

use std::env;
use std::io;

use xmldiff::{xml_diff, DiffOptions, TagFilter, XmlParser};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <a.xml> <b.xml> [SKIPPED_TAG...]", args[0]);
        std::process::exit(1);
    }

    let parser = XmlParser::default();

    eprintln!("Parsing a: {}", args[1]);
    let a = parser.parse_file(&args[1])?;

    eprintln!("Parsing b: {}", args[2]);
    let b = parser.parse_file(&args[2])?;

    let mut options = DiffOptions::new().with_namespaces(xmldiff::DEFAULT_NAMESPACES);
    if args.len() > 3 {
        options = options.with_filter(TagFilter::new(args[3..].iter().cloned()));
    }

    xml_diff(&a, &b, &options, io::stdout().lock())?;
    Ok(())
}
