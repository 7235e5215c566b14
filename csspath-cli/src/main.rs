//! csspath CLI - compile CSS selectors to `XPath`
//!
//! Usage:
//!   csspath <selector>...                 Print the `XPath` for each selector
//!   csspath <selector>... --json          One JSON record per selector
//!   csspath <selector>... --segments      Also dump the parsed segment chain
//!   csspath <selector>... --cache <file>  Reuse and update a compiled cache
//!
//! Examples:
//!   csspath 'ul.nav > li:first-child'
//!   csspath 'a, b' --cache compiled.json
//!   csspath '//div' --type xpath

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use csspath_common::warning::warn_once;
use csspath_query::{ExpressionType, Query, Segment, segment_chain};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Parser)]
#[command(name = "csspath", version, about = "Compile CSS selectors to XPath")]
struct Cli {
    /// Selector lists to compile (each may contain commas)
    #[arg(required = true)]
    selectors: Vec<String>,

    /// Language of the input: `css` or `xpath` (passed through)
    #[arg(short = 't', long = "type", default_value_t = ExpressionType::Css)]
    expression_type: ExpressionType,

    /// JSON file holding compiled chunks; loaded first and written back
    #[arg(short, long)]
    cache: Option<PathBuf>,

    /// Report failing selectors and continue with the rest
    #[arg(short, long)]
    keep_going: bool,

    /// Dump the parsed segments of every chunk as JSON
    #[arg(short, long)]
    segments: bool,

    /// Print one JSON record per selector instead of plain text
    #[arg(short, long)]
    json: bool,
}

/// One line of `--json` output.
#[derive(Serialize)]
struct CompiledRecord<'a> {
    selector: &'a str,
    xpath: &'a str,
}

/// One chunk of `--segments` output.
#[derive(Serialize)]
struct SegmentDump<'a> {
    chunk: &'a str,
    segments: &'a [Segment],
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut query = match &cli.cache {
        Some(path) => load_cache(path)?,
        None => Query::new(),
    };

    let mut failures = 0usize;
    for selector in &cli.selectors {
        if cli.segments && cli.expression_type == ExpressionType::Css {
            dump_segments(selector)?;
        }

        match query.compile(selector, cli.expression_type) {
            Ok(xpath) => print_compiled(selector, &xpath, cli.json)?,
            Err(err) if cli.keep_going => {
                warn_once("query", &err.to_string());
                failures += 1;
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to compile '{selector}'"));
            }
        }
    }

    if let Some(path) = &cli.cache {
        save_cache(&query, path)?;
    }

    if failures > 0 {
        bail!("{failures} of {} selector(s) failed to compile", cli.selectors.len());
    }
    Ok(())
}

/// Build a compiler seeded from the cache file at `path`.
///
/// A missing file starts empty. A file that is valid JSON but not an object
/// of strings is reported and ignored; it is overwritten on save.
fn load_cache(path: &Path) -> Result<Query> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Query::new()),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    };

    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    let mut query = Query::new();
    if let Err(err) = query.set_compiled_value(value) {
        warn_once("cache", &format!("ignoring {}: {err}", path.display()));
    }
    Ok(query)
}

fn save_cache(query: &Query, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(query.cache())?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

fn dump_segments(selector: &str) -> Result<()> {
    for chunk in selector.split(',').map(str::trim) {
        match segment_chain(chunk) {
            Ok(segments) => {
                let dump = SegmentDump {
                    chunk,
                    segments: &segments,
                };
                println!("{}", serde_json::to_string_pretty(&dump)?);
            }
            Err(err) => warn_once("segments", &err.to_string()),
        }
    }
    Ok(())
}

fn print_compiled(selector: &str, xpath: &str, json: bool) -> Result<()> {
    if json {
        let record = CompiledRecord { selector, xpath };
        println!("{}", serde_json::to_string(&record)?);
    } else {
        println!("{} {} {}", selector.dimmed(), "=>".bold(), xpath.green());
    }
    Ok(())
}
