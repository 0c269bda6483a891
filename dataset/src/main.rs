//! Developer tool for inspecting GIGS dataset files.
//!
//! Prints parsed rows as JSON lines so fixture data can be checked before it
//! feeds a conformance suite.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dataset::core::value::parse_column_types;
use dataset::{expand, load, regroup};

#[derive(Parser)]
#[command(name = "dataset", version, about = "Inspect GIGS dataset tables")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a dataset file and print each row as a JSON array.
    Inspect {
        path: PathBuf,
        /// Comma-separated column types (str, int, double, bool, str-list, int-list).
        #[arg(long)]
        columns: String,
        /// Code column to regroup on; enables regrouping.
        #[arg(long, requires = "regroup_name")]
        regroup_code: Option<usize>,
        /// Name column holding the templated names.
        #[arg(long)]
        regroup_name: Option<usize>,
        /// Columns that must be equal within a merged run.
        #[arg(long = "constant")]
        constants: Vec<usize>,
        /// Name pattern (regular expression); may be repeated.
        #[arg(long = "pattern")]
        patterns: Vec<String>,
    },
    /// Expand a list/range cell such as "16362-16398 +2".
    Expand { cell: String },
}

fn main() {
    dataset::logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Inspect {
            path,
            columns,
            regroup_code,
            regroup_name,
            constants,
            patterns,
        } => cmd_inspect(
            &path,
            &columns,
            regroup_code.zip(regroup_name),
            &constants,
            &patterns,
        ),
        Command::Expand { cell } => cmd_expand(&cell),
    }
}

fn cmd_inspect(
    path: &std::path::Path,
    columns: &str,
    regroup_columns: Option<(usize, usize)>,
    constants: &[usize],
    patterns: &[String],
) -> Result<()> {
    let types = parse_column_types(columns).context("parse --columns")?;
    let mut table = load(path, &types)?;
    if let Some((code_column, name_column)) = regroup_columns {
        let patterns: Vec<&str> = patterns.iter().map(String::as_str).collect();
        regroup(&mut table, code_column, constants, name_column, &patterns)?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for row in &table {
        let json = serde_json::to_string(row).context("serialize row")?;
        writeln!(out, "{json}").context("write row")?;
    }
    Ok(())
}

fn cmd_expand(cell: &str) -> Result<()> {
    let codes = expand(cell).with_context(|| format!("expand {cell:?}"))?;
    let rendered: Vec<String> = codes.iter().map(i32::to_string).collect();
    println!("{}", rendered.join(" "));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_inspect_with_regroup() {
        let cli = Cli::parse_from([
            "dataset",
            "inspect",
            "crs.txt",
            "--columns",
            "int,str,double",
            "--regroup-code",
            "0",
            "--regroup-name",
            "1",
            "--constant",
            "2",
            "--pattern",
            r"\d+",
        ]);
        match cli.command {
            Command::Inspect {
                regroup_code,
                regroup_name,
                constants,
                patterns,
                ..
            } => {
                assert_eq!(regroup_code, Some(0));
                assert_eq!(regroup_name, Some(1));
                assert_eq!(constants, vec![2]);
                assert_eq!(patterns, vec![r"\d+".to_string()]);
            }
            Command::Expand { .. } => panic!("expected inspect"),
        }
    }

    #[test]
    fn parse_expand() {
        let cli = Cli::parse_from(["dataset", "expand", "1-3"]);
        assert!(matches!(cli.command, Command::Expand { cell } if cell == "1-3"));
    }
}
