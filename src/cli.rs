//! Command-line front end: compile, inspect, or check stylesheet files.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, NamedSource, Result, WrapErr};

use crate::{emitter, parser};

#[derive(Debug, Parser)]
#[command(
    name = "sassafras",
    version,
    about = "An SCSS-flavored stylesheet compiler: nested rules and variables, emitted as plain CSS."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a stylesheet and emit CSS.
    Compile {
        /// The stylesheet file to compile.
        #[arg(required = true)]
        file: PathBuf,
        /// Write the CSS here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the parsed syntax tree as JSON.
    Ast {
        /// The stylesheet file to parse.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Parse only; exit non-zero on the first error.
    Check {
        /// The stylesheet file to check.
        #[arg(required = true)]
        file: PathBuf,
    },
}

/// The main entry point for the CLI.
pub fn run() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Compile { file, output } => {
            let source = read_source(&file)?;
            let doc = parse_named(&file, &source)?;
            let css = emitter::emit_css(doc.statements());
            match output {
                Some(path) => fs::write(&path, css)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("could not write {}", path.display()))?,
                None => print!("{}", css),
            }
        }
        Command::Ast { file } => {
            let source = read_source(&file)?;
            let doc = parse_named(&file, &source)?;
            let json = serde_json::to_string_pretty(doc.statements()).into_diagnostic()?;
            println!("{}", json);
        }
        Command::Check { file } => {
            let source = read_source(&file)?;
            parse_named(&file, &source)?;
            println!("{}: ok", file.display());
        }
    }
    Ok(())
}

fn read_source(file: &Path) -> Result<String> {
    fs::read_to_string(file)
        .into_diagnostic()
        .wrap_err_with(|| format!("could not read {}", file.display()))
}

// Attach the file as named source so parse errors render with a labeled
// snippet of the offending line.
fn parse_named<'src>(file: &Path, source: &'src str) -> Result<parser::Document<'src>> {
    parser::parse(source).map_err(|err| {
        miette::Report::new(err)
            .with_source_code(NamedSource::new(file.display().to_string(), source.to_string()))
    })
}
