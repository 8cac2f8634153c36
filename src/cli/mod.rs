//! Command-line interface for grepzip
//!
//! `grepzip path [pattern] [zipFile]`: scan `path`, select files with a line
//! matching `pattern`, and zip them into `zipFile`.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{self, Binding};
use crate::matcher::MatchMode;

mod search;

/// Search a directory tree for files whose lines match a regex and zip them
#[derive(Parser)]
#[command(name = "grepzip")]
#[command(author, version, about, long_about = None)]
#[command(override_usage = "grepzip [OPTIONS] [PATH [PATTERN [ZIPFILE]]]")]
pub struct Cli {
    /// PATH to scan, then an optional PATTERN a whole line must match and an
    /// optional ZIPFILE to write. Options must come before PATH: every token
    /// from PATH on is taken literally, and tokens after ZIPFILE are ignored.
    #[arg(value_name = "ARGS", trailing_var_arg = true)]
    args: Vec<String>,

    /// Match the pattern anywhere in a line instead of against the whole line
    #[arg(long)]
    substring: bool,

    /// Follow symbolic links when scanning
    #[arg(long)]
    follow_symlinks: bool,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    verbose: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if cli.args.len() > 3 {
        tracing::debug!("Ignoring extra arguments: {:?}", &cli.args[3..]);
    }

    let mode = if cli.substring { MatchMode::Substring } else { MatchMode::WholeLine };

    match config::bind(cli.args.as_slice(), mode)? {
        Binding::Usage => {
            println!("{}", config::usage(env!("CARGO_PKG_NAME")));
            Ok(())
        }
        Binding::Search(cfg) => search::run(&cfg, cli.follow_symlinks),
    }
}
