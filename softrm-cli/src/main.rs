//! softrm - safe delete front end.

mod cli;
mod commands;
mod config;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use softrm_core::Trash;

use crate::cli::Cli;
use crate::config::{resolve_trash_config, FileConfig};

fn run(cli: Cli) -> Result<()> {
    let file_config = FileConfig::load(cli.config.as_deref())?;
    let cwd = std::env::current_dir().context("failed to read the current directory")?;
    let trash_config = resolve_trash_config(cli.trash_dir.as_deref(), &file_config, &cwd)?;
    let trash = Trash::new(trash_config);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::execute(&trash, cli.command, &mut out)
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        eprintln!("Aborting.");
        std::process::exit(1);
    }
}
