//! Runs one subcommand against the engine and renders its results.

use anyhow::{bail, Chain, Result};
use chrono::Local;
use softrm_core::{
    print_size, sanitize_user_path, CoreError, DeletionReceipt, FileSystem, FlushReport, FlushRequest,
    GroupSummary, RestoreOutcome, Trash, DISPLAY_TIME_FORMAT,
};
use std::io::Write;

use crate::cli::Commands;

pub fn execute<F: FileSystem>(trash: &Trash<F>, command: Commands, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Rm(args) => {
            let receipt = trash.delete(&args.paths)?;
            write_receipt(out, &receipt)?;
        }
        Commands::Ls => write_listing(out, &trash.list()?)?,
        Commands::Restore(args) => {
            let outcomes = trash.restore(&args.ids)?;
            write_restores(out, &outcomes)?;
        }
        Commands::Flush(args) => {
            let request = if args.all {
                FlushRequest::All
            } else {
                FlushRequest::Selected(args.ids)
            };
            let report = trash.flush(request)?;
            write_flush(out, &report)?;
        }
    }
    Ok(())
}

fn write_receipt(out: &mut impl Write, receipt: &DeletionReceipt) -> Result<()> {
    writeln!(
        out,
        "All files were moved to directory {}",
        sanitize_user_path(&receipt.group.container)
    )?;
    writeln!(out, "Deletion group ID: {}", receipt.group.id())?;
    writeln!(out, "rm operation successfully completed.")?;
    Ok(())
}

fn write_listing(out: &mut impl Write, groups: &[GroupSummary]) -> Result<()> {
    writeln!(out, "{:<16}{:<22}{:>9}  {}", "DELETION ID", "DELETION TIME", "SIZE", "ORIGINAL LOCATION")?;
    for summary in groups {
        let time = summary
            .group
            .created()
            .with_timezone(&Local)
            .format(DISPLAY_TIME_FORMAT)
            .to_string();
        let size = summary.size_bytes.map(print_size).unwrap_or_else(|| "?".to_string());
        let origin = summary
            .original_root
            .as_deref()
            .map(sanitize_user_path)
            .unwrap_or_else(|| "?".to_string());
        writeln!(out, "{:<16}{:<22}{:>9}  {}", summary.group.id(), time, size, origin)?;
    }
    Ok(())
}

fn write_restores(out: &mut impl Write, outcomes: &[RestoreOutcome]) -> Result<()> {
    let mut failed = 0;
    for outcome in outcomes {
        match &outcome.result {
            Ok(report) => writeln!(
                out,
                "Restoration of {} completed successfully ({} items to {})",
                outcome.requested,
                report.restored.len(),
                sanitize_user_path(&report.restore_root)
            )?,
            Err(err) => {
                failed += 1;
                writeln!(out, "Restoration of {} failed: {}", outcome.requested, describe(err))?;
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} restorations failed", outcomes.len());
    }
    Ok(())
}

fn write_flush(out: &mut impl Write, report: &FlushReport) -> Result<()> {
    match report {
        FlushReport::All { removed } => writeln!(out, "Trash emptied, {removed} entries removed.")?,
        FlushReport::Selected(outcomes) => {
            for outcome in outcomes {
                match &outcome.result {
                    Ok(()) => writeln!(out, "Flushed {}", outcome.group.id())?,
                    Err(err) => writeln!(out, "Flushing {} failed: {}", outcome.group.id(), describe(err))?,
                }
            }
        }
    }
    let failed = report.failure_count();
    if failed > 0 {
        bail!("{failed} deletion groups could not be flushed");
    }
    Ok(())
}

/// Renders an error followed by its causes, like `{:#}` does for anyhow.
fn describe(err: &CoreError) -> String {
    Chain::new(err)
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}
