//! Command-line interface definitions for softrm.
//!
//! ```bash
//! softrm rm tempfile.txt ../old-build
//! softrm ls
//! softrm restore k2j4
//! softrm flush k2j4 q9x1
//! softrm flush --all
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Move files to a trash directory instead of deleting them.
#[derive(Debug, Parser)]
#[command(name = "softrm")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Trash directory to use (overrides the config file)
    #[arg(long, value_name = "DIR", global = true, env = "SOFTRM_TRASH_DIR")]
    pub trash_dir: Option<String>,

    /// Config file to read instead of the default location
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Move file(s) to trash
    ///
    /// Relative paths are resolved against the current directory; absolute
    /// paths are supported as well. All given paths form one deletion group.
    Rm(RmArgs),
    /// List deletion groups in the trash
    Ls,
    /// Restore deletion groups to their original location
    ///
    /// An ID may be shortened to any prefix that names a single group.
    Restore(RestoreArgs),
    /// Delete deletion groups permanently
    ///
    /// Flushed files cannot be recovered with this tool. No shredding is
    /// done; use a specialised tool if you need it.
    Flush(FlushArgs),
}

#[derive(Debug, Args)]
pub struct RmArgs {
    /// Files or directories to move to trash
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RestoreArgs {
    /// Deletion group IDs (or unique prefixes)
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,
}

#[derive(Debug, Args)]
pub struct FlushArgs {
    /// Deletion group IDs (or unique prefixes)
    #[arg(value_name = "ID", required_unless_present = "all")]
    pub ids: Vec<String>,

    /// Permanently delete all files from trash
    #[arg(long, conflicts_with = "ids")]
    pub all: bool,
}
