pub mod logging;
pub mod report;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::types::DEFAULT_FIELD_SPEC_PATH;

/// Command-line arguments for dcmmerge
#[derive(Parser, Debug)]
#[command(name = "dcmmerge")]
#[command(about = "Merge DICOM metadata from a directory tree into a single CSV file")]
#[command(after_help = "Example: dcmmerge /path/to/shared_folder -o /path/to/output.csv")]
#[command(version)]
pub struct Cli {
    /// Directory searched recursively for .dcm files
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Output CSV path (default: results/<ROOT name>.csv)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// JSON document mapping column names to "(gggg,eeee)" tags
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_FIELD_SPEC_PATH)]
    pub tags: PathBuf,

    /// Format of the final run report
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Also write log lines to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Exit with a non-zero status when any file was skipped
    #[arg(long)]
    pub fail_on_skip: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}
