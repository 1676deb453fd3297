//! Command-line argument definitions for the vsmap CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input table, the output base path
//! and formats, configuration file selection and logging verbosity.

use clap::Parser;

/// Command-line arguments for the vsmap value stream map tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input CSV file
    #[arg(help = "Path to the input CSV file")]
    pub input: String,

    /// Output base path; each format appends its own extension
    #[arg(short, long, default_value = "vsm")]
    pub output: String,

    /// Comma-separated output formats (pptx, pdf, svg)
    #[arg(short, long, default_value = "pptx,pdf")]
    pub format: String,

    /// Map title, defaults to the input file name
    #[arg(short, long)]
    pub title: Option<String>,

    /// Box spacing mode (uniform, cycle-time, wip), overrides the config file
    #[arg(long)]
    pub spacing: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
