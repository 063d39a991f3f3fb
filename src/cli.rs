use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "wave-tally")]
#[command(about = "Tally field recordings and compare index series around an event", long_about = None)]
pub struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Count files, sizes and WAV durations per subfolder and write a CSV summary
    Summary(SummaryArgs),
    /// Try to open every WAV file under a directory and report unreadable ones
    Check {
        /// Directory to search recursively
        dir: PathBuf,
    },
    /// Window NDVI series around an event date and label records before/after it
    Ndvi(NdviArgs),
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Directory whose immediate subfolders become rows
    pub root: PathBuf,

    /// Destination CSV file
    pub output: PathBuf,

    /// Include files at any depth under each subfolder
    #[arg(short, long)]
    pub recursive: bool,

    /// Only count files with this extension, e.g. `wav`
    #[arg(short, long)]
    pub ext: Option<String>,

    /// Skip files whose names start with this prefix (repeatable, default `._`)
    #[arg(long = "hidden-prefix")]
    pub hidden_prefixes: Vec<String>,

    /// Do not draw a progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Debug, Args)]
pub struct NdviArgs {
    /// Series CSV files; the site key is the file name up to the first `_`
    #[arg(required = true)]
    pub series: Vec<PathBuf>,

    /// Event date, e.g. 2017-09-06
    #[arg(long)]
    pub anchor: String,

    /// Calendar months kept on each side of the event
    #[arg(long, default_value_t = 6)]
    pub months: u32,

    /// Destination CSV for the windowed records
    #[arg(short, long)]
    pub output: PathBuf,

    /// Display name for a site key, as KEY=NAME (repeatable)
    #[arg(long = "site", value_parser = parse_site)]
    pub sites: Vec<(String, String)>,
}

fn parse_site(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(k, _)| !k.is_empty())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=NAME, got {raw:?}"))
}
