mod cli;

use anyhow::Context;
use clap::Parser;
use indicatif::ProgressBar;
use tracing::{error, info, warn};

use cli::{Cli, Commands, NdviArgs, SummaryArgs};
use wave_tally::audio::{check_directory, CheckStatus};
use wave_tally::ndvi::{self, EventWindow, SiteNames};
use wave_tally::{aggregate_with_progress, export, logging, progress, ScanOptions};

fn main() {
    let args = Cli::parse();
    logging::init_logger(logging::level(args.verbose, args.quiet));

    let result = match args.command {
        Commands::Summary(summary) => run_summary(&summary),
        Commands::Check { dir } => run_check(&dir),
        Commands::Ndvi(ndvi) => run_ndvi(&ndvi),
    };

    if let Err(err) = result {
        error!("{:#}", err);
        std::process::exit(1);
    }
}

fn run_summary(args: &SummaryArgs) -> anyhow::Result<()> {
    let mut options = ScanOptions::default()
        .with_recursive(args.recursive)
        .with_extension_filter(args.ext.as_deref());
    if !args.hidden_prefixes.is_empty() {
        options = options.with_hidden_prefixes(args.hidden_prefixes.iter().cloned());
    }

    let pb = if args.no_progress {
        ProgressBar::hidden()
    } else {
        progress::bar(0)
    };
    let report = aggregate_with_progress(&args.root, &options, &pb)?;

    if !report.warnings().is_empty() {
        warn!("{} files were skipped or had no readable duration", report.warnings().len());
    }

    export::export_report(&report, &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    Ok(())
}

fn run_check(dir: &std::path::Path) -> anyhow::Result<()> {
    let outcomes = check_directory(dir)?;
    let mut corrupt = 0usize;
    for outcome in &outcomes {
        match &outcome.status {
            CheckStatus::Ok { .. } => println!("{}: OK", outcome.file_name()),
            CheckStatus::Corrupt { cause } => {
                corrupt += 1;
                println!(
                    "{}: WAV file is corrupt or unreadable - {}",
                    outcome.file_name(),
                    cause
                );
            }
        }
    }
    println!("{} WAV files checked, {} unreadable", outcomes.len(), corrupt);
    Ok(())
}

fn run_ndvi(args: &NdviArgs) -> anyhow::Result<()> {
    let sites: SiteNames = args.sites.iter().cloned().collect();
    let window = EventWindow::parse(&args.anchor, args.months)?;
    let (start, end) = window.bounds()?;

    let records = ndvi::load_series(&args.series, &sites)?;
    let labeled = window.apply(&records)?;
    info!(
        "{} of {} records fall between {} and {}",
        labeled.len(),
        records.len(),
        start,
        end
    );

    let file = std::fs::File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    ndvi::write_records(&labeled, file)?;

    for s in ndvi::summarize(&labeled) {
        println!(
            "{:<24} {:<6} n={:<4} mean={:.3} min={:.3} max={:.3}",
            s.site, s.period, s.count, s.mean, s.min, s.max
        );
    }
    println!("Windowed records saved to: {}", args.output.display());
    Ok(())
}
