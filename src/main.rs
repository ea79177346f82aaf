use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod error;
mod metadata;
mod settings;
mod state;
mod ui;

#[cfg(test)]
mod test_support;

use settings::Settings;
use state::aggregate::{GroupingPolicy, LensAggregate};
use state::scanner::Scanner;
use state::summary::{summarize, summarize_by_directory};
use ui::chart::{ChartBuilder, ChartOutcome};
use ui::report::{self, JsonReport};

/// Scan a photo library and chart focal-length usage per lens
#[derive(Parser, Debug)]
#[command(name = "focal-usage", version, about, long_about = None)]
struct Cli {
    /// Path to image directory
    dir: PathBuf,

    /// Save plots to focal_length_usage_per_lens.html/.png instead of showing them
    #[arg(long)]
    save_plot: bool,

    /// Print the report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Follow symbolic links while scanning
    #[arg(long)]
    follow_links: bool,

    /// Group focal lengths into buckets of this many millimetres
    #[arg(long, value_name = "MM")]
    bucket_width: Option<f64>,

    /// Number of files to read in parallel (1-1024)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..=1024))]
    jobs: u16,

    /// JSON settings file; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory saved plots are written to
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Log debug details, including every skipped file
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Load the settings file (if any) and apply flag overrides
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if self.follow_links {
            settings.scan.follow_links = true;
        }
        if let Some(width) = self.bucket_width {
            settings.grouping = GroupingPolicy::bucketed(width)?;
        }
        if let Some(dir) = &self.output_dir {
            settings.chart.output_dir = dir.clone();
        }

        Ok(settings)
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    info!("📷 focal-usage v{}", env!("CARGO_PKG_VERSION"));

    let settings = cli.settings()?;
    debug!("Effective settings:\n{}", settings.to_json()?);
    let scanner = Scanner::new(settings.scan.clone());

    let jobs = usize::from(cli.jobs);
    let scan = if jobs > 1 {
        scanner.scan_concurrent(&cli.dir, jobs).await?
    } else {
        scanner.scan(&cli.dir)?
    };

    if scan.is_empty() {
        info!("No image files found under {}", cli.dir.display());
    }

    let aggregate = LensAggregate::build(&scan, &settings.grouping);
    info!(
        "Aggregated {} photos across {} lenses",
        aggregate.total(),
        aggregate.lens_count()
    );

    if cli.json {
        let report = JsonReport::new(&scan, &aggregate);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !aggregate.is_empty() {
        print!("{}", report::directory_summary(&summarize_by_directory(&scan, &settings.grouping)));
        print!("{}", report::overall_overview(&summarize(&scan.records, &settings.grouping)));
    }

    let builder = ChartBuilder::new(settings.chart.clone());
    let outcome = builder
        .build(&aggregate, cli.save_plot)
        .context("failed to render charts")?;

    match outcome {
        ChartOutcome::NothingToChart if !cli.json => println!("nothing to chart"),
        ChartOutcome::NothingToChart => info!("nothing to chart"),
        ChartOutcome::Built(artifact) => match (&artifact.html_path, &artifact.png_path) {
            (Some(html), Some(png)) if !cli.json => {
                println!("Plots saved as {} and {}", html.display(), png.display());
            }
            (None, None) if !cli.json => print!("{}", ui::terminal::render(&artifact)),
            _ => {}
        },
    }

    if !cli.json {
        println!("{}", report::counts_line(&scan));
    }

    Ok(())
}
