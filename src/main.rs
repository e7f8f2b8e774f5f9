//! EvBoard - rank prediction markets by expected value
//!
//! One-shot by default; `--watch` re-reads the feed on an interval until Ctrl-C.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use evboard::config::{AppConfig, LogConfig};
use evboard::feed::{FeedSnapshot, FileSource, ObservationSource, SampleSource};
use evboard::persistence::{export_csv, export_json};
use evboard::portfolio::{summarize, PortfolioSummary};
use evboard::report::render_text;

#[derive(Parser)]
#[command(name = "evboard")]
#[command(author, version, about = "Prediction-market EV ranking", long_about = None)]
struct Cli {
    /// Feed file (JSON or YAML); defaults to feed.path or the sample batch
    #[arg(short, long)]
    feed: Option<PathBuf>,

    /// Extra config file layered over config/default and config/local
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Number of ranked markets to print (0 = all)
    #[arg(long)]
    top: Option<usize>,

    /// Append the ranking to a CSV file
    #[arg(long)]
    export_csv: Option<PathBuf>,

    /// Write the summary to a JSON file
    #[arg(long)]
    export_json: Option<PathBuf>,

    /// Keep refreshing until Ctrl-C
    #[arg(short, long)]
    watch: bool,

    /// Refresh interval in seconds for --watch
    #[arg(long)]
    interval: Option<u64>,

    /// Fail instead of substituting the sample batch when the feed is unreadable
    #[arg(long)]
    no_fallback: bool,
}

struct Outputs {
    json: bool,
    top: usize,
    export_csv: Option<PathBuf>,
    export_json: Option<PathBuf>,
}

fn init_logging(cfg: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if cfg.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_summary(summary: &PortfolioSummary, outputs: &Outputs) -> Result<()> {
    if outputs.json {
        let json = serde_json::to_string_pretty(summary).context("Failed to serialize summary")?;
        println!("{}", json);
    } else {
        print!("{}", render_text(summary, outputs.top));
    }
    Ok(())
}

fn run_cycle(
    snapshot: &mut FeedSnapshot,
    source: &dyn ObservationSource,
    outputs: &Outputs,
) -> Result<PortfolioSummary> {
    let origin = snapshot.refresh(source)?;
    let summary = summarize(snapshot.observations());

    info!(
        origin = %origin,
        markets = summary.total,
        positive_ev = summary.positive_ev_count,
        tradeable = summary.tradeable_count,
        alert = %summary.alert_tier,
        "Summary computed"
    );

    print_summary(&summary, outputs)?;

    if let Some(path) = &outputs.export_csv {
        export_csv(&summary, path)?;
    }
    if let Some(path) = &outputs.export_json {
        export_json(&summary, path)?;
    }

    Ok(summary)
}

async fn watch(
    snapshot: &mut FeedSnapshot,
    source: &dyn ObservationSource,
    outputs: &Outputs,
    interval_secs: u64,
) -> Result<()> {
    info!(interval_secs, "Watching feed, Ctrl-C to stop");
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = run_cycle(snapshot, source, outputs) {
                    error!(error = %e, "Refresh cycle failed");
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown requested");
                break;
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    init_logging(&config.log);
    info!(config = %config, "EvBoard starting");

    let feed_path = cli
        .feed
        .clone()
        .or_else(|| config.feed.path.as_ref().map(PathBuf::from));
    let source: Box<dyn ObservationSource> = match &feed_path {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(SampleSource),
    };

    let auto_csv = config
        .persistence
        .csv_enabled
        .then(|| Path::new(&config.persistence.export_dir).join("rankings.csv"));

    let outputs = Outputs {
        json: cli.json || config.report.format == "json",
        top: cli.top.unwrap_or(config.report.top),
        export_csv: cli.export_csv.clone().or(auto_csv),
        export_json: cli.export_json.clone(),
    };

    let mut snapshot = FeedSnapshot::new(config.feed.fallback_to_sample && !cli.no_fallback);

    if cli.watch {
        let interval = cli
            .interval
            .unwrap_or(config.feed.refresh_interval_secs)
            .max(1);
        watch(&mut snapshot, source.as_ref(), &outputs, interval).await
    } else {
        run_cycle(&mut snapshot, source.as_ref(), &outputs)?;
        Ok(())
    }
}
