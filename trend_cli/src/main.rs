mod loader;
mod report;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trend_core::{TimeSeries, TrendConfig, TrendEstimator};

use loader::ColumnSpec;
use report::AreaSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "trend_cli",
    version,
    about = "Rolling exponential trend estimates for daily count series",
    long_about = None
)]
struct Cli {
    /// CSV file, or a directory holding one CSV per area
    path: PathBuf,

    /// Name of the date column
    #[arg(long, default_value = "date")]
    date_column: String,

    /// Name of the value column
    #[arg(long, default_value = "value")]
    value_column: String,

    /// chrono format of the date column
    #[arg(long, default_value = "%Y-%m-%d")]
    date_format: String,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the smoothing window
    #[arg(long)]
    smooth: Option<usize>,

    /// Override the fit window
    #[arg(long)]
    window: Option<usize>,

    /// Values are cumulative totals; fit their daily increments
    #[arg(long, default_value = "false")]
    cumulative: bool,

    /// Days past the last date to project the latest fit
    #[arg(long, default_value = "7", value_parser = clap::value_parser!(i64).range(0..=3650))]
    project: i64,

    /// Directory for per-area <area>_trend.csv files
    #[arg(long)]
    output: Option<PathBuf>,

    /// Summary format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log format
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.log_format, cli.verbose);

    let config = load_config(&cli)?;
    let estimator = TrendEstimator::new(config)?;
    tracing::debug!(
        config = ?estimator.config(),
        lag = estimator.window_lag(),
        "estimator ready"
    );
    let columns = ColumnSpec {
        date_column: cli.date_column.clone(),
        value_column: cli.value_column.clone(),
        date_format: cli.date_format.clone(),
    };

    if let Some(dir) = &cli.output {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {:?}", dir))?;
    }

    let inputs = loader::collect_inputs(&cli.path)?;
    if inputs.is_empty() {
        tracing::warn!(path = ?cli.path, "no csv files found");
    }

    let mut failures = 0;
    for path in &inputs {
        tracing::info!(file = ?path, "processing");
        // one bad area must not stop the others
        if let Err(e) = process_csv_file(path, &cli, &columns, &estimator) {
            tracing::error!(file = ?path, "{:#}", e);
            failures += 1;
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} inputs failed", failures, inputs.len());
    }
    Ok(())
}

fn setup_tracing(format: LogFormat, verbose: bool) {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("trend_cli=debug,trend_core=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("trend_cli=info,trend_core=info,warn")
    };

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn load_config(cli: &Cli) -> Result<TrendConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {:?}", path))?;
            TrendConfig::from_json_str(&text)?
        }
        None => TrendConfig::default(),
    };
    if let Some(n) = cli.smooth {
        config.smooth_window = n;
    }
    if let Some(w) = cli.window {
        config.fit_window = w;
    }
    config.validate()?;
    Ok(config)
}

fn area_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("series")
        .to_string()
}

fn process_csv_file(
    path: &Path,
    cli: &Cli,
    columns: &ColumnSpec,
    estimator: &TrendEstimator,
) -> Result<()> {
    let mut series: TimeSeries = loader::load_csv_file(path, columns)?;
    if cli.cumulative {
        // increments are only per day once every date is present
        series = estimator.prepare(&series).daily_increments();
    }

    let area = area_name(path);
    let report = estimator
        .estimate(&series)
        .with_context(|| format!("estimating {}", area))?;

    match cli.format {
        OutputFormat::Text => println!("{}", report::summary_line(&area, &report)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(&AreaSummary::new(&area, &report, cli.project))?
        ),
    }

    if let Some(dir) = &cli.output {
        let file_path = dir.join(format!("{}_trend.csv", area));
        report::write_csv(&file_path, &report)?;
        tracing::info!(file = ?file_path, "saved");
    }

    Ok(())
}
