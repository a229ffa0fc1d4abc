//! CLI entry point for the housing EDA tooling.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use housing_eda::{
    DashboardConfig, DriftThresholds, ProfilingReport, RenderableViewModel, build_view_model,
    source,
};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "EDA report ingestion and rendering for the housing-price dashboard",
    long_about = "Turns profiling artifacts into chart-ready view models.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  EDA_API_URL           Base URL of the prediction/analytics API\n  \
                  EDA_TIMEOUT_SECS      Request timeout in seconds\n  \
                  EDA_HISTOGRAM_BINS    Histogram bins for local profiling\n\n\
                  EXAMPLES:\n  \
                  # Render a profiling artifact\n  \
                  housing-eda render data/reports/eda_data.json\n\n  \
                  # Profile a CSV locally and write the artifact\n  \
                  housing-eda profile data/housing.csv -o eda_data.json\n\n  \
                  # KS drift between two CSVs, as JSON\n  \
                  housing-eda --json drift data/train.csv data/recent.csv"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print JSON to stdout instead of a human-readable summary
    ///
    /// Disables all logging so stdout only carries the JSON document.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the view model of a profiling artifact
    Render {
        /// Path to the profiling report JSON
        report: PathBuf,
    },

    /// Profile a CSV file locally
    Profile {
        /// Path to the CSV file
        input: PathBuf,

        /// Write the profiling report JSON here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Histogram bins (overrides EDA_HISTOGRAM_BINS)
        #[arg(long)]
        bins: Option<usize>,
    },

    /// Per-feature KS drift of a current CSV against a baseline CSV
    Drift {
        /// Training / reference data
        baseline: PathBuf,

        /// Recent data to test
        current: PathBuf,

        /// P-value below which drift is high severity
        #[arg(long, default_value = "0.01")]
        high: f64,

        /// P-value below which drift is medium severity
        #[arg(long, default_value = "0.05")]
        medium: f64,
    },

    /// Fetch a payload from the prediction/analytics API
    #[cfg(feature = "fetch")]
    Fetch {
        #[command(subcommand)]
        what: FetchTarget,
    },
}

#[cfg(feature = "fetch")]
#[derive(Subcommand, Debug)]
enum FetchTarget {
    /// The latest profiling artifact, rendered
    Report,
    /// Prediction counters and recent activity
    Stats,
    /// Mean-shift drift of recent predictions
    Drift {
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Active drift alerts of the last days
    Alerts {
        #[arg(long, default_value = "7")]
        days: u32,
    },
    /// Experiment runs, compared
    Runs {
        #[arg(long, default_value = housing_eda::client::DEFAULT_EXPERIMENT)]
        experiment: String,
        #[arg(long, default_value = "10")]
        limit: u32,
    },
    /// Feature importance of the production model
    Importance,
    /// Histogram of one feature
    Distribution {
        feature: String,
        #[arg(long, default_value = "30")]
        bins: usize,
    },
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    dotenv().ok();

    let config = DashboardConfig::from_env().context("Invalid environment configuration")?;

    match &args.command {
        Command::Render { report } => run_render(report, &config, args.json),
        Command::Profile {
            input,
            output,
            bins,
        } => run_profile(input, output.as_deref(), *bins, config, args.json),
        Command::Drift {
            baseline,
            current,
            high,
            medium,
        } => {
            let config = DashboardConfig {
                drift_thresholds: DriftThresholds {
                    high: *high,
                    medium: *medium,
                },
                ..config
            };
            config.validate()?;
            run_drift(baseline, current, &config, args.json)
        }
        #[cfg(feature = "fetch")]
        Command::Fetch { what } => run_fetch(what, &config, args.json),
    }
}

fn read_report(path: &Path) -> Result<ProfilingReport> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(ProfilingReport::from_json(&text)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_render(path: &Path, config: &DashboardConfig, json: bool) -> Result<()> {
    info!("Loading report from: {}", path.display());
    let report = read_report(path)?;
    let view = build_view_model(&report, config);
    if json {
        return print_json(&view);
    }
    print_summary(&view);
    Ok(())
}

fn run_profile(
    input: &Path,
    output: Option<&Path>,
    bins: Option<usize>,
    config: DashboardConfig,
    json: bool,
) -> Result<()> {
    let config = match bins {
        Some(bins) => {
            let config = DashboardConfig {
                histogram_bins: bins,
                ..config
            };
            config.validate()?;
            config
        }
        None => config,
    };

    info!("Profiling: {}", input.display());
    let report = source::profile_csv(input, &config)?;

    if let Some(output) = output {
        std::fs::write(output, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!("Report written to: {}", output.display());
    }

    if json {
        return print_json(&report);
    }
    print_summary(&build_view_model(&report, &config));
    Ok(())
}

fn run_drift(baseline: &Path, current: &Path, config: &DashboardConfig, json: bool) -> Result<()> {
    let baseline = source::load_csv(baseline)?;
    let current = source::load_csv(current)?;
    let report = source::detect_frame_drift(&baseline, &current, config)?;
    if json {
        return print_json(&report);
    }

    println!("\n{}", "=".repeat(60));
    println!(
        "FEATURE DRIFT  score {:.2}  overall: {}",
        report.drift_score,
        if report.overall_drift { "DRIFT" } else { "OK" }
    );
    println!("{}", "=".repeat(60));
    println!(
        "{:<16} {:>10} {:>10} {:<8}",
        "Feature", "KS", "p-value", "Severity"
    );
    println!("{}", "-".repeat(48));
    for row in report.rows(&config.drift_thresholds) {
        println!(
            "{:<16} {:>10.4} {:>10.4} {:<8}",
            row.feature,
            row.statistic,
            row.p_value,
            row.severity.as_str()
        );
    }
    Ok(())
}

/// Human-readable digest of a view model.
///
/// Uses `println!` intentionally: this is the command's output, not logging.
fn print_summary(view: &RenderableViewModel) {
    println!("\n{}", "=".repeat(60));
    println!("{}", if view.title.is_empty() { "EDA report" } else { view.title.as_str() });
    println!("{}", "=".repeat(60));
    for card in &view.overview {
        println!("  {:<26} {}", card.label, card.value);
    }

    println!("\nVARIABLES");
    println!("{}", "-".repeat(60));
    for card in &view.variables {
        let shape = card
            .numeric()
            .and_then(|n| n.skewness.as_ref())
            .map(|s| s.label.as_str())
            .unwrap_or("-");
        println!(
            "  {:<16} {:<12} missing {:>6.2}%  {}",
            card.name,
            card.type_name,
            card.p_missing * 100.0,
            shape
        );
    }

    for heatmap in &view.heatmaps {
        println!("\nTOP CORRELATIONS ({})", heatmap.method);
        println!("{}", "-".repeat(60));
        for pair in &heatmap.top_pairs {
            println!("  {:<16} {:<16} {:>6.2}", pair.a, pair.b, pair.value);
        }
    }

    if !view.alerts.is_empty() {
        println!("\nALERTS");
        println!("{}", "-".repeat(60));
        for alert in &view.alerts {
            println!("  {alert}");
        }
    }

    if !view.defects.is_empty() {
        println!("\nDEFECTS");
        println!("{}", "-".repeat(60));
        for defect in &view.defects {
            println!("  {}: {}", defect.location, defect.defect);
        }
    }
}

#[cfg(feature = "fetch")]
fn run_fetch(what: &FetchTarget, config: &DashboardConfig, json: bool) -> Result<()> {
    use housing_eda::{
        DashboardClient, active_alerts, compare_runs, drift_score_status, rank_feature_importance,
    };

    let client = DashboardClient::new(config)?;
    let runtime = tokio::runtime::Runtime::new()?;
    info!("Fetching from: {}", client.base_url());

    runtime.block_on(async {
        match what {
            FetchTarget::Report => {
                let report = client.profiling_report().await?;
                let view = build_view_model(&report, config);
                if json {
                    return print_json(&view);
                }
                print_summary(&view);
            }
            FetchTarget::Stats => {
                let stats = client.monitoring_stats().await?;
                if json {
                    return print_json(&stats);
                }
                println!("  {:<22} {}", "Total predictions", stats.total_predictions);
                println!("  {:<22} {:.1}", "Uptime (h)", stats.uptime_hours);
                println!("  {:<22} {:.1}", "Predictions per hour", stats.predictions_per_hour);
                for (name, value) in stats.prediction_stats.iter().chain(&stats.inference_stats) {
                    println!("  {name:<22} {value:.3}");
                }
                if let Some(last) = &stats.last_prediction_time {
                    println!("  {:<22} {last}", "Last prediction");
                }
            }
            FetchTarget::Alerts { days } => {
                let alerts = client.drift_alerts(*days).await?;
                if json {
                    return print_json(&alerts);
                }
                for alert in active_alerts(&alerts) {
                    println!(
                        "  {:<8} {:<10} {:>6.3}  {}",
                        alert.severity.as_str(),
                        alert.feature,
                        alert.drift_score,
                        alert.recommendation.as_deref().unwrap_or("-")
                    );
                }
            }
            FetchTarget::Drift { threshold } => {
                let info = client.monitoring_drift(*threshold).await?;
                if json {
                    return print_json(&info);
                }
                println!("Drift: {}", drift_score_status(&info).badge());
            }
            FetchTarget::Runs { experiment, limit } => {
                let comparison = compare_runs(&client.runs(experiment, *limit).await?);
                if json {
                    return print_json(&comparison);
                }
                for best in &comparison.best {
                    println!("  best {:<12} {:<34} {:.4}", best.metric, best.run_id, best.value);
                }
            }
            FetchTarget::Importance => {
                let response = client.feature_importance().await?;
                let ranked = rank_feature_importance(&response.importances());
                if json {
                    return print_json(&ranked);
                }
                if ranked.is_empty() {
                    return Err(anyhow::anyhow!(
                        "{} has no feature importances",
                        response.model_type
                    ));
                }
                for item in &ranked {
                    println!(
                        "  {:>2}. {:<16} {:>6.1}%",
                        item.rank,
                        item.feature,
                        item.importance * 100.0
                    );
                }
            }
            FetchTarget::Distribution { feature, bins } => {
                let distribution = client.distribution(feature, *bins).await?;
                if json {
                    return print_json(&distribution);
                }
                let binding = housing_eda::bind_histogram(&distribution.histogram());
                for bin in &binding.bins {
                    println!("  {:<20} {}", bin.label, bin.count);
                }
            }
        }
        Ok::<_, anyhow::Error>(())
    })
}
