use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod logging;

#[derive(Parser)]
#[command(
    name = "tankwatch",
    about = "Tank fleet monitoring, predictions and geospatial reports"
)]
struct Cli {
    /// Path to the run configuration YAML.
    #[arg(long, default_value = "tankwatch.yaml")]
    config: String,

    /// Override the data document path from the configuration.
    #[arg(long)]
    data: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every tank with its derived status, plus the fleet summary.
    Tanks,
    /// Show one tank with its quality assessment and trend analysis.
    Tank { tank_id: String },
    /// Print a tank's archived readings.
    History { tank_id: String },
    /// List alerts with per-kind counts.
    Alerts,
    /// Fleet-wide analytics rollup.
    Analytics,
    /// Trend analysis for one tank.
    Trends { tank_id: String },
    /// Water-quality projection for one tank.
    Predict { tank_id: String },
    /// Leakage/overflow detection for one tank.
    Leakage { tank_id: String },
    /// Cleaning recommendation for one tank.
    MaintenancePlan { tank_id: String },
    /// Seven-day demand forecast for the fleet.
    Demand,
    /// Rainwater harvesting estimate for the fleet.
    Rainwater,
    /// Ward aggregation as GeoJSON.
    Wards,
    /// A single ward's feature.
    Ward { ward_id: String },
    /// Heatmap points for a metric.
    Heatmap {
        #[arg(long)]
        metric: Option<String>,
    },
    /// Map markers and bounds.
    Map,
    /// Rule-based fleet recommendations.
    Recommend,
    /// Root-cause explanation for an alert.
    ExplainAlert { alert_id: String },
    /// Record a completed cleaning for a tank.
    UpdateMaintenance {
        tank_id: String,
        /// Cleaning date, YYYY-MM-DD.
        cleaned_date: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Export the fleet status snapshot to CSV.
    Export {
        #[arg(long)]
        out: Option<String>,
    },
    /// Drop the document cache and re-read the backing file.
    Reload,
}

fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();
    let mut config = config::RunConfig::load(&cli.config)?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }

    commands::run(&config, cli.command)
}
