use crate::config::RunConfig;
use crate::Command;
use anyhow::{Context, Result};
use chrono::Local;
use log::info;
use serde::Serialize;
use serde_json::json;
use tankwatch_core::{
    advisor, analytics,
    error::TankwatchError,
    export::StatusCsvExporter,
    map, predict, status,
    store::TankStore,
    trends, wards,
};

pub fn run(config: &RunConfig, command: Command) -> Result<()> {
    let store = TankStore::open(&config.data_path);
    let today = Local::now().date_naive();

    match command {
        Command::Tanks => {
            let fleet = status::fleet_status(&store.tanks()?, today);
            let summary = status::summarize(&fleet);
            print_json(&json!({ "tanks": fleet, "summary": summary }))
        }
        Command::Tank { tank_id } => {
            let tank = store.find_tank(&tank_id)?;
            let view = status::with_status(&tank, today);
            let analysis = analytics::assess_water_quality(&view);
            let trend = trend_or_marker(&tank)?;
            print_json(&json!({ "tank": view, "analysis": analysis, "trend": trend }))
        }
        Command::History { tank_id } => {
            print_json(&json!({ "history": store.history(&tank_id)? }))
        }
        Command::Alerts => {
            let alerts = store.alerts()?;
            let summary = analytics::summarize_alerts(&alerts);
            print_json(&json!({ "alerts": alerts, "summary": summary }))
        }
        Command::Analytics => {
            let fleet = status::fleet_status(&store.tanks()?, today);
            print_json(&analytics::system_analytics(&fleet, &store.alerts()?))
        }
        Command::Trends { tank_id } => {
            let tank = store.find_tank(&tank_id)?;
            print_json(&trend_or_marker(&tank)?)
        }
        Command::Predict { tank_id } => {
            let tank = store.find_tank(&tank_id)?;
            print_json(&predict::quality::predict(
                &tank.current_readings,
                &tank.history,
            ))
        }
        Command::Leakage { tank_id } => {
            let tank = store.find_tank(&tank_id)?;
            print_json(&predict::anomaly::detect(
                tank.current_level_percent,
                &tank.history,
            ))
        }
        Command::MaintenancePlan { tank_id } => {
            let tank = store.find_tank(&tank_id)?;
            let view = status::with_status(&tank, today);
            print_json(&predict::maintenance::recommend(
                tank.current_readings.turbidity,
                view.days_since_cleaned,
                today,
            ))
        }
        Command::Demand => print_json(&predict::demand::forecast(&store.tanks()?, today)),
        Command::Rainwater => print_json(&predict::harvest::estimate(&store.tanks()?)),
        Command::Wards => {
            let fleet = status::fleet_status(&store.tanks()?, today);
            print_json(&wards::ward_geojson(&fleet))
        }
        Command::Ward { ward_id } => {
            let fleet = status::fleet_status(&store.tanks()?, today);
            print_json(&wards::ward_details(&fleet, &ward_id)?)
        }
        Command::Heatmap { metric } => {
            let fleet = status::fleet_status(&store.tanks()?, today);
            let metric = metric.unwrap_or_else(|| config.heatmap_metric.clone());
            print_json(&map::heatmap(&fleet, &metric))
        }
        Command::Map => {
            let fleet = status::fleet_status(&store.tanks()?, today);
            print_json(&map::map_data(&fleet))
        }
        Command::Recommend => {
            let fleet = status::fleet_status(&store.tanks()?, today);
            print_json(&advisor::fleet_recommendations(&fleet))
        }
        Command::ExplainAlert { alert_id } => {
            print_json(&advisor::explain(&store.alerts()?, &alert_id)?)
        }
        Command::UpdateMaintenance {
            tank_id,
            cleaned_date,
            notes,
        } => {
            let tank = store.update_maintenance(&tank_id, &cleaned_date, notes.as_deref())?;
            print_json(&json!({
                "message": format!("Maintenance updated for {tank_id}"),
                "tank": status::with_status(&tank, today),
            }))
        }
        Command::Export { out } => {
            let fleet = status::fleet_status(&store.tanks()?, today);
            let path = out.unwrap_or_else(|| config.export_path.clone());
            let mut exporter = StatusCsvExporter::new(&path)
                .with_context(|| format!("Failed to create export file '{path}'"))?;
            exporter.write_snapshot(&fleet)?;
            info!("exported {} tanks to {path}", fleet.len());
            print_json(&json!({ "exported": path, "tanks": fleet.len() }))
        }
        Command::Reload => {
            store.reload()?;
            print_json(&json!({ "status": "Data reloaded successfully" }))
        }
    }
}

/// Trend analysis degrades to an explicit marker when a tank has too little
/// history; a thin fleet is not an error at this boundary.
fn trend_or_marker(tank: &tankwatch_schemas::tank::Tank) -> Result<serde_json::Value> {
    match trends::analyze(tank) {
        Ok(report) => Ok(serde_json::to_value(report)?),
        Err(TankwatchError::InsufficientHistory { .. }) => {
            Ok(json!({ "trend": "insufficient_data" }))
        }
        Err(e) => Err(e.into()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
