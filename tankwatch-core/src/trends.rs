use crate::error::TankwatchError;
use serde::{Deserialize, Serialize};
use tankwatch_schemas::tank::Tank;

/// Direction of a metric between the oldest and newest history sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

/// Labels a last-minus-first delta. The comparison is strict: a delta equal
/// to the threshold is still stable.
fn label(delta: f64, threshold: f64) -> Trend {
    if delta > threshold {
        Trend::Increasing
    } else if -delta > threshold {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub tank_id: String,
    pub ph_trend: Trend,
    pub turbidity_trend: Trend,
    pub temperature_trend: Trend,
    pub data_points: usize,
}

/// Compares the newest history sample against the oldest.
///
/// Requires at least two samples; thresholds are 0.3 for pH and 1.0 for
/// turbidity and temperature.
pub fn analyze(tank: &Tank) -> Result<TrendReport, TankwatchError> {
    let history = &tank.history;
    if history.len() < 2 {
        return Err(TankwatchError::InsufficientHistory {
            required: 2,
            actual: history.len(),
        });
    }

    let oldest = &history[0];
    let newest = &history[history.len() - 1];

    Ok(TrendReport {
        tank_id: tank.id.clone(),
        ph_trend: label(newest.ph - oldest.ph, 0.3),
        turbidity_trend: label(newest.turbidity - oldest.turbidity, 1.0),
        temperature_trend: label(newest.temperature - oldest.temperature, 1.0),
        data_points: history.len(),
    })
}
