use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tankwatch_schemas::tank::{SensorReadings, Tank};

/// Tank health verdict, derived fresh on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Normal,
    Warning,
    Critical,
}

impl HealthStatus {
    /// Discrete score used by ward aggregation and heatmaps.
    pub fn health_score(self) -> u32 {
        match self {
            HealthStatus::Critical => 30,
            HealthStatus::Warning => 60,
            HealthStatus::Normal => 90,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Normal => "normal",
            HealthStatus::Warning => "warning",
            HealthStatus::Critical => "critical",
        }
    }
}

/// Days elapsed since the last cleaning. Negative when the recorded date
/// lies in the future; a negative age contributes no risk.
pub fn days_since_cleaned(last_cleaned: NaiveDate, today: NaiveDate) -> i64 {
    (today - last_cleaned).num_days()
}

/// Days until the next scheduled maintenance. Negative means overdue.
pub fn days_until_maintenance(next_maintenance: NaiveDate, today: NaiveDate) -> i64 {
    (next_maintenance - today).num_days()
}

/// Classifies a tank from its current readings and cleaning age.
///
/// All comparisons are strict, so a reading sitting exactly on a threshold
/// does not trip it.
pub fn classify(readings: &SensorReadings, days_since_cleaned: i64) -> HealthStatus {
    let ph = readings.ph;
    let turbidity = readings.turbidity;

    if turbidity > 7.0 || ph < 6.0 || ph > 9.0 || days_since_cleaned > 60 {
        HealthStatus::Critical
    } else if turbidity > 5.0 || ph < 6.5 || ph > 8.5 || days_since_cleaned > 30 {
        HealthStatus::Warning
    } else {
        HealthStatus::Normal
    }
}

/// A tank enriched with its derived health figures.
///
/// Never cached across requests: "today" moves, so the derivation is redone
/// on every read.
#[derive(Debug, Clone, Serialize)]
pub struct TankStatus {
    #[serde(flatten)]
    pub tank: Tank,
    pub status: HealthStatus,
    pub days_since_cleaned: i64,
    pub days_until_maintenance: i64,
}

pub fn with_status(tank: &Tank, today: NaiveDate) -> TankStatus {
    let age = days_since_cleaned(tank.last_cleaned, today);
    TankStatus {
        status: classify(&tank.current_readings, age),
        days_since_cleaned: age,
        days_until_maintenance: days_until_maintenance(tank.next_maintenance, today),
        tank: tank.clone(),
    }
}

pub fn fleet_status(tanks: &[Tank], today: NaiveDate) -> Vec<TankStatus> {
    tanks.iter().map(|t| with_status(t, today)).collect()
}

/// Status head-count over the fleet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetSummary {
    pub total: usize,
    pub normal: usize,
    pub warning: usize,
    pub critical: usize,
    pub avg_level: f64,
}

pub fn summarize(tanks: &[TankStatus]) -> FleetSummary {
    let total = tanks.len();
    let count = |status: HealthStatus| tanks.iter().filter(|t| t.status == status).count();
    let avg_level = if total > 0 {
        tanks
            .iter()
            .map(|t| f64::from(t.tank.current_level_percent))
            .sum::<f64>()
            / total as f64
    } else {
        0.0
    };
    FleetSummary {
        total,
        normal: count(HealthStatus::Normal),
        warning: count(HealthStatus::Warning),
        critical: count(HealthStatus::Critical),
        avg_level,
    }
}
