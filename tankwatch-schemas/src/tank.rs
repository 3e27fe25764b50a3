use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Geographic position of a tank, as supplied by the field survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

/// The most recent sensor sample for a tank.
///
/// `ph`, `turbidity` and `temperature` carry schema-level defaults so that a
/// document with a partially-equipped tank still deserializes to usable
/// values; the defaulting policy lives here and nowhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReadings {
    #[serde(default = "default_ph")]
    pub ph: f64,
    #[serde(default)]
    pub turbidity: f64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dissolved_oxygen: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chlorine: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

fn default_ph() -> f64 {
    7.0
}

fn default_temperature() -> f64 {
    20.0
}

impl Default for SensorReadings {
    fn default() -> Self {
        Self {
            ph: default_ph(),
            turbidity: 0.0,
            temperature: default_temperature(),
            dissolved_oxygen: None,
            chlorine: None,
            timestamp: None,
        }
    }
}

/// One archived sensor sample. A tank's history is chronological,
/// oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub ph: f64,
    pub turbidity: f64,
    pub temperature: f64,
}

/// Tank-side maintenance record, written by the maintenance update
/// transaction. Notes overwrite on each update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_cleaned: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A monitored water storage tank as persisted in the backing document.
///
/// Health status and the day counts derived from `last_cleaned` /
/// `next_maintenance` are intentionally absent: they depend on "today" and
/// are recomputed on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    pub id: String,
    pub name: String,
    pub location: Location,
    pub capacity_liters: u64,
    pub current_level_percent: u8,
    pub last_cleaned: NaiveDate,
    pub next_maintenance: NaiveDate,
    pub current_readings: SensorReadings,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance: Option<MaintenanceInfo>,
}
