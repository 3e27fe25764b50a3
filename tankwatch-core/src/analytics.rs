use crate::status::{HealthStatus, TankStatus};
use serde::Serialize;
use tankwatch_schemas::alert::{Alert, AlertKind};

/// Per-tank water quality assessment: concrete issues with paired
/// remediation advice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterQualityReport {
    pub tank_id: String,
    pub tank_name: String,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub risk_level: HealthStatus,
}

pub fn assess_water_quality(entry: &TankStatus) -> WaterQualityReport {
    let readings = &entry.tank.current_readings;
    let ph = readings.ph;
    let turbidity = readings.turbidity;
    let temperature = readings.temperature;

    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    if ph < 6.5 {
        issues.push(format!("pH too low ({ph})"));
        recommendations.push("Add pH increaser (sodium carbonate)".to_string());
    } else if ph > 8.5 {
        issues.push(format!("pH too high ({ph})"));
        recommendations.push("Add pH decreaser (sodium bisulfate)".to_string());
    }

    if turbidity > 5.0 {
        issues.push(format!("High turbidity ({turbidity} NTU)"));
        recommendations.push("Schedule immediate tank cleaning".to_string());
        recommendations.push("Check filtration system".to_string());
    } else if turbidity > 3.0 {
        issues.push(format!("Elevated turbidity ({turbidity} NTU)"));
        recommendations.push("Monitor turbidity levels closely".to_string());
    }

    if temperature > 25.0 {
        issues.push(format!("Temperature elevated ({temperature}\u{b0}C)"));
        recommendations.push("Check cooling systems".to_string());
    }

    let risk_level = match issues.len() {
        0 => HealthStatus::Normal,
        1 => HealthStatus::Warning,
        _ => HealthStatus::Critical,
    };

    WaterQualityReport {
        tank_id: entry.tank.id.clone(),
        tank_name: entry.tank.name.clone(),
        issues,
        recommendations,
        risk_level,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TankRef {
    pub id: String,
    pub name: String,
}

/// Fleet-wide rollup, fully recomputed on every call. The critical/warning
/// lists count by water-quality risk, not by health status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemAnalytics {
    pub total_tanks: usize,
    pub total_capacity_liters: u64,
    pub average_level_percent: f64,
    pub average_ph: f64,
    pub average_turbidity: f64,
    pub average_temperature: f64,
    pub critical_count: usize,
    pub warning_count: usize,
    pub normal_count: usize,
    pub active_alerts: usize,
    pub critical_tanks: Vec<TankRef>,
    pub warning_tanks: Vec<TankRef>,
}

pub fn system_analytics(tanks: &[TankStatus], alerts: &[Alert]) -> SystemAnalytics {
    let total = tanks.len();
    let mean = |f: &dyn Fn(&TankStatus) -> f64| {
        if total > 0 {
            tanks.iter().map(|t| f(t)).sum::<f64>() / total as f64
        } else {
            0.0
        }
    };

    let mut critical_tanks = Vec::new();
    let mut warning_tanks = Vec::new();
    for entry in tanks {
        let reference = TankRef {
            id: entry.tank.id.clone(),
            name: entry.tank.name.clone(),
        };
        match assess_water_quality(entry).risk_level {
            HealthStatus::Critical => critical_tanks.push(reference),
            HealthStatus::Warning => warning_tanks.push(reference),
            HealthStatus::Normal => {}
        }
    }

    SystemAnalytics {
        total_tanks: total,
        total_capacity_liters: tanks.iter().map(|t| t.tank.capacity_liters).sum(),
        average_level_percent: round1(mean(&|t| f64::from(t.tank.current_level_percent))),
        average_ph: round2(mean(&|t| t.tank.current_readings.ph)),
        average_turbidity: round2(mean(&|t| t.tank.current_readings.turbidity)),
        average_temperature: round1(mean(&|t| t.tank.current_readings.temperature)),
        critical_count: critical_tanks.len(),
        warning_count: warning_tanks.len(),
        normal_count: total - critical_tanks.len() - warning_tanks.len(),
        active_alerts: alerts.iter().filter(|a| !a.acknowledged).count(),
        critical_tanks,
        warning_tanks,
    }
}

/// Per-kind alert counts for the alert feed header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertSummary {
    pub total: usize,
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
    pub unacknowledged: usize,
}

pub fn summarize_alerts(alerts: &[Alert]) -> AlertSummary {
    let count = |kind: AlertKind| alerts.iter().filter(|a| a.kind == kind).count();
    AlertSummary {
        total: alerts.len(),
        critical: count(AlertKind::Critical),
        warning: count(AlertKind::Warning),
        info: count(AlertKind::Info),
        unacknowledged: alerts.iter().filter(|a| !a.acknowledged).count(),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
