use super::Provenance;
use serde::{Deserialize, Serialize};
use tankwatch_schemas::tank::HistoryEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    None,
    Leakage,
    Overflow,
    UnusualConsumption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyDetails {
    pub estimated_loss_liters_per_day: Option<f64>,
    pub overflow_risk_percent: f64,
    pub pattern_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeakageAnalysis {
    pub anomaly_detected: bool,
    pub anomaly_type: AnomalyType,
    pub severity: Severity,
    pub confidence: f64,
    pub details: AnomalyDetails,
    pub recommended_actions: Vec<String>,
    pub government_alert_required: bool,
    pub source: Provenance,
}

/// Flags leakage, overflow and consumption anomalies for a tank.
///
/// The mean sample-to-sample turbidity change stands in for a consumption
/// signal. Anomaly types resolve by priority: a level above 95 % is
/// overflow, below 30 % is leakage, anything else flagged is unusual
/// consumption. A government alert additionally requires the level to have
/// dropped under 20 %.
pub fn detect(current_level_percent: u8, history: &[HistoryEntry]) -> LeakageAnalysis {
    let level = f64::from(current_level_percent);

    let avg_change = if history.len() >= 2 {
        let total: f64 = history
            .windows(2)
            .map(|pair| pair[1].turbidity - pair[0].turbidity)
            .sum();
        total / (history.len() - 1) as f64
    } else {
        0.0
    };

    let anomaly_detected = level < 30.0 || level > 95.0 || avg_change.abs() > 1.0;

    let anomaly_type = if !anomaly_detected {
        AnomalyType::None
    } else if level > 95.0 {
        AnomalyType::Overflow
    } else if level < 30.0 {
        AnomalyType::Leakage
    } else {
        AnomalyType::UnusualConsumption
    };

    let overflow_risk_percent = if level > 85.0 {
        ((level - 85.0) * 5.0).max(0.0)
    } else {
        0.0
    };

    LeakageAnalysis {
        anomaly_detected,
        anomaly_type,
        severity: if anomaly_detected {
            Severity::Medium
        } else {
            Severity::None
        },
        confidence: 0.6,
        details: AnomalyDetails {
            estimated_loss_liters_per_day: None,
            overflow_risk_percent,
            pattern_description: "Mean sample-to-sample turbidity change used as consumption proxy"
                .to_string(),
        },
        recommended_actions: Vec::new(),
        government_alert_required: anomaly_detected && level < 20.0,
        source: Provenance::RuleBased,
    }
}
