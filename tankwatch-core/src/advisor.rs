use crate::error::TankwatchError;
use crate::predict::Provenance;
use crate::status::{HealthStatus, TankStatus};
use serde::Serialize;
use tankwatch_schemas::alert::{Alert, AlertKind};

// ---------------------------------------------------------------------------
// Fleet-wide recommendations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub tank_name: String,
    pub risk_level: HealthStatus,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceEntry {
    pub tank_name: String,
    pub advice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaintenanceAdvice {
    pub tank_name: String,
    pub recommended_action: String,
    pub priority: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetRecommendations {
    pub risk_assessment: Vec<RiskAssessment>,
    pub immediate_actions: Vec<String>,
    pub water_quality_advice: Vec<AdviceEntry>,
    pub maintenance_schedule: Vec<MaintenanceAdvice>,
    pub trend_forecast: String,
    pub overall_health_score: u32,
    pub source: Provenance,
}

/// Rule-based fleet triage: per-tank issue scan, critical tanks first in
/// the assessment, one action line per critical issue, and a fleet score
/// that loses 20 points per critical tank and 10 per warning tank.
pub fn fleet_recommendations(tanks: &[TankStatus]) -> FleetRecommendations {
    let mut critical: Vec<(String, Vec<String>)> = Vec::new();
    let mut warning: Vec<(String, Vec<String>)> = Vec::new();
    let mut immediate_actions = Vec::new();

    for entry in tanks {
        let readings = &entry.tank.current_readings;
        let ph = readings.ph;
        let turbidity = readings.turbidity;
        let days = entry.days_since_cleaned;

        let mut issues = Vec::new();
        if !(6.5..=8.5).contains(&ph) {
            issues.push(format!("pH imbalance ({ph})"));
        }
        if turbidity > 5.0 {
            issues.push(format!("High turbidity ({turbidity} NTU)"));
        }
        if days > 30 {
            issues.push(format!("Overdue cleaning ({days} days)"));
        }

        if issues.len() >= 2 || turbidity > 7.0 || ph < 6.0 || ph > 9.0 {
            for issue in &issues {
                immediate_actions.push(format!("{}: Address {issue}", entry.tank.name));
            }
            critical.push((entry.tank.name.clone(), issues));
        } else if !issues.is_empty() {
            warning.push((entry.tank.name.clone(), issues));
        }
    }

    let overall_health_score =
        (100i64 - 20 * critical.len() as i64 - 10 * warning.len() as i64).max(0) as u32;

    let assessment = |list: Vec<(String, Vec<String>)>, risk_level| {
        list.into_iter().map(move |(tank_name, issues)| RiskAssessment {
            tank_name,
            risk_level,
            reason: issues.join(", "),
        })
    };
    let risk_assessment = assessment(critical, HealthStatus::Critical)
        .chain(assessment(warning, HealthStatus::Warning))
        .collect();

    FleetRecommendations {
        risk_assessment,
        immediate_actions,
        water_quality_advice: Vec::new(),
        maintenance_schedule: Vec::new(),
        trend_forecast: "Analysis based on rule-based fallback system".to_string(),
        overall_health_score,
        source: Provenance::RuleBased,
    }
}

// ---------------------------------------------------------------------------
// Alert explanation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionItem {
    pub action: String,
    pub priority: String,
    pub estimated_time: String,
    pub responsible: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootCauseAnalysis {
    pub primary_cause: String,
    pub contributing_factors: Vec<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityAssessment {
    pub level: AlertKind,
    pub impact_score: u32,
    pub affected_population_estimate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceImpact {
    pub standards_violation: bool,
    pub reporting_required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertExplanation {
    pub root_cause_analysis: RootCauseAnalysis,
    pub severity_assessment: SeverityAssessment,
    pub trend_explanation: String,
    pub recommended_actions: Vec<ActionItem>,
    pub prevention_measures: Vec<String>,
    pub compliance_impact: ComplianceImpact,
    pub plain_language_summary: String,
    pub source: Provenance,
}

fn action(action: &str, priority: &str, estimated_time: &str, responsible: &str) -> ActionItem {
    ActionItem {
        action: action.to_string(),
        priority: priority.to_string(),
        estimated_time: estimated_time.to_string(),
        responsible: responsible.to_string(),
    }
}

/// Explains an alert from its message keywords alone: pH, turbidity and
/// cleaning mentions each map to a cause and an action item; anything else
/// gets the generic threshold explanation.
pub fn explain_alert(alert: &Alert) -> AlertExplanation {
    let message = alert.message.to_lowercase();

    let mut causes = Vec::new();
    let mut actions = Vec::new();

    if message.contains("ph") {
        causes.push("pH imbalance detected in water".to_string());
        actions.push(action(
            "Test water pH and add neutralizing agents",
            "high",
            "2 hours",
            "Water Quality Officer",
        ));
    }
    if message.contains("turbidity") {
        causes.push("Suspended particles in water causing cloudiness".to_string());
        actions.push(action(
            "Check filtration system and clean if needed",
            "high",
            "4 hours",
            "Maintenance Team",
        ));
    }
    if message.contains("maintenance") || message.contains("clean") {
        causes.push("Tank requires cleaning based on schedule".to_string());
        actions.push(action(
            "Schedule tank cleaning",
            "medium",
            "6 hours",
            "Maintenance Supervisor",
        ));
    }
    if causes.is_empty() {
        causes.push("Alert triggered based on monitoring thresholds".to_string());
        actions.push(action(
            "Review tank status and take appropriate action",
            "medium",
            "1 hour",
            "Duty Officer",
        ));
    }

    let impact_score = match alert.kind {
        AlertKind::Critical => 8,
        AlertKind::Warning => 5,
        AlertKind::Info => 2,
    };

    let primary_cause = causes.remove(0);
    AlertExplanation {
        root_cause_analysis: RootCauseAnalysis {
            primary_cause,
            contributing_factors: causes,
            confidence: 0.6,
        },
        severity_assessment: SeverityAssessment {
            level: alert.kind,
            impact_score,
            affected_population_estimate: 1000,
        },
        trend_explanation: "Based on rule-based fallback analysis".to_string(),
        recommended_actions: actions,
        prevention_measures: vec![
            "Regular monitoring".to_string(),
            "Scheduled maintenance".to_string(),
        ],
        compliance_impact: ComplianceImpact {
            standards_violation: alert.kind == AlertKind::Critical,
            reporting_required: alert.kind == AlertKind::Critical,
        },
        plain_language_summary: alert.message.clone(),
        source: Provenance::RuleBased,
    }
}

/// Looks an alert up by id and explains it.
pub fn explain(alerts: &[Alert], alert_id: &str) -> Result<AlertExplanation, TankwatchError> {
    alerts
        .iter()
        .find(|a| a.id == alert_id)
        .map(explain_alert)
        .ok_or_else(|| TankwatchError::AlertNotFound(alert_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::with_status;
    use chrono::NaiveDate;
    use tankwatch_schemas::tank::{Location, SensorReadings, Tank};

    fn entry(name: &str, ph: f64, turbidity: f64, cleaned_days_ago: i64) -> TankStatus {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let tank = Tank {
            id: name.to_lowercase(),
            name: name.to_string(),
            location: Location {
                lat: 12.34,
                lng: 56.78,
                address: String::new(),
            },
            capacity_liters: 100_000,
            current_level_percent: 60,
            last_cleaned: today - chrono::Duration::days(cleaned_days_ago),
            next_maintenance: today,
            current_readings: SensorReadings {
                ph,
                turbidity,
                ..SensorReadings::default()
            },
            history: Vec::new(),
            maintenance: None,
        };
        with_status(&tank, today)
    }

    fn alert_with(message: &str, kind: AlertKind) -> Alert {
        Alert {
            id: "A1".to_string(),
            tank_id: "t1".to_string(),
            kind,
            message: message.to_string(),
            created_at: "2025-06-01T08:00:00Z".to_string(),
            acknowledged: false,
        }
    }

    #[test]
    fn healthy_fleet_scores_one_hundred() {
        let recs = fleet_recommendations(&[entry("North", 7.2, 0.5, 5)]);
        assert!(recs.risk_assessment.is_empty());
        assert!(recs.immediate_actions.is_empty());
        assert_eq!(recs.overall_health_score, 100);
    }

    #[test]
    fn two_issues_make_a_tank_critical() {
        let recs = fleet_recommendations(&[entry("North", 6.2, 6.0, 5)]);
        assert_eq!(recs.risk_assessment.len(), 1);
        assert_eq!(recs.risk_assessment[0].risk_level, HealthStatus::Critical);
        assert_eq!(recs.immediate_actions.len(), 2);
        assert!(recs.immediate_actions[0].starts_with("North: Address "));
        assert_eq!(recs.overall_health_score, 80);
    }

    #[test]
    fn single_issue_is_a_warning_without_actions() {
        let recs = fleet_recommendations(&[entry("North", 7.2, 0.5, 40)]);
        assert_eq!(recs.risk_assessment.len(), 1);
        assert_eq!(recs.risk_assessment[0].risk_level, HealthStatus::Warning);
        assert_eq!(recs.risk_assessment[0].reason, "Overdue cleaning (40 days)");
        assert!(recs.immediate_actions.is_empty());
        assert_eq!(recs.overall_health_score, 90);
    }

    #[test]
    fn extreme_single_reading_is_critical_on_its_own() {
        let recs = fleet_recommendations(&[entry("North", 5.5, 0.5, 5)]);
        assert_eq!(recs.risk_assessment[0].risk_level, HealthStatus::Critical);
    }

    #[test]
    fn score_bottoms_out_at_zero() {
        let fleet: Vec<TankStatus> = (0..6)
            .map(|i| entry(&format!("T{i}"), 5.5, 8.0, 70))
            .collect();
        let recs = fleet_recommendations(&fleet);
        assert_eq!(recs.overall_health_score, 0);
    }

    #[test]
    fn explanation_routes_on_message_keywords() {
        let explanation =
            explain_alert(&alert_with("High turbidity in tank 4", AlertKind::Warning));
        assert_eq!(
            explanation.root_cause_analysis.primary_cause,
            "Suspended particles in water causing cloudiness"
        );
        assert_eq!(explanation.recommended_actions.len(), 1);
        assert_eq!(explanation.severity_assessment.impact_score, 5);
        assert!(!explanation.compliance_impact.standards_violation);
    }

    #[test]
    fn unmatched_message_gets_generic_explanation() {
        let explanation = explain_alert(&alert_with("Sensor offline", AlertKind::Info));
        assert_eq!(
            explanation.root_cause_analysis.primary_cause,
            "Alert triggered based on monitoring thresholds"
        );
        assert_eq!(explanation.severity_assessment.impact_score, 2);
    }

    #[test]
    fn critical_alerts_require_reporting() {
        let explanation = explain_alert(&alert_with("pH critical in tank 2", AlertKind::Critical));
        assert!(explanation.compliance_impact.standards_violation);
        assert!(explanation.compliance_impact.reporting_required);
        assert_eq!(explanation.severity_assessment.impact_score, 8);
    }

    #[test]
    fn unknown_alert_id_is_not_found() {
        let alerts = vec![alert_with("High turbidity", AlertKind::Warning)];
        assert!(explain(&alerts, "A1").is_ok());
        let err = explain(&alerts, "A9").unwrap_err();
        assert!(matches!(err, TankwatchError::AlertNotFound(_)));
    }
}
