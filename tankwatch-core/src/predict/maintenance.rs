use super::{Provenance, RiskLevel};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Routine,
    Soon,
    Urgent,
    Immediate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningType {
    Routine,
    Deep,
    Emergency,
}

/// A recommended cleaning slot for one tank. Cost and duration are nominal
/// planning figures, not computed estimates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaintenancePlan {
    pub recommended_cleaning_date: NaiveDate,
    pub urgency: Urgency,
    pub days_until_recommended: i64,
    pub cleaning_type: CleaningType,
    pub estimated_duration_hours: u32,
    pub resources_needed: Vec<String>,
    pub cost_estimate: u32,
    pub risk_if_delayed: RiskLevel,
    pub reason: String,
    pub within_cleaning_interval: bool,
    pub source: Provenance,
}

/// Derives cleaning urgency from turbidity and cleaning age, most severe
/// rule first.
pub fn recommend(turbidity: f64, days_since_cleaned: i64, today: NaiveDate) -> MaintenancePlan {
    let (urgency, lead_days) = if turbidity > 5.0 || days_since_cleaned > 45 {
        (Urgency::Immediate, 0)
    } else if turbidity > 3.0 || days_since_cleaned > 35 {
        (Urgency::Urgent, 3)
    } else if days_since_cleaned > 25 {
        (Urgency::Soon, 7)
    } else {
        (Urgency::Routine, (30 - days_since_cleaned).max(0))
    };

    MaintenancePlan {
        recommended_cleaning_date: today + Duration::days(lead_days),
        urgency,
        days_until_recommended: lead_days,
        cleaning_type: if urgency == Urgency::Immediate {
            CleaningType::Emergency
        } else {
            CleaningType::Routine
        },
        estimated_duration_hours: 4,
        resources_needed: vec![
            "Cleaning crew".to_string(),
            "Water testing kit".to_string(),
        ],
        cost_estimate: 15_000,
        risk_if_delayed: if matches!(urgency, Urgency::Immediate | Urgency::Urgent) {
            RiskLevel::High
        } else {
            RiskLevel::Medium
        },
        reason: format!("Based on {days_since_cleaned} days since last cleaning"),
        within_cleaning_interval: days_since_cleaned <= 30,
        source: Provenance::RuleBased,
    }
}
