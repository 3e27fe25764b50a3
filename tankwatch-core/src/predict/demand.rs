use super::Provenance;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tankwatch_schemas::tank::Tank;

/// Fraction of fleet capacity assumed consumed per day.
const DAILY_CONSUMPTION_FRACTION: f64 = 0.15;

/// Blended week multiplier for the headline total. Deliberately not the sum
/// of the seven daily entries; consumers depend on this exact figure.
const WEEKLY_BLEND_MULTIPLIER: f64 = 6.7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyDemand {
    pub day: u32,
    pub date: NaiveDate,
    pub predicted_demand_liters: i64,
    pub peak_hours: Vec<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplyAdequacy {
    pub sufficient: bool,
    pub deficit_liters: Option<i64>,
    pub tanks_at_risk: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandForecast {
    pub daily_forecasts: Vec<DailyDemand>,
    pub weekly_total_demand_liters: i64,
    pub average_daily_demand_liters: i64,
    pub peak_demand_day: String,
    pub low_demand_day: String,
    pub supply_adequacy: SupplyAdequacy,
    pub recommendations: Vec<String>,
    pub planning_note: String,
    pub source: Provenance,
}

/// Seven-day fleet demand forecast from total capacity.
///
/// Days 1-5 carry the weekday multiplier 1.0, days 6-7 the weekend
/// multiplier 0.85.
pub fn forecast(tanks: &[Tank], today: NaiveDate) -> DemandForecast {
    let total_capacity: u64 = tanks.iter().map(|t| t.capacity_liters).sum();
    let avg_daily = total_capacity as f64 * DAILY_CONSUMPTION_FRACTION;

    let daily_forecasts = (0..7u32)
        .map(|i| {
            let multiplier = if i < 5 { 1.0 } else { 0.85 };
            DailyDemand {
                day: i + 1,
                date: today + Duration::days(i64::from(i) + 1),
                predicted_demand_liters: (avg_daily * multiplier).round() as i64,
                peak_hours: vec!["07:00".to_string(), "18:00".to_string()],
                confidence: 0.6,
            }
        })
        .collect();

    DemandForecast {
        daily_forecasts,
        weekly_total_demand_liters: (avg_daily * WEEKLY_BLEND_MULTIPLIER).round() as i64,
        average_daily_demand_liters: avg_daily.round() as i64,
        peak_demand_day: "Monday".to_string(),
        low_demand_day: "Sunday".to_string(),
        supply_adequacy: SupplyAdequacy {
            sufficient: true,
            deficit_liters: None,
            tanks_at_risk: Vec::new(),
        },
        recommendations: vec!["Monitor tank levels during peak hours".to_string()],
        planning_note: "Rule-based forecast from fleet capacity".to_string(),
        source: Provenance::RuleBased,
    }
}
