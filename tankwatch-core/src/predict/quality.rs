use super::{round1, round2, Provenance, RiskLevel};
use crate::trends::Trend;
use serde::Serialize;
use tankwatch_schemas::tank::{HistoryEntry, SensorReadings};

/// Projected readings at one horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityProjection {
    pub ph: f64,
    pub turbidity: f64,
    pub temperature: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HorizonProjections {
    #[serde(rename = "24h")]
    pub next_24h: QualityProjection,
    #[serde(rename = "48h")]
    pub next_48h: QualityProjection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSummary {
    pub ph_trend: Trend,
    pub turbidity_trend: Trend,
    pub temperature_trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityPrediction {
    pub predictions: HorizonProjections,
    pub trend_analysis: TrendSummary,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
    pub recommended_actions: Vec<String>,
    pub note: String,
    pub source: Provenance,
}

fn rate_label(rate: f64, stability_band: f64) -> Trend {
    if rate.abs() < stability_band {
        Trend::Stable
    } else if rate > 0.0 {
        Trend::Increasing
    } else {
        Trend::Decreasing
    }
}

/// Extrapolates water quality 24 and 48 hours ahead.
///
/// The per-sample rate is (newest − oldest) / sample count; with fewer than
/// two samples the rate is zero and the projection repeats the current
/// readings. Confidence degrades with the horizon (0.7, then 0.5) and the
/// turbidity projection never goes below zero.
pub fn predict(readings: &SensorReadings, history: &[HistoryEntry]) -> QualityPrediction {
    let ph = readings.ph;
    let turbidity = readings.turbidity;
    let temperature = readings.temperature;

    let (ph_rate, turbidity_rate, temperature_rate) = if history.len() >= 2 {
        let samples = history.len() as f64;
        let oldest = &history[0];
        let newest = &history[history.len() - 1];
        (
            (newest.ph - oldest.ph) / samples,
            (newest.turbidity - oldest.turbidity) / samples,
            (newest.temperature - oldest.temperature) / samples,
        )
    } else {
        (0.0, 0.0, 0.0)
    };

    let project = |multiplier: f64, confidence: f64| QualityProjection {
        ph: round2(ph + ph_rate * multiplier),
        turbidity: round2((turbidity + turbidity_rate * multiplier).max(0.0)),
        temperature: round1(temperature + temperature_rate * multiplier),
        confidence,
    };

    let mut risk_level = RiskLevel::Low;
    let mut risk_factors = Vec::new();
    if turbidity > 5.0 || ph < 6.5 || ph > 8.5 {
        risk_level = RiskLevel::High;
        risk_factors.push("Current readings exceed safe thresholds".to_string());
    }

    QualityPrediction {
        predictions: HorizonProjections {
            next_24h: project(1.0, 0.7),
            next_48h: project(2.0, 0.5),
        },
        trend_analysis: TrendSummary {
            ph_trend: rate_label(ph_rate, 0.1),
            turbidity_trend: rate_label(turbidity_rate, 0.2),
            temperature_trend: rate_label(temperature_rate, 0.3),
        },
        risk_level,
        risk_factors,
        recommended_actions: Vec::new(),
        note: "Rule-based extrapolation from recorded history".to_string(),
        source: Provenance::RuleBased,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn readings(ph: f64, turbidity: f64, temperature: f64) -> SensorReadings {
        SensorReadings {
            ph,
            turbidity,
            temperature,
            ..SensorReadings::default()
        }
    }

    fn history(entries: &[(f64, f64, f64)]) -> Vec<HistoryEntry> {
        let base = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        entries
            .iter()
            .enumerate()
            .map(|(i, &(ph, turbidity, temperature))| HistoryEntry {
                date: base + chrono::Duration::days(i as i64),
                ph,
                turbidity,
                temperature,
            })
            .collect()
    }

    #[test]
    fn no_history_projects_current_readings() {
        let prediction = predict(&readings(7.2, 1.5, 21.0), &[]);
        let near = &prediction.predictions.next_24h;
        assert_eq!(near.ph, 7.2);
        assert_eq!(near.turbidity, 1.5);
        assert_eq!(near.temperature, 21.0);
        assert_eq!(near.confidence, 0.7);
        assert_eq!(prediction.predictions.next_48h.confidence, 0.5);
        assert_eq!(prediction.trend_analysis.ph_trend, Trend::Stable);
        assert_eq!(prediction.source, Provenance::RuleBased);
    }

    #[test]
    fn far_horizon_doubles_the_rate() {
        // pH rose 1.0 over 2 samples: rate 0.5 per sample.
        let prediction = predict(
            &readings(7.0, 1.0, 20.0),
            &history(&[(6.0, 1.0, 20.0), (7.0, 1.0, 20.0)]),
        );
        assert_eq!(prediction.predictions.next_24h.ph, 7.5);
        assert_eq!(prediction.predictions.next_48h.ph, 8.0);
    }

    #[test]
    fn turbidity_projection_is_floored_at_zero() {
        // Turbidity fell 4.0 over 2 samples: rate -2.0 per sample.
        let prediction = predict(
            &readings(7.0, 0.5, 20.0),
            &history(&[(7.0, 5.0, 20.0), (7.0, 1.0, 20.0)]),
        );
        assert_eq!(prediction.predictions.next_24h.turbidity, 0.0);
        assert_eq!(prediction.predictions.next_48h.turbidity, 0.0);
    }

    #[test]
    fn unsafe_current_readings_escalate_risk() {
        let prediction = predict(&readings(7.0, 5.5, 20.0), &[]);
        assert_eq!(prediction.risk_level, RiskLevel::High);
        assert_eq!(prediction.risk_factors.len(), 1);

        let prediction = predict(&readings(6.2, 0.5, 20.0), &[]);
        assert_eq!(prediction.risk_level, RiskLevel::High);

        let prediction = predict(&readings(7.0, 0.5, 20.0), &[]);
        assert_eq!(prediction.risk_level, RiskLevel::Low);
        assert!(prediction.risk_factors.is_empty());
    }
}
