use super::Provenance;
use serde::Serialize;
use tankwatch_schemas::tank::Tank;

/// Minimum spare capacity for a tank to be recommended for collection.
const RECOMMENDATION_FLOOR_LITERS: f64 = 50_000.0;

/// Fraction of total spare capacity assumed collectable in a month.
const MONTHLY_COLLECTION_FRACTION: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarvestCandidate {
    pub name: String,
    pub overflow_capacity_liters: i64,
    pub harvesting_score: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarvestingPotential {
    pub total_overflow_capacity_liters: i64,
    pub recommended_tanks: Vec<HarvestCandidate>,
    pub estimated_monthly_collection_liters: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverflowRiskAnalysis {
    pub tanks_at_overflow_risk: Vec<String>,
    pub recommended_diversions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Readiness {
    pub score: u32,
    pub gaps: Vec<String>,
    pub preparations_needed: Vec<String>,
}

/// Nominal planning figures, not a computed cost model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBenefit {
    pub estimated_monthly_savings: u32,
    pub implementation_cost: u32,
    pub payback_months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarvestEstimate {
    pub harvesting_potential: HarvestingPotential,
    pub overflow_risk_analysis: OverflowRiskAnalysis,
    pub readiness: Readiness,
    pub cost_benefit: CostBenefit,
    pub source: Provenance,
}

fn overflow_capacity_liters(tank: &Tank) -> f64 {
    (100.0 - f64::from(tank.current_level_percent)) * tank.capacity_liters as f64 / 100.0
}

/// Estimates how much rainwater the fleet's spare capacity could absorb.
///
/// Candidates keep fleet encounter order and are capped at five; the score
/// saturates at 100.
pub fn estimate(tanks: &[Tank]) -> HarvestEstimate {
    let total_overflow: f64 = tanks.iter().map(overflow_capacity_liters).sum();

    let mut recommended: Vec<HarvestCandidate> = tanks
        .iter()
        .filter_map(|tank| {
            let capacity = overflow_capacity_liters(tank);
            (capacity > RECOMMENDATION_FLOOR_LITERS).then(|| HarvestCandidate {
                name: tank.name.clone(),
                overflow_capacity_liters: capacity as i64,
                harvesting_score: ((capacity / 1000.0) as i64).min(100),
            })
        })
        .collect();
    recommended.truncate(5);

    let tanks_at_overflow_risk = tanks
        .iter()
        .filter(|t| t.current_level_percent > 90)
        .map(|t| t.name.clone())
        .collect();

    HarvestEstimate {
        harvesting_potential: HarvestingPotential {
            total_overflow_capacity_liters: total_overflow as i64,
            recommended_tanks: recommended,
            estimated_monthly_collection_liters: (total_overflow * MONTHLY_COLLECTION_FRACTION)
                as i64,
        },
        overflow_risk_analysis: OverflowRiskAnalysis {
            tanks_at_overflow_risk,
            recommended_diversions: vec![
                "Install overflow pipes to secondary storage".to_string()
            ],
        },
        readiness: Readiness {
            score: 70,
            gaps: vec!["Check overflow drainage".to_string()],
            preparations_needed: vec!["Clean intake filters".to_string()],
        },
        cost_benefit: CostBenefit {
            estimated_monthly_savings: 50_000,
            implementation_cost: 200_000,
            payback_months: 4,
        },
        source: Provenance::RuleBased,
    }
}
