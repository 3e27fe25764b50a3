//! Rule-based predictors used whenever no enrichment model is configured or
//! a model call fails. Each predictor is a pure function of current
//! readings, history, or the fleet, and emits the same shape a model-backed
//! collaborator would, tagged with its provenance.

pub mod anomaly;
pub mod demand;
pub mod harvest;
pub mod maintenance;
pub mod quality;

use serde::{Deserialize, Serialize};

/// How a prediction was produced. Consumers stay agnostic to the shape but
/// can tell model output from rule output by this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Model,
    RuleBased,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
