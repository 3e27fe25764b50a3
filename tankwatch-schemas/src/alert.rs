use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Critical,
    Warning,
    Info,
}

/// An alert raised against a tank. Alerts are read-only here; their
/// lifecycle (creation, acknowledgement) belongs to the notification layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub tank_id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    pub created_at: String,
    #[serde(default)]
    pub acknowledged: bool,
}
