use crate::{alert::Alert, schedule::ScheduleEntry, tank::Tank};
use serde::{Deserialize, Serialize};

/// The entire backing-store document.
///
/// The store reads and rewrites this as a whole; there are no partial
/// patches. Collections default to empty so a sparse document still loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterDocument {
    #[serde(default)]
    pub tanks: Vec<Tank>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
    #[serde(default)]
    pub maintenance_schedule: Vec<ScheduleEntry>,
}
