use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-tank cleaning schedule entry.
///
/// `last_cleaned` and `next_scheduled` are always rewritten together by the
/// maintenance update; `next_scheduled` is `last_cleaned` plus
/// `cleaning_interval_days` and is never edited independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub tank_id: String,
    #[serde(default = "default_cleaning_interval_days")]
    pub cleaning_interval_days: u32,
    pub last_cleaned: NaiveDate,
    pub next_scheduled: NaiveDate,
}

fn default_cleaning_interval_days() -> u32 {
    30
}
