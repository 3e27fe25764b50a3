use crate::error::TankwatchError;
use chrono::{Duration, NaiveDate};
use log::{debug, info};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use tankwatch_schemas::{
    alert::Alert,
    document::WaterDocument,
    schedule::ScheduleEntry,
    tank::{HistoryEntry, MaintenanceInfo, Tank},
};

/// Accessor for the backing JSON document.
///
/// The document is read once and cached as an immutable snapshot behind an
/// `RwLock`; readers clone the `Arc` and work lock-free from then on. The
/// maintenance update is the only mutator and holds the write lock for the
/// whole load-mutate-persist-swap sequence, so a concurrent reader observes
/// either the old document or the new one, never a half-updated mix.
pub struct TankStore {
    path: PathBuf,
    cache: RwLock<Option<Arc<WaterDocument>>>,
}

impl TankStore {
    /// Creates a store for the document at `path`. No I/O happens until the
    /// first read.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    /// Returns the current document snapshot, reading the backing file on
    /// first use.
    pub fn document(&self) -> Result<Arc<WaterDocument>, TankwatchError> {
        if let Some(doc) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Ok(Arc::clone(doc));
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have filled the cache while we waited.
        if let Some(doc) = cache.as_ref() {
            return Ok(Arc::clone(doc));
        }
        let doc = Arc::new(self.read_document()?);
        *cache = Some(Arc::clone(&doc));
        Ok(doc)
    }

    /// Drops the cached snapshot and re-reads the backing file.
    pub fn reload(&self) -> Result<Arc<WaterDocument>, TankwatchError> {
        {
            let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
            *cache = None;
        }
        self.document()
    }

    /// All tanks, in stable fleet order.
    pub fn tanks(&self) -> Result<Vec<Tank>, TankwatchError> {
        Ok(self.document()?.tanks.clone())
    }

    pub fn alerts(&self) -> Result<Vec<Alert>, TankwatchError> {
        Ok(self.document()?.alerts.clone())
    }

    pub fn maintenance_schedule(&self) -> Result<Vec<ScheduleEntry>, TankwatchError> {
        Ok(self.document()?.maintenance_schedule.clone())
    }

    pub fn find_tank(&self, tank_id: &str) -> Result<Tank, TankwatchError> {
        self.document()?
            .tanks
            .iter()
            .find(|t| t.id == tank_id)
            .cloned()
            .ok_or_else(|| TankwatchError::TankNotFound(tank_id.to_string()))
    }

    /// A tank's archived readings. An unknown id is an error, never an
    /// empty success.
    pub fn history(&self, tank_id: &str) -> Result<Vec<HistoryEntry>, TankwatchError> {
        Ok(self.find_tank(tank_id)?.history)
    }

    /// Records a completed cleaning for `tank_id`.
    ///
    /// Rewrites the schedule entry (`last_cleaned`, `next_scheduled` =
    /// cleaned date + interval) and the tank (`last_cleaned`,
    /// `next_maintenance`, maintenance notes) together, persists the whole
    /// document, and swaps the cache only after the write succeeded.
    pub fn update_maintenance(
        &self,
        tank_id: &str,
        cleaned_date: &str,
        notes: Option<&str>,
    ) -> Result<Tank, TankwatchError> {
        let cleaned = NaiveDate::parse_from_str(cleaned_date, "%Y-%m-%d")
            .map_err(|_| TankwatchError::InvalidDate(cleaned_date.to_string()))?;

        // Exclusive access for the entire read-modify-write sequence.
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        let current = match cache.as_ref() {
            Some(doc) => Arc::clone(doc),
            None => Arc::new(self.read_document()?),
        };
        let mut doc = (*current).clone();

        let tank_idx = doc
            .tanks
            .iter()
            .position(|t| t.id == tank_id)
            .ok_or_else(|| TankwatchError::TankNotFound(tank_id.to_string()))?;
        let entry_idx = doc
            .maintenance_schedule
            .iter()
            .position(|e| e.tank_id == tank_id)
            .ok_or_else(|| TankwatchError::ScheduleNotFound(tank_id.to_string()))?;

        let entry = &mut doc.maintenance_schedule[entry_idx];
        let next_scheduled = cleaned + Duration::days(i64::from(entry.cleaning_interval_days));
        entry.last_cleaned = cleaned;
        entry.next_scheduled = next_scheduled;

        let tank = &mut doc.tanks[tank_idx];
        tank.last_cleaned = cleaned;
        tank.next_maintenance = next_scheduled;
        let info = tank.maintenance.get_or_insert_with(MaintenanceInfo::default);
        info.last_cleaned = Some(cleaned);
        if let Some(notes) = notes {
            info.notes = Some(notes.to_string());
        }
        let updated = tank.clone();

        self.write_document(&doc)?;
        *cache = Some(Arc::new(doc));
        info!("maintenance updated for tank {tank_id}, next due {next_scheduled}");
        Ok(updated)
    }

    fn read_document(&self) -> Result<WaterDocument, TankwatchError> {
        debug!("reading document from {}", self.path.display());
        let content = fs::read_to_string(&self.path)
            .map_err(|e| TankwatchError::FileIO(self.path.display().to_string(), e))?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_document(&self, doc: &WaterDocument) -> Result<(), TankwatchError> {
        let json = serde_json::to_string_pretty(doc)?;
        fs::write(&self.path, json)
            .map_err(|e| TankwatchError::FileIO(self.path.display().to_string(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tankwatch_schemas::tank::{Location, SensorReadings};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_tank(id: &str) -> Tank {
        Tank {
            id: id.to_string(),
            name: format!("Tank {id}"),
            location: Location {
                lat: 12.34,
                lng: 56.78,
                address: "Sector 4".to_string(),
            },
            capacity_liters: 100_000,
            current_level_percent: 60,
            last_cleaned: date("2025-05-01"),
            next_maintenance: date("2025-05-31"),
            current_readings: SensorReadings::default(),
            history: Vec::new(),
            maintenance: None,
        }
    }

    fn sample_document() -> WaterDocument {
        WaterDocument {
            tanks: vec![sample_tank("T1")],
            alerts: Vec::new(),
            maintenance_schedule: vec![ScheduleEntry {
                tank_id: "T1".to_string(),
                cleaning_interval_days: 30,
                last_cleaned: date("2025-05-01"),
                next_scheduled: date("2025-05-31"),
            }],
        }
    }

    fn store_with(doc: &WaterDocument, tag: &str) -> TankStore {
        let path = std::env::temp_dir().join(format!(
            "tankwatch-store-{tag}-{}.json",
            std::process::id()
        ));
        fs::write(&path, serde_json::to_string_pretty(doc).unwrap()).unwrap();
        TankStore::open(path)
    }

    #[test]
    fn find_tank_unknown_id_is_not_found() {
        let store = store_with(&sample_document(), "unknown");
        let err = store.find_tank("nonexistent").unwrap_err();
        assert!(matches!(err, TankwatchError::TankNotFound(_)));
        let err = store.history("nonexistent").unwrap_err();
        assert!(matches!(err, TankwatchError::TankNotFound(_)));
    }

    #[test]
    fn update_rejects_bad_date() {
        let store = store_with(&sample_document(), "bad-date");
        let err = store
            .update_maintenance("T1", "June 1st 2025", None)
            .unwrap_err();
        assert!(matches!(err, TankwatchError::InvalidDate(_)));
    }

    #[test]
    fn update_rejects_missing_schedule_entry() {
        let mut doc = sample_document();
        doc.maintenance_schedule.clear();
        let store = store_with(&doc, "no-schedule");
        let err = store.update_maintenance("T1", "2025-06-01", None).unwrap_err();
        assert!(matches!(err, TankwatchError::ScheduleNotFound(_)));
    }

    #[test]
    fn update_spans_month_boundary() {
        let store = store_with(&sample_document(), "month-boundary");
        let tank = store
            .update_maintenance("T1", "2025-06-01", Some("flushed and scrubbed"))
            .unwrap();

        assert_eq!(tank.last_cleaned, date("2025-06-01"));
        assert_eq!(tank.next_maintenance, date("2025-07-01"));
        let info = tank.maintenance.unwrap();
        assert_eq!(info.last_cleaned, Some(date("2025-06-01")));
        assert_eq!(info.notes.as_deref(), Some("flushed and scrubbed"));

        // The schedule entry moved in lockstep with the tank.
        let entry = &store.maintenance_schedule().unwrap()[0];
        assert_eq!(entry.last_cleaned, date("2025-06-01"));
        assert_eq!(entry.next_scheduled, date("2025-07-01"));
    }

    #[test]
    fn update_persists_and_survives_reload() {
        let store = store_with(&sample_document(), "persist");
        store.update_maintenance("T1", "2025-06-01", None).unwrap();

        let doc = store.reload().unwrap();
        assert_eq!(doc.tanks[0].last_cleaned, date("2025-06-01"));
        assert_eq!(doc.maintenance_schedule[0].next_scheduled, date("2025-07-01"));
    }

    #[test]
    fn readers_see_whole_snapshots_only() {
        let store = store_with(&sample_document(), "snapshot");
        let before = store.document().unwrap();

        store.update_maintenance("T1", "2025-06-01", None).unwrap();
        let after = store.document().unwrap();

        // The pre-update snapshot is untouched; the post-update snapshot has
        // tank and schedule entry agreeing. There is no state in between.
        assert_eq!(before.tanks[0].last_cleaned, date("2025-05-01"));
        assert_eq!(before.maintenance_schedule[0].last_cleaned, date("2025-05-01"));
        assert_eq!(after.tanks[0].last_cleaned, date("2025-06-01"));
        assert_eq!(after.maintenance_schedule[0].last_cleaned, date("2025-06-01"));
        assert_eq!(
            after.tanks[0].next_maintenance,
            after.maintenance_schedule[0].next_scheduled
        );
    }
}
