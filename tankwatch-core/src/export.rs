use crate::status::TankStatus;
use csv::Writer;
use serde::Serialize;
use std::fs;
use std::io;

#[derive(Debug, Serialize)]
struct SnapshotRow {
    tank_id: String,
    name: String,
    status: String,
    level_percent: u8,
    ph: f64,
    turbidity: f64,
    temperature: f64,
    days_since_cleaned: i64,
    days_until_maintenance: i64,
}

/// Writes flat per-tank status rows for reporting clients.
pub struct StatusCsvExporter {
    writer: Writer<fs::File>,
}

impl StatusCsvExporter {
    pub fn new(path: &str) -> Result<Self, io::Error> {
        let writer = Writer::from_path(path)?;
        Ok(Self { writer })
    }

    pub fn write_snapshot(&mut self, tanks: &[TankStatus]) -> Result<(), anyhow::Error> {
        for entry in tanks {
            let readings = &entry.tank.current_readings;
            let row = SnapshotRow {
                tank_id: entry.tank.id.clone(),
                name: entry.tank.name.clone(),
                status: entry.status.as_str().to_string(),
                level_percent: entry.tank.current_level_percent,
                ph: readings.ph,
                turbidity: readings.turbidity,
                temperature: readings.temperature,
                days_since_cleaned: entry.days_since_cleaned,
                days_until_maintenance: entry.days_until_maintenance,
            };
            self.writer.serialize(row)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
