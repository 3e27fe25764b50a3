use crate::status::{HealthStatus, TankStatus};
use serde::Serialize;

/// Fallback viewport when the fleet is empty.
const FALLBACK_CENTER: (f64, f64) = (40.7128, -74.006);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapBounds {
    pub center: GeoPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Extent>,
    pub zoom: u8,
}

fn bounds_over(coordinates: &[(f64, f64)], zoom: u8) -> MapBounds {
    if coordinates.is_empty() {
        return MapBounds {
            center: GeoPoint {
                lat: FALLBACK_CENTER.0,
                lng: FALLBACK_CENTER.1,
            },
            bounds: None,
            zoom: 12,
        };
    }

    let count = coordinates.len() as f64;
    let center = GeoPoint {
        lat: coordinates.iter().map(|c| c.0).sum::<f64>() / count,
        lng: coordinates.iter().map(|c| c.1).sum::<f64>() / count,
    };
    MapBounds {
        center,
        bounds: Some(Extent {
            north: coordinates.iter().map(|c| c.0).fold(f64::MIN, f64::max),
            south: coordinates.iter().map(|c| c.0).fold(f64::MAX, f64::min),
            east: coordinates.iter().map(|c| c.1).fold(f64::MIN, f64::max),
            west: coordinates.iter().map(|c| c.1).fold(f64::MAX, f64::min),
        }),
        zoom,
    }
}

// ---------------------------------------------------------------------------
// Heatmap layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatPoint {
    pub lat: f64,
    pub lng: f64,
    pub value: f64,
    pub tank_id: String,
    pub tank_name: String,
    pub status: HealthStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendRange {
    pub min: f64,
    pub max: f64,
    pub color: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: String,
    pub ranges: Vec<LegendRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapData {
    pub metric: String,
    pub points: Vec<HeatPoint>,
    pub legend: Legend,
    pub bounds: MapBounds,
}

/// One point per tank with a metric-selectable value. An unknown metric
/// name degrades to a flat 50 rather than erroring.
pub fn heatmap(tanks: &[TankStatus], metric: &str) -> HeatmapData {
    let points: Vec<HeatPoint> = tanks
        .iter()
        .map(|entry| HeatPoint {
            lat: entry.tank.location.lat,
            lng: entry.tank.location.lng,
            value: metric_value(entry, metric),
            tank_id: entry.tank.id.clone(),
            tank_name: entry.tank.name.clone(),
            status: entry.status,
        })
        .collect();

    let coordinates: Vec<(f64, f64)> = points.iter().map(|p| (p.lat, p.lng)).collect();
    HeatmapData {
        metric: metric.to_string(),
        points,
        legend: legend_for(metric),
        bounds: bounds_over(&coordinates, 11),
    }
}

fn metric_value(entry: &TankStatus, metric: &str) -> f64 {
    let readings = &entry.tank.current_readings;
    match metric {
        "health_score" => f64::from(entry.status.health_score()),
        "ph" => readings.ph,
        "turbidity" => readings.turbidity,
        "temperature" => readings.temperature,
        "water_level" => f64::from(entry.tank.current_level_percent),
        _ => 50.0,
    }
}

fn range(min: f64, max: f64, color: &str, label: &str) -> LegendRange {
    LegendRange {
        min,
        max,
        color: color.to_string(),
        label: label.to_string(),
    }
}

fn legend_for(metric: &str) -> Legend {
    let (title, ranges) = match metric {
        "ph" => (
            "pH Level",
            vec![
                range(0.0, 6.5, "#ef4444", "Acidic"),
                range(6.5, 8.5, "#10b981", "Normal"),
                range(8.5, 14.0, "#ef4444", "Alkaline"),
            ],
        ),
        "turbidity" => (
            "Turbidity (NTU)",
            vec![
                range(0.0, 1.0, "#10b981", "Excellent"),
                range(1.0, 5.0, "#f59e0b", "Acceptable"),
                range(5.0, 100.0, "#ef4444", "Poor"),
            ],
        ),
        "temperature" => (
            "Temperature (\u{b0}C)",
            vec![
                range(0.0, 15.0, "#3b82f6", "Cold"),
                range(15.0, 25.0, "#10b981", "Normal"),
                range(25.0, 50.0, "#ef4444", "Warm"),
            ],
        ),
        "water_level" => (
            "Water Level (%)",
            vec![
                range(0.0, 30.0, "#ef4444", "Low"),
                range(30.0, 70.0, "#f59e0b", "Medium"),
                range(70.0, 100.0, "#10b981", "High"),
            ],
        ),
        // health_score, and the fallback for unknown metric names.
        _ => (
            "Ward Health Score",
            vec![
                range(0.0, 40.0, "#ef4444", "Critical"),
                range(40.0, 70.0, "#f59e0b", "Warning"),
                range(70.0, 100.0, "#10b981", "Normal"),
            ],
        ),
    };
    Legend {
        title: title.to_string(),
        ranges,
    }
}

// ---------------------------------------------------------------------------
// Marker layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerPopup {
    pub name: String,
    pub status: HealthStatus,
    pub level: u8,
    pub ph: f64,
    pub turbidity: f64,
    pub temperature: f64,
    pub days_since_cleaned: i64,
    pub days_until_maintenance: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub status: HealthStatus,
    pub color: String,
    pub popup_content: MarkerPopup,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapData {
    pub markers: Vec<Marker>,
    pub bounds: MapBounds,
}

fn status_color(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Normal => "green",
        HealthStatus::Warning => "yellow",
        HealthStatus::Critical => "red",
    }
}

pub fn markers(tanks: &[TankStatus]) -> Vec<Marker> {
    tanks
        .iter()
        .map(|entry| {
            let readings = &entry.tank.current_readings;
            Marker {
                id: entry.tank.id.clone(),
                name: entry.tank.name.clone(),
                lat: entry.tank.location.lat,
                lng: entry.tank.location.lng,
                address: entry.tank.location.address.clone(),
                status: entry.status,
                color: status_color(entry.status).to_string(),
                popup_content: MarkerPopup {
                    name: entry.tank.name.clone(),
                    status: entry.status,
                    level: entry.tank.current_level_percent,
                    ph: readings.ph,
                    turbidity: readings.turbidity,
                    temperature: readings.temperature,
                    days_since_cleaned: entry.days_since_cleaned,
                    days_until_maintenance: entry.days_until_maintenance,
                },
            }
        })
        .collect()
}

pub fn map_bounds(tanks: &[TankStatus]) -> MapBounds {
    let coordinates: Vec<(f64, f64)> = tanks
        .iter()
        .map(|t| (t.tank.location.lat, t.tank.location.lng))
        .collect();
    bounds_over(&coordinates, 12)
}

pub fn map_data(tanks: &[TankStatus]) -> MapData {
    MapData {
        markers: markers(tanks),
        bounds: map_bounds(tanks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::with_status;
    use chrono::NaiveDate;
    use tankwatch_schemas::tank::{Location, SensorReadings, Tank};

    fn tank_at(id: &str, lat: f64, lng: f64, ph: f64) -> TankStatus {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let tank = Tank {
            id: id.to_string(),
            name: format!("Tank {id}"),
            location: Location {
                lat,
                lng,
                address: "Pump house road".to_string(),
            },
            capacity_liters: 100_000,
            current_level_percent: 60,
            last_cleaned: date,
            next_maintenance: date,
            current_readings: SensorReadings {
                ph,
                turbidity: 2.0,
                temperature: 22.0,
                ..SensorReadings::default()
            },
            history: Vec::new(),
            maintenance: None,
        };
        with_status(&tank, date)
    }

    #[test]
    fn health_score_metric_maps_status_tiers() {
        let fleet = vec![tank_at("T1", 12.3, 56.7, 7.0), tank_at("T2", 12.4, 56.7, 9.5)];
        let data = heatmap(&fleet, "health_score");
        assert_eq!(data.points[0].value, 90.0);
        assert_eq!(data.points[1].value, 30.0);
    }

    #[test]
    fn unknown_metric_degrades_to_flat_fifty() {
        let fleet = vec![tank_at("T1", 12.3, 56.7, 7.0)];
        let data = heatmap(&fleet, "salinity");
        assert_eq!(data.points[0].value, 50.0);
        assert_eq!(data.legend.title, "Ward Health Score");
    }

    #[test]
    fn metric_selects_the_matching_reading() {
        let fleet = vec![tank_at("T1", 12.3, 56.7, 7.4)];
        assert_eq!(heatmap(&fleet, "ph").points[0].value, 7.4);
        assert_eq!(heatmap(&fleet, "turbidity").points[0].value, 2.0);
        assert_eq!(heatmap(&fleet, "temperature").points[0].value, 22.0);
        assert_eq!(heatmap(&fleet, "water_level").points[0].value, 60.0);
    }

    #[test]
    fn empty_fleet_falls_back_to_fixed_viewport() {
        let data = heatmap(&[], "health_score");
        assert!(data.points.is_empty());
        assert_eq!(data.bounds.center.lat, 40.7128);
        assert_eq!(data.bounds.center.lng, -74.006);
        assert_eq!(data.bounds.zoom, 12);
        assert!(data.bounds.bounds.is_none());
    }

    #[test]
    fn bounds_cover_the_fleet_extent() {
        let fleet = vec![tank_at("T1", 12.3, 56.7, 7.0), tank_at("T2", 12.5, 56.9, 7.0)];
        let data = heatmap(&fleet, "health_score");
        let extent = data.bounds.bounds.unwrap();
        assert_eq!(data.bounds.zoom, 11);
        assert_eq!(extent.north, 12.5);
        assert_eq!(extent.south, 12.3);
        assert_eq!(extent.east, 56.9);
        assert_eq!(extent.west, 56.7);
        assert!((data.bounds.center.lat - 12.4).abs() < 1e-9);
    }

    #[test]
    fn markers_carry_status_colors() {
        let fleet = vec![tank_at("T1", 12.3, 56.7, 7.0), tank_at("T2", 12.4, 56.7, 8.7)];
        let data = map_data(&fleet);
        assert_eq!(data.markers[0].color, "green");
        assert_eq!(data.markers[1].color, "yellow");
        assert_eq!(data.markers[0].popup_content.level, 60);
        assert_eq!(data.bounds.zoom, 12);
    }
}
