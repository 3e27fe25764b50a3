use crate::error::TankwatchError;
use crate::status::{HealthStatus, TankStatus};
use serde::Serialize;

/// Half-width of the placeholder ward square, in degrees. A visualization
/// shape, not an administrative boundary.
const WARD_POLYGON_OFFSET: f64 = 0.02;

/// Buckets a coordinate into a synthetic ward on a 0.1-degree grid.
///
/// Both axes floor to the grid and wrap into 0-9, so the id is
/// deterministic for any hemisphere even though it no longer reflects true
/// geography.
pub fn ward_id(lat: f64, lng: f64) -> String {
    let row = ((lat * 10.0).floor() as i64).rem_euclid(10);
    let col = ((lng * 10.0).floor() as i64).rem_euclid(10);
    format!("ward_{row}_{col}")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WardTankRef {
    pub id: String,
    pub name: String,
    pub status: HealthStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WardProperties {
    pub ward_id: String,
    pub ward_name: String,
    pub tank_count: usize,
    pub total_capacity_liters: u64,
    pub avg_ph: f64,
    pub avg_turbidity: f64,
    pub health_score: u32,
    pub status: HealthStatus,
    pub critical_tanks: usize,
    pub warning_tanks: usize,
    pub normal_tanks: usize,
    pub tanks: Vec<WardTankRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WardFeature {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: WardProperties,
    pub geometry: PolygonGeometry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WardCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<WardFeature>,
}

struct WardAccumulator {
    id: String,
    center_lat: f64,
    center_lng: f64,
    total_capacity: u64,
    ph_sum: f64,
    turbidity_sum: f64,
    critical: usize,
    warning: usize,
    normal: usize,
    tanks: Vec<WardTankRef>,
}

/// Aggregates the fleet into ward features, recomputed from scratch on
/// every call. Wards appear in first-seen order and each ward's square is
/// centered on its first-seen tank.
pub fn ward_geojson(tanks: &[TankStatus]) -> WardCollection {
    let mut wards: Vec<WardAccumulator> = Vec::new();

    for entry in tanks {
        let location = &entry.tank.location;
        let id = ward_id(location.lat, location.lng);
        let idx = match wards.iter().position(|w| w.id == id) {
            Some(idx) => idx,
            None => {
                wards.push(WardAccumulator {
                    id,
                    center_lat: location.lat,
                    center_lng: location.lng,
                    total_capacity: 0,
                    ph_sum: 0.0,
                    turbidity_sum: 0.0,
                    critical: 0,
                    warning: 0,
                    normal: 0,
                    tanks: Vec::new(),
                });
                wards.len() - 1
            }
        };

        let ward = &mut wards[idx];
        ward.total_capacity += entry.tank.capacity_liters;
        ward.ph_sum += entry.tank.current_readings.ph;
        ward.turbidity_sum += entry.tank.current_readings.turbidity;
        match entry.status {
            HealthStatus::Critical => ward.critical += 1,
            HealthStatus::Warning => ward.warning += 1,
            HealthStatus::Normal => ward.normal += 1,
        }
        ward.tanks.push(WardTankRef {
            id: entry.tank.id.clone(),
            name: entry.tank.name.clone(),
            status: entry.status,
        });
    }

    WardCollection {
        kind: "FeatureCollection".to_string(),
        features: wards.into_iter().map(into_feature).collect(),
    }
}

/// Single-ward lookup over the same aggregation.
pub fn ward_details(tanks: &[TankStatus], ward_id: &str) -> Result<WardFeature, TankwatchError> {
    ward_geojson(tanks)
        .features
        .into_iter()
        .find(|f| f.properties.ward_id == ward_id)
        .ok_or_else(|| TankwatchError::WardNotFound(ward_id.to_string()))
}

fn into_feature(ward: WardAccumulator) -> WardFeature {
    let tank_count = ward.tanks.len();

    // Three discrete tiers; any critical tank drags the whole ward down.
    let status = if ward.critical > 0 {
        HealthStatus::Critical
    } else if ward.warning > 0 {
        HealthStatus::Warning
    } else {
        HealthStatus::Normal
    };

    let ward_name = format!(
        "Ward {}",
        ward.id.trim_start_matches("ward_").replace('_', "-")
    );

    let (lat, lng) = (ward.center_lat, ward.center_lng);
    let ring = vec![
        [lng - WARD_POLYGON_OFFSET, lat - WARD_POLYGON_OFFSET],
        [lng + WARD_POLYGON_OFFSET, lat - WARD_POLYGON_OFFSET],
        [lng + WARD_POLYGON_OFFSET, lat + WARD_POLYGON_OFFSET],
        [lng - WARD_POLYGON_OFFSET, lat + WARD_POLYGON_OFFSET],
        [lng - WARD_POLYGON_OFFSET, lat - WARD_POLYGON_OFFSET],
    ];

    WardFeature {
        kind: "Feature".to_string(),
        properties: WardProperties {
            ward_id: ward.id,
            ward_name,
            tank_count,
            total_capacity_liters: ward.total_capacity,
            avg_ph: round2(ward.ph_sum / tank_count as f64),
            avg_turbidity: round2(ward.turbidity_sum / tank_count as f64),
            health_score: status.health_score(),
            status,
            critical_tanks: ward.critical,
            warning_tanks: ward.warning,
            normal_tanks: ward.normal,
            tanks: ward.tanks,
        },
        geometry: PolygonGeometry {
            kind: "Polygon".to_string(),
            coordinates: vec![ring],
        },
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::with_status;
    use chrono::NaiveDate;
    use tankwatch_schemas::tank::{Location, SensorReadings, Tank};

    fn tank_at(id: &str, lat: f64, lng: f64, ph: f64, turbidity: f64) -> TankStatus {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let tank = Tank {
            id: id.to_string(),
            name: format!("Tank {id}"),
            location: Location {
                lat,
                lng,
                address: String::new(),
            },
            capacity_liters: 100_000,
            current_level_percent: 60,
            last_cleaned: date,
            next_maintenance: date,
            current_readings: SensorReadings {
                ph,
                turbidity,
                ..SensorReadings::default()
            },
            history: Vec::new(),
            maintenance: None,
        };
        with_status(&tank, date)
    }

    #[test]
    fn bucketing_follows_the_literal_grid_rule() {
        assert_eq!(ward_id(12.34, 56.78), "ward_3_7");
        assert_eq!(ward_id(12.39, 56.79), "ward_3_7");
        // One grid cell north lands in the next row.
        assert_eq!(ward_id(12.44, 56.78), "ward_4_7");
    }

    #[test]
    fn bucketing_wraps_into_single_digits() {
        assert_eq!(ward_id(13.34, 56.78), "ward_3_7");
        // Southern/western coordinates floor and wrap, never go negative.
        assert_eq!(ward_id(-12.34, 56.78), "ward_6_7");
    }

    #[test]
    fn tanks_in_one_cell_share_a_ward() {
        let fleet = vec![
            tank_at("T1", 12.34, 56.78, 7.0, 1.0),
            tank_at("T2", 12.39, 56.79, 7.4, 3.0),
        ];
        let collection = ward_geojson(&fleet);
        assert_eq!(collection.kind, "FeatureCollection");
        assert_eq!(collection.features.len(), 1);

        let props = &collection.features[0].properties;
        assert_eq!(props.ward_id, "ward_3_7");
        assert_eq!(props.ward_name, "Ward 3-7");
        assert_eq!(props.tank_count, 2);
        assert_eq!(props.total_capacity_liters, 200_000);
        assert_eq!(props.avg_ph, 7.2);
        assert_eq!(props.avg_turbidity, 2.0);
    }

    #[test]
    fn one_critical_tank_drags_the_ward_to_critical() {
        let fleet = vec![
            tank_at("T1", 12.34, 56.78, 7.0, 1.0),
            tank_at("T2", 12.35, 56.78, 9.2, 8.0),
        ];
        let props = &ward_geojson(&fleet).features[0].properties;
        assert_eq!(props.status, HealthStatus::Critical);
        assert_eq!(props.health_score, 30);
        assert_eq!(props.critical_tanks, 1);
        assert_eq!(props.normal_tanks, 1);
    }

    #[test]
    fn warning_without_critical_scores_sixty() {
        let fleet = vec![tank_at("T1", 12.34, 56.78, 8.7, 1.0)];
        let props = &ward_geojson(&fleet).features[0].properties;
        assert_eq!(props.status, HealthStatus::Warning);
        assert_eq!(props.health_score, 60);
    }

    #[test]
    fn geometry_is_a_closed_square_around_the_first_tank() {
        let fleet = vec![
            tank_at("T1", 12.34, 56.78, 7.0, 1.0),
            tank_at("T2", 12.39, 56.79, 7.0, 1.0),
        ];
        let geometry = &ward_geojson(&fleet).features[0].geometry;
        assert_eq!(geometry.kind, "Polygon");
        let ring = &geometry.coordinates[0];
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], ring[4]);
        // Centered on T1, the first-seen tank, not on T2.
        assert_eq!(ring[0], [56.78 - 0.02, 12.34 - 0.02]);
        assert_eq!(ring[2], [56.78 + 0.02, 12.34 + 0.02]);
    }

    #[test]
    fn unknown_ward_id_is_not_found() {
        let fleet = vec![tank_at("T1", 12.34, 56.78, 7.0, 1.0)];
        assert!(ward_details(&fleet, "ward_3_7").is_ok());
        let err = ward_details(&fleet, "ward_9_9").unwrap_err();
        assert!(matches!(err, TankwatchError::WardNotFound(_)));
    }
}
