//! Model unit tests: status codes, ids, points, directory lookups.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use trail_explorer::model::*;

fn trail(id: u32, name: &str, vertices: Vec<[f64; 2]>) -> Trail {
    Trail {
        id: TrailId::new(id),
        name: name.into(),
        geometry: Arc::new(Polyline {
            paths: vec![vertices],
        }),
        ..Trail::default()
    }
}

fn directory() -> TrailDirectory {
    TrailDirectory::new(vec![
        trail(1, "Ridge Walk", vec![[7.1, 46.2], [7.14, 46.225]]),
        trail(2, "Lake Circuit", vec![[7.05, 46.15], [7.07, 46.15]]),
        trail(3, "No Geometry", vec![]),
    ])
}

// ═══════════════════════════════════════════════════════════════════════════
// Status codes
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_status_from_code() {
    assert_eq!(TrailStatus::from_code(0), TrailStatus::Closed);
    assert_eq!(TrailStatus::from_code(1), TrailStatus::Open);
    assert_eq!(TrailStatus::from_code(7), TrailStatus::Unknown(7));
    assert_eq!(TrailStatus::from_code(-1), TrailStatus::Unknown(-1));
}

#[test]
fn test_status_labels_and_icons() {
    assert_eq!(TrailStatus::Closed.label(), "Closed");
    assert_eq!(TrailStatus::Closed.icon(), "fa fa-calendar-times-o");
    assert_eq!(TrailStatus::Open.label(), "Open");
    assert_eq!(TrailStatus::Open.icon(), "fa fa-calendar-check-o");
    assert_eq!(TrailStatus::Unknown(5).to_string(), "Unknown");
    assert!(TrailStatus::Open.is_open());
    assert!(!TrailStatus::Unknown(1).is_open());
}

#[test]
fn test_data_format_from_extension() {
    assert_eq!(DataFormat::from_extension(Some("yaml")), DataFormat::Yaml);
    assert_eq!(DataFormat::from_extension(Some("YML")), DataFormat::Yaml);
    assert_eq!(DataFormat::from_extension(Some("json")), DataFormat::Json);
    assert_eq!(DataFormat::from_extension(None), DataFormat::Json);
}

// ═══════════════════════════════════════════════════════════════════════════
// Ids and points
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_trail_id_display_and_serialize() {
    let id = TrailId::from(42);
    assert_eq!(id.to_string(), "42");
    assert_eq!(serde_json::to_string(&id).unwrap(), "42");
}

#[test]
fn test_wgs84_point_serializes_spatial_reference() {
    let point = GeoPoint::wgs84(7.11, 46.21, 1300.0);
    let json = serde_json::to_value(point).unwrap();
    assert_eq!(json["spatialReference"]["wkid"], 4326);
    assert_eq!(json["longitude"], 7.11);
}

#[test]
fn test_sample_point_serializes_as_triple() {
    let sample = ProfileSample {
        length: 1.0,
        value: 1300.0,
        point: GeoPoint::wgs84(7.11, 46.21, 1300.0),
    };
    let json = serde_json::to_value(sample).unwrap();
    assert_eq!(json["point"], serde_json::json!([7.11, 46.21, 1300.0]));
}

// ═══════════════════════════════════════════════════════════════════════════
// Directory
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_directory_resolve_and_position() {
    let dir = directory();
    assert_eq!(dir.len(), 3);
    assert_eq!(dir.resolve(TrailId::new(2)).unwrap().name, "Lake Circuit");
    assert_eq!(dir.position(TrailId::new(3)), Some(2));
    assert!(dir.resolve(TrailId::new(99)).is_none());
}

#[test]
fn test_directory_clones_share_records() {
    let dir = directory();
    let clone = dir.clone();
    assert!(std::ptr::eq(dir.get(0).unwrap(), clone.get(0).unwrap()));
}

#[test]
fn test_nearest_ignores_trails_without_geometry() {
    let dir = directory();
    assert_eq!(dir.nearest(7.13, 46.22).unwrap().id, TrailId::new(1));
    assert_eq!(dir.nearest(7.06, 46.14).unwrap().id, TrailId::new(2));
    assert!(TrailDirectory::default().nearest(7.0, 46.0).is_none());
}

#[test]
fn test_bounds_cover_all_vertices() {
    let (min_x, min_y, max_x, max_y) = directory().bounds().unwrap();
    assert_eq!((min_x, min_y), (7.05, 46.15));
    assert_eq!((max_x, max_y), (7.14, 46.225));
    assert!(TrailDirectory::default().bounds().is_none());
}

#[test]
fn test_sample_lookup() {
    let mut t = trail(1, "Ridge Walk", vec![]);
    assert!(t.sample(0).is_none());
    t.profile_data = Arc::from(vec![
        ProfileSample {
            length: 0.0,
            value: 1200.0,
            point: GeoPoint::wgs84(7.1, 46.2, 1200.0),
        },
        ProfileSample {
            length: 1.0,
            value: 1450.0,
            point: GeoPoint::wgs84(7.12, 46.22, 1450.0),
        },
    ]);
    assert_eq!(t.sample(1).unwrap().value, 1450.0);
    assert!(t.sample(2).is_none());
}
