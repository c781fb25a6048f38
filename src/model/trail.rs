use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::enums::TrailStatus;

// ---------------------------------------------------------------------------
// TrailId: newtype for type safety
// ---------------------------------------------------------------------------

/// Stable identity key of a trail.  Always positive; zero and negative ids
/// are rejected at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TrailId(pub u32);

impl TrailId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TrailId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TrailId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

/// Spatial reference identified by its well-known id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SpatialReference {
    pub wkid: u32,
}

impl SpatialReference {
    /// WGS84 geographic coordinates (EPSG:4326).
    pub const WGS84: SpatialReference = SpatialReference { wkid: 4326 };
}

/// A 3D point in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
    pub elevation: f64,
    pub spatial_reference: SpatialReference,
}

impl GeoPoint {
    pub fn wgs84(longitude: f64, latitude: f64, elevation: f64) -> Self {
        Self {
            longitude,
            latitude,
            elevation,
            spatial_reference: SpatialReference::WGS84,
        }
    }
}

/// Trail geometry: one or more paths of `[longitude, latitude]` vertices.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Polyline {
    pub paths: Vec<Vec<[f64; 2]>>,
}

impl Polyline {
    pub fn vertices(&self) -> impl Iterator<Item = &[f64; 2]> {
        self.paths.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.iter().all(Vec::is_empty)
    }
}

// ---------------------------------------------------------------------------
// ProfileSample: one elevation-profile sample
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileSample {
    /// Distance along the trail.
    pub length: f64,
    /// Elevation in meters.
    pub value: f64,
    /// Geographic position of the sample.
    #[serde(serialize_with = "serialize_point_tuple")]
    pub point: GeoPoint,
}

fn serialize_point_tuple<S>(point: &GeoPoint, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    [point.longitude, point.latitude, point.elevation].serialize(serializer)
}

// ---------------------------------------------------------------------------
// Trail: the core data model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Trail {
    pub id: TrailId,
    pub name: String,
    pub geometry: Arc<Polyline>,
    pub difficulty: String,
    pub category: String,
    pub walktime: f64,
    pub ascent: f64,
    pub status: TrailStatus,
    pub description: String,
    pub profile_data: Arc<[ProfileSample]>,
}

impl Trail {
    pub fn sample(&self, index: usize) -> Option<&ProfileSample> {
        self.profile_data.get(index)
    }
}

impl Default for Trail {
    fn default() -> Self {
        Self {
            id: TrailId::new(0),
            name: String::new(),
            geometry: Arc::new(Polyline::default()),
            difficulty: String::new(),
            category: String::new(),
            walktime: 0.0,
            ascent: 0.0,
            status: TrailStatus::Closed,
            description: String::new(),
            profile_data: Arc::from(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wgs84_point_carries_wkid() {
        let p = GeoPoint::wgs84(7.1, 46.2, 1200.0);
        assert_eq!(p.spatial_reference.wkid, 4326);
    }

    #[test]
    fn test_sample_serializes_point_as_tuple() {
        let sample = ProfileSample {
            length: 1.0,
            value: 1300.0,
            point: GeoPoint::wgs84(7.11, 46.21, 1300.0),
        };
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(json, r#"{"length":1.0,"value":1300.0,"point":[7.11,46.21,1300.0]}"#);
    }

    #[test]
    fn test_empty_polyline() {
        assert!(Polyline::default().is_empty());
        let line = Polyline {
            paths: vec![vec![[7.0, 46.0]]],
        };
        assert!(!line.is_empty());
        assert_eq!(line.vertices().count(), 1);
    }
}
