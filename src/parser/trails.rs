//! Trail record ingestion: the boundary where loosely-typed source data
//! becomes `Trail` values.
//!
//! The source data is an array of objects:
//!   { id, name, difficulty, category, walktime, ascent, status,
//!     description, geometry: { paths }, profileData: [{ length, value, point }] }
//!
//! `description` may arrive as a number; it is converted to its string form.
//! `status` may be any integer; codes outside {0, 1} become `Unknown`.
//! Sample points must have exactly three coordinates and samples must be
//! ordered by `length`.  Only the outer array must parse; a record that
//! doesn't match the shape above is rejected on its own.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

use crate::model::{DataFormat, GeoPoint, Polyline, ProfileSample, Trail, TrailId, TrailStatus};
use crate::parser::error::ParseError;

// ---------------------------------------------------------------------------
// Raw deserialization
// ---------------------------------------------------------------------------

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawTrail {
    id: i64,
    name: String,
    #[serde(default)]
    geometry: RawGeometry,
    #[serde(default)]
    difficulty: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    walktime: f64,
    #[serde(default)]
    ascent: f64,
    status: TrailStatus,
    #[serde(default)]
    description: Option<RawText>,
    #[serde(default, alias = "profile_data")]
    profile_data: Vec<RawSample>,
}

#[derive(Deserialize, Debug, Default)]
struct RawGeometry {
    #[serde(default)]
    paths: Vec<Vec<Vec<f64>>>,
}

#[derive(Deserialize, Debug)]
struct RawSample {
    length: f64,
    value: f64,
    point: Vec<Option<f64>>,
}

/// Text that some exports write as a number.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RawText {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl RawText {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Integer(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Result of ingesting a trail file.  Records that fail validation are
/// reported in `rejected` and left out of the directory.
#[derive(Debug)]
pub struct ParsedTrails {
    pub trails: Vec<Trail>,
    pub rejected: Vec<ParseError>,
}

/// Parse trail data in the given format.
pub fn parse_trails_content(content: &str, format: DataFormat) -> Result<ParsedTrails, ParseError> {
    // Only the outer array has to be well-formed; each record is decoded on
    // its own so one bad record can't sink the file.
    let records: Vec<Result<RawTrail, String>> = match format {
        DataFormat::Json => serde_json::from_str::<Vec<serde_json::Value>>(content)?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(|e| e.to_string()))
            .collect(),
        DataFormat::Yaml => serde_yaml::from_str::<Vec<serde_yaml::Value>>(content)?
            .into_iter()
            .map(|v| serde_yaml::from_value(v).map_err(|e| e.to_string()))
            .collect(),
    };

    let mut trails = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();
    let mut seen = HashSet::new();

    for (position, record) in records.into_iter().enumerate() {
        let checked = record
            .map_err(|reason| ParseError::InvalidRecord { position, reason })
            .and_then(|raw_trail| validate(position, raw_trail));
        match checked {
            Ok(trail) if !seen.insert(trail.id) => {
                warn!(trail_id = %trail.id, "duplicate trail id, keeping first");
                rejected.push(ParseError::DuplicateId { id: trail.id.get() });
            }
            Ok(trail) => {
                if let TrailStatus::Unknown(code) = trail.status {
                    warn!(trail_id = %trail.id, code, "unknown status code");
                }
                trails.push(trail);
            }
            Err(e) => {
                warn!(position, error = %e, "rejected trail record");
                rejected.push(e);
            }
        }
    }

    Ok(ParsedTrails { trails, rejected })
}

fn validate(position: usize, raw: RawTrail) -> Result<Trail, ParseError> {
    let id = u32::try_from(raw.id)
        .ok()
        .filter(|&id| id > 0)
        .ok_or(ParseError::InvalidId { position, id: raw.id })?;

    let mut paths = Vec::with_capacity(raw.geometry.paths.len());
    let mut vertex_index = 0;
    for raw_path in raw.geometry.paths {
        let mut path = Vec::with_capacity(raw_path.len());
        for vertex in raw_path {
            match vertex.as_slice() {
                [x, y, ..] => path.push([*x, *y]),
                _ => {
                    return Err(ParseError::MalformedVertex {
                        trail_id: id,
                        index: vertex_index,
                        arity: vertex.len(),
                    })
                }
            }
            vertex_index += 1;
        }
        paths.push(path);
    }

    let mut samples = Vec::with_capacity(raw.profile_data.len());
    for (index, raw_sample) in raw.profile_data.into_iter().enumerate() {
        let [Some(longitude), Some(latitude), Some(elevation)] = raw_sample.point.as_slice()
        else {
            return Err(ParseError::MalformedSample {
                trail_id: id,
                index,
                arity: raw_sample.point.iter().flatten().count(),
            });
        };
        if let Some(prev) = samples.last().map(|s: &ProfileSample| s.length) {
            if raw_sample.length < prev {
                return Err(ParseError::UnorderedProfile { trail_id: id, index });
            }
        }
        samples.push(ProfileSample {
            length: raw_sample.length,
            value: raw_sample.value,
            point: GeoPoint::wgs84(*longitude, *latitude, *elevation),
        });
    }

    Ok(Trail {
        id: TrailId::new(id),
        name: raw.name,
        geometry: Arc::new(Polyline { paths }),
        difficulty: raw.difficulty,
        category: raw.category,
        walktime: raw.walktime,
        ascent: raw.ascent,
        status: raw.status,
        description: raw.description.map(RawText::into_string).unwrap_or_default(),
        profile_data: Arc::from(samples),
    })
}
