//! TrailDirectory: the ordered, read-only collection of trails.

use std::sync::Arc;

use super::trail::{Trail, TrailId};

/// Ordered collection of trail records.  Cloning is cheap; clones share the
/// same underlying records.
#[derive(Debug, Clone, Default)]
pub struct TrailDirectory {
    trails: Arc<[Trail]>,
}

impl TrailDirectory {
    pub fn new(trails: Vec<Trail>) -> Self {
        Self {
            trails: Arc::from(trails),
        }
    }

    pub fn len(&self) -> usize {
        self.trails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trails.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trail> {
        self.trails.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Trail> {
        self.trails.get(index)
    }

    /// Resolve an id to the first trail carrying it.
    pub fn resolve(&self, id: TrailId) -> Option<&Trail> {
        self.trails.iter().find(|t| t.id == id)
    }

    /// Position of the first trail carrying `id`.
    pub fn position(&self, id: TrailId) -> Option<usize> {
        self.trails.iter().position(|t| t.id == id)
    }

    /// Trail whose geometry has a vertex closest to the given coordinate.
    /// Trails without geometry are ignored.
    pub fn nearest(&self, longitude: f64, latitude: f64) -> Option<&Trail> {
        self.trails
            .iter()
            .filter_map(|trail| {
                trail
                    .geometry
                    .vertices()
                    .map(|[x, y]| (x - longitude).powi(2) + (y - latitude).powi(2))
                    .min_by(f64::total_cmp)
                    .map(|d| (trail, d))
            })
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(trail, _)| trail)
    }

    /// Bounding box `(min_lon, min_lat, max_lon, max_lat)` over all geometry.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        self.trails
            .iter()
            .flat_map(|t| t.geometry.vertices().copied().collect::<Vec<_>>())
            .fold(None, |acc, [x, y]| match acc {
                None => Some((x, y, x, y)),
                Some((min_x, min_y, max_x, max_y)) => {
                    Some((min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y)))
                }
            })
    }
}

impl From<Vec<Trail>> for TrailDirectory {
    fn from(trails: Vec<Trail>) -> Self {
        Self::new(trails)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Polyline;

    fn trail(id: u32, name: &str, vertex: [f64; 2]) -> Trail {
        Trail {
            id: TrailId::new(id),
            name: name.to_string(),
            geometry: Arc::new(Polyline {
                paths: vec![vec![vertex]],
            }),
            ..Trail::default()
        }
    }

    #[test]
    fn test_resolve_first_match() {
        let dir = TrailDirectory::new(vec![
            trail(1, "first", [0.0, 0.0]),
            trail(1, "duplicate", [0.0, 0.0]),
        ]);
        assert_eq!(dir.resolve(TrailId::new(1)).unwrap().name, "first");
        assert!(dir.resolve(TrailId::new(2)).is_none());
    }

    #[test]
    fn test_nearest_picks_closest_vertex() {
        let dir = TrailDirectory::new(vec![
            trail(1, "west", [7.0, 46.0]),
            trail(2, "east", [8.0, 46.0]),
        ]);
        assert_eq!(dir.nearest(7.9, 46.1).unwrap().id, TrailId::new(2));
        assert_eq!(dir.nearest(7.2, 45.9).unwrap().id, TrailId::new(1));
    }

    #[test]
    fn test_bounds() {
        let dir = TrailDirectory::new(vec![
            trail(1, "a", [7.0, 46.5]),
            trail(2, "b", [8.0, 46.0]),
        ]);
        assert_eq!(dir.bounds(), Some((7.0, 46.0, 8.0, 46.5)));
        assert_eq!(TrailDirectory::default().bounds(), None);
    }
}
