#![allow(dead_code)]

use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use walkroute::sdk::routing::provider::types::{Directions, LatLon, OsmElement};
use walkroute::sdk::routing::{
    Coord, GeoCache, MapDataProvider, PoiLookup, RoutingError, RoutingProvider, TagFilter,
    WalkingRouter,
};

pub const BERLIN: Coord = Coord {
    lat: 52.52,
    lon: 13.405,
};

pub fn tags(pairs: &[(&str, &str)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect()
}

pub fn node(id: i64, lat: f64, lon: f64, pairs: &[(&str, &str)]) -> OsmElement {
    OsmElement::Node {
        id,
        lat,
        lon,
        tags: tags(pairs),
    }
}

pub fn way(id: i64, points: &[(f64, f64)], pairs: &[(&str, &str)]) -> OsmElement {
    OsmElement::Way {
        id,
        geometry: Some(
            points
                .iter()
                .map(|&(lat, lon)| LatLon { lat, lon })
                .collect(),
        ),
        tags: tags(pairs),
    }
}

/// Map-data provider serving a fixed element list and counting calls.
pub struct FakeMapData {
    elements: Vec<OsmElement>,
    fail: bool,
    pub calls: AtomicUsize,
    pub last_filters: Mutex<Vec<TagFilter>>,
}

impl FakeMapData {
    pub fn new(elements: Vec<OsmElement>) -> Arc<Self> {
        Arc::new(Self {
            elements,
            fail: false,
            calls: AtomicUsize::new(0),
            last_filters: Mutex::new(Vec::new()),
        })
    }

    pub fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            elements: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
            last_filters: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MapDataProvider for FakeMapData {
    fn fetch_elements(
        &self,
        _center: Coord,
        _radius_m: f64,
        filters: &[TagFilter],
    ) -> Result<Vec<OsmElement>, RoutingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_filters.lock().unwrap() = filters.to_vec();
        if self.fail {
            return Err(RoutingError::ProviderUnavailable(
                "connection refused".to_string(),
            ));
        }
        Ok(self.elements.clone())
    }
}

/// Routing provider drawing straight lines; distance is 1 m per 1e-5 degree
/// of lat+lon difference, duration is distance / 1.4 m/s.
pub struct FakeRouter {
    failing: Vec<(Coord, Coord)>,
    pub requests: Mutex<Vec<(Coord, Coord)>>,
}

impl FakeRouter {
    pub fn new() -> Arc<Self> {
        Self::failing_on(Vec::new())
    }

    pub fn failing_on(failing: Vec<(Coord, Coord)>) -> Arc<Self> {
        Arc::new(Self {
            failing,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<(Coord, Coord)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn distance_m(start: Coord, end: Coord) -> f64 {
        ((start.lat - end.lat).abs() + (start.lon - end.lon).abs()) * 100_000.0
    }
}

impl RoutingProvider for FakeRouter {
    fn get_directions(&self, start: Coord, end: Coord) -> Result<Directions, RoutingError> {
        self.requests.lock().unwrap().push((start, end));
        if self.failing.contains(&(start, end)) {
            return Err(RoutingError::ApiError {
                code: "NoRoute".to_string(),
                message: "Impossible route between points".to_string(),
            });
        }
        let distance_m = Self::distance_m(start, end);
        Ok(Directions {
            path: vec![start, end],
            distance_m,
            duration_s: distance_m / 1.4,
        })
    }
}

/// POI lookup and router over fresh temporary caches.
pub struct Harness {
    pub dir: TempDir,
    pub map_data: Arc<FakeMapData>,
    pub routing: Arc<FakeRouter>,
    pub pois: Arc<PoiLookup>,
    pub router: Arc<WalkingRouter>,
}

impl Harness {
    pub fn new(map_data: Arc<FakeMapData>, routing: Arc<FakeRouter>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let poi_cache = Arc::new(GeoCache::open(dir.path().join("osm")).unwrap());
        let route_cache = Arc::new(GeoCache::open(dir.path().join("routes")).unwrap());
        Self {
            pois: Arc::new(PoiLookup::new(map_data.clone(), poi_cache)),
            router: Arc::new(WalkingRouter::new(routing.clone(), route_cache)),
            dir,
            map_data,
            routing,
        }
    }
}
