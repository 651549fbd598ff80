use crate::sdk::routing::geojson::{Coord, Position, Properties};
use serde::{Deserialize, Serialize};

// --- Overpass response shapes ---

#[derive(Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OsmElement>,
    /// Set by Overpass on soft failures (timeouts, memory exhaustion), which
    /// still arrive as HTTP 200 with empty or truncated `elements`.
    #[serde(default)]
    pub remark: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// A raw map-data element, before normalization.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OsmElement {
    Node {
        id: i64,
        lat: f64,
        lon: f64,
        #[serde(default)]
        tags: Properties,
    },
    Way {
        id: i64,
        #[serde(default)]
        geometry: Option<Vec<LatLon>>,
        #[serde(default)]
        tags: Properties,
    },
    Relation {
        id: i64,
    },
    #[serde(other)]
    Other,
}

// --- OSRM response shapes ---

#[derive(Deserialize)]
pub struct OsrmResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
pub struct OsrmRoute {
    pub geometry: OsrmGeometry,
    pub distance: f64,
    pub duration: f64,
}

#[derive(Deserialize)]
pub struct OsrmGeometry {
    pub coordinates: Vec<Position>,
}

/// Best-ranked walking path between two points, as reported by a routing
/// provider.
#[derive(Clone, Debug, PartialEq)]
pub struct Directions {
    pub path: Vec<Coord>,
    pub distance_m: f64,
    pub duration_s: f64,
}
