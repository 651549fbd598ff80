use super::error::RoutingError;
use super::geojson::Coord;
use super::poi::TagFilter;
use super::provider::types::{Directions, OsmElement};

/// External map-data source (e.g. Overpass).
pub trait MapDataProvider: Send + Sync {
    /// Returns every element matching any of `filters` within `radius_m`
    /// meters of `center`.
    fn fetch_elements(
        &self,
        center: Coord,
        radius_m: f64,
        filters: &[TagFilter],
    ) -> Result<Vec<OsmElement>, RoutingError>;
}

/// External walking-directions source (e.g. OSRM).
pub trait RoutingProvider: Send + Sync {
    /// Gets the fastest walking path between two points.
    fn get_directions(&self, start: Coord, end: Coord) -> Result<Directions, RoutingError>;
}
