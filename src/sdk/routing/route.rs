use super::cache::{CacheKey, GeoCache};
use super::error::RoutingError;
use super::geojson::{Coord, Feature, Geometry, Properties};
use super::provider::types::Directions;
use super::service::RoutingProvider;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// One point-to-point walking leg.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RouteSegment {
    pub path: Vec<Coord>,
    pub distance_m: f64,
    pub duration_s: f64,
    /// Whole minutes, truncated: `floor(duration_s / 60)`.
    pub duration_minutes: u64,
}

impl RouteSegment {
    pub fn from_directions(directions: Directions) -> Self {
        Self {
            duration_minutes: whole_minutes(directions.duration_s),
            path: directions.path,
            distance_m: directions.distance_m,
            duration_s: directions.duration_s,
        }
    }

    fn stationary(at: Coord) -> Self {
        Self {
            path: vec![at, at],
            distance_m: 0.0,
            duration_s: 0.0,
            duration_minutes: 0,
        }
    }

    pub fn to_feature(&self) -> Feature {
        let mut properties = Properties::new();
        properties.insert("distance".into(), Value::from(self.distance_m));
        properties.insert("duration".into(), Value::from(self.duration_s));
        properties.insert("duration_minutes".into(), Value::from(self.duration_minutes));
        Feature::new(
            Geometry::LineString(self.path.iter().map(Coord::position).collect()),
            properties,
        )
    }
}

pub(crate) fn whole_minutes(seconds: f64) -> u64 {
    (seconds / 60.0).floor().max(0.0) as u64
}

/// Read-through walking router backed by the shared [`GeoCache`].
pub struct WalkingRouter {
    provider: Arc<dyn RoutingProvider>,
    cache: Arc<GeoCache>,
}

impl WalkingRouter {
    pub fn new(provider: Arc<dyn RoutingProvider>, cache: Arc<GeoCache>) -> Self {
        Self { provider, cache }
    }

    /// Fetches (or recalls) the walking leg from `start` to `end`.
    ///
    /// Failures are returned, never cached.
    pub fn try_route(&self, start: Coord, end: Coord) -> Result<RouteSegment, RoutingError> {
        if start == end {
            log::debug!("Start and end coordinates are identical. Returning zero route.");
            return Ok(RouteSegment::stationary(start));
        }

        let key = CacheKey::route(start, end);
        if let Some(segment) = self.cache.get::<RouteSegment>(&key) {
            return Ok(segment);
        }

        let segment = RouteSegment::from_directions(self.provider.get_directions(start, end)?);
        if let Err(e) = self.cache.put(&key, &segment) {
            log::warn!("Failed to cache route {}: {}", key, e);
        }
        Ok(segment)
    }

    /// Like [`try_route`](Self::try_route) but reports "no route available"
    /// as `None` after logging the reason.
    pub fn route(&self, start: Coord, end: Coord) -> Option<RouteSegment> {
        match self.try_route(start, end) {
            Ok(segment) => Some(segment),
            Err(e) => {
                log::warn!("No walking route {:?} -> {:?}: {}", start, end, e);
                None
            }
        }
    }
}
