use super::error::RoutingError;
use super::geojson::{Coord, Feature, FeatureCollection, Position};
use super::poi::{PoiLookup, TagFilter, SCENIC_FILTERS};
use super::route::{whole_minutes, RouteSegment, WalkingRouter};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Fewer candidates than this and no scenic loop is attempted.
pub const MIN_SCENIC_POIS: usize = 2;

/// Upper bound on POIs visited by one loop.
pub const MAX_SCENIC_STOPS: usize = 3;

/// Property keys that name a POI's category, in priority order.
pub const CATEGORY_KEYS: [&str; 4] = ["leisure", "natural", "tourism", "historic"];

pub const UNNAMED_POI: &str = "Unnamed location";
pub const GENERIC_CATEGORY: &str = "point of interest";

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PoiSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub category: String,
    pub location: Position,
}

impl PoiSummary {
    pub fn from_feature(feature: &Feature, at: Coord) -> Self {
        let name = feature
            .property_str("name")
            .unwrap_or(UNNAMED_POI)
            .to_string();
        let category = CATEGORY_KEYS
            .iter()
            .find(|k| feature.properties.contains_key(**k))
            .map(|k| k.to_string())
            .unwrap_or_else(|| GENERIC_CATEGORY.to_string());
        Self {
            name,
            category,
            location: at.position(),
        }
    }
}

/// A leg of the loop that could not be routed.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SkippedLeg {
    pub from: Coord,
    pub to: Coord,
    pub reason: String,
}

/// A loop through selected POIs. Legs are in visiting order; legs that
/// failed are listed in `skipped_legs` and excluded from the totals.
#[derive(Clone, Debug)]
pub struct CompositeRoute {
    pub waypoints: Vec<Coord>,
    pub legs: Vec<RouteSegment>,
    pub pois: Vec<PoiSummary>,
    pub skipped_legs: Vec<SkippedLeg>,
}

impl CompositeRoute {
    pub fn total_distance_m(&self) -> f64 {
        self.legs.iter().map(|l| l.distance_m).sum()
    }

    pub fn total_duration_s(&self) -> f64 {
        self.legs.iter().map(|l| l.duration_s).sum()
    }

    /// Total distance in km rounded to two decimals.
    pub fn total_distance_km(&self) -> f64 {
        round_km(self.total_distance_m())
    }

    pub fn total_duration_minutes(&self) -> u64 {
        whole_minutes(self.total_duration_s())
    }

    pub fn is_partial(&self) -> bool {
        !self.skipped_legs.is_empty()
    }

    pub fn to_feature_collection(&self) -> FeatureCollection {
        let mut fc =
            FeatureCollection::new(self.legs.iter().map(RouteSegment::to_feature).collect());
        let props = &mut fc.properties;
        props.insert("total_distance".into(), Value::from(self.total_distance_m()));
        props.insert("total_duration".into(), Value::from(self.total_duration_s()));
        props.insert("total_distance_km".into(), Value::from(self.total_distance_km()));
        props.insert(
            "total_duration_minutes".into(),
            Value::from(self.total_duration_minutes()),
        );
        props.insert(
            "pois".into(),
            serde_json::to_value(&self.pois).unwrap_or_default(),
        );
        props.insert(
            "skipped_legs".into(),
            serde_json::to_value(&self.skipped_legs).unwrap_or_default(),
        );
        fc
    }
}

pub(crate) fn round_km(meters: f64) -> f64 {
    (meters / 1000.0 * 100.0).round() / 100.0
}

fn is_park(f: &Feature) -> bool {
    f.property_str("leisure") == Some("park")
}

fn is_attraction(f: &Feature) -> bool {
    f.properties.contains_key("tourism") || f.properties.contains_key("historic")
}

/// Picks up to [`MAX_SCENIC_STOPS`] POIs: the first park, then the first
/// tourism/historic feature, then whatever comes next in input order.
/// Positional only; distance from the start is not considered. When the
/// first attraction is the park itself, its slot goes to the fill.
pub fn select_pois(features: &[Feature]) -> Vec<&Feature> {
    let mut picked: Vec<usize> = Vec::with_capacity(MAX_SCENIC_STOPS);

    if let Some(i) = features.iter().position(is_park) {
        picked.push(i);
    }
    if let Some(i) = features.iter().position(is_attraction) {
        if !picked.contains(&i) {
            picked.push(i);
        }
    }
    for i in 0..features.len() {
        if picked.len() >= MAX_SCENIC_STOPS {
            break;
        }
        if !picked.contains(&i) {
            picked.push(i);
        }
    }

    picked.into_iter().map(|i| &features[i]).collect()
}

/// Builds circular walks from a start point through nearby POIs.
pub struct ScenicComposer {
    pois: Arc<PoiLookup>,
    router: Arc<WalkingRouter>,
}

impl ScenicComposer {
    pub fn new(pois: Arc<PoiLookup>, router: Arc<WalkingRouter>) -> Self {
        Self { pois, router }
    }

    /// Composes a loop `start -> POI.. -> start` within `max_distance_km`.
    ///
    /// Legs are routed one after another in visiting order; a failed leg is
    /// recorded and skipped. Errors only when too few POIs exist or when
    /// not a single leg could be routed.
    pub fn compose(
        &self,
        start: Coord,
        max_distance_km: f64,
    ) -> Result<CompositeRoute, RoutingError> {
        let filters = TagFilter::set(&SCENIC_FILTERS);
        let candidates = self
            .pois
            .find_pois(start, max_distance_km * 1000.0, Some(filters.as_slice()))?;

        if candidates.len() < MIN_SCENIC_POIS {
            log::warn!(
                "Not enough POIs found for a scenic route: {} within {} km",
                candidates.len(),
                max_distance_km
            );
            return Err(RoutingError::InsufficientData {
                found: candidates.len(),
                required: MIN_SCENIC_POIS,
            });
        }

        let mut waypoints = vec![start];
        let mut pois = Vec::new();
        for feature in select_pois(&candidates.features) {
            match feature.geometry.representative_point() {
                Some(at) => {
                    waypoints.push(at);
                    pois.push(PoiSummary::from_feature(feature, at));
                }
                None => log::debug!("Skipping POI without coordinates: {:?}", feature.properties),
            }
        }
        waypoints.push(start);

        let mut legs = Vec::with_capacity(waypoints.len() - 1);
        let mut skipped_legs = Vec::new();
        for pair in waypoints.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            match self.router.try_route(from, to) {
                Ok(segment) => legs.push(segment),
                Err(e) => {
                    log::warn!("Skipping scenic leg {:?} -> {:?}: {}", from, to, e);
                    skipped_legs.push(SkippedLeg {
                        from,
                        to,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if legs.is_empty() {
            return Err(RoutingError::RouteUnavailable(format!(
                "none of the {} scenic legs could be routed",
                skipped_legs.len()
            )));
        }

        let route = CompositeRoute {
            waypoints,
            legs,
            pois,
            skipped_legs,
        };
        log::info!(
            "Scenic route: {} legs ({} skipped), {} km, {} min",
            route.legs.len(),
            route.skipped_legs.len(),
            route.total_distance_km(),
            route.total_duration_minutes()
        );
        Ok(route)
    }
}
