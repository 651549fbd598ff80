use super::error::RoutingError;
use super::geojson::{Coord, FeatureCollection};
use super::isochrone::walkable_area;
use super::poi::PoiLookup;
use super::route::WalkingRouter;
use super::scenic::{round_km, ScenicComposer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Pace used to turn a distance budget into a time budget (5 km/h).
pub const MINUTES_PER_KM: f64 = 12.0;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RouteRequest {
    pub start: Coord,
    #[serde(default)]
    pub end: Option<Coord>,
    #[serde(default)]
    pub max_distance_km: Option<f64>,
    #[serde(default)]
    pub scenic: bool,
}

impl RouteRequest {
    pub fn kind(&self) -> RouteKind {
        if self.scenic {
            RouteKind::Scenic
        } else if self.end.is_some() {
            RouteKind::PointToPoint
        } else {
            RouteKind::WalkableArea
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteKind {
    Scenic,
    PointToPoint,
    WalkableArea,
}

/// Stored walking preferences, supplied by the profile store.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct UserPreferences {
    pub preferred_walking_speed_kmh: f64,
    pub preferred_max_distance_km: f64,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            preferred_walking_speed_kmh: 5.0,
            preferred_max_distance_km: 5.0,
        }
    }
}

/// Dispatches a route request to the matching builder and returns a
/// uniform GeoJSON document.
pub struct RouteSelector {
    pois: Arc<PoiLookup>,
    router: Arc<WalkingRouter>,
    scenic: ScenicComposer,
}

impl RouteSelector {
    pub fn new(pois: Arc<PoiLookup>, router: Arc<WalkingRouter>) -> Self {
        Self {
            scenic: ScenicComposer::new(pois.clone(), router.clone()),
            pois,
            router,
        }
    }

    /// Builds the route for `request`. The request's distance budget wins
    /// over the stored preference.
    ///
    /// The returned collection always exposes `total_distance_km`,
    /// `total_duration_minutes` and `pois` in its properties.
    pub fn suggest(
        &self,
        request: &RouteRequest,
        preferences: &UserPreferences,
    ) -> Result<FeatureCollection, RoutingError> {
        let max_distance_km = request
            .max_distance_km
            .unwrap_or(preferences.preferred_max_distance_km);
        log::info!(
            "Suggesting {:?} route from {:?} (max {} km)",
            request.kind(),
            request.start,
            max_distance_km
        );

        match (request.kind(), request.end) {
            (RouteKind::Scenic, _) => Ok(self
                .scenic
                .compose(request.start, max_distance_km)?
                .to_feature_collection()),
            (RouteKind::PointToPoint, Some(end)) => self.point_to_point(request.start, end),
            _ => self.walkable_area(request.start, max_distance_km),
        }
    }

    fn point_to_point(&self, start: Coord, end: Coord) -> Result<FeatureCollection, RoutingError> {
        let segment = self.router.route(start, end).ok_or_else(|| {
            RoutingError::RouteUnavailable(format!(
                "no walking route from {:?} to {:?}",
                start, end
            ))
        })?;

        let mut fc = FeatureCollection::new(vec![segment.to_feature()]);
        let props = &mut fc.properties;
        props.insert("total_distance".into(), Value::from(segment.distance_m));
        props.insert("total_duration".into(), Value::from(segment.duration_s));
        props.insert("total_distance_km".into(), Value::from(round_km(segment.distance_m)));
        props.insert(
            "total_duration_minutes".into(),
            Value::from(segment.duration_minutes),
        );
        props.insert("pois".into(), Value::Array(vec![]));
        Ok(fc)
    }

    fn walkable_area(
        &self,
        center: Coord,
        max_distance_km: f64,
    ) -> Result<FeatureCollection, RoutingError> {
        let minutes = (max_distance_km * MINUTES_PER_KM).floor().max(0.0) as u32;

        let mut area = walkable_area(center, minutes);
        area.properties
            .insert("type".into(), Value::from("walkable_area"));
        area.properties.insert(
            "estimated_walking_time_minutes".into(),
            Value::from(minutes),
        );

        let pois = self.pois.find_pois(center, max_distance_km * 1000.0, None)?;

        let mut features = Vec::with_capacity(pois.len() + 1);
        features.push(area);
        features.extend(pois.features);

        let mut fc = FeatureCollection::new(features);
        let props = &mut fc.properties;
        props.insert("total_distance_km".into(), Value::from(max_distance_km));
        props.insert("total_duration_minutes".into(), Value::from(minutes));
        props.insert("pois".into(), Value::Array(vec![]));
        Ok(fc)
    }
}
