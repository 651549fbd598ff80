use super::cache::{CacheKey, GeoCache};
use super::error::RoutingError;
use super::geojson::{Coord, Feature, FeatureCollection, Geometry};
use super::provider::types::OsmElement;
use super::service::MapDataProvider;
use serde_json::Value;
use std::{fmt, str::FromStr, sync::Arc};

/// Tags that make a place interesting while walking.
pub const DEFAULT_FILTERS: [(&str, &str); 8] = [
    ("leisure", "park"),
    ("natural", "wood"),
    ("amenity", "cafe"),
    ("amenity", "restaurant"),
    ("tourism", "attraction"),
    ("historic", "monument"),
    ("shop", "bakery"),
    ("amenity", "bench"),
];

/// The narrower set used when composing scenic loops.
pub const SCENIC_FILTERS: [(&str, &str); 4] = [
    ("leisure", "park"),
    ("natural", "wood"),
    ("tourism", "attraction"),
    ("historic", "monument"),
];

/// A single `key=value` tag match.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TagFilter {
    pub key: String,
    pub value: String,
}

impl TagFilter {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn set(pairs: &[(&str, &str)]) -> Vec<TagFilter> {
        pairs.iter().map(|(k, v)| TagFilter::new(k, v)).collect()
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

impl FromStr for TagFilter {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((k, v)) if !k.trim().is_empty() && !v.trim().is_empty() => {
                Ok(TagFilter::new(k.trim(), v.trim()))
            }
            _ => Err("Invalid tag filter, expected key=value"),
        }
    }
}

/// Converts raw map-data elements into a uniform feature collection.
///
/// Nodes become points, ways carrying geometry become line strings, and
/// everything else (relations, geometry-less ways) is dropped.
pub fn normalize_elements(elements: Vec<OsmElement>) -> FeatureCollection {
    let features = elements
        .into_iter()
        .filter_map(|element| {
            let (geometry, mut properties, id, kind) = match element {
                OsmElement::Node { id, lat, lon, tags } => {
                    (Geometry::Point([lon, lat]), tags, id, "node")
                }
                OsmElement::Way {
                    id,
                    geometry: Some(points),
                    tags,
                } if !points.is_empty() => {
                    let line = points.iter().map(|p| [p.lon, p.lat]).collect();
                    (Geometry::LineString(line), tags, id, "way")
                }
                OsmElement::Way { id, .. } => {
                    log::debug!("Skipping way {} without geometry", id);
                    return None;
                }
                OsmElement::Relation { id } => {
                    log::debug!("Skipping relation {}", id);
                    return None;
                }
                OsmElement::Other => return None,
            };
            properties.insert("osm_id".into(), Value::from(id));
            properties.insert("osm_type".into(), Value::from(kind));
            Some(Feature::new(geometry, properties))
        })
        .collect();

    FeatureCollection::new(features)
}

/// Read-through POI search backed by the shared [`GeoCache`].
pub struct PoiLookup {
    provider: Arc<dyn MapDataProvider>,
    cache: Arc<GeoCache>,
}

impl PoiLookup {
    pub fn new(provider: Arc<dyn MapDataProvider>, cache: Arc<GeoCache>) -> Self {
        Self { provider, cache }
    }

    /// Finds POIs within `radius_m` meters of `center`.
    ///
    /// `None` filters means [`DEFAULT_FILTERS`]. Failed fetches are returned
    /// as errors and never cached.
    pub fn find_pois(
        &self,
        center: Coord,
        radius_m: f64,
        filters: Option<&[TagFilter]>,
    ) -> Result<FeatureCollection, RoutingError> {
        let defaults;
        let filters = match filters {
            Some(f) if !f.is_empty() => f,
            _ => {
                defaults = TagFilter::set(&DEFAULT_FILTERS);
                &defaults[..]
            }
        };

        let key = CacheKey::pois(center, radius_m, filters);
        if let Some(cached) = self.cache.get::<FeatureCollection>(&key) {
            return Ok(cached);
        }

        let elements = self.provider.fetch_elements(center, radius_m, filters)?;
        let raw_count = elements.len();
        let collection = normalize_elements(elements);
        log::info!(
            "Found {} POIs ({} raw elements) within {} m of {:?}",
            collection.len(),
            raw_count,
            radius_m,
            center
        );

        if let Err(e) = self.cache.put(&key, &collection) {
            log::warn!("Failed to cache POI lookup {}: {}", key, e);
        }
        Ok(collection)
    }
}
