use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// GeoJSON position: `[longitude, latitude]`.
pub type Position = [f64; 2];

/// Free-form tag/property bag attached to a feature.
pub type Properties = Map<String, Value>;

/// A WGS84 coordinate in degrees. Not bounds-checked.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl Coord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn position(&self) -> Position {
        [self.lon, self.lat]
    }

    pub fn from_position(position: Position) -> Self {
        Self {
            lat: position[1],
            lon: position[0],
        }
    }
}

impl From<Coord> for geo::Point<f64> {
    fn from(c: Coord) -> Self {
        geo::Point::new(c.lon, c.lat)
    }
}

impl From<geo::Point<f64>> for Coord {
    fn from(p: geo::Point<f64>) -> Self {
        Self {
            lat: p.y(),
            lon: p.x(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Position),
    LineString(Vec<Position>),
    /// Only produced by the isochrone estimator; POI lookups never emit polygons.
    Polygon(Vec<Vec<Position>>),
}

impl Geometry {
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
        }
    }

    /// A single coordinate standing in for the whole geometry.
    ///
    /// Points are themselves; lines and polygons use their centroid, falling
    /// back to the first vertex for degenerate shapes.
    pub fn representative_point(&self) -> Option<Coord> {
        use geo::Centroid;

        match self {
            Geometry::Point(p) => Some(Coord::from_position(*p)),
            Geometry::LineString(line) => {
                let ls: geo::LineString<f64> =
                    line.iter().map(|p| geo::coord! { x: p[0], y: p[1] }).collect();
                ls.centroid()
                    .map(Coord::from)
                    .or_else(|| line.first().copied().map(Coord::from_position))
            }
            Geometry::Polygon(rings) => {
                let exterior = rings.first()?;
                let poly = geo::Polygon::new(
                    exterior
                        .iter()
                        .map(|p| geo::coord! { x: p[0], y: p[1] })
                        .collect(),
                    vec![],
                );
                poly.centroid()
                    .map(Coord::from)
                    .or_else(|| exterior.first().copied().map(Coord::from_position))
            }
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: Properties,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: Properties) -> Self {
        Self {
            geometry,
            properties,
        }
    }

    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }
}

/// Ordered features plus aggregate metadata. Feature order only carries
/// meaning for composed routes, where it is the visiting order.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
    #[serde(default)]
    pub properties: Properties,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            properties: Properties::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
