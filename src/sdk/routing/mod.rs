pub mod cache;
pub mod error;
pub mod geojson;
pub mod isochrone;
pub mod poi;
pub mod provider;
pub mod route;
pub mod scenic;
pub mod selector;
pub mod service;

pub use cache::{CacheKey, GeoCache};
pub use error::RoutingError;
pub use geojson::{Coord, Feature, FeatureCollection, Geometry};
pub use isochrone::walkable_area;
pub use poi::{PoiLookup, TagFilter};
pub use provider::{OsrmProvider, OverpassProvider};
pub use route::{RouteSegment, WalkingRouter};
pub use scenic::{CompositeRoute, PoiSummary, ScenicComposer, SkippedLeg};
pub use selector::{RouteKind, RouteRequest, RouteSelector, UserPreferences};
pub use service::{MapDataProvider, RoutingProvider};
