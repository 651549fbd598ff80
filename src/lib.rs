pub mod sdk;

pub use sdk::config::WalkConfig;
pub use sdk::narration::{attach_description, Narrator, RouteSummary};
pub use sdk::routing::cache::GeoCache;
pub use sdk::routing::{
    Coord, FeatureCollection, RouteRequest, RouteSelector, RoutingError, UserPreferences,
};
