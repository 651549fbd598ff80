pub mod osrm;
pub mod overpass;
pub mod types;

pub use osrm::OsrmProvider;
pub use overpass::OverpassProvider;
