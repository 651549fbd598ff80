//! Walkable-area estimation.
//!
//! Not a network reachability computation: the area is a disc whose radius
//! is the distance covered at a constant 5 km/h pace. Barriers and the path
//! network are ignored, so the result overestimates what is reachable in
//! dense or fragmented areas.

use super::geojson::{Coord, Feature, Geometry, Position, Properties};
use geo::{Destination, Haversine, Point};
use serde_json::Value;

/// 5 km/h rounded to whole meters per minute.
pub const WALKING_SPEED_M_PER_MIN: f64 = 83.0;

/// Number of distinct vertices on the disc boundary.
pub const DISC_VERTICES: usize = 64;

pub fn walking_distance_m(minutes: u32) -> f64 {
    f64::from(minutes) * WALKING_SPEED_M_PER_MIN
}

/// Approximate area reachable on foot within `minutes` of `center`.
///
/// Returns a single polygon feature tagged with the radius used and the
/// approximation method.
pub fn walkable_area(center: Coord, minutes: u32) -> Feature {
    let radius_m = walking_distance_m(minutes);
    let origin: Point<f64> = center.into();

    let mut ring: Vec<Position> = (0..DISC_VERTICES)
        .map(|i| {
            let bearing = 360.0 * i as f64 / DISC_VERTICES as f64;
            let p = Haversine.destination(origin, bearing, radius_m);
            [p.x(), p.y()]
        })
        .collect();
    ring.push(ring[0]);

    let mut properties = Properties::new();
    properties.insert("walking_time_minutes".into(), Value::from(minutes));
    properties.insert("walking_distance_m".into(), Value::from(radius_m));
    properties.insert("approximation".into(), Value::from("constant_speed_disc"));

    Feature::new(Geometry::Polygon(vec![ring]), properties)
}
