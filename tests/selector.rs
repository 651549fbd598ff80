mod test_utils;

use serde_json::json;
use test_utils::*;
use walkroute::sdk::narration::RouteSummary;
use walkroute::sdk::routing::{
    Coord, Geometry, RouteRequest, RouteSelector, RoutingError, UserPreferences,
};

const ALEX: Coord = Coord {
    lat: 52.5219,
    lon: 13.4132,
};

fn selector(h: &Harness) -> RouteSelector {
    RouteSelector::new(h.pois.clone(), h.router.clone())
}

fn places() -> Vec<walkroute::sdk::routing::provider::types::OsmElement> {
    vec![
        node(1, 52.519, 13.404, &[("leisure", "park"), ("name", "Park")]),
        node(2, 52.52, 13.407, &[("tourism", "attraction"), ("name", "Tower")]),
        node(3, 52.521, 13.405, &[("amenity", "cafe")]),
    ]
}

#[test]
fn end_point_gives_single_leg_route() {
    let h = Harness::new(FakeMapData::new(places()), FakeRouter::new());
    let request = RouteRequest {
        start: BERLIN,
        end: Some(ALEX),
        max_distance_km: None,
        scenic: false,
    };

    let fc = selector(&h)
        .suggest(&request, &UserPreferences::default())
        .unwrap();

    assert_eq!(fc.features.len(), 1);
    assert_eq!(fc.features[0].geometry.kind(), "LineString");
    assert_eq!(fc.properties["pois"], json!([]));
    assert!(fc.properties.contains_key("total_distance_km"));
    assert!(fc.properties.contains_key("total_duration_minutes"));
    assert_eq!(h.map_data.calls(), 0);
}

#[test]
fn unroutable_end_point_reports_failure() {
    let h = Harness::new(
        FakeMapData::new(places()),
        FakeRouter::failing_on(vec![(BERLIN, ALEX)]),
    );
    let request = RouteRequest {
        start: BERLIN,
        end: Some(ALEX),
        max_distance_km: None,
        scenic: false,
    };

    assert!(matches!(
        selector(&h).suggest(&request, &UserPreferences::default()),
        Err(RoutingError::RouteUnavailable(_))
    ));
}

#[test]
fn open_ended_request_merges_area_and_pois() {
    let h = Harness::new(FakeMapData::new(places()), FakeRouter::new());
    let request = RouteRequest {
        start: BERLIN,
        end: None,
        max_distance_km: Some(3.0),
        scenic: false,
    };

    let fc = selector(&h)
        .suggest(&request, &UserPreferences::default())
        .unwrap();

    assert_eq!(fc.features.len(), 4);
    let area = &fc.features[0];
    assert!(matches!(area.geometry, Geometry::Polygon(_)));
    assert_eq!(area.properties["type"], json!("walkable_area"));
    assert_eq!(area.properties["estimated_walking_time_minutes"], json!(36));
    assert!(fc.features[1..]
        .iter()
        .all(|f| f.properties.contains_key("osm_id")));
    assert_eq!(fc.properties["total_distance_km"], json!(3.0));
    assert_eq!(fc.properties["total_duration_minutes"], json!(36));
    assert!(h.routing.requests().is_empty());
}

#[test]
fn stored_preference_applies_without_request_distance() {
    let h = Harness::new(FakeMapData::new(places()), FakeRouter::new());
    let request = RouteRequest {
        start: BERLIN,
        end: None,
        max_distance_km: None,
        scenic: false,
    };
    let preferences = UserPreferences {
        preferred_max_distance_km: 2.0,
        ..UserPreferences::default()
    };

    let fc = selector(&h).suggest(&request, &preferences).unwrap();

    assert_eq!(fc.properties["total_duration_minutes"], json!(24));
    assert_eq!(fc.properties["total_distance_km"], json!(2.0));
}

#[test]
fn scenic_flag_takes_precedence_over_end_point() {
    let h = Harness::new(FakeMapData::new(places()), FakeRouter::new());
    let request = RouteRequest {
        start: BERLIN,
        end: Some(ALEX),
        max_distance_km: Some(3.0),
        scenic: true,
    };

    let fc = selector(&h)
        .suggest(&request, &UserPreferences::default())
        .unwrap();

    assert_eq!(fc.features.len(), 4);
    assert!(!h.routing.requests().contains(&(BERLIN, ALEX)));

    let summary = RouteSummary::from_route(&fc);
    assert_eq!(
        summary.pois,
        vec![
            ("Park".to_string(), "leisure".to_string()),
            ("Tower".to_string(), "tourism".to_string()),
            ("Unnamed location".to_string(), "point of interest".to_string()),
        ]
    );
}

#[test]
fn scenic_request_with_one_poi_fails() {
    let h = Harness::new(
        FakeMapData::new(vec![node(1, 52.519, 13.404, &[("leisure", "park")])]),
        FakeRouter::new(),
    );
    let request = RouteRequest {
        start: BERLIN,
        end: None,
        max_distance_km: Some(3.0),
        scenic: true,
    };

    assert!(matches!(
        selector(&h).suggest(&request, &UserPreferences::default()),
        Err(RoutingError::InsufficientData { found: 1, .. })
    ));
}
