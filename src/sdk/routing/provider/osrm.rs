use super::types::{Directions, OsrmResponse};
use crate::sdk::routing::error::{ProviderErrorPayload, RoutingError};
use crate::sdk::routing::geojson::Coord;
use crate::sdk::routing::service::RoutingProvider;
use crate::sdk::util::rate_limit::{self, Limiter};
use reqwest::blocking::Client;
use std::time::Duration;

pub const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org/route/v1/foot";

pub struct OsrmProvider {
    client: Client,
    base_url: String,
    limiter: Limiter,
}

impl OsrmProvider {
    pub fn new(
        base_url: String,
        timeout: Duration,
        limiter: Limiter,
    ) -> Result<Self, RoutingError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url,
            limiter,
        })
    }

    fn route_url(&self, start: Coord, end: Coord) -> String {
        format!(
            "{}/{},{};{},{}",
            self.base_url.trim_end_matches('/'),
            start.lon,
            start.lat,
            end.lon,
            end.lat
        )
    }
}

/// Turns a successful OSRM body into directions, rejecting any non-`Ok`
/// code or an empty route list.
pub fn parse_directions(text: &str) -> Result<Directions, RoutingError> {
    let body: OsrmResponse = serde_json::from_str(text)?;
    if body.code != "Ok" {
        return Err(RoutingError::ApiError {
            message: body.message.unwrap_or_else(|| "Unknown error".to_string()),
            code: body.code,
        });
    }

    let best = body.routes.into_iter().next().ok_or_else(|| RoutingError::ApiError {
        code: "NoRoute".to_string(),
        message: "No route found in success response".to_string(),
    })?;

    Ok(Directions {
        path: best
            .geometry
            .coordinates
            .into_iter()
            .map(Coord::from_position)
            .collect(),
        distance_m: best.distance,
        duration_s: best.duration,
    })
}

impl RoutingProvider for OsrmProvider {
    fn get_directions(&self, start: Coord, end: Coord) -> Result<Directions, RoutingError> {
        rate_limit::wait(&self.limiter);
        log::debug!(
            "[PROVIDER] Calling osrm get_directions for {:?} -> {:?}",
            start,
            end
        );
        let url = self.route_url(start, end);

        let response = self
            .client
            .get(&url)
            .query(&[("steps", "true"), ("geometries", "geojson"), ("overview", "full")])
            .send()
            .map_err(|e| {
                log::error!("Failed to send GET request. URL: {}\nError: {}", url, e);
                RoutingError::from_transport(e)
            })?;

        let status = response.status();
        let text = response.text().map_err(RoutingError::from_transport)?;

        if !status.is_success() {
            // Try to parse the structured error first
            if let Ok(payload) = serde_json::from_str::<ProviderErrorPayload>(&text) {
                return Err(RoutingError::ApiError {
                    code: payload.code,
                    message: payload.message.unwrap_or_default(),
                });
            }
            log::error!(
                "API returned non-success status: {}. Unparseable Body: {}",
                status,
                text
            );
            return Err(RoutingError::ApiError {
                code: status.as_u16().to_string(),
                message: text,
            });
        }

        parse_directions(&text).map_err(|e| {
            if let RoutingError::ParseError(ref inner) = e {
                log::error!(
                    "Failed to parse OsrmResponse. URL: {}\nError: {}. Body: {}",
                    url,
                    inner,
                    text
                );
            }
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::util::rate_limit;

    #[test]
    fn url_uses_lon_lat_order() {
        let p = OsrmProvider::new(
            "http://localhost:5000/route/v1/foot/".to_string(),
            Duration::from_secs(1),
            rate_limit::per_minute(60),
        )
        .unwrap();
        let url = p.route_url(Coord::new(52.52, 13.405), Coord::new(52.51, 13.39));
        assert_eq!(
            url,
            "http://localhost:5000/route/v1/foot/13.405,52.52;13.39,52.51"
        );
    }

    #[test]
    fn parses_best_route() {
        let text = r#"{
            "code": "Ok",
            "routes": [
                {"geometry": {"type": "LineString",
                              "coordinates": [[13.405, 52.52], [13.39, 52.51]]},
                 "distance": 1520.4, "duration": 1094.7, "legs": []},
                {"geometry": {"type": "LineString", "coordinates": []},
                 "distance": 9999.0, "duration": 9999.0}
            ],
            "waypoints": []
        }"#;
        let d = parse_directions(text).unwrap();
        assert_eq!(d.distance_m, 1520.4);
        assert_eq!(d.duration_s, 1094.7);
        assert_eq!(d.path, vec![Coord::new(52.52, 13.405), Coord::new(52.51, 13.39)]);
    }

    #[test]
    fn non_ok_code_is_api_error() {
        let text = r#"{"code": "NoRoute", "message": "Impossible route between points"}"#;
        match parse_directions(text) {
            Err(RoutingError::ApiError { code, message }) => {
                assert_eq!(code, "NoRoute");
                assert_eq!(message, "Impossible route between points");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn empty_route_list_is_api_error() {
        assert!(matches!(
            parse_directions(r#"{"code": "Ok", "routes": []}"#),
            Err(RoutingError::ApiError { .. })
        ));
    }
}
