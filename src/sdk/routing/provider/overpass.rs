use super::types::{OsmElement, OverpassResponse};
use crate::sdk::routing::error::RoutingError;
use crate::sdk::routing::geojson::Coord;
use crate::sdk::routing::poi::TagFilter;
use crate::sdk::routing::service::MapDataProvider;
use crate::sdk::util::rate_limit::{self, Limiter};
use reqwest::blocking::Client;
use std::time::Duration;

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

pub struct OverpassProvider {
    client: Client,
    base_url: String,
    limiter: Limiter,
}

impl OverpassProvider {
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
}

/// Escapes a tag key or value for use inside a double-quoted QL string.
fn quote(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Builds one Overpass QL query covering every filter as node, way and
/// relation clauses around the center point.
pub fn build_query(center: Coord, radius_m: f64, filters: &[TagFilter]) -> String {
    let around = format!("around:{},{},{}", radius_m, center.lat, center.lon);
    let mut query = String::from("[out:json];\n(\n");
    for f in filters {
        let (key, value) = (quote(&f.key), quote(&f.value));
        for kind in ["node", "way", "relation"] {
            query.push_str(&format!(
                "  {}[\"{}\"=\"{}\"]({});\n",
                kind, key, value, around
            ));
        }
    }
    query.push_str(");\nout body geom;\n");
    query
}

/// Reads the element list from an Overpass body. A `runtime error` remark
/// means the query was aborted server-side and the elements are unusable.
pub fn parse_elements(text: &str) -> Result<Vec<OsmElement>, RoutingError> {
    let body: OverpassResponse = serde_json::from_str(text)?;
    match body.remark {
        Some(remark) if remark.trim_start().starts_with("runtime error") => {
            Err(RoutingError::ApiError {
                code: "runtime error".to_string(),
                message: remark,
            })
        }
        Some(remark) => {
            log::debug!("Overpass remark: {}", remark);
            Ok(body.elements)
        }
        None => Ok(body.elements),
    }
}

impl MapDataProvider for OverpassProvider {
    fn fetch_elements(
        &self,
        center: Coord,
        radius_m: f64,
        filters: &[TagFilter],
    ) -> Result<Vec<OsmElement>, RoutingError> {
        let query = build_query(center, radius_m, filters);
        rate_limit::wait(&self.limiter);
        log::debug!(
            "[PROVIDER] Calling overpass for {} filters within {} m of {:?}",
            filters.len(),
            radius_m,
            center
        );

        let response = self
            .client
            .post(&self.base_url)
            .form(&[("data", query.as_str())])
            .send()
            .map_err(|e| {
                log::error!(
                    "Failed to send POST request. URL: {}\nError: {}",
                    self.base_url,
                    e
                );
                RoutingError::from_transport(e)
            })?;

        let status = response.status();
        let text = response.text().map_err(RoutingError::from_transport)?;

        if !status.is_success() {
            log::error!(
                "Overpass returned non-success status: {}. Body: {}",
                status,
                text
            );
            return Err(RoutingError::ApiError {
                code: status.as_u16().to_string(),
                message: text,
            });
        }

        parse_elements(&text).map_err(|e| {
            log::error!(
                "Failed to read OverpassResponse. URL: {}\nError: {}. Body: {}",
                self.base_url,
                e,
                text
            );
            e
        })
    }
}
