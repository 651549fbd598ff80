use crate::sdk::routing::provider::osrm::DEFAULT_OSRM_URL;
use crate::sdk::routing::provider::overpass::DEFAULT_OVERPASS_URL;
use crate::sdk::routing::{
    GeoCache, OsrmProvider, OverpassProvider, PoiLookup, RouteSelector, WalkingRouter,
};
use crate::sdk::util::rate_limit;
use anyhow::{Context, Result};
use std::{env, path::PathBuf, str::FromStr, sync::Arc, time::Duration};

/// Runtime settings, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkConfig {
    pub overpass_url: String,
    pub osrm_url: String,
    pub cache_dir: PathBuf,
    pub http_timeout: Duration,
    /// `None` keeps cache entries forever.
    pub cache_max_age: Option<chrono::Duration>,
    pub overpass_requests_per_minute: u32,
    pub osrm_requests_per_minute: u32,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            osrm_url: DEFAULT_OSRM_URL.to_string(),
            cache_dir: PathBuf::from("cache"),
            http_timeout: Duration::from_secs(30),
            cache_max_age: None,
            overpass_requests_per_minute: 10,
            osrm_requests_per_minute: 60,
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("Invalid value for {}: {:?}", name, raw))
        })
        .transpose()
}

impl WalkConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            overpass_url: lookup("OVERPASS_URL").unwrap_or(defaults.overpass_url),
            osrm_url: lookup("OSRM_URL").unwrap_or(defaults.osrm_url),
            cache_dir: lookup("WALKROUTE_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            http_timeout: parse_var::<u64>(&lookup, "HTTP_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            cache_max_age: parse_var::<i64>(&lookup, "CACHE_MAX_AGE_DAYS")?
                .map(chrono::Duration::days),
            overpass_requests_per_minute: parse_var(&lookup, "OVERPASS_REQUESTS_PER_MINUTE")?
                .unwrap_or(defaults.overpass_requests_per_minute),
            osrm_requests_per_minute: parse_var(&lookup, "OSRM_REQUESTS_PER_MINUTE")?
                .unwrap_or(defaults.osrm_requests_per_minute),
        })
    }

    pub fn poi_cache_dir(&self) -> PathBuf {
        self.cache_dir.join("osm")
    }

    pub fn route_cache_dir(&self) -> PathBuf {
        self.cache_dir.join("routes")
    }

    /// Wires the HTTP providers, caches and limiters into a POI lookup and
    /// a walking router.
    pub fn build_services(&self) -> Result<(Arc<PoiLookup>, Arc<WalkingRouter>)> {
        let poi_cache = GeoCache::open(self.poi_cache_dir())
            .with_context(|| format!("Failed to open cache {}", self.poi_cache_dir().display()))?
            .with_max_age(self.cache_max_age);
        let route_cache = GeoCache::open(self.route_cache_dir())
            .with_context(|| format!("Failed to open cache {}", self.route_cache_dir().display()))?
            .with_max_age(self.cache_max_age);

        let overpass = OverpassProvider::new(
            self.overpass_url.clone(),
            self.http_timeout,
            rate_limit::per_minute(self.overpass_requests_per_minute),
        )?;
        let osrm = OsrmProvider::new(
            self.osrm_url.clone(),
            self.http_timeout,
            rate_limit::per_minute(self.osrm_requests_per_minute),
        )?;

        Ok((
            Arc::new(PoiLookup::new(Arc::new(overpass), Arc::new(poi_cache))),
            Arc::new(WalkingRouter::new(Arc::new(osrm), Arc::new(route_cache))),
        ))
    }

    pub fn build_selector(&self) -> Result<RouteSelector> {
        let (pois, router) = self.build_services()?;
        Ok(RouteSelector::new(pois, router))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = WalkConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, WalkConfig::default());
        assert_eq!(config.cache_max_age, None);
        assert_eq!(config.poi_cache_dir(), PathBuf::from("cache/osm"));
        assert_eq!(config.route_cache_dir(), PathBuf::from("cache/routes"));
    }

    #[test]
    fn reads_overrides() {
        let config = WalkConfig::from_lookup(lookup(&[
            ("OSRM_URL", "http://localhost:5000/route/v1/foot"),
            ("WALKROUTE_CACHE_DIR", "/tmp/walk"),
            ("HTTP_TIMEOUT_SECS", " 5 "),
            ("CACHE_MAX_AGE_DAYS", "30"),
            ("OSRM_REQUESTS_PER_MINUTE", "600"),
        ]))
        .unwrap();
        assert_eq!(config.osrm_url, "http://localhost:5000/route/v1/foot");
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/walk"));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.cache_max_age, Some(chrono::Duration::days(30)));
        assert_eq!(config.osrm_requests_per_minute, 600);
        assert_eq!(config.overpass_url, DEFAULT_OVERPASS_URL);
    }

    #[test]
    fn rejects_garbage_numbers() {
        let err = WalkConfig::from_lookup(lookup(&[("HTTP_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("HTTP_TIMEOUT_SECS"));
    }
}
