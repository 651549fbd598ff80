use super::error::RoutingError;
use super::geojson::Coord;
use super::poi::TagFilter;
use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{
    fmt, fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

/// Canonical, order-independent identity of a geo query.
#[derive(Eq, PartialEq, Hash, Clone, Debug)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a POI lookup. Filters are sorted and de-duplicated so the same
    /// logical filter set always lands on the same entry.
    pub fn pois(center: Coord, radius_m: f64, filters: &[TagFilter]) -> Self {
        let mut tags: Vec<String> = filters.iter().map(ToString::to_string).collect();
        tags.sort_unstable();
        tags.dedup();
        Self(format!(
            "pois::{},{}::{}::{}",
            center.lat,
            center.lon,
            radius_m,
            tags.join(",")
        ))
    }

    /// Key for a directed point-to-point leg. Start and end are not swapped:
    /// walking paths are not guaranteed symmetric.
    pub fn route(start: Coord, end: Coord) -> Self {
        Self(format!(
            "route::{},{}::{},{}",
            start.lat, start.lon, end.lat, end.lon
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn file_name(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        format!("{}.json", hex::encode(digest))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// On-disk record: the document plus enough metadata to validate it on read.
#[derive(Serialize, Deserialize, Debug)]
pub struct CacheEntry<T> {
    pub key: String,
    pub fetched_at: DateTime<Utc>,
    pub document: T,
}

/// File-per-key document cache.
///
/// Each entry lives in `<dir>/<sha256(key)>.json` and is written through a
/// temporary file that is renamed into place, so readers never observe a
/// half-written entry and concurrent writers of one key resolve to
/// last-write-wins. Entries never expire unless a maximum age is set.
#[derive(Debug, Clone)]
pub struct GeoCache {
    dir: PathBuf,
    max_age: Option<Duration>,
}

impl GeoCache {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, RoutingError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, max_age: None })
    }

    pub fn with_max_age(mut self, max_age: Option<Duration>) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the cached document for `key`, or `None` on a miss.
    ///
    /// Unreadable, corrupt, mismatched and expired entries are all misses.
    pub fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let path = self.dir.join(key.file_name());
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("[CACHE MISS] {}", key);
                return None;
            }
            Err(e) => {
                log::warn!("Unreadable cache entry {}: {}", path.display(), e);
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&data) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Corrupt cache entry {}: {}", path.display(), e);
                return None;
            }
        };

        if entry.key != key.as_str() {
            log::warn!(
                "Cache entry {} holds key {:?}, expected {:?}",
                path.display(),
                entry.key,
                key.as_str()
            );
            return None;
        }

        if let Some(max_age) = self.max_age {
            if Utc::now() - entry.fetched_at > max_age {
                log::debug!("[CACHE EXPIRED] {} (fetched {})", key, entry.fetched_at);
                return None;
            }
        }

        log::debug!("[CACHE HIT] {}", key);
        Some(entry.document)
    }

    /// Durably stores `document` under `key`, replacing any previous entry.
    pub fn put<T: Serialize>(&self, key: &CacheKey, document: &T) -> Result<(), RoutingError> {
        let entry = CacheEntry {
            key: key.to_string(),
            fetched_at: Utc::now(),
            document,
        };

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer(&mut tmp, &entry)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.dir.join(key.file_name()))
            .map_err(|e| e.error)?;
        Ok(())
    }
}
