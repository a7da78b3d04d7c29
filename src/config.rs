//! Runtime settings read from `COURTCAPS_*` environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::badges::{Catalog, CatalogError, LoadOptions};
use crate::source::{AttributeSource, LabClient, ResolvingSource, ResponseCache, SourceError, DEFAULT_CACHE_DIR};

pub const DEFAULT_API_URL: &str = "https://www.nba2klab.com/.netlify/functions/char";
pub const DEFAULT_GAME_YEAR: u32 = 26;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub url: String,
    /// Bearer token; empty sends no Authorization header.
    pub token: String,
    pub year: u32,
    pub timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_string(),
            token: String::new(),
            year: DEFAULT_GAME_YEAR,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api: ApiSettings,
    pub cache_dir: PathBuf,
    pub cache_enabled: bool,
    /// Catalog JSON on disk; `None` uses the bundled catalog.
    pub catalog_path: Option<PathBuf>,
    pub strict_catalog: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            cache_enabled: true,
            catalog_path: None,
            strict_catalog: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup. Unparseable numbers keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Settings::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api = ApiSettings {
            url: non_empty("COURTCAPS_API_URL").unwrap_or(defaults.api.url),
            token: non_empty("COURTCAPS_API_TOKEN").unwrap_or_default(),
            year: non_empty("COURTCAPS_GAME_YEAR")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.api.year),
            timeout: non_empty("COURTCAPS_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.api.timeout),
        };

        Self {
            api,
            cache_dir: non_empty("COURTCAPS_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            cache_enabled: !non_empty("COURTCAPS_NO_CACHE").is_some_and(|v| is_truthy(&v)),
            catalog_path: non_empty("COURTCAPS_CATALOG").map(PathBuf::from),
            strict_catalog: non_empty("COURTCAPS_STRICT_CATALOG").is_some_and(|v| is_truthy(&v)),
        }
    }

    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        let options = LoadOptions {
            strict_attributes: self.strict_catalog,
        };
        match &self.catalog_path {
            Some(path) => Catalog::from_path(path, options),
            None => Catalog::embedded_with(options),
        }
    }

    pub fn response_cache(&self) -> ResponseCache {
        let mut cache = ResponseCache::new(&self.cache_dir);
        if !self.cache_enabled {
            cache.disable();
        }
        cache
    }

    /// Cache plus remote lookup, or cache plus approximation when `offline`.
    pub fn resolving_source(&self, offline: bool) -> Result<ResolvingSource, SourceError> {
        let remote = if offline {
            None
        } else {
            Some(Box::new(LabClient::new(&self.api)?) as Box<dyn AttributeSource + Send + Sync>)
        };
        Ok(ResolvingSource::new(self.response_cache(), remote))
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
