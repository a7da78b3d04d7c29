//! Cache, then remote lookup, then local approximation.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::attributes::AttributeCaps;
use crate::source::{
    AttributeSource, BuildQuery, LocalApproximation, ResponseCache, SourceError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CapsOrigin {
    Cache,
    Remote,
    Approximation,
}

impl CapsOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Remote => "remote",
            Self::Approximation => "approximation",
        }
    }
}

impl fmt::Display for CapsOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub caps: AttributeCaps,
    pub origin: CapsOrigin,
}

pub struct ResolvingSource {
    cache: ResponseCache,
    remote: Option<Box<dyn AttributeSource + Send + Sync>>,
    fallback: LocalApproximation,
}

impl ResolvingSource {
    pub fn new(cache: ResponseCache, remote: Option<Box<dyn AttributeSource + Send + Sync>>) -> Self {
        Self {
            cache,
            remote,
            fallback: LocalApproximation,
        }
    }

    /// Approximation only; nothing is read from or written to disk.
    pub fn offline() -> Self {
        Self::new(ResponseCache::disabled(), None)
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Always produces caps. Cache read/write problems are logged, not returned.
    pub fn resolve(&self, query: &BuildQuery) -> Resolved {
        match self.cache.get(query) {
            Ok(Some(caps)) => {
                return Resolved {
                    caps,
                    origin: CapsOrigin::Cache,
                }
            }
            Ok(None) => {}
            Err(err) => warn!(%query, error = %err, "ignoring unreadable cache entry"),
        }

        if let Some(remote) = &self.remote {
            match remote.fetch(query) {
                Ok(caps) => {
                    if let Err(err) = self.cache.set(&caps) {
                        warn!(%query, error = %err, "failed to cache response");
                    }
                    return Resolved {
                        caps,
                        origin: CapsOrigin::Remote,
                    };
                }
                Err(err) => {
                    warn!(%query, error = %err, "lookup failed, using local approximation");
                }
            }
        } else {
            debug!(%query, "no remote source configured");
        }

        Resolved {
            caps: self.fallback.caps_for(query),
            origin: CapsOrigin::Approximation,
        }
    }
}

impl AttributeSource for ResolvingSource {
    fn fetch(&self, query: &BuildQuery) -> Result<AttributeCaps, SourceError> {
        Ok(self.resolve(query).caps)
    }
}
