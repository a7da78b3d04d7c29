//! Where attribute caps come from: the lookup service, the on-disk response cache,
//! or the local approximation table.

pub mod cache;
pub mod client;
pub mod local;
pub mod resolve;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attributes::AttributeCaps;

pub use cache::{CacheError, ResponseCache, DEFAULT_CACHE_DIR};
pub use client::{LabClient, ScrapeProgress};
pub use local::LocalApproximation;
pub use resolve::{CapsOrigin, Resolved, ResolvingSource};

/// One point in the character builder: position plus height, wingspan (inches) and weight (lbs).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildQuery {
    pub position: String,
    pub height: u32,
    pub wingspan: u32,
    pub weight: u32,
}

impl BuildQuery {
    pub fn new(position: impl Into<String>, height: u32, wingspan: u32, weight: u32) -> Self {
        Self {
            position: position.into(),
            height,
            wingspan,
            weight,
        }
    }

    pub fn center(height: u32, wingspan: u32, weight: u32) -> Self {
        Self::new("Center", height, wingspan, weight)
    }
}

impl fmt::Display for BuildQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "position={} height={} wingspan={} weight={}",
            self.position, self.height, self.wingspan, self.weight
        )
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("no results returned for {0}")]
    NoResults(BuildQuery),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Anything that can produce attribute caps for a build.
pub trait AttributeSource {
    fn fetch(&self, query: &BuildQuery) -> Result<AttributeCaps, SourceError>;
}

impl<T: AttributeSource + ?Sized> AttributeSource for Box<T> {
    fn fetch(&self, query: &BuildQuery) -> Result<AttributeCaps, SourceError> {
        (**self).fetch(query)
    }
}
