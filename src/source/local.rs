use crate::attributes::{approximate_center, AttributeCaps};
use crate::source::{AttributeSource, BuildQuery, SourceError};

/// Offline source backed by the Center approximation table. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalApproximation;

impl LocalApproximation {
    pub fn caps_for(&self, query: &BuildQuery) -> AttributeCaps {
        let mut caps = approximate_center(query.height, query.wingspan, query.weight);
        caps.position = query.position.clone();
        caps
    }
}

impl AttributeSource for LocalApproximation {
    fn fetch(&self, query: &BuildQuery) -> Result<AttributeCaps, SourceError> {
        Ok(self.caps_for(query))
    }
}
