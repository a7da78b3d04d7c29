use std::path::PathBuf;

use thiserror::Error;

/// Failure to build a catalog. Fatal: nothing can be scored without one.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read badge requirements '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse badge requirements: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("badge '{badge}' references unknown attribute '{attribute}'")]
    UnknownAttribute { badge: String, attribute: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BadgeError {
    #[error("badge \"{0}\" not found")]
    NotFound(String),
}
