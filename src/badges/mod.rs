pub mod calculator;
pub mod error;
pub mod loader;
pub mod types;
pub mod validate;

pub use calculator::{BadgeCalculator, BadgeEvaluation, RequirementOutcome};
pub use error::{BadgeError, CatalogError};
pub use loader::{Catalog, LoadOptions, RequirementRow, ThresholdCell, DEFAULT_CATALOG_PATH};
pub use types::{
    badge_id, AttributeRequirement, BadgeCategory, BadgeRequirements, BadgeTier, CombinationType,
};
pub use validate::{validate_catalog, ValidationDiagnostic, ValidationReport, ValidationSeverity};
