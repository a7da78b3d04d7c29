use std::fmt;

use crate::badges::loader::Catalog;
use crate::badges::types::{
    AttributeRequirement, BadgeCategory, BadgeRequirements, BadgeTier, CombinationType,
};

/// Ordered so that sorting puts errors first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

/// One finding about a badge, or about one of its attribute rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub badge: String,
    pub attribute: Option<String>,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            ValidationSeverity::Error => "error",
            ValidationSeverity::Warning => "warning",
            ValidationSeverity::Info => "info",
        };
        match &self.attribute {
            Some(attribute) => write!(f, "[{level}] {} / {attribute}: {}", self.badge, self.message),
            None => write!(f, "[{level}] {}: {}", self.badge, self.message),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    fn badge(&mut self, severity: ValidationSeverity, badge: &BadgeRequirements, message: String) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            badge: badge.name.clone(),
            attribute: None,
            message,
        });
    }

    fn requirement(
        &mut self,
        severity: ValidationSeverity,
        badge: &BadgeRequirements,
        req: &AttributeRequirement,
        message: String,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            badge: badge.name.clone(),
            attribute: Some(req.name.clone()),
            message,
        });
    }

    pub fn has_errors(&self) -> bool {
        self.count(ValidationSeverity::Error) > 0
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }

    /// Errors first, then by badge and attribute.
    pub fn sorted(&self) -> Vec<&ValidationDiagnostic> {
        let mut sorted: Vec<_> = self.diagnostics.iter().collect();
        sorted.sort_by(|a, b| {
            a.severity
                .cmp(&b.severity)
                .then_with(|| a.badge.cmp(&b.badge))
                .then_with(|| a.attribute.cmp(&b.attribute))
        });
        sorted
    }
}

/// Check a loaded catalog for drift against the attribute model and for inconsistent rows.
pub fn validate_catalog(catalog: &Catalog) -> ValidationReport {
    let mut report = ValidationReport::default();

    for badge in catalog.iter() {
        if BadgeCategory::from_catalog_label(&badge.category).is_none() {
            report.badge(
                ValidationSeverity::Error,
                badge,
                format!("unknown category '{}'", badge.category),
            );
        }
        if CombinationType::parse(&badge.type_label).is_none() {
            report.badge(
                ValidationSeverity::Warning,
                badge,
                format!(
                    "unknown type '{}', scored as {}",
                    badge.type_label,
                    badge.kind.as_str()
                ),
            );
        }
        if badge.requirements.is_empty() {
            report.badge(ValidationSeverity::Error, badge, "no requirements".into());
        }

        for req in &badge.requirements {
            if req.attribute.is_none() {
                report.requirement(
                    ValidationSeverity::Error,
                    badge,
                    req,
                    "attribute name has no field mapping".into(),
                );
            }
            if !req.is_monotonic() {
                let ladder: Vec<String> = BadgeTier::DESCENDING
                    .iter()
                    .rev()
                    .map(|tier| req.threshold(*tier).to_string())
                    .collect();
                report.requirement(
                    ValidationSeverity::Warning,
                    badge,
                    req,
                    format!("thresholds decrease up the tiers ({})", ladder.join("/")),
                );
            }
            if req.min_height > 0 && req.max_height > 0 && req.min_height > req.max_height {
                report.requirement(
                    ValidationSeverity::Warning,
                    badge,
                    req,
                    format!(
                        "min height {}\" above max height {}\"; no build can unlock it",
                        req.min_height, req.max_height
                    ),
                );
            }
            if !req.has_any_threshold() {
                report.requirement(
                    ValidationSeverity::Info,
                    badge,
                    req,
                    "no tier is reachable through this attribute".into(),
                );
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badges::loader::LoadOptions;

    #[test]
    fn bundled_catalog_has_no_errors() {
        let catalog = Catalog::embedded().unwrap();
        let report = validate_catalog(&catalog);
        assert!(!report.has_errors(), "{:?}", report.sorted());
        assert_eq!(report.count(ValidationSeverity::Warning), 0);
    }

    #[test]
    fn drift_and_bad_rows_are_reported() {
        let raw = r#"[
            {"Category":"Clutch","Badge":"Ice Veins","Type":"Tertiary","Attribute":"Free Throw","Bronze":70,"Silver":80,"Gold":75,"HoF":"","Legend":"","id":"IceVeins"},
            {"Category":"Defense","Badge":"Wall","Type":"Primary","Attribute":"Hustle","Bronze":"","Silver":"","Gold":"","HoF":"","Legend":"","Min_Height":"7'0","Max_Height":"6'5","id":"Wall"}
        ]"#;
        let catalog = Catalog::from_json_str(raw, LoadOptions::default()).unwrap();
        let report = validate_catalog(&catalog);
        let messages: Vec<String> = report.sorted().iter().map(|d| d.to_string()).collect();

        assert!(report.has_errors());
        assert_eq!(report.count(ValidationSeverity::Error), 2, "{messages:?}");
        assert!(messages.iter().any(|m| m.contains("unknown category 'Clutch'")));
        assert!(messages.iter().any(|m| m.contains("no field mapping")));
        assert!(messages.iter().any(|m| m.contains("unknown type 'Tertiary'")));
        assert!(messages.iter().any(|m| m.contains("thresholds decrease")));
        assert!(messages.iter().any(|m| m.contains("above max height")));
        assert_eq!(report.count(ValidationSeverity::Info), 1);
        assert_eq!(report.sorted()[0].severity, ValidationSeverity::Error);
        assert!(messages
            .iter()
            .any(|m| m == "[error] Wall / Hustle: attribute name has no field mapping"));
    }
}
