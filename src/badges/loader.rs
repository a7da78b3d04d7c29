//! Badge requirement catalog: one JSON row per (badge, attribute) pair, folded into one
//! [BadgeRequirements] per badge. The bundled catalog lives in data/badge_requirements.json.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::attributes::{parse_catalog_height, Attribute};
use crate::badges::error::CatalogError;
use crate::badges::types::{badge_id, AttributeRequirement, BadgeRequirements, CombinationType};

pub const DEFAULT_CATALOG_PATH: &str = "data/badge_requirements.json";

const EMBEDDED_CATALOG: &str = include_str!("../../data/badge_requirements.json");

/// Threshold cell: numbers normally, but HoF/Legend arrive as `""` when the tier is unreachable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThresholdCell {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl ThresholdCell {
    /// Normalized threshold; empty, negative or non-numeric cells become 0 (unset).
    pub fn value(&self) -> u8 {
        let raw = match self {
            Self::Integer(n) => return u8::try_from((*n).max(0)).unwrap_or(u8::MAX),
            Self::Number(n) => *n,
            Self::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) => n,
                Err(_) => return 0,
            },
        };
        if !raw.is_finite() || raw <= 0.0 {
            0
        } else {
            raw.round().min(f64::from(u8::MAX)) as u8
        }
    }

    /// Cell for a raw spreadsheet value: whole numbers stay integers, other numbers stay
    /// numeric, anything else (including blanks) is kept as text.
    pub fn from_text(raw: &str) -> ThresholdCell {
        let trimmed = raw.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Self::Integer(n);
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => Self::Integer(n as i64),
            Ok(n) if n.is_finite() => Self::Number(n),
            _ => Self::Text(trimmed.to_string()),
        }
    }
}

fn cell_value(cell: &Option<ThresholdCell>) -> u8 {
    cell.as_ref().map(ThresholdCell::value).unwrap_or(0)
}

/// One catalog row as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementRow {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Badge")]
    pub badge: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Attribute")]
    pub attribute: String,
    #[serde(rename = "Bronze", default)]
    pub bronze: Option<ThresholdCell>,
    #[serde(rename = "Silver", default)]
    pub silver: Option<ThresholdCell>,
    #[serde(rename = "Gold", default)]
    pub gold: Option<ThresholdCell>,
    #[serde(rename = "HoF", default)]
    pub hof: Option<ThresholdCell>,
    #[serde(rename = "Legend", default)]
    pub legend: Option<ThresholdCell>,
    #[serde(rename = "Min_Height", default)]
    pub min_height: Option<String>,
    #[serde(rename = "Max_Height", default)]
    pub max_height: Option<String>,
    #[serde(default)]
    pub id: String,
}

impl RequirementRow {
    /// Grouping key for rows: the explicit id when present, otherwise derived from the badge name.
    pub fn group_key(&self) -> String {
        let id = self.id.trim();
        if id.is_empty() {
            badge_id(&self.badge)
        } else {
            id.to_string()
        }
    }

    fn to_requirement(&self) -> AttributeRequirement {
        AttributeRequirement {
            name: self.attribute.trim().to_string(),
            attribute: Attribute::from_catalog_name(&self.attribute),
            bronze: cell_value(&self.bronze),
            silver: cell_value(&self.silver),
            gold: cell_value(&self.gold),
            hall_of_fame: cell_value(&self.hof),
            legendary: cell_value(&self.legend),
            min_height: parse_catalog_height(self.min_height.as_deref().unwrap_or("")),
            max_height: parse_catalog_height(self.max_height.as_deref().unwrap_or("")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Reject catalogs that reference attribute names with no known mapping.
    pub strict_attributes: bool,
}

/// Immutable badge catalog keyed by badge id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    badges: HashMap<String, BadgeRequirements>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn embedded() -> Result<Catalog, CatalogError> {
        Self::embedded_with(LoadOptions::default())
    }

    pub fn embedded_with(options: LoadOptions) -> Result<Catalog, CatalogError> {
        Self::from_json_str(EMBEDDED_CATALOG, options)
    }

    pub fn from_path(path: impl AsRef<Path>, options: LoadOptions) -> Result<Catalog, CatalogError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw, options)
    }

    pub fn from_json_str(raw: &str, options: LoadOptions) -> Result<Catalog, CatalogError> {
        let rows: Vec<RequirementRow> = serde_json::from_str(raw)?;
        Self::from_rows(rows, options)
    }

    /// Group rows by id, then key each badge by [badge_id] of its name so lookups by name and
    /// listings agree. Later rows for an attribute already seen on that badge replace it.
    pub fn from_rows(
        rows: impl IntoIterator<Item = RequirementRow>,
        options: LoadOptions,
    ) -> Result<Catalog, CatalogError> {
        let mut badges: HashMap<String, BadgeRequirements> = HashMap::new();
        let mut warned: HashSet<String> = HashSet::new();
        let mut keys: HashMap<String, String> = HashMap::new();

        for row in rows {
            let requirement = row.to_requirement();
            if requirement.attribute.is_none() {
                if options.strict_attributes {
                    return Err(CatalogError::UnknownAttribute {
                        badge: row.badge.clone(),
                        attribute: requirement.name,
                    });
                }
                if warned.insert(requirement.name.clone()) {
                    warn!(
                        badge = %row.badge,
                        attribute = %requirement.name,
                        "catalog attribute has no field mapping; it will score as 0"
                    );
                }
            }

            let key = keys
                .entry(row.group_key())
                .or_insert_with(|| badge_id(row.badge.trim()))
                .clone();
            let badge = badges.entry(key).or_insert_with(|| {
                let kind = CombinationType::parse(&row.kind).unwrap_or_else(|| {
                    warn!(badge = %row.badge, kind = %row.kind, "unknown badge type, treating as Secondary");
                    CombinationType::Secondary
                });
                BadgeRequirements {
                    name: row.badge.trim().to_string(),
                    category: row.category.trim().to_string(),
                    kind,
                    type_label: row.kind.trim().to_string(),
                    requirements: Vec::new(),
                }
            });

            match badge
                .requirements
                .iter_mut()
                .find(|existing| same_attribute(existing, &requirement))
            {
                Some(existing) => *existing = requirement,
                None => badge.requirements.push(requirement),
            }
        }

        Ok(Catalog { badges })
    }

    /// Build directly from rule sets, keyed by [badge_id] of each name.
    pub fn from_badges(badges: impl IntoIterator<Item = BadgeRequirements>) -> Catalog {
        Catalog {
            badges: badges
                .into_iter()
                .map(|badge| (badge_id(&badge.name), badge))
                .collect(),
        }
    }

    /// Look up by display name or id; spaces and hyphens are ignored.
    pub fn get(&self, name: &str) -> Option<&BadgeRequirements> {
        self.badges.get(&badge_id(name.trim()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &BadgeRequirements> {
        self.badges.values()
    }

    pub fn len(&self) -> usize {
        self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }
}

fn same_attribute(a: &AttributeRequirement, b: &AttributeRequirement) -> bool {
    match (a.attribute, b.attribute) {
        (Some(x), Some(y)) => x == y,
        _ => a.name == b.name,
    }
}
