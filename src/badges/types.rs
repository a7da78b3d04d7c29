use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::attributes::Attribute;

/// Unlock tier of a badge. Ordering is the tier ladder, so `min`/`max` pick the weaker/stronger tier.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum BadgeTier {
    #[default]
    None,
    Bronze,
    Silver,
    Gold,
    #[serde(rename = "Hall of Fame")]
    HallOfFame,
    Legendary,
}

impl BadgeTier {
    pub const ALL: [BadgeTier; 6] = [
        Self::None,
        Self::Bronze,
        Self::Silver,
        Self::Gold,
        Self::HallOfFame,
        Self::Legendary,
    ];

    /// Scoring tiers from highest to lowest; the order thresholds are tested in.
    pub const DESCENDING: [BadgeTier; 5] = [
        Self::Legendary,
        Self::HallOfFame,
        Self::Gold,
        Self::Silver,
        Self::Bronze,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::HallOfFame => "Hall of Fame",
            Self::Legendary => "Legendary",
        }
    }

    pub fn next(&self) -> Option<BadgeTier> {
        match self {
            Self::None => Some(Self::Bronze),
            Self::Bronze => Some(Self::Silver),
            Self::Silver => Some(Self::Gold),
            Self::Gold => Some(Self::HallOfFame),
            Self::HallOfFame => Some(Self::Legendary),
            Self::Legendary => None,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        *self > Self::None
    }
}

impl fmt::Display for BadgeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for BadgeTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "none" => Ok(Self::None),
            "bronze" => Ok(Self::Bronze),
            "silver" => Ok(Self::Silver),
            "gold" => Ok(Self::Gold),
            "hof" | "halloffame" => Ok(Self::HallOfFame),
            "legendary" | "legend" => Ok(Self::Legendary),
            _ => Err(format!(
                "unknown tier '{s}' (use Bronze, Silver, Gold, HoF or Legendary)"
            )),
        }
    }
}

/// Display groups for badges. Each maps to exactly one category label used by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BadgeCategory {
    Finishing,
    Shooting,
    Playmaking,
    Defense,
    Rebounding,
    Physicals,
    AllAround,
}

impl BadgeCategory {
    pub const ALL: [BadgeCategory; 7] = [
        Self::Finishing,
        Self::Shooting,
        Self::Playmaking,
        Self::Defense,
        Self::Rebounding,
        Self::Physicals,
        Self::AllAround,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Finishing => "Finishing",
            Self::Shooting => "Shooting",
            Self::Playmaking => "Playmaking",
            Self::Defense => "Defense",
            Self::Rebounding => "Rebounding",
            Self::Physicals => "Physicals",
            Self::AllAround => "All-Around",
        }
    }

    /// Category string used in the requirement catalog.
    pub fn catalog_label(&self) -> &'static str {
        match self {
            Self::Finishing => "Inside Scoring",
            Self::Shooting => "Outside Scoring",
            Self::Playmaking => "Playmaking",
            Self::Defense => "Defense",
            Self::Rebounding => "Rebounding",
            Self::Physicals => "General Offense",
            Self::AllAround => "All Around",
        }
    }

    /// Exact match against [catalog_label](BadgeCategory::catalog_label).
    pub fn from_catalog_label(label: &str) -> Option<BadgeCategory> {
        Self::ALL.into_iter().find(|c| c.catalog_label() == label)
    }
}

impl fmt::Display for BadgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BadgeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "finishing" | "inside" | "insidescoring" => Ok(Self::Finishing),
            "shooting" | "outside" | "outsidescoring" => Ok(Self::Shooting),
            "playmaking" | "passing" => Ok(Self::Playmaking),
            "defense" | "defensive" => Ok(Self::Defense),
            "rebounding" | "rebounds" => Ok(Self::Rebounding),
            "physicals" | "physical" | "generaloffense" => Ok(Self::Physicals),
            "allaround" | "all" => Ok(Self::AllAround),
            _ => Err(format!("unknown category '{s}'")),
        }
    }
}

/// How a badge's requirements combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombinationType {
    /// Every requirement must clear a tier; the weakest one decides.
    Primary,
    /// Any requirement may clear a tier; the strongest one decides.
    Secondary,
}

impl CombinationType {
    pub fn parse(label: &str) -> Option<CombinationType> {
        match label.trim() {
            "Primary" => Some(Self::Primary),
            "Secondary" => Some(Self::Secondary),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Secondary => "Secondary",
        }
    }
}

/// One scored attribute of a badge. A threshold of 0 means the tier is not reachable through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeRequirement {
    /// Attribute name exactly as written in the catalog.
    pub name: String,
    /// `None` when the catalog name has no known mapping; such a requirement scores as 0.
    pub attribute: Option<Attribute>,
    pub bronze: u8,
    pub silver: u8,
    pub gold: u8,
    pub hall_of_fame: u8,
    pub legendary: u8,
    /// Inclusive bounds in inches; 0 means unbounded on that side.
    pub min_height: u32,
    pub max_height: u32,
}

impl AttributeRequirement {
    pub fn new(attribute: Attribute, thresholds: [u8; 5]) -> Self {
        let [bronze, silver, gold, hall_of_fame, legendary] = thresholds;
        Self {
            name: attribute.display_name().to_string(),
            attribute: Some(attribute),
            bronze,
            silver,
            gold,
            hall_of_fame,
            legendary,
            min_height: 0,
            max_height: 0,
        }
    }

    pub fn with_height_window(mut self, min_height: u32, max_height: u32) -> Self {
        self.min_height = min_height;
        self.max_height = max_height;
        self
    }

    /// Raw threshold for a tier, 0 when unset. `BadgeTier::None` has no threshold.
    pub fn threshold(&self, tier: BadgeTier) -> u8 {
        match tier {
            BadgeTier::None => 0,
            BadgeTier::Bronze => self.bronze,
            BadgeTier::Silver => self.silver,
            BadgeTier::Gold => self.gold,
            BadgeTier::HallOfFame => self.hall_of_fame,
            BadgeTier::Legendary => self.legendary,
        }
    }

    /// Highest tier whose threshold is set and met by `value`.
    pub fn tier_for(&self, value: u8) -> BadgeTier {
        BadgeTier::DESCENDING
            .into_iter()
            .find(|tier| {
                let threshold = self.threshold(*tier);
                threshold > 0 && value >= threshold
            })
            .unwrap_or(BadgeTier::None)
    }

    /// Next tier above `current` reachable through this attribute, with its threshold.
    pub fn next_step(&self, current: BadgeTier) -> Option<(BadgeTier, u8)> {
        let mut tier = current.next();
        while let Some(t) = tier {
            let threshold = self.threshold(t);
            if threshold > 0 {
                return Some((t, threshold));
            }
            tier = t.next();
        }
        None
    }

    pub fn has_height_window(&self) -> bool {
        self.min_height > 0 || self.max_height > 0
    }

    pub fn height_allows(&self, height: u32) -> bool {
        if self.min_height > 0 && height < self.min_height {
            return false;
        }
        if self.max_height > 0 && height > self.max_height {
            return false;
        }
        true
    }

    /// Set thresholds never decrease up the tier ladder.
    pub fn is_monotonic(&self) -> bool {
        let set: Vec<u8> = BadgeTier::DESCENDING
            .iter()
            .rev()
            .map(|tier| self.threshold(*tier))
            .filter(|t| *t > 0)
            .collect();
        set.windows(2).all(|pair| pair[0] <= pair[1])
    }

    pub fn has_any_threshold(&self) -> bool {
        BadgeTier::DESCENDING
            .iter()
            .any(|tier| self.threshold(*tier) > 0)
    }
}

/// Full rule set for one badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeRequirements {
    pub name: String,
    /// Category label as written in the catalog (e.g. "Inside Scoring").
    pub category: String,
    pub kind: CombinationType,
    /// Type string as written in the catalog, kept for diagnostics.
    pub type_label: String,
    pub requirements: Vec<AttributeRequirement>,
}

impl BadgeRequirements {
    pub fn new(
        name: impl Into<String>,
        category: BadgeCategory,
        kind: CombinationType,
        requirements: Vec<AttributeRequirement>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.catalog_label().to_string(),
            kind,
            type_label: kind.as_str().to_string(),
            requirements,
        }
    }

    pub fn category(&self) -> Option<BadgeCategory> {
        BadgeCategory::from_catalog_label(&self.category)
    }
}

/// Catalog key for a badge name: spaces and hyphens removed.
pub fn badge_id(name: &str) -> String {
    name.chars().filter(|c| *c != ' ' && *c != '-').collect()
}
