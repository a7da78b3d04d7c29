//! Badge tier calculator: maps a build's attribute caps to the best unlockable tier per badge.
//!
//! Height windows are a precondition: a build outside any requirement's window gets `None`
//! for the whole badge. Otherwise Primary badges take the weakest requirement's tier and
//! Secondary badges take the strongest.

use std::collections::HashMap;

use serde::Serialize;

use crate::attributes::AttributeCaps;
use crate::badges::error::BadgeError;
use crate::badges::loader::Catalog;
use crate::badges::types::{
    AttributeRequirement, BadgeCategory, BadgeRequirements, BadgeTier, CombinationType,
};

/// Per-requirement detail for a single badge evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementOutcome {
    pub attribute: String,
    pub value: u8,
    pub tier: BadgeTier,
    /// Next tier reachable through this attribute and the cap it needs.
    pub next: Option<(BadgeTier, u8)>,
    pub height_ok: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeEvaluation {
    pub name: String,
    pub category: Option<BadgeCategory>,
    pub kind: CombinationType,
    pub tier: BadgeTier,
    pub height_gated: bool,
    pub requirements: Vec<RequirementOutcome>,
    /// Index into `requirements` of the one that decides the tier (weakest for Primary, strongest for Secondary).
    pub deciding: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct BadgeCalculator {
    catalog: Catalog,
}

impl BadgeCalculator {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Tier for one badge. The only failure is an unknown badge name.
    pub fn badge_tier(&self, name: &str, attrs: &AttributeCaps) -> Result<BadgeTier, BadgeError> {
        let badge = self
            .catalog
            .get(name)
            .ok_or_else(|| BadgeError::NotFound(name.to_string()))?;
        Ok(tier_of(badge, attrs))
    }

    /// Like [badge_tier](BadgeCalculator::badge_tier) but with the per-requirement breakdown.
    pub fn evaluate(&self, name: &str, attrs: &AttributeCaps) -> Result<BadgeEvaluation, BadgeError> {
        let badge = self
            .catalog
            .get(name)
            .ok_or_else(|| BadgeError::NotFound(name.to_string()))?;

        let requirements: Vec<RequirementOutcome> = badge
            .requirements
            .iter()
            .map(|req| {
                let value = attribute_value(req, attrs);
                let tier = req.tier_for(value);
                RequirementOutcome {
                    attribute: req.name.clone(),
                    value,
                    tier,
                    next: req.next_step(tier),
                    height_ok: req.height_allows(attrs.height),
                }
            })
            .collect();

        let height_gated = requirements.iter().any(|r| !r.height_ok);
        let deciding = match badge.kind {
            CombinationType::Primary => requirements
                .iter()
                .enumerate()
                .min_by_key(|(_, r)| r.tier)
                .map(|(i, _)| i),
            CombinationType::Secondary => requirements
                .iter()
                .enumerate()
                .rev()
                .max_by_key(|(_, r)| r.tier)
                .map(|(i, _)| i),
        };

        Ok(BadgeEvaluation {
            name: badge.name.clone(),
            category: badge.category(),
            kind: badge.kind,
            tier: tier_of(badge, attrs),
            height_gated,
            requirements,
            deciding,
        })
    }

    /// Every badge unlocked at Bronze or better, keyed by display name.
    pub fn available_badges(&self, attrs: &AttributeCaps) -> HashMap<String, BadgeTier> {
        self.collect_unlocked(attrs, |_| true)
    }

    /// Unlocked badges whose catalog category is exactly the label for `category`.
    pub fn badges_by_category(
        &self,
        category: BadgeCategory,
        attrs: &AttributeCaps,
    ) -> HashMap<String, BadgeTier> {
        let label = category.catalog_label();
        self.collect_unlocked(attrs, |badge| badge.category == label)
    }

    pub fn list_all_badges(&self) -> Vec<String> {
        self.catalog.iter().map(|badge| badge.name.clone()).collect()
    }

    pub fn category_of(&self, name: &str) -> Option<BadgeCategory> {
        self.catalog.get(name).and_then(BadgeRequirements::category)
    }

    fn collect_unlocked(
        &self,
        attrs: &AttributeCaps,
        keep: impl Fn(&BadgeRequirements) -> bool,
    ) -> HashMap<String, BadgeTier> {
        self.catalog
            .iter()
            .filter(|badge| keep(badge))
            .filter_map(|badge| {
                let tier = tier_of(badge, attrs);
                tier.is_unlocked().then(|| (badge.name.clone(), tier))
            })
            .collect()
    }
}

fn attribute_value(req: &AttributeRequirement, attrs: &AttributeCaps) -> u8 {
    req.attribute.map(|attr| attrs.get(attr)).unwrap_or(0)
}

fn tier_of(badge: &BadgeRequirements, attrs: &AttributeCaps) -> BadgeTier {
    if badge
        .requirements
        .iter()
        .any(|req| !req.height_allows(attrs.height))
    {
        return BadgeTier::None;
    }

    let tiers = badge
        .requirements
        .iter()
        .map(|req| req.tier_for(attribute_value(req, attrs)));

    match badge.kind {
        CombinationType::Primary => tiers.min(),
        CombinationType::Secondary => tiers.max(),
    }
    .unwrap_or(BadgeTier::None)
}
