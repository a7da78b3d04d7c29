//! Property tests for the badge calculator.

use std::collections::HashMap;

use proptest::prelude::*;

use courtcaps::attributes::{Attribute, AttributeCaps};
use courtcaps::badges::{
    AttributeRequirement, BadgeCalculator, BadgeCategory, BadgeRequirements, BadgeTier, Catalog,
    CombinationType,
};

fn caps_strategy() -> impl Strategy<Value = AttributeCaps> {
    (70..=90u32, prop::collection::vec(0..=99u8, Attribute::ALL.len())).prop_map(
        |(height, values)| {
            let mut caps = AttributeCaps::new("Center", height, height + 3, 250);
            for (attr, value) in Attribute::ALL.iter().zip(values) {
                caps.set(*attr, value);
            }
            caps
        },
    )
}

/// Five ascending thresholds; a zero entry models an unreachable tier.
fn thresholds_strategy() -> impl Strategy<Value = [u8; 5]> {
    (prop::collection::vec(1..=99u8, 5), 0..=2usize).prop_map(|(mut values, unset_top)| {
        values.sort_unstable();
        let mut out = [values[0], values[1], values[2], values[3], values[4]];
        for slot in out.iter_mut().rev().take(unset_top) {
            *slot = 0;
        }
        out
    })
}

fn kind_strategy() -> impl Strategy<Value = CombinationType> {
    prop_oneof![Just(CombinationType::Primary), Just(CombinationType::Secondary)]
}

fn window_strategy() -> impl Strategy<Value = (u32, u32)> {
    prop_oneof![
        Just((0, 0)),
        (72..=86u32).prop_map(|min| (min, 0)),
        (72..=86u32).prop_map(|max| (0, max)),
    ]
}

fn badge_strategy() -> impl Strategy<Value = BadgeRequirements> {
    badge_with_windows(window_strategy().boxed())
}

/// Badges with no height window anywhere, so every case reaches the tier combination.
fn ungated_badge_strategy() -> impl Strategy<Value = BadgeRequirements> {
    badge_with_windows(Just((0, 0)).boxed())
}

fn badge_with_windows(
    windows: BoxedStrategy<(u32, u32)>,
) -> impl Strategy<Value = BadgeRequirements> {
    (
        kind_strategy(),
        prop::sample::subsequence(Attribute::ALL.to_vec(), 1..=3),
        prop::collection::vec((thresholds_strategy(), windows), 3),
    )
        .prop_map(|(kind, attrs, specs)| {
            let requirements = attrs
                .into_iter()
                .zip(specs)
                .map(|(attr, (thresholds, (min, max)))| {
                    AttributeRequirement::new(attr, thresholds).with_height_window(min, max)
                })
                .collect();
            BadgeRequirements::new("Synthetic", BadgeCategory::AllAround, kind, requirements)
        })
}

fn calculator_for(badge: &BadgeRequirements) -> BadgeCalculator {
    BadgeCalculator::new(Catalog::from_badges([badge.clone()]))
}

proptest! {
    #[test]
    fn raising_an_attribute_never_lowers_the_tier(
        badge in badge_strategy(),
        caps in caps_strategy(),
        bump in 0..=99u8,
        index in 0..3usize,
    ) {
        let calc = calculator_for(&badge);
        let req = &badge.requirements[index % badge.requirements.len()];
        let attr = req.attribute.unwrap();

        let before = calc.badge_tier("Synthetic", &caps).unwrap();
        let raised = caps.get(attr).saturating_add(bump).min(99);
        let after = calc.badge_tier("Synthetic", &caps.clone().with(attr, raised)).unwrap();
        prop_assert!(after >= before, "{before:?} -> {after:?}");
    }

    #[test]
    fn height_outside_any_window_locks_the_badge(
        badge in badge_strategy(),
        caps in caps_strategy(),
    ) {
        let calc = calculator_for(&badge);
        let gated = badge.requirements.iter().any(|r| !r.height_allows(caps.height));
        let tier = calc.badge_tier("Synthetic", &caps).unwrap();
        if gated {
            prop_assert_eq!(tier, BadgeTier::None);
        }
        prop_assert_eq!(calc.evaluate("Synthetic", &caps).unwrap().height_gated, gated);
    }

    #[test]
    fn primary_is_min_and_secondary_is_max(
        badge in ungated_badge_strategy(),
        caps in caps_strategy(),
    ) {
        let calc = calculator_for(&badge);
        let eval = calc.evaluate("Synthetic", &caps).unwrap();
        prop_assert!(!eval.height_gated);

        let tiers = eval.requirements.iter().map(|r| r.tier);
        let expected = match badge.kind {
            CombinationType::Primary => tiers.min(),
            CombinationType::Secondary => tiers.max(),
        }
        .unwrap_or(BadgeTier::None);
        prop_assert_eq!(eval.tier, expected);
        prop_assert_eq!(calc.badge_tier("Synthetic", &caps).unwrap(), expected);
    }

    #[test]
    fn per_requirement_tier_matches_threshold_ladder(
        thresholds in thresholds_strategy(),
        value in 0..=99u8,
    ) {
        let req = AttributeRequirement::new(Attribute::Block, thresholds);
        let tier = req.tier_for(value);
        if tier.is_unlocked() {
            prop_assert!(value >= req.threshold(tier));
        }
        if let Some((next, needed)) = req.next_step(tier) {
            prop_assert!(next > tier);
            prop_assert!(value < needed);
        }
    }

    #[test]
    fn category_queries_partition_available_badges(caps in caps_strategy()) {
        let calc = BadgeCalculator::new(Catalog::embedded().unwrap());
        let available = calc.available_badges(&caps);

        let mut merged = HashMap::new();
        for category in BadgeCategory::ALL {
            for (name, tier) in calc.badges_by_category(category, &caps) {
                prop_assert!(merged.insert(name, tier).is_none());
            }
        }
        prop_assert_eq!(merged, available);
    }
}
