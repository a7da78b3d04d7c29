use std::collections::HashMap;

use courtcaps::attributes::{Attribute, AttributeCaps};
use courtcaps::badges::{
    BadgeCalculator, BadgeCategory, BadgeError, BadgeTier, Catalog, CombinationType, LoadOptions,
};

fn bundled() -> BadgeCalculator {
    BadgeCalculator::new(Catalog::embedded().expect("bundled catalog should load"))
}

fn center(height: u32) -> AttributeCaps {
    AttributeCaps::new("Center", height, height + 3, 250)
}

fn maxed(height: u32) -> AttributeCaps {
    let mut caps = center(height);
    for attr in Attribute::ALL {
        caps.set(attr, 99);
    }
    caps
}

#[test]
fn posterizer_silver_when_both_clear_silver() {
    let attrs = center(84)
        .with(Attribute::DrivingDunk, 87)
        .with(Attribute::Vertical, 75);
    assert_eq!(bundled().badge_tier("Posterizer", &attrs), Ok(BadgeTier::Silver));
}

#[test]
fn posterizer_is_capped_by_vertical() {
    let attrs = center(84)
        .with(Attribute::DrivingDunk, 90)
        .with(Attribute::Vertical, 65);
    assert_eq!(bundled().badge_tier("Posterizer", &attrs), Ok(BadgeTier::Bronze));
}

#[test]
fn deadeye_takes_the_better_jumper() {
    let attrs = center(84)
        .with(Attribute::MidRangeShot, 73)
        .with(Attribute::ThreePointShot, 92);
    assert_eq!(bundled().badge_tier("Deadeye", &attrs), Ok(BadgeTier::Gold));
}

#[test]
fn rise_up_is_locked_below_minimum_height() {
    let calc = bundled();
    assert_eq!(calc.badge_tier("Rise Up", &maxed(75)), Ok(BadgeTier::None));
    assert_eq!(calc.badge_tier("Rise Up", &maxed(78)), Ok(BadgeTier::Legendary));
}

#[test]
fn max_height_windows_lock_tall_builds() {
    let calc = bundled();
    let tall = maxed(84);
    assert_eq!(calc.badge_tier("Float Game", &tall), Ok(BadgeTier::None));
    assert_eq!(calc.badge_tier("Giant Slayer", &tall), Ok(BadgeTier::None));
    assert_eq!(calc.badge_tier("Mini Marksman", &tall), Ok(BadgeTier::None));

    assert_eq!(calc.badge_tier("Float Game", &maxed(82)), Ok(BadgeTier::Legendary));
    assert_eq!(calc.badge_tier("Giant Slayer", &maxed(77)), Ok(BadgeTier::HallOfFame));
}

#[test]
fn empty_legend_cell_stops_at_hall_of_fame() {
    let calc = bundled();
    assert_eq!(calc.badge_tier("Versatility", &maxed(84)), Ok(BadgeTier::HallOfFame));
    assert_eq!(calc.badge_tier("Shifty Shooter", &maxed(84)), Ok(BadgeTier::HallOfFame));
}

#[test]
fn unknown_badge_is_an_error() {
    let err = bundled()
        .badge_tier("NotARealBadge", &maxed(84))
        .unwrap_err();
    assert!(matches!(err, BadgeError::NotFound(ref name) if name == "NotARealBadge"));
    assert!(err.to_string().contains("not found"));
}

#[test]
fn maxed_center_unlocks_everything_outside_height_windows() {
    let calc = bundled();
    let available = calc.available_badges(&maxed(84));
    assert_eq!(calc.list_all_badges().len(), 42);
    assert_eq!(available.len(), 39);
    assert!(available.values().all(BadgeTier::is_unlocked));
    assert_eq!(available.get("Posterizer"), Some(&BadgeTier::Legendary));
    assert!(!available.contains_key("Float Game"));
}

#[test]
fn zero_build_unlocks_nothing() {
    assert!(bundled().available_badges(&center(84)).is_empty());
}

#[test]
fn categories_partition_available_badges() {
    let calc = bundled();
    let attrs = maxed(80);
    let available = calc.available_badges(&attrs);

    let mut merged: HashMap<String, BadgeTier> = HashMap::new();
    for category in BadgeCategory::ALL {
        for (name, tier) in calc.badges_by_category(category, &attrs) {
            assert_eq!(calc.category_of(&name), Some(category));
            assert!(merged.insert(name, tier).is_none(), "badge listed twice");
        }
    }
    assert_eq!(merged, available);
}

#[test]
fn every_category_has_badges() {
    let calc = bundled();
    let attrs = maxed(80);
    for category in BadgeCategory::ALL {
        assert!(
            !calc.badges_by_category(category, &attrs).is_empty(),
            "{category} is empty"
        );
    }
}

#[test]
fn evaluation_explains_the_bottleneck() {
    let attrs = center(84)
        .with(Attribute::Block, 95)
        .with(Attribute::Vertical, 71);
    let eval = bundled().evaluate("High-Flying Denier", &attrs).unwrap();
    assert_eq!(eval.kind, CombinationType::Primary);
    assert_eq!(eval.category, Some(BadgeCategory::Defense));
    assert_eq!(eval.tier, BadgeTier::Silver);
    let deciding = &eval.requirements[eval.deciding.unwrap()];
    assert_eq!(deciding.attribute, "Vertical");
    assert_eq!(deciding.next, Some((BadgeTier::Gold, 78)));
}

#[test]
fn catalog_file_on_disk_loads_like_the_bundled_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(
        &path,
        r#"[
            {"Category":"Defense","Badge":"Glove","Type":"Primary","Attribute":"Steal","Bronze":"67","Silver":77,"Gold":85.0,"HoF":92,"Legend":"","id":"Glove"}
        ]"#,
    )
    .unwrap();
    let calc = BadgeCalculator::new(Catalog::from_path(&path, LoadOptions::default()).unwrap());
    let attrs = center(84).with(Attribute::Steal, 99);
    assert_eq!(calc.badge_tier("Glove", &attrs), Ok(BadgeTier::HallOfFame));
    assert_eq!(calc.badge_tier("Glove", &center(84).with(Attribute::Steal, 67)), Ok(BadgeTier::Bronze));
}

#[test]
fn strict_loading_rejects_unmapped_attributes() {
    let raw = r#"[{"Category":"Defense","Badge":"Wall","Type":"Primary","Attribute":"Hustle","Bronze":60,"Silver":70,"Gold":80,"HoF":90,"Legend":99}]"#;
    assert!(Catalog::from_json_str(raw, LoadOptions::default()).is_ok());
    let strict = LoadOptions {
        strict_attributes: true,
    };
    assert!(Catalog::from_json_str(raw, strict).is_err());
}

#[test]
fn badge_with_custom_id_is_listed_and_queryable() {
    let raw = r#"[{"Category":"Defense","Badge":"Off-Ball Pest","Type":"Primary","Attribute":"Perimeter Defense",
        "Bronze":60,"Silver":70,"Gold":80,"HoF":90,"Legend":99,"id":"Off-Ball_Pest"}]"#;
    let calc = BadgeCalculator::new(Catalog::from_json_str(raw, LoadOptions::default()).unwrap());
    let attrs = center(84).with(Attribute::PerimeterDefense, 99);

    assert_eq!(calc.list_all_badges(), vec!["Off-Ball Pest".to_string()]);
    assert_eq!(
        calc.available_badges(&attrs).get("Off-Ball Pest"),
        Some(&BadgeTier::Legendary)
    );
    for name in calc.list_all_badges() {
        assert_eq!(calc.badge_tier(&name, &attrs), Ok(BadgeTier::Legendary));
    }
}
