use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use courtcaps::attributes::{Attribute, AttributeCaps};
use courtcaps::badges::{BadgeCalculator, BadgeTier, Catalog, LoadOptions};

fn unique_temp_path(name: &str, ext: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("courtcaps-{name}-{stamp}.{ext}"))
}

const CSV: &str = "\
Category,Badge,Type,Attribute,Bronze,Silver,Gold,HoF,Legend,Min_Height,Max_Height,id
Inside Scoring,Posterizer,Primary,Driving Dunk,73,87,93,96,99,,,Posterizer
Inside Scoring,Posterizer,Primary,Vertical,65,75,80,85,,,,Posterizer
Defense,Glove,Primary,Steal,67.0,77,85,92,,,6'9,
";

#[test]
fn csv_import_writes_integer_thresholds_and_loads_back() {
    let input = unique_temp_path("import", "csv");
    let output = unique_temp_path("import", "json");
    fs::write(&input, CSV).expect("fixture should be written");

    let status = Command::new(env!("CARGO_BIN_EXE_import_badge_csv"))
        .args([
            "--input",
            input.to_string_lossy().as_ref(),
            "--output",
            output.to_string_lossy().as_ref(),
        ])
        .env_remove("RUST_LOG")
        .output()
        .expect("import_badge_csv should run");
    assert_eq!(status.status.code(), Some(0), "{}", String::from_utf8_lossy(&status.stderr));
    assert!(String::from_utf8_lossy(&status.stdout).contains("Wrote 3 rows (2 badges)"));

    let written = fs::read_to_string(&output).expect("catalog should be written");
    let rows: serde_json::Value = serde_json::from_str(&written).expect("catalog json");
    let first = &rows[0];
    assert!(first["Bronze"].is_i64(), "Bronze written as {}", first["Bronze"]);
    assert_eq!(first["Bronze"], 73);
    assert_eq!(rows[1]["Legend"], "");
    assert!(rows[2]["Bronze"].is_i64());
    assert_eq!(rows[2]["Bronze"], 67);
    assert!(!written.contains("73.0"));

    let catalog = Catalog::from_path(&output, LoadOptions::default()).expect("catalog reloads");
    let calc = BadgeCalculator::new(catalog);
    let caps = AttributeCaps::new("Center", 79, 82, 230)
        .with(Attribute::DrivingDunk, 90)
        .with(Attribute::Vertical, 65)
        .with(Attribute::Steal, 99);
    assert_eq!(calc.badge_tier("Posterizer", &caps), Ok(BadgeTier::Bronze));
    assert_eq!(calc.badge_tier("Glove", &caps), Ok(BadgeTier::HallOfFame));
    assert_eq!(
        calc.badge_tier("Glove", &AttributeCaps::new("Center", 84, 87, 250).with(Attribute::Steal, 99)),
        Ok(BadgeTier::None)
    );

    let _ = fs::remove_file(input);
    let _ = fs::remove_file(output);
}

#[test]
fn missing_required_column_fails() {
    let input = unique_temp_path("import-bad", "csv");
    let output = unique_temp_path("import-bad", "json");
    fs::write(&input, "Badge,Type,Attribute\nGlove,Primary,Steal\n").expect("fixture should be written");

    let result = Command::new(env!("CARGO_BIN_EXE_import_badge_csv"))
        .args([
            "--input",
            input.to_string_lossy().as_ref(),
            "--output",
            output.to_string_lossy().as_ref(),
        ])
        .output()
        .expect("import_badge_csv should run");
    assert_ne!(result.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&result.stderr).contains("Category"));
    assert!(!output.exists());

    let _ = fs::remove_file(input);
}
