use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_courtcaps")
}

fn unique_temp_path(name: &str, ext: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("courtcaps-{name}-{stamp}.{ext}"))
}

fn run(args: &[&str]) -> Output {
    Command::new(bin())
        .args(args)
        .env("COURTCAPS_NO_CACHE", "1")
        .env("COURTCAPS_API_URL", "http://127.0.0.1:9/char")
        .env_remove("COURTCAPS_CATALOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("courtcaps should run")
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    let output = run(&[]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn badges_requires_build_dimensions() {
    let output = run(&["badges", "--height", "84"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--wingspan"));
}

#[test]
fn badges_offline_emits_json() {
    let output = run(&[
        "badges", "--height", "7-0", "--wingspan", "87", "--weight", "250", "--offline", "--json",
    ]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).expect("badges should emit json");

    assert_eq!(payload["source"], "approximation");
    assert_eq!(payload["build"]["height"], 84);
    assert_eq!(payload["build"]["close_shot"], 99);

    let names: Vec<&str> = payload["badges"]
        .as_array()
        .expect("badges array")
        .iter()
        .filter_map(|b| b["name"].as_str())
        .collect();
    assert!(names.contains(&"Paint Prodigy"));
    assert!(names.contains(&"Dimer"));
    assert!(!names.contains(&"Giant Slayer"));
}

#[test]
fn badges_offline_prints_grouped_listing() {
    let output = run(&[
        "badges", "--height", "84", "--wingspan", "87", "--weight", "250", "--offline",
        "--category", "playmaking",
    ]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Playmaking ("));
    assert!(stdout.contains("💎 Dimer (Legendary)"));
    assert!(!stdout.contains("Paint Prodigy"));
}

#[test]
fn unknown_badge_exits_non_zero() {
    let output = run(&[
        "badges", "--height", "84", "--wingspan", "87", "--weight", "250", "--offline",
        "--badge", "NotARealBadge",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"));
}

#[test]
fn badge_detail_lists_requirements() {
    let output = run(&[
        "badges", "--height", "84", "--wingspan", "87", "--weight", "250", "--offline",
        "--badge", "Paint Prodigy",
    ]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Tier:     💎 Legendary"));
    assert!(stdout.contains("Close Shot"));
}

#[test]
fn catalog_command_accepts_bundled_catalog() {
    let output = run(&["catalog"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("badges=42, errors=0"));
}

#[test]
fn catalog_command_returns_non_zero_on_invalid_catalog() {
    let path = unique_temp_path("bad-catalog", "json");
    fs::write(
        &path,
        r#"[{"Category":"Clutch","Badge":"Ice Veins","Type":"Primary","Attribute":"Free Throw","Bronze":70,"Silver":80,"Gold":85,"HoF":90,"Legend":95}]"#,
    )
    .expect("fixture should be written");

    let output = run(&["catalog", "--path", path.to_string_lossy().as_ref()]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("unknown category 'Clutch'"));

    let _ = fs::remove_file(path);
}

#[test]
fn validate_command_checks_recorded_builds() {
    let path = unique_temp_path("dataset", "json");
    let builds = serde_json::json!([
        {"position":"Center","height":79,"wingspan":82,"weight":245,"close_shot":99,"driving_layup":99,"pass_accuracy":99},
        {"position":"Center","height":88,"wingspan":88,"weight":270,"close_shot":99,"driving_layup":62,"pass_accuracy":99,"driving_dunk":64},
        {"position":"Center","height":79,"wingspan":79,"weight":215,"close_shot":99,"driving_layup":99,"pass_accuracy":99},
        {"position":"Center","height":87,"wingspan":91,"weight":260,"close_shot":99,"driving_layup":75,"pass_accuracy":99,
         "standing_dunk":99,"block":99,"offensive_rebound":99,"defensive_rebound":99}
    ]);
    fs::write(&path, builds.to_string()).expect("fixture should be written");

    let output = run(&["validate", "--dataset", path.to_string_lossy().as_ref()]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Results: 4 passed, 0 failed"));

    fs::write(&path, "[]").expect("fixture should be written");
    let output = run(&["validate", "--dataset", path.to_string_lossy().as_ref()]);
    assert_eq!(output.status.code(), Some(1));

    let _ = fs::remove_file(path);
}

#[test]
fn quality_command_reports_json() {
    let path = unique_temp_path("quality", "json");
    fs::write(
        &path,
        r#"[{"position":"Center","height":79,"wingspan":82,"weight":245,"close_shot":99,"driving_layup":99,"pass_accuracy":99}]"#,
    )
    .expect("fixture should be written");

    let output = run(&["quality", "--dataset", path.to_string_lossy().as_ref(), "--json"]);
    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("quality should emit json");
    assert_eq!(payload["samples_per_attribute"], 1);
    assert_eq!(payload["attributes"].as_array().map(Vec::len), Some(21));

    let _ = fs::remove_file(path);
}

#[test]
fn best_command_ranks_offline_grid_and_writes_csv() {
    let csv_path = unique_temp_path("best", "csv");
    let output = run(&[
        "best",
        "--offline",
        "--min-height", "79", "--max-height", "80",
        "--min-wingspan", "82", "--max-wingspan", "84",
        "--min-weight", "240", "--max-weight", "240",
        "--top", "3",
        "--csv", csv_path.to_string_lossy().as_ref(),
    ]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Total builds:   4"));
    assert!(stdout.contains("Top 3 Builds by Badge Count"));
    assert!(stdout.contains("Badge Breakdown:"));

    let csv = fs::read_to_string(&csv_path).expect("csv should be written");
    assert_eq!(csv.lines().count(), 5);
    assert!(csv.starts_with("rank,position,height"));

    let _ = fs::remove_file(csv_path);
}
