//! Convert a badge requirement spreadsheet export (CSV) into the JSON catalog format.
//! Columns by header name: Category, Badge, Type, Attribute, Bronze, Silver, Gold, HoF,
//! Legend, Min_Height, Max_Height, id (the last three optional).

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use courtcaps::badges::{
    validate_catalog, Catalog, LoadOptions, RequirementRow, ThresholdCell, ValidationSeverity,
    DEFAULT_CATALOG_PATH,
};

#[derive(Debug, Parser)]
#[command(name = "import_badge_csv", about = "Import badge requirements from CSV")]
struct Args {
    #[arg(long, default_value = "data/import/badge_requirements.csv")]
    input: PathBuf,
    #[arg(long, default_value = DEFAULT_CATALOG_PATH)]
    output: PathBuf,
    /// Refuse to write when the imported catalog has validation errors.
    #[arg(long)]
    strict: bool,
}

const REQUIRED: [&str; 4] = ["Category", "Badge", "Type", "Attribute"];

fn main() -> Result<()> {
    courtcaps::logging::init(0);
    let args = Args::parse();

    let mut reader = csv::Reader::from_path(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;
    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));

    for name in REQUIRED {
        if column(name).is_none() {
            bail!("{} is missing the {name} column", args.input.display());
        }
    }

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("CSV row {}", line + 2))?;
        let text = |name: &str| {
            column(name)
                .and_then(|i| record.get(i))
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };
        let cell = |name: &str| Some(ThresholdCell::from_text(&text(name)));
        let optional = |name: &str| Some(text(name)).filter(|s| !s.is_empty());

        let badge = text("Badge");
        if badge.is_empty() {
            continue;
        }
        rows.push(RequirementRow {
            category: text("Category"),
            badge,
            kind: text("Type"),
            attribute: text("Attribute"),
            bronze: cell("Bronze"),
            silver: cell("Silver"),
            gold: cell("Gold"),
            hof: cell("HoF"),
            legend: cell("Legend"),
            min_height: optional("Min_Height"),
            max_height: optional("Max_Height"),
            id: text("id"),
        });
    }

    let catalog = Catalog::from_rows(rows.clone(), LoadOptions::default())?;
    let report = validate_catalog(&catalog);
    for diagnostic in report.sorted() {
        eprintln!("{diagnostic}");
    }
    if args.strict && report.has_errors() {
        bail!(
            "{} validation errors; nothing written",
            report.count(ValidationSeverity::Error)
        );
    }

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&args.output, serde_json::to_string_pretty(&rows)?)
        .with_context(|| format!("write {}", args.output.display()))?;
    println!(
        "Wrote {} rows ({} badges) to {} at {}",
        rows.len(),
        catalog.len(),
        args.output.display(),
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    Ok(())
}
