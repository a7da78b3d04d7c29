//! Scraped datasets of attribute caps: loading, recorded expectation checks, and a
//! quality report of the local approximation against real data.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::attributes::{approximate, Attribute, AttributeCaps, CENTER_BOUNDS};

pub const DEFAULT_DATASET_PATH: &str = "data/Center_caps.json";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid dataset JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    builds: Vec<AttributeCaps>,
    index: HashMap<(u32, u32, u32), usize>,
}

impl Dataset {
    pub fn new(builds: Vec<AttributeCaps>) -> Self {
        let mut index = HashMap::with_capacity(builds.len());
        for (i, caps) in builds.iter().enumerate() {
            index.insert((caps.height, caps.wingspan, caps.weight), i);
        }
        Self { builds, index }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| DatasetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, DatasetError> {
        Ok(Self::new(serde_json::from_str(raw)?))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DatasetError> {
        let path = path.as_ref();
        let write_err = |source| DatasetError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let raw = serde_json::to_string_pretty(&self.builds)?;
        fs::write(path, raw).map_err(write_err)
    }

    pub fn builds(&self) -> &[AttributeCaps] {
        &self.builds
    }

    pub fn len(&self) -> usize {
        self.builds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }

    /// Later duplicates of the same height/wingspan/weight win.
    pub fn find(&self, height: u32, wingspan: u32, weight: u32) -> Option<&AttributeCaps> {
        self.index
            .get(&(height, wingspan, weight))
            .map(|&i| &self.builds[i])
    }

    pub fn height_distribution(&self) -> BTreeMap<u32, usize> {
        let mut counts = BTreeMap::new();
        for caps in &self.builds {
            *counts.entry(caps.height).or_insert(0) += 1;
        }
        counts
    }

    /// Center heights from the bounds table with no build in the dataset.
    pub fn missing_center_heights(&self) -> Vec<u32> {
        let present = self.height_distribution();
        CENTER_BOUNDS
            .iter()
            .map(|b| b.height)
            .filter(|h| !present.contains_key(h))
            .collect()
    }

    /// Builds with a zero cap in an attribute every Center has capped at a real value.
    pub fn zero_counts(&self, attributes: &[Attribute]) -> Vec<(Attribute, usize)> {
        attributes
            .iter()
            .map(|attr| {
                let zeros = self.builds.iter().filter(|c| c.get(*attr) == 0).count();
                (*attr, zeros)
            })
            .collect()
    }
}

/// A build whose caps were confirmed by hand in the character builder.
#[derive(Debug, Clone, Copy)]
pub struct Expectation {
    pub name: &'static str,
    pub height: u32,
    pub wingspan: u32,
    pub weight: u32,
    pub checks: &'static [(Attribute, u8)],
}

pub const RECORDED_EXPECTATIONS: [Expectation; 4] = [
    Expectation {
        name: "6'7\" default build",
        height: 79,
        wingspan: 82,
        weight: 245,
        checks: &[
            (Attribute::CloseShot, 99),
            (Attribute::DrivingLayup, 99),
            (Attribute::PassAccuracy, 99),
        ],
    },
    Expectation {
        name: "7'4\" min wingspan",
        height: 88,
        wingspan: 88,
        weight: 270,
        checks: &[(Attribute::DrivingDunk, 64)],
    },
    Expectation {
        name: "6'7\" min weight min wingspan",
        height: 79,
        wingspan: 79,
        weight: 215,
        checks: &[
            (Attribute::CloseShot, 99),
            (Attribute::DrivingLayup, 99),
            (Attribute::PassAccuracy, 99),
        ],
    },
    Expectation {
        name: "7'3\" default build",
        height: 87,
        wingspan: 91,
        weight: 260,
        checks: &[
            (Attribute::CloseShot, 99),
            (Attribute::DrivingLayup, 75),
            (Attribute::PassAccuracy, 99),
            (Attribute::StandingDunk, 99),
            (Attribute::Block, 99),
            (Attribute::OffensiveRebound, 99),
            (Attribute::DefensiveRebound, 99),
        ],
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeCheck {
    pub attribute: Attribute,
    pub expected: u8,
    pub actual: u8,
}

impl AttributeCheck {
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpectationResult {
    pub name: &'static str,
    pub height: u32,
    pub wingspan: u32,
    pub weight: u32,
    /// Empty when the build is missing from the dataset.
    pub checks: Vec<AttributeCheck>,
    pub found: bool,
}

impl ExpectationResult {
    pub fn passed(&self) -> bool {
        self.found && self.checks.iter().all(AttributeCheck::passed)
    }
}

pub fn check_expectations(dataset: &Dataset, expectations: &[Expectation]) -> Vec<ExpectationResult> {
    expectations
        .iter()
        .map(|exp| {
            let build = dataset.find(exp.height, exp.wingspan, exp.weight);
            let checks = build
                .map(|caps| {
                    exp.checks
                        .iter()
                        .map(|(attribute, expected)| AttributeCheck {
                            attribute: *attribute,
                            expected: *expected,
                            actual: caps.get(*attribute),
                        })
                        .collect()
                })
                .unwrap_or_default();
            ExpectationResult {
                name: exp.name,
                height: exp.height,
                wingspan: exp.wingspan,
                weight: exp.weight,
                checks,
                found: build.is_some(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityVerdict {
    Perfect,
    Partial,
    Stubbed,
}

impl QualityVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Perfect => "perfect",
            Self::Partial => "partial",
            Self::Stubbed => "stubbed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityMismatch {
    pub height: u32,
    pub wingspan: u32,
    pub weight: u32,
    pub approximated: u8,
    pub scraped: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeQuality {
    pub attribute: Attribute,
    pub verdict: QualityVerdict,
    pub samples: usize,
    pub matched: usize,
    pub stubbed: usize,
    pub mismatches: Vec<QualityMismatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityReport {
    pub attributes: Vec<AttributeQuality>,
    pub samples_per_attribute: usize,
}

impl QualityReport {
    pub fn count(&self, verdict: QualityVerdict) -> usize {
        self.attributes.iter().filter(|a| a.verdict == verdict).count()
    }
}

/// Evenly spaced indices; deterministic so repeated runs compare the same builds.
fn sample_indices(len: usize, samples: usize) -> Vec<usize> {
    if samples == 0 || len == 0 {
        return Vec::new();
    }
    if samples >= len {
        return (0..len).collect();
    }
    (0..samples).map(|i| i * len / samples).collect()
}

/// Compare the local approximation against `samples` builds per attribute.
pub fn quality_report(dataset: &Dataset, samples: usize) -> QualityReport {
    let indices = sample_indices(dataset.len(), samples);

    let attributes = Attribute::ALL
        .iter()
        .map(|&attribute| {
            let mut matched = 0;
            let mut stubbed = 0;
            let mut mismatches = Vec::new();

            for &i in &indices {
                let caps = &dataset.builds[i];
                let scraped = caps.get(attribute);
                match approximate(attribute, caps.height, caps.wingspan, caps.weight) {
                    None => stubbed += 1,
                    Some(value) if value == scraped => matched += 1,
                    Some(value) => mismatches.push(QualityMismatch {
                        height: caps.height,
                        wingspan: caps.wingspan,
                        weight: caps.weight,
                        approximated: value,
                        scraped,
                    }),
                }
            }

            let verdict = if stubbed == indices.len() {
                QualityVerdict::Stubbed
            } else if mismatches.is_empty() {
                QualityVerdict::Perfect
            } else {
                QualityVerdict::Partial
            };

            AttributeQuality {
                attribute,
                verdict,
                samples: indices.len(),
                matched,
                stubbed,
                mismatches,
            }
        })
        .collect();

    QualityReport {
        attributes,
        samples_per_attribute: indices.len(),
    }
}
