//! Build-grid search: enumerate height/wingspan/weight combinations, score each by
//! unlocked badge count and rank them.

use std::io;

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::attributes::{format_length, AttributeCaps};
use crate::badges::{BadgeCalculator, BadgeCategory};
use crate::source::{BuildQuery, CapsOrigin, ResolvingSource};

/// Inclusive range with a step. A zero step is treated as 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

impl Span {
    pub const fn new(min: u32, max: u32, step: u32) -> Self {
        Self { min, max, step }
    }

    pub fn values(&self) -> impl Iterator<Item = u32> {
        (self.min..=self.max).step_by(self.step.max(1) as usize)
    }

    pub fn count(&self) -> usize {
        if self.min > self.max {
            return 0;
        }
        ((self.max - self.min) / self.step.max(1)) as usize + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildGrid {
    pub position: String,
    pub heights: Span,
    pub wingspans: Span,
    pub weights: Span,
}

impl Default for BuildGrid {
    fn default() -> Self {
        Self {
            position: "Center".to_string(),
            heights: Span::new(78, 88, 1),
            wingspans: Span::new(78, 92, 2),
            weights: Span::new(220, 300, 20),
        }
    }
}

impl BuildGrid {
    pub fn len(&self) -> usize {
        self.heights.count() * self.wingspans.count() * self.weights.count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Height-major, then wingspan, then weight.
    pub fn queries(&self) -> Vec<BuildQuery> {
        let mut out = Vec::with_capacity(self.len());
        for height in self.heights.values() {
            for wingspan in self.wingspans.values() {
                for weight in self.weights.values() {
                    out.push(BuildQuery::new(self.position.clone(), height, wingspan, weight));
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildScore {
    pub caps: AttributeCaps,
    pub origin: CapsOrigin,
    pub badge_count: usize,
    pub average_cap: f64,
}

impl BuildScore {
    pub fn height(&self) -> u32 {
        self.caps.height
    }

    pub fn wingspan(&self) -> u32 {
        self.caps.wingspan
    }

    pub fn weight(&self) -> u32 {
        self.caps.weight
    }
}

pub fn score_build(calculator: &BadgeCalculator, caps: AttributeCaps, origin: CapsOrigin) -> BuildScore {
    let badge_count = calculator.available_badges(&caps).len();
    let average_cap = caps.average_cap();
    BuildScore {
        caps,
        origin,
        badge_count,
        average_cap,
    }
}

/// Most badges first, then higher average cap; ties fall back to the smaller build.
pub fn rank_builds(mut builds: Vec<BuildScore>) -> Vec<BuildScore> {
    builds.sort_by(|left, right| {
        right
            .badge_count
            .cmp(&left.badge_count)
            .then_with(|| right.average_cap.total_cmp(&left.average_cap))
            .then_with(|| left.height().cmp(&right.height()))
            .then_with(|| left.wingspan().cmp(&right.wingspan()))
            .then_with(|| left.weight().cmp(&right.weight()))
    });
    builds
}

/// Score a batch of already-fetched caps in parallel and rank them.
pub fn rank_caps(
    calculator: &BadgeCalculator,
    fetched: Vec<(AttributeCaps, CapsOrigin)>,
) -> Vec<BuildScore> {
    let scored: Vec<BuildScore> = fetched
        .into_par_iter()
        .map(|(caps, origin)| score_build(calculator, caps, origin))
        .collect();
    rank_builds(scored)
}

/// Fetch every build in the grid (sequentially, the lookup service is rate limited),
/// then score and rank. `on_progress` receives (done, total).
pub fn find_best_builds(
    grid: &BuildGrid,
    source: &ResolvingSource,
    calculator: &BadgeCalculator,
    mut on_progress: impl FnMut(usize, usize),
) -> Vec<BuildScore> {
    let queries = grid.queries();
    let total = queries.len();
    let mut fetched = Vec::with_capacity(total);
    for (index, query) in queries.iter().enumerate() {
        let resolved = source.resolve(query);
        debug!(%query, origin = %resolved.origin, "fetched build");
        fetched.push((resolved.caps, resolved.origin));
        on_progress(index + 1, total);
    }
    rank_caps(calculator, fetched)
}

/// Unlocked badge count per category, in display order, omitting empty categories.
pub fn category_breakdown(
    calculator: &BadgeCalculator,
    caps: &AttributeCaps,
) -> Vec<(BadgeCategory, usize)> {
    BadgeCategory::ALL
        .iter()
        .map(|category| (*category, calculator.badges_by_category(*category, caps).len()))
        .filter(|(_, count)| *count > 0)
        .collect()
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    rank: usize,
    position: &'a str,
    height: u32,
    height_ft: String,
    wingspan: u32,
    wingspan_ft: String,
    weight: u32,
    badges: usize,
    avg_cap: String,
    source: &'static str,
}

pub fn write_csv<W: io::Write>(writer: W, ranked: &[BuildScore]) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    for (index, build) in ranked.iter().enumerate() {
        out.serialize(CsvRow {
            rank: index + 1,
            position: &build.caps.position,
            height: build.height(),
            height_ft: format_length(build.height()),
            wingspan: build.wingspan(),
            wingspan_ft: format_length(build.wingspan()),
            weight: build.weight(),
            badges: build.badge_count,
            avg_cap: format!("{:.1}", build.average_cap),
            source: build.origin.as_str(),
        })?;
    }
    out.flush()?;
    Ok(())
}
