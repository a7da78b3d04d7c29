//! Blocking client for the character-builder lookup service.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::attributes::{AttributeCaps, PhysicalBounds};
use crate::config::ApiSettings;
use crate::source::{AttributeSource, BuildQuery, SourceError};

const DEFAULT_SCRAPE_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Serialize)]
struct LookupRequest<'a> {
    filters: Vec<Filter<'a>>,
    year: u32,
}

#[derive(Debug, Serialize)]
struct Filter<'a> {
    name: &'a str,
    value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    results: Vec<AttributeCaps>,
}

/// Reported once per request during a scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeProgress {
    pub current: usize,
    pub total: usize,
    pub query: BuildQuery,
}

#[derive(Debug, Clone)]
pub struct LabClient {
    http: Client,
    base_url: String,
    auth_token: String,
    year: u32,
    delay: Duration,
}

impl LabClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, SourceError> {
        let http = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            http,
            base_url: settings.url.clone(),
            auth_token: settings.token.clone(),
            year: settings.year,
            delay: DEFAULT_SCRAPE_DELAY,
        })
    }

    /// Pause between requests during range scrapes.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch caps for one build. The first result row wins.
    pub fn get_attribute_caps(&self, query: &BuildQuery) -> Result<AttributeCaps, SourceError> {
        let body = LookupRequest {
            filters: vec![
                Filter {
                    name: "position",
                    value: query.position.clone().into(),
                },
                Filter {
                    name: "height",
                    value: query.height.into(),
                },
                Filter {
                    name: "wingspan",
                    value: query.wingspan.into(),
                },
                Filter {
                    name: "weight",
                    value: query.weight.into(),
                },
            ],
            year: self.year,
        };

        let mut request = self
            .http
            .post(&self.base_url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json, text/plain, */*")
            .json(&body);
        if !self.auth_token.is_empty() {
            request = request.header(AUTHORIZATION, format!("Bearer {}", self.auth_token));
        }

        debug!(%query, url = %self.base_url, "requesting attribute caps");
        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text()?;
        let parsed: LookupResponse = serde_json::from_str(&raw).map_err(SourceError::Decode)?;
        parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::NoResults(query.clone()))
    }

    /// Scrape every combination in the given inclusive ranges. Failed builds are logged and skipped.
    pub fn scrape_range(
        &self,
        position: &str,
        heights: (u32, u32),
        wingspans: (u32, u32),
        weights: (u32, u32, u32),
        mut on_progress: impl FnMut(&ScrapeProgress),
    ) -> Vec<AttributeCaps> {
        let (min_weight, max_weight, step) = weights;
        let queries: Vec<BuildQuery> = (heights.0..=heights.1)
            .flat_map(|height| {
                (wingspans.0..=wingspans.1).flat_map(move |wingspan| {
                    (min_weight..=max_weight)
                        .step_by(step.max(1) as usize)
                        .map(move |weight| BuildQuery::new(position, height, wingspan, weight))
                })
            })
            .collect();
        self.scrape_queries(queries, &mut on_progress)
    }

    /// Scrape every valid Center build described by `bounds`.
    pub fn scrape_bounds(
        &self,
        bounds: &[PhysicalBounds],
        weight_step: u32,
        mut on_progress: impl FnMut(&ScrapeProgress),
    ) -> Vec<AttributeCaps> {
        let queries: Vec<BuildQuery> = bounds
            .iter()
            .flat_map(|b| {
                b.wingspans().flat_map(move |wingspan| {
                    b.weights(weight_step)
                        .map(move |weight| BuildQuery::center(b.height, wingspan, weight))
                })
            })
            .collect();
        self.scrape_queries(queries, &mut on_progress)
    }

    fn scrape_queries(
        &self,
        queries: Vec<BuildQuery>,
        on_progress: &mut impl FnMut(&ScrapeProgress),
    ) -> Vec<AttributeCaps> {
        let total = queries.len();
        let mut results = Vec::with_capacity(total);
        for (index, query) in queries.into_iter().enumerate() {
            on_progress(&ScrapeProgress {
                current: index + 1,
                total,
                query: query.clone(),
            });
            match self.get_attribute_caps(&query) {
                Ok(caps) => results.push(caps),
                Err(err) => {
                    warn!(%query, error = %err, "skipping build");
                    continue;
                }
            }
            if index + 1 < total && !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
        }
        info!(scraped = results.len(), requested = total, "scrape finished");
        results
    }
}

impl AttributeSource for LabClient {
    fn fetch(&self, query: &BuildQuery) -> Result<AttributeCaps, SourceError> {
        self.get_attribute_caps(query)
    }
}
