//! Page-to-composite pipeline
//!
//! Classifies a page for every entity type, runs each getter and assembles the result.
//! Batches run on scoped worker threads; each worker parses its own pages since the
//! parsed tree cannot cross threads.

use crate::assemble::{CompositeRecordSet, RecordAssembler};
use crate::data::fetcher::{absolute_url, PageFetcher};
use crate::data::links::match_report_links;
use crate::data::page::Page;
use crate::data::variant::{classify, Variant};
use crate::getters::{
    Diagnostic, EventsGetter, Getter, MatchInfoGetter, MatchSummaryGetter, PlayerGetter,
    SquadsGetter, StatsGetter,
};
use crate::model::EntityType;
use crate::normalize::context::PageContext;
use crate::normalize::registry::NormalizationRegistry;
use crate::{FetchConfig, MatchId, Result, ScrapeError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// The getter producing records of `entity`
pub fn getter_for(entity: EntityType) -> &'static dyn Getter {
    match entity {
        EntityType::Events => &EventsGetter,
        EntityType::Squads => &SquadsGetter,
        EntityType::Stats => &StatsGetter,
        EntityType::MatchInfo => &MatchInfoGetter,
        EntityType::MatchSummary => &MatchSummaryGetter,
        EntityType::Players => &PlayerGetter,
    }
}

/// Everything extracted from one match-report page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub url: String,
    pub fetched_at: DateTime<Utc>,
    pub variants: BTreeMap<EntityType, Variant>,
    pub diagnostics: Vec<Diagnostic>,
    /// Absent when the page has no match id
    pub composite: Option<CompositeRecordSet>,
}

impl MatchReport {
    pub fn match_id(&self) -> Option<&MatchId> {
        self.composite.as_ref().map(|c| &c.match_id)
    }
}

/// Extract every entity type from one page
pub fn scrape_page(page: &Page, registry: &NormalizationRegistry) -> MatchReport {
    let parsed = page.parse();

    let mut variants = BTreeMap::new();
    let mut diagnostics = Vec::new();
    let mut records = BTreeMap::new();

    for entity in EntityType::ALL {
        let variant = classify(entity, &parsed);
        let extraction = getter_for(entity).extract(&parsed, variant, registry);
        variants.insert(entity, extraction.variant);
        diagnostics.extend(extraction.diagnostics);
        records.insert(entity, extraction.records);
    }

    let composite = PageContext::resolve(&parsed, registry)
        .map(|ctx| RecordAssembler.assemble(&ctx.match_id, records));

    MatchReport {
        url: page.url().to_string(),
        fetched_at: page.timestamp(),
        variants,
        diagnostics,
        composite,
    }
}

/// Scrape many pages on up to `workers` threads. Reports come back in input order.
pub fn scrape_batch(
    pages: &[Page],
    registry: &NormalizationRegistry,
    workers: usize,
) -> Vec<MatchReport> {
    if pages.is_empty() {
        return Vec::new();
    }
    let workers = workers.clamp(1, pages.len());
    let chunk_size = pages.len().div_ceil(workers);
    log::info!("Scraping {} pages on {} workers", pages.len(), workers);

    std::thread::scope(|s| {
        let handles: Vec<_> = pages
            .chunks(chunk_size)
            .map(|chunk| {
                s.spawn(move || {
                    chunk
                        .iter()
                        .map(|page| scrape_page(page, registry))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| {
                handle.join().unwrap_or_else(|_| {
                    log::error!("Scrape worker panicked; its pages are skipped");
                    Vec::new()
                })
            })
            .collect()
    })
}

/// Fetch every URL, keeping the pages that arrived and the failures separately.
/// One failed URL never stops the others.
pub fn fetch_pages<F: PageFetcher + ?Sized>(
    fetcher: &F,
    urls: &[String],
) -> (Vec<Page>, Vec<(String, ScrapeError)>) {
    let mut pages = Vec::new();
    let mut failures = Vec::new();

    for url in urls {
        match fetcher.fetch(url) {
            Ok(page) => pages.push(page),
            Err(e) => {
                log::warn!("Skipping {}: {}", url, e);
                failures.push((url.clone(), e));
            }
        }
    }

    (pages, failures)
}

/// Match-report URLs listed on the results page for `date` (YYYY-MM-DD), grouped by
/// competition
pub fn report_links<F: PageFetcher + ?Sized>(
    fetcher: &F,
    config: &FetchConfig,
    date: &str,
) -> Result<BTreeMap<String, Vec<String>>> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| ScrapeError::Parse(format!("invalid date {:?}: {}", date, e)))?;

    let url = format!("{}{}", config.results_url, date);
    let page = fetcher.fetch(&url)?.parse();

    Ok(match_report_links(&page, date)
        .into_iter()
        .map(|(competition, links)| {
            let links = links
                .iter()
                .map(|link| absolute_url(&config.base_url, link))
                .collect();
            (competition, links)
        })
        .collect())
}
