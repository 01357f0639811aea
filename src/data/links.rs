//! Match-report links from a results-by-date page
//!
//! Each results table lists one competition: its first link names the competition and
//! the rows link to the individual match reports.

use crate::data::page::{element_text, select_in, ParsedPage};
use std::collections::BTreeMap;

/// Link text of a match-report link
const REPORT_LINK_TEXT: &str = "Match Report";

/// Collect match-report links keyed by `Competition_Name:date`.
/// Empty when the page has no tables.
pub fn match_report_links(page: &ParsedPage, date: &str) -> BTreeMap<String, Vec<String>> {
    let mut reports: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for table in page.select_all("table") {
        let links = select_in(table, "a");
        let Some(first) = links.first() else {
            continue;
        };
        let competition = element_text(*first).replace(' ', "_");
        if competition.is_empty() {
            continue;
        }

        let hrefs: Vec<String> = links
            .iter()
            .filter(|a| element_text(**a).contains(REPORT_LINK_TEXT))
            .filter_map(|a| a.value().attr("href"))
            .map(str::to_string)
            .collect();

        let entry = reports.entry(format!("{}:{}", competition, date)).or_default();
        for href in hrefs {
            if !entry.contains(&href) {
                entry.push(href);
            }
        }
    }

    log::info!(
        "{}: {} match reports in {} competitions",
        page.url(),
        reports.values().map(Vec::len).sum::<usize>(),
        reports.len()
    );
    reports
}
