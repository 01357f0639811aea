//! Structural page-variant classification
//!
//! Every (entity, page) pair maps to exactly one `Variant`. Classification only looks at
//! the presence and count of markup anchors, never at free text, so copy changes on the
//! source site do not move a page between variants.

use crate::data::page::ParsedPage;
use crate::model::EntityType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of stat tables on a full match report
pub const FULL_STAT_TABLES: usize = 17;
/// Number of stat tables on a legacy match report
pub const REDUCED_STAT_TABLES: usize = 2;

const STAT_TABLES: &str = "table[id^='stats_'], table[id^='keeper_stats_'], table[id^='shots_']";
const SUMMARY_TABLES: &str = "table[id^='stats_'][id$='_summary']";
const SCOREBOX: &str = "div.scorebox";
const SCOREBOX_TEAMS: &str = "div.scorebox > div strong a";
const LINEUP_TABLES: &str = "div.lineup table";

/// Lineup layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SquadVariant {
    Present,
    Absent,
}

/// Stat-table layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsVariant {
    Full17,
    Reduced2,
}

/// Structural layout of a page for one entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// The single known layout of entities without layout alternatives
    Standard,
    Squad(SquadVariant),
    Stats(StatsVariant),
    /// Matches none of the known fingerprints
    Unknown,
}

impl Variant {
    /// Whether this variant can describe pages of `entity`
    pub fn applies_to(&self, entity: EntityType) -> bool {
        match self {
            Variant::Unknown => true,
            Variant::Squad(_) => entity == EntityType::Squads,
            Variant::Stats(_) => entity == EntityType::Stats,
            Variant::Standard => !matches!(entity, EntityType::Squads | EntityType::Stats),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Variant::Standard => "standard",
            Variant::Squad(SquadVariant::Present) => "squad_present",
            Variant::Squad(SquadVariant::Absent) => "squad_absent",
            Variant::Stats(StatsVariant::Full17) => "stats_full17",
            Variant::Stats(StatsVariant::Reduced2) => "stats_reduced2",
            Variant::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a parsed page for one entity type. Total: never fails, never panics.
pub fn classify(entity: EntityType, page: &ParsedPage) -> Variant {
    let variant = match entity {
        EntityType::Squads => classify_squads(page),
        EntityType::Stats => classify_stats(page),
        EntityType::Events => standard_if(page.exists("div#events_wrap")),
        EntityType::MatchInfo => standard_if(page.exists("div.scorebox_meta")),
        EntityType::MatchSummary => standard_if(page.count(SCOREBOX_TEAMS) >= 2),
        EntityType::Players => standard_if(page.exists(SUMMARY_TABLES)),
    };
    log::debug!("{}: {} classified as {}", page.url(), entity, variant);
    variant
}

fn standard_if(matched: bool) -> Variant {
    if matched {
        Variant::Standard
    } else {
        Variant::Unknown
    }
}

fn classify_squads(page: &ParsedPage) -> Variant {
    if page.exists(LINEUP_TABLES) {
        Variant::Squad(SquadVariant::Present)
    } else if page.exists(SCOREBOX) {
        Variant::Squad(SquadVariant::Absent)
    } else {
        Variant::Unknown
    }
}

fn classify_stats(page: &ParsedPage) -> Variant {
    let tables = page.select_all(STAT_TABLES);
    let summaries = tables
        .iter()
        .filter(|t| t.value().attr("id").is_some_and(|id| id.ends_with("_summary")))
        .count();

    match tables.len() {
        FULL_STAT_TABLES => Variant::Stats(StatsVariant::Full17),
        REDUCED_STAT_TABLES if summaries == REDUCED_STAT_TABLES => {
            Variant::Stats(StatsVariant::Reduced2)
        }
        _ => Variant::Unknown,
    }
}
