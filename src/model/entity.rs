//! Entity types and their canonical schemas
//!
//! The schema of an entity type is the external contract: every record of that type
//! carries exactly these fields, in this order, whatever page layout it came from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of records extracted from a match-report page
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Events,
    Squads,
    Stats,
    MatchInfo,
    MatchSummary,
    Players,
}

const EVENT_FIELDS: &[&str] = &[
    "team_id",
    "side",
    "minute",
    "stoppage_time",
    "event_type",
    "player_id",
    "player_name",
    "related_player_id",
    "related_player_name",
    "score",
];

const SQUAD_FIELDS: &[&str] = &[
    "team_id",
    "side",
    "player_id",
    "player_name",
    "shirt_number",
    "role",
    "formation",
];

const STAT_FIELDS: &[&str] = &[
    // summary
    "home_goals",
    "home_assists",
    "home_shots",
    "home_shots_on_target",
    "home_yellow_cards",
    "home_red_cards",
    "away_goals",
    "away_assists",
    "away_shots",
    "away_shots_on_target",
    "away_yellow_cards",
    "away_red_cards",
    // passing
    "home_passes_completed",
    "home_passes",
    "home_progressive_passes",
    "away_passes_completed",
    "away_passes",
    "away_progressive_passes",
    // pass types
    "home_crosses",
    "home_corner_kicks",
    "away_crosses",
    "away_corner_kicks",
    // defense
    "home_tackles",
    "home_interceptions",
    "home_blocks",
    "away_tackles",
    "away_interceptions",
    "away_blocks",
    // possession
    "home_touches",
    "home_take_ons",
    "away_touches",
    "away_take_ons",
    // misc
    "home_fouls",
    "home_offsides",
    "away_fouls",
    "away_offsides",
    // goalkeeping
    "home_saves",
    "home_goals_against",
    "away_saves",
    "away_goals_against",
    // shot logs
    "shot_log_total",
    "home_shot_log",
    "away_shot_log",
];

const MATCH_INFO_FIELDS: &[&str] = &[
    "date",
    "kickoff",
    "competition",
    "round",
    "venue",
    "attendance",
    "referee",
];

const MATCH_SUMMARY_FIELDS: &[&str] = &[
    "home_team_id",
    "away_team_id",
    "home_team",
    "away_team",
    "home_score",
    "away_score",
    "home_xg",
    "away_xg",
    "home_manager",
    "away_manager",
];

const PLAYER_FIELDS: &[&str] = &[
    "team_id",
    "player_id",
    "player_name",
    "shirt_number",
    "nationality",
    "position",
    "age",
    "minutes",
];

impl EntityType {
    pub const ALL: [EntityType; 6] = [
        EntityType::Events,
        EntityType::Squads,
        EntityType::Stats,
        EntityType::MatchInfo,
        EntityType::MatchSummary,
        EntityType::Players,
    ];

    /// Canonical field names, in output order
    pub fn schema(&self) -> &'static [&'static str] {
        match self {
            EntityType::Events => EVENT_FIELDS,
            EntityType::Squads => SQUAD_FIELDS,
            EntityType::Stats => STAT_FIELDS,
            EntityType::MatchInfo => MATCH_INFO_FIELDS,
            EntityType::MatchSummary => MATCH_SUMMARY_FIELDS,
            EntityType::Players => PLAYER_FIELDS,
        }
    }

    /// Position of a field in the schema
    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.schema().iter().position(|f| *f == field)
    }

    pub fn name(&self) -> &'static str {
        match self {
            EntityType::Events => "events",
            EntityType::Squads => "squads",
            EntityType::Stats => "stats",
            EntityType::MatchInfo => "match_info",
            EntityType::MatchSummary => "match_summary",
            EntityType::Players => "players",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.name() == name.trim().to_lowercase())
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
