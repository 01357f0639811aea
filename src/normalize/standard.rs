//! Standard layouts of the match-report pages
//!
//! Current reports carry lineups and seventeen stat tables; legacy reports carry no
//! lineup and only the two per-team summary tables, with older column names.

use crate::data::variant::{SquadVariant, StatsVariant, Variant};
use crate::model::{EntityType, ReasonCode};
use crate::normalize::coerce::Coercion;
use crate::normalize::locator::Locator;
use crate::normalize::rule::{Layout, NormalizationRule as Rule};
use crate::Side;

const HOME_BLOCK: &str = "div.scorebox > div:nth-of-type(1)";
const AWAY_BLOCK: &str = "div.scorebox > div:nth-of-type(2)";
const META_ROWS: &str = "div.scorebox_meta > div";
const PLAYER_LINK: &str = "th[data-stat='player'] a";

/// Stat tables of a current report: (table id template, [(field suffix, footer stat)])
const TEAM_TABLES: &[(&str, &[(&str, &str)])] = &[
    (
        "stats_{team}_summary",
        &[
            ("goals", "goals"),
            ("assists", "assists"),
            ("shots", "shots"),
            ("shots_on_target", "shots_on_target"),
            ("yellow_cards", "cards_yellow"),
            ("red_cards", "cards_red"),
        ],
    ),
    (
        "stats_{team}_passing",
        &[
            ("passes_completed", "passes_completed"),
            ("passes", "passes"),
            ("progressive_passes", "progressive_passes"),
        ],
    ),
    (
        "stats_{team}_passing_types",
        &[("crosses", "crosses"), ("corner_kicks", "corner_kicks")],
    ),
    (
        "stats_{team}_defense",
        &[
            ("tackles", "tackles"),
            ("interceptions", "interceptions"),
            ("blocks", "blocks"),
        ],
    ),
    (
        "stats_{team}_possession",
        &[("touches", "touches"), ("take_ons", "take_ons")],
    ),
    (
        "stats_{team}_misc",
        &[("fouls", "fouls"), ("offsides", "offsides")],
    ),
    (
        "keeper_stats_{team}",
        &[("saves", "gk_saves"), ("goals_against", "gk_goals_against")],
    ),
];

/// Legacy summary tables name the shot total differently
const LEGACY_SUMMARY: &[(&str, &str)] = &[
    ("goals", "goals"),
    ("assists", "assists"),
    ("shots", "shots_total"),
    ("shots_on_target", "shots_on_target"),
    ("yellow_cards", "cards_yellow"),
    ("red_cards", "cards_red"),
];

pub fn identity_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "match_id",
            Locator::attr("link[rel='canonical']", "href"),
            Coercion::path_id("matches"),
        ),
        Rule::new(
            "match_id",
            Locator::attr("meta[property='og:url']", "content"),
            Coercion::path_id("matches"),
        ),
        Rule::new(
            "home_team_id",
            Locator::attr(&format!("{} strong a", HOME_BLOCK), "href"),
            Coercion::path_id("squads"),
        ),
        Rule::new(
            "away_team_id",
            Locator::attr(&format!("{} strong a", AWAY_BLOCK), "href"),
            Coercion::path_id("squads"),
        ),
    ]
}

pub fn layouts() -> Vec<Layout> {
    vec![
        events(),
        squads_present(),
        squads_absent(),
        stats_full(),
        stats_reduced(),
        match_info(),
        match_summary(),
        players(),
    ]
}

fn events() -> Layout {
    Layout::items(
        EntityType::Events,
        Variant::Standard,
        "div#events_wrap",
        "div.event",
        None,
        vec![
            Rule::new(
                "team_id",
                Locator::OwnAttr {
                    attr: "class".to_string(),
                },
                Coercion::SideTeam,
            )
            .identifier(),
            Rule::new(
                "side",
                Locator::OwnAttr {
                    attr: "class".to_string(),
                },
                Coercion::Side,
            ),
            Rule::new("minute", Locator::OwnText, Coercion::Minute),
            Rule::new("stoppage_time", Locator::OwnText, Coercion::StoppageTime),
            Rule::new(
                "event_type",
                Locator::attr("div.event_icon", "class"),
                Coercion::ClassToken { index: 1 },
            ),
            Rule::new(
                "player_id",
                Locator::attr("a", "href"),
                Coercion::path_id("players"),
            ),
            Rule::new("player_name", Locator::text("a"), Coercion::Text),
            Rule::new(
                "related_player_id",
                Locator::nth_attr("a", "href", 1),
                Coercion::path_id("players"),
            )
            .or_null(),
            Rule::new(
                "related_player_name",
                Locator::nth_text("a", 1),
                Coercion::Text,
            )
            .or_null(),
            Rule::new("score", Locator::text("small > span"), Coercion::Text).or_null(),
        ],
    )
}

fn squads_present() -> Layout {
    let lineup_id = || Locator::ContainerAttr {
        attr: "id".to_string(),
    };
    Layout::items(
        EntityType::Squads,
        Variant::Squad(SquadVariant::Present),
        "div.lineup",
        "tr",
        Some("th"),
        vec![
            Rule::new("team_id", lineup_id(), Coercion::SideTeam),
            Rule::new("side", lineup_id(), Coercion::Side),
            Rule::new(
                "player_id",
                Locator::attr("a", "href"),
                Coercion::path_id("players"),
            )
            .identifier(),
            Rule::new("player_name", Locator::text("a"), Coercion::Text),
            Rule::new("shirt_number", Locator::text("td"), Coercion::Integer),
            Rule::new(
                "role",
                Locator::Section,
                Coercion::section(&["starter", "bench"]),
            ),
            Rule::new(
                "formation",
                Locator::ContainerText {
                    selector: "th".to_string(),
                },
                Coercion::Parenthetical,
            ),
        ],
    )
}

fn squads_absent() -> Layout {
    Layout::page(
        EntityType::Squads,
        Variant::Squad(SquadVariant::Absent),
        Vec::new(),
    )
    .with_reason(ReasonCode::SquadNotPublished)
}

fn stats_full() -> Layout {
    let mut rules = Vec::new();
    for (table, stats) in TEAM_TABLES {
        for side in [Side::Home, Side::Away] {
            rules.extend(team_table_rules(table, side, stats));
        }
    }
    rules.push(Rule::new(
        "shot_log_total",
        Locator::table_rows("shots_all", None),
        Coercion::Integer,
    ));
    for side in [Side::Home, Side::Away] {
        rules.push(Rule::new(
            &format!("{}_shot_log", side),
            Locator::table_rows("shots_{team}", Some(side)),
            Coercion::Integer,
        ));
    }

    Layout::page(
        EntityType::Stats,
        Variant::Stats(StatsVariant::Full17),
        rules,
    )
}

fn stats_reduced() -> Layout {
    let rules = [Side::Home, Side::Away]
        .into_iter()
        .flat_map(|side| team_table_rules("stats_{team}_summary", side, LEGACY_SUMMARY))
        .collect();

    Layout::page(
        EntityType::Stats,
        Variant::Stats(StatsVariant::Reduced2),
        rules,
    )
}

fn team_table_rules(table: &str, side: Side, stats: &[(&str, &str)]) -> Vec<Rule> {
    stats
        .iter()
        .map(|(field, stat)| {
            Rule::new(
                &format!("{}_{}", side, field),
                Locator::table_total(table, Some(side), stat),
                Coercion::Integer,
            )
        })
        .collect()
}

fn match_info() -> Layout {
    let venuetime = "div.scorebox_meta span.venuetime";
    let label = "small:first-child";
    let value = Some("small:nth-of-type(2)");

    Layout::page(
        EntityType::MatchInfo,
        Variant::Standard,
        vec![
            Rule::new(
                "date",
                Locator::attr(venuetime, "data-venue-date"),
                Coercion::date("%Y-%m-%d"),
            ),
            Rule::new(
                "kickoff",
                Locator::attr(venuetime, "data-venue-time"),
                Coercion::Text,
            ),
            Rule::new(
                "competition",
                Locator::text("div.scorebox_meta a[href*='/comps/']"),
                Coercion::Text,
            ),
            Rule::new(
                "round",
                Locator::text("div.scorebox_meta > div:nth-of-type(2)"),
                Coercion::Parenthetical,
            ),
            Rule::new(
                "venue",
                Locator::labeled(META_ROWS, label, "Venue", value),
                Coercion::Text,
            ),
            Rule::new(
                "attendance",
                Locator::labeled(META_ROWS, label, "Attendance", value),
                Coercion::Integer,
            ),
            Rule::new(
                "referee",
                Locator::labeled(
                    META_ROWS,
                    label,
                    "Officials",
                    Some("small:nth-of-type(2) span"),
                ),
                Coercion::BeforeParenthetical,
            ),
        ],
    )
}

fn match_summary() -> Layout {
    let mut rules = Vec::new();
    for (side, block) in [(Side::Home, HOME_BLOCK), (Side::Away, AWAY_BLOCK)] {
        let team_link = format!("{} strong a", block);
        rules.push(Rule::new(
            &format!("{}_team_id", side),
            Locator::attr(&team_link, "href"),
            Coercion::path_id("squads"),
        ));
        rules.push(Rule::new(
            &format!("{}_team", side),
            Locator::text(&team_link),
            Coercion::Text,
        ));
        rules.push(Rule::new(
            &format!("{}_score", side),
            Locator::text(&format!("{} div.score", block)),
            Coercion::Integer,
        ));
        rules.push(Rule::new(
            &format!("{}_xg", side),
            Locator::text(&format!("{} div.score_xg", block)),
            Coercion::Decimal,
        ));
        rules.push(Rule::new(
            &format!("{}_manager", side),
            Locator::labeled(
                &format!("{} div.datapoint", block),
                "strong",
                "Manager",
                None,
            ),
            Coercion::after(":"),
        ));
    }

    Layout::page(EntityType::MatchSummary, Variant::Standard, rules)
}

fn players() -> Layout {
    let cell = |stat: &str| Locator::text(&format!("td[data-stat='{}']", stat));
    Layout::items(
        EntityType::Players,
        Variant::Standard,
        "table[id^='stats_'][id$='_summary']",
        "tbody > tr",
        None,
        vec![
            Rule::new(
                "team_id",
                Locator::ContainerAttr {
                    attr: "id".to_string(),
                },
                Coercion::between("stats_", "_summary"),
            ),
            Rule::new(
                "player_id",
                Locator::attr(PLAYER_LINK, "href"),
                Coercion::path_id("players"),
            )
            .identifier(),
            Rule::new("player_name", Locator::text(PLAYER_LINK), Coercion::Text),
            Rule::new("shirt_number", cell("shirtnumber"), Coercion::Integer),
            Rule::new("nationality", cell("nationality"), Coercion::CountryCode),
            Rule::new("position", cell("position"), Coercion::Text),
            Rule::new("age", cell("age"), Coercion::AgeYears),
            Rule::new("minutes", cell("minutes"), Coercion::Integer),
        ],
    )
}
