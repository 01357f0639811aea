//! HTML fixtures shaped like current and legacy match-report pages

pub const MATCH_ID: &str = "cc5b4244";
pub const HOME: &str = "943e8050";
pub const AWAY: &str = "b8fd03ef";

pub const LEGACY_MATCH_ID: &str = "2bd6a1f3";
pub const LEGACY_HOME: &str = "8cec06e1";
pub const LEGACY_AWAY: &str = "e090f40b";

fn document(head: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>Match Report</title>{}</head><body><div id=\"content\">{}</div></body></html>",
        head, body
    )
}

fn canonical(match_id: &str) -> String {
    format!(
        r#"<link rel="canonical" href="https://fbref.com/en/matches/{}/Match-Report">"#,
        match_id
    )
}

fn team_block(id: &str, name: &str, score: u8, xg: Option<&str>, manager: &str) -> String {
    let xg = xg
        .map(|x| format!(r#"<div class="score_xg">{}</div>"#, x))
        .unwrap_or_default();
    format!(
        r#"<div>
             <div><strong><a href="/en/squads/{id}/{name}-Stats">{name}</a></strong></div>
             <div class="scores"><div class="score">{score}</div>{xg}</div>
             <div class="datapoint"><strong>Manager</strong>: {manager}</div>
           </div>"#
    )
}

fn scorebox() -> String {
    format!(
        r#"<div class="scorebox">
             {home}
             {away}
             <div class="scorebox_meta">
               <div><strong><a href="/en/matches/2023-08-11">Friday August 11, 2023</a></strong>
                 <span class="venuetime" data-venue-date="2023-08-11" data-venue-time="20:00">20:00</span></div>
               <div><a href="/en/comps/9/Premier-League-Stats">Premier League</a> (Matchweek 1)</div>
               <div><small><span>Attendance</span></small>: <small>21,572</small></div>
               <div><small><span>Venue</span></small>: <small>Turf Moor, Burnley</small></div>
               <div><small><span>Officials</span></small>: <small><span>Anthony Taylor (Referee)</span> &middot; <span>Gary Beswick (AR1)</span></small></div>
             </div>
           </div>"#,
        home = team_block(HOME, "Burnley", 0, Some("0.3"), "Vincent Kompany"),
        away = team_block(AWAY, "Manchester City", 3, Some("2.1"), "Pep Guardiola"),
    )
}

fn player_link(id: &str, name: &str) -> String {
    format!(
        r#"<a href="/en/players/{}/{}">{}</a>"#,
        id,
        name.replace(' ', "-"),
        name
    )
}

fn event(side: &str, minute: &str, kind: &str, score: Option<&str>, players: &[(&str, &str)]) -> String {
    let score = score
        .map(|s| format!("<br/><small><span>{}</span></small>", s))
        .unwrap_or_default();
    let first = players
        .first()
        .map(|(id, name)| player_link(id, name))
        .unwrap_or_default();
    let second = players
        .get(1)
        .map(|(id, name)| format!("<small>for {}</small>", player_link(id, name)))
        .unwrap_or_default();
    format!(
        r#"<div class="event {side}"><div>&nbsp;{minute}&rsquo;{score}</div><div><div class="event_icon {kind}"></div><div><div>{first}</div>{second}</div></div></div>"#
    )
}

/// Five events; the opening goal has an assist and the substitution names both players
fn events() -> String {
    [
        event("b", "4", "goal", Some("0:1"), &[("1f44ac21", "Erling Haaland"), ("6434f10d", "Rodri")]),
        event("a", "31", "yellow_card", None, &[("f5b0fb8e", "Lyle Foster")]),
        event("b", "36", "goal", Some("0:2"), &[("1f44ac21", "Erling Haaland")]),
        event("b", "75", "substitute_in", None, &[("5ad13f9c", "Josko Gvardiol"), ("6434f10d", "Rodri")]),
        event("a", "90+2", "yellow_card", None, &[("a1d5bd30", "James Trafford")]),
    ]
    .iter()
    .fold(String::from(r#"<div id="events_wrap">"#), |acc, e| acc + e)
        + "</div>"
}

fn lineup(marker: &str, header: &str, starters: &[(u8, &str, &str)], bench: &[(u8, &str, &str)]) -> String {
    let row = |(number, id, name): &(u8, &str, &str)| {
        format!("<tr><td>{}</td><td>{}</td></tr>", number, player_link(id, name))
    };
    let starters: String = starters.iter().map(row).collect();
    let bench: String = bench.iter().map(row).collect();
    format!(
        r#"<div class="lineup" id="{marker}"><table>
             <tr><th colspan="2">{header}</th></tr>
             {starters}<tr><th colspan="2">Bench</th></tr>{bench}
           </table></div>"#
    )
}

fn lineups() -> String {
    lineup(
        "a",
        "Burnley (5-4-1)",
        &[(1, "a1d5bd30", "James Trafford"), (17, "f5b0fb8e", "Lyle Foster")],
        &[(49, "8f696594", "Arijanet Muric")],
    ) + &lineup(
        "b",
        "Manchester City (4-2-3-1)",
        &[(9, "1f44ac21", "Erling Haaland"), (16, "6434f10d", "Rodri")],
        &[(24, "5ad13f9c", "Josko Gvardiol")],
    )
}

/// (id, name, shirt, nationality, position, age, minutes)
type PlayerRow<'a> = (&'a str, &'a str, u8, &'a str, &'a str, &'a str, u16);

fn player_rows(players: &[PlayerRow<'_>]) -> String {
    players
        .iter()
        .map(|(id, name, shirt, nation, pos, age, minutes)| {
            format!(
                r#"<tr><th data-stat="player">{link}</th><td data-stat="shirtnumber">{shirt}</td><td data-stat="nationality"><a href="/en/country/x">{nation}</a></td><td data-stat="position">{pos}</td><td data-stat="age">{age}</td><td data-stat="minutes">{minutes}</td></tr>"#,
                link = player_link(id, name)
            )
        })
        .collect()
}

fn stat_table(id: &str, body: &str, totals: &[(&str, i64)]) -> String {
    let cells: String = totals
        .iter()
        .map(|(stat, value)| format!(r#"<td data-stat="{}">{}</td>"#, stat, value))
        .collect();
    format!(
        r#"<table id="{id}"><thead><tr><th>Player</th></tr></thead><tbody>{body}</tbody><tfoot><tr><th>Total</th>{cells}</tr></tfoot></table>"#
    )
}

fn shot_rows(count: usize) -> String {
    "<tr><td data-stat=\"minute\">10</td></tr>".repeat(count)
}

fn full_team_tables(team: &str, players: &[PlayerRow<'_>], base: i64) -> String {
    [
        stat_table(
            &format!("stats_{}_summary", team),
            &player_rows(players),
            &[
                ("goals", base),
                ("assists", base + 1),
                ("shots", base + 2),
                ("shots_on_target", base + 3),
                ("cards_yellow", base + 4),
                ("cards_red", 0),
            ],
        ),
        stat_table(
            &format!("stats_{}_passing", team),
            "",
            &[("passes_completed", 410), ("passes", 480), ("progressive_passes", 31)],
        ),
        stat_table(
            &format!("stats_{}_passing_types", team),
            "",
            &[("crosses", 12), ("corner_kicks", 5)],
        ),
        stat_table(
            &format!("stats_{}_defense", team),
            "",
            &[("tackles", 17), ("interceptions", 8), ("blocks", 11)],
        ),
        stat_table(
            &format!("stats_{}_possession", team),
            "",
            &[("touches", 620), ("take_ons", 14)],
        ),
        stat_table(
            &format!("stats_{}_misc", team),
            "",
            &[("fouls", 9), ("offsides", 2)],
        ),
        stat_table(
            &format!("keeper_stats_{}", team),
            "",
            &[("gk_saves", 3), ("gk_goals_against", base)],
        ),
    ]
    .concat()
}

const HOME_PLAYERS: &[PlayerRow<'static>] = &[
    ("a1d5bd30", "James Trafford", 1, "eng ENG", "GK", "20-304", 90),
    ("f5b0fb8e", "Lyle Foster", 17, "rsa RSA", "FW", "22-363", 90),
];

const AWAY_PLAYERS: &[PlayerRow<'static>] = &[
    ("1f44ac21", "Erling Haaland", 9, "nor NOR", "FW", "23-021", 90),
    ("6434f10d", "Rodri", 16, "esp ESP", "DM", "27-044", 75),
];

fn full_stat_tables() -> String {
    [
        full_team_tables(HOME, HOME_PLAYERS, 0),
        full_team_tables(AWAY, AWAY_PLAYERS, 3),
        stat_table("shots_all", &shot_rows(3), &[]),
        stat_table(&format!("shots_{}", HOME), &shot_rows(1), &[]),
        stat_table(&format!("shots_{}", AWAY), &shot_rows(2), &[]),
    ]
    .concat()
}

/// Current-layout report: lineups, events and all seventeen stat tables
pub fn full_report() -> String {
    let body = [scorebox(), events(), lineups(), full_stat_tables()].concat();
    document(&canonical(MATCH_ID), &body)
}

/// Legacy-layout report: no lineups, two summary tables with the old column names
pub fn legacy_report() -> String {
    let scorebox = format!(
        r#"<div class="scorebox">{}{}<div class="scorebox_meta">
             <div><strong><a href="/en/matches/2011-08-13">Saturday August 13, 2011</a></strong>
               <span class="venuetime" data-venue-date="2011-08-13" data-venue-time="15:00">15:00</span></div>
             <div><a href="/en/comps/9/Premier-League-Stats">Premier League</a> (Matchweek 1)</div>
             <div><small><span>Venue</span></small>: <small>Ewood Park</small></div>
           </div></div>"#,
        team_block(LEGACY_HOME, "Blackburn Rovers", 1, None, "Steve Kean"),
        team_block(LEGACY_AWAY, "Wolverhampton Wanderers", 2, None, "Mick McCarthy"),
    );
    let legacy_totals = |goals: i64| {
        vec![
            ("goals", goals),
            ("assists", goals),
            ("shots_total", 11 + goals),
            ("shots_on_target", 4 + goals),
            ("cards_yellow", 1),
            ("cards_red", 0),
        ]
    };
    let tables = stat_table(
        &format!("stats_{}_summary", LEGACY_HOME),
        &player_rows(&[("6d0e3ad8", "Paul Robinson", 1, "", "GK", "", 90)]),
        &legacy_totals(1),
    ) + &stat_table(
        &format!("stats_{}_summary", LEGACY_AWAY),
        &player_rows(&[("9a6c0c8e", "Steven Fletcher", 10, "", "FW", "", 90)]),
        &legacy_totals(2),
    );
    let body = [scorebox, r#"<div id="events_wrap"></div>"#.to_string(), tables].concat();
    document(&canonical(LEGACY_MATCH_ID), &body)
}

/// Full report body with no canonical link and no og:url
pub fn report_without_match_id() -> String {
    let body = [scorebox(), events(), lineups(), full_stat_tables()].concat();
    document("", &body)
}

/// Results-by-date page with two competitions
pub fn results_page() -> String {
    let body = format!(
        r#"<table><caption><a href="/en/comps/9/Premier-League-Stats">Premier League</a></caption>
             <tbody>
               <tr><td><a href="/en/squads/{HOME}/x">Burnley</a></td><td><a href="/en/matches/{MATCH_ID}/Burnley-Manchester-City">Match Report</a></td></tr>
               <tr><td><a href="/en/squads/x/y">Arsenal</a></td><td><a href="/en/matches/3a6836b4/Arsenal-Nottingham-Forest">Match Report</a></td></tr>
             </tbody></table>
           <table><caption><a href="/en/comps/13/Ligue-1-Stats">Ligue 1</a></caption>
             <tbody><tr><td><a href="/en/matches/60d2bbf3/Nice-Lille">Match Report</a></td><td><a href="/en/matches/60d2bbf3/Nice-Lille">Head-to-Head</a></td></tr></tbody>
           </table>"#
    );
    document("", &body)
}
