//! Page-level identity shared by every getter on one page

use crate::data::page::ParsedPage;
use crate::model::FieldValue;
use crate::normalize::locator::Scope;
use crate::normalize::registry::NormalizationRegistry;
use crate::normalize::rule::Resolution;
use crate::{MatchId, Side, TeamId};

/// Fields the registry's identity rules may target
pub const IDENTITY_FIELDS: &[&str] = &["match_id", "home_team_id", "away_team_id"];

/// Identifiers resolved once per page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub match_id: MatchId,
    pub home_team: Option<TeamId>,
    pub away_team: Option<TeamId>,
}

impl PageContext {
    /// A context that knows the match but neither team
    pub fn new(match_id: MatchId) -> Self {
        PageContext {
            match_id,
            home_team: None,
            away_team: None,
        }
    }

    /// Resolve the page identity. `None` when no match id can be found; the
    /// match id is never guessed.
    pub fn resolve(page: &ParsedPage, registry: &NormalizationRegistry) -> Option<Self> {
        let scope = Scope::page(page);
        let blank = PageContext::new(MatchId(String::new()));

        let mut match_id = None;
        let mut home_team = None;
        let mut away_team = None;

        // first rule that resolves wins
        for rule in registry.identity() {
            let slot = match rule.field.as_str() {
                "match_id" => &mut match_id,
                "home_team_id" => &mut home_team,
                "away_team_id" => &mut away_team,
                _ => continue,
            };
            if slot.is_some() {
                continue;
            }
            if let Resolution::Value(FieldValue::Text(id)) = rule.resolve(&scope, &blank) {
                *slot = Some(id);
            }
        }

        let Some(match_id) = match_id else {
            log::debug!("{}: no match id", page.url());
            return None;
        };

        Some(PageContext {
            match_id: MatchId(match_id),
            home_team: home_team.map(TeamId),
            away_team: away_team.map(TeamId),
        })
    }

    pub fn team(&self, side: Side) -> Option<&TeamId> {
        match side {
            Side::Home => self.home_team.as_ref(),
            Side::Away => self.away_team.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    #[test]
    fn test_resolve_full_report() {
        let page = ParsedPage::parse("u", &fixtures::full_report());
        let ctx = PageContext::resolve(&page, &NormalizationRegistry::standard()).unwrap();
        assert_eq!(ctx.match_id, MatchId(fixtures::MATCH_ID.to_string()));
        assert_eq!(ctx.team(Side::Home), Some(&TeamId(fixtures::HOME.to_string())));
        assert_eq!(ctx.team(Side::Away), Some(&TeamId(fixtures::AWAY.to_string())));
    }

    #[test]
    fn test_match_id_falls_back_to_og_url() {
        let html = format!(
            r#"<html><head><meta property="og:url" content="https://fbref.com/en/matches/{}/x"></head></html>"#,
            fixtures::MATCH_ID
        );
        let page = ParsedPage::parse("u", &html);
        let ctx = PageContext::resolve(&page, &NormalizationRegistry::standard()).unwrap();
        assert_eq!(ctx.match_id.0, fixtures::MATCH_ID);
        assert!(ctx.home_team.is_none());
    }

    #[test]
    fn test_missing_match_id() {
        let page = ParsedPage::parse("u", &fixtures::report_without_match_id());
        assert!(PageContext::resolve(&page, &NormalizationRegistry::standard()).is_none());

        // a results-by-date url is not a match id
        let dated = ParsedPage::parse(
            "u",
            r#"<link rel="canonical" href="https://fbref.com/en/matches/2023-08-11">"#,
        );
        assert!(PageContext::resolve(&dated, &NormalizationRegistry::standard()).is_none());
    }
}
