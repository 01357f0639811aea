//! Coercions: raw located text to a typed `FieldValue`
//!
//! A coercion returning `None` means the raw value was malformed; the getter then
//! treats the field exactly like an unresolved locator.

use crate::model::FieldValue;
use crate::normalize::context::PageContext;
use crate::Side;
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Coercion {
    /// Trimmed text with whitespace collapsed; empty text is malformed
    Text,
    /// Integer, thousands separators allowed
    Integer,
    /// Decimal number, a trailing `%` allowed
    Decimal,
    /// Match minute from `23’` or `90+2’`
    Minute,
    /// Added time from `90+2’`; zero when the minute has none
    StoppageTime,
    Date { format: String },
    /// Id segment following `segment` in a site path, e.g. `/en/players/<id>/Name`
    PathId { segment: String },
    /// Text between a fixed prefix and suffix, e.g. the team id inside a table id
    Between { prefix: String, suffix: String },
    /// One whitespace-separated token of a class list
    ClassToken { index: usize },
    /// `home`/`away` from an `a`/`b` marker token
    Side,
    /// Team id of the side named by an `a`/`b` marker token
    SideTeam,
    /// Label for a section index
    Section { labels: Vec<String> },
    /// Whole years from `25-123` (years-days)
    AgeYears,
    /// Upper-case country code from `eng ENG`
    CountryCode,
    /// Text inside the first pair of parentheses
    Parenthetical,
    /// Text before the first opening parenthesis
    BeforeParenthetical,
    /// Text after the first `separator`
    AfterSeparator { separator: String },
}

fn minute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d{1,3})\s*(?:\+\s*(\d{1,2}))?\s*[’']").expect("minute pattern is valid")
    })
}

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9]+$").expect("id pattern is valid"))
}

fn collapse(raw: &str) -> Option<String> {
    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn side_marker(raw: &str) -> Option<Side> {
    raw.split_whitespace().find_map(Side::from_marker)
}

impl Coercion {
    pub fn date(format: &str) -> Self {
        Coercion::Date {
            format: format.to_string(),
        }
    }

    pub fn path_id(segment: &str) -> Self {
        Coercion::PathId {
            segment: segment.to_string(),
        }
    }

    pub fn between(prefix: &str, suffix: &str) -> Self {
        Coercion::Between {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        }
    }

    pub fn section(labels: &[&str]) -> Self {
        Coercion::Section {
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }

    pub fn after(separator: &str) -> Self {
        Coercion::AfterSeparator {
            separator: separator.to_string(),
        }
    }

    pub fn apply(&self, raw: &str, ctx: &PageContext) -> Option<FieldValue> {
        match self {
            Coercion::Text => collapse(raw).map(FieldValue::Text),
            Coercion::Integer => {
                let cleaned: String = raw
                    .chars()
                    .filter(|c| !c.is_whitespace() && *c != ',')
                    .collect();
                cleaned.parse::<i64>().ok().map(FieldValue::Int)
            }
            Coercion::Decimal => {
                let cleaned: String = raw
                    .chars()
                    .filter(|c| !c.is_whitespace() && *c != ',' && *c != '%')
                    .collect();
                cleaned
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(FieldValue::Float)
            }
            Coercion::Minute => {
                let caps = minute_pattern().captures(raw)?;
                caps.get(1)?.as_str().parse().ok().map(FieldValue::Int)
            }
            Coercion::StoppageTime => {
                let caps = minute_pattern().captures(raw)?;
                let added = match caps.get(2) {
                    Some(m) => m.as_str().parse().ok()?,
                    None => 0,
                };
                Some(FieldValue::Int(added))
            }
            Coercion::Date { format } => NaiveDate::parse_from_str(raw.trim(), format)
                .ok()
                .map(FieldValue::Date),
            Coercion::PathId { segment } => {
                let mut parts = raw.split('/');
                parts.find(|p| *p == segment.as_str())?;
                let id = parts.next()?;
                id_pattern()
                    .is_match(id)
                    .then(|| FieldValue::Text(id.to_string()))
            }
            Coercion::Between { prefix, suffix } => {
                let inner = raw.trim().strip_prefix(prefix.as_str())?;
                let inner = inner.strip_suffix(suffix.as_str())?;
                collapse(inner).map(FieldValue::Text)
            }
            Coercion::ClassToken { index } => raw
                .split_whitespace()
                .nth(*index)
                .map(|t| FieldValue::Text(t.to_string())),
            Coercion::Side => side_marker(raw).map(|s| FieldValue::Text(s.as_str().to_string())),
            Coercion::SideTeam => {
                let side = side_marker(raw)?;
                ctx.team(side).map(|t| FieldValue::Text(t.0.clone()))
            }
            Coercion::Section { labels } => {
                let idx: usize = raw.trim().parse().ok()?;
                labels.get(idx).map(|l| FieldValue::Text(l.clone()))
            }
            Coercion::AgeYears => {
                let years = raw.trim().split('-').next()?;
                years.parse::<i64>().ok().map(FieldValue::Int)
            }
            Coercion::CountryCode => {
                let code = raw.split_whitespace().last()?;
                let valid = (2..=3).contains(&code.len())
                    && code.chars().all(|c| c.is_ascii_alphabetic());
                valid.then(|| FieldValue::Text(code.to_uppercase()))
            }
            Coercion::Parenthetical => {
                let start = raw.find('(')?;
                let end = start + raw[start..].find(')')?;
                collapse(&raw[start + 1..end]).map(FieldValue::Text)
            }
            Coercion::BeforeParenthetical => {
                let head = raw.split('(').next()?;
                collapse(head).map(FieldValue::Text)
            }
            Coercion::AfterSeparator { separator } => {
                let (_, tail) = raw.split_once(separator.as_str())?;
                collapse(tail).map(FieldValue::Text)
            }
        }
    }
}
