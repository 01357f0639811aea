//! Locators: where a raw field value lives in the parsed page
//!
//! A locator resolves to the raw text of one field (or `None`) relative to a `Scope`:
//! the page root for page-level records, or one item element (an event, a lineup row,
//! a stat-table row) for per-item records.

use crate::data::page::{element_text, select_in, selector, ParsedPage};
use crate::normalize::context::PageContext;
use crate::Side;
use scraper::ElementRef;
use serde::{Deserialize, Serialize};

/// Placeholder in table ids replaced by the team id of the locator's side
pub const TEAM_PLACEHOLDER: &str = "{team}";

/// Where a locator is evaluated
#[derive(Clone, Copy)]
pub struct Scope<'a> {
    pub page: &'a ParsedPage,
    /// The item element, or the document root for page-level layouts
    pub element: ElementRef<'a>,
    /// The container the item was found in
    pub container: Option<ElementRef<'a>>,
    /// Number of section breaks preceding the item in its container; header rows
    /// ahead of the first item do not count
    pub section: usize,
}

impl<'a> Scope<'a> {
    pub fn page(page: &'a ParsedPage) -> Self {
        Scope {
            page,
            element: page.root(),
            container: None,
            section: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Locator {
    /// Text of the `nth` element matching `selector` inside the scope
    Text {
        selector: String,
        #[serde(default)]
        nth: usize,
    },
    /// Attribute of the `nth` element matching `selector` inside the scope
    Attr {
        selector: String,
        attr: String,
        #[serde(default)]
        nth: usize,
    },
    /// Text of the scope element itself
    OwnText,
    /// Attribute of the scope element itself
    OwnAttr { attr: String },
    /// Attribute of the container the item was found in
    ContainerAttr { attr: String },
    /// Text of the first element matching `selector` inside the item's container
    ContainerText { selector: String },
    /// Section index of the item within its container
    Section,
    /// Value of a labelled row: the row among `rows` whose `label` element reads `text`.
    /// Without `value` the whole row text is returned.
    Labeled {
        rows: String,
        label: String,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    /// Footer cell `stat` of the table with id `table`
    TableTotal {
        table: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        side: Option<Side>,
        stat: String,
    },
    /// Number of body rows of the table with id `table`
    TableRows {
        table: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        side: Option<Side>,
    },
}

impl Locator {
    pub fn text(selector: &str) -> Self {
        Locator::Text {
            selector: selector.to_string(),
            nth: 0,
        }
    }

    pub fn nth_text(selector: &str, nth: usize) -> Self {
        Locator::Text {
            selector: selector.to_string(),
            nth,
        }
    }

    pub fn attr(selector: &str, attr: &str) -> Self {
        Locator::Attr {
            selector: selector.to_string(),
            attr: attr.to_string(),
            nth: 0,
        }
    }

    pub fn nth_attr(selector: &str, attr: &str, nth: usize) -> Self {
        Locator::Attr {
            selector: selector.to_string(),
            attr: attr.to_string(),
            nth,
        }
    }

    pub fn labeled(rows: &str, label: &str, text: &str, value: Option<&str>) -> Self {
        Locator::Labeled {
            rows: rows.to_string(),
            label: label.to_string(),
            text: text.to_string(),
            value: value.map(str::to_string),
        }
    }

    pub fn table_total(table: &str, side: Option<Side>, stat: &str) -> Self {
        Locator::TableTotal {
            table: table.to_string(),
            side,
            stat: stat.to_string(),
        }
    }

    pub fn table_rows(table: &str, side: Option<Side>) -> Self {
        Locator::TableRows {
            table: table.to_string(),
            side,
        }
    }

    /// Every CSS selector this locator evaluates, for registry validation
    pub fn selectors(&self) -> Vec<&str> {
        match self {
            Locator::Text { selector, .. }
            | Locator::Attr { selector, .. }
            | Locator::ContainerText { selector } => vec![selector.as_str()],
            Locator::Labeled {
                rows, label, value, ..
            } => {
                let mut sels = vec![rows.as_str(), label.as_str()];
                sels.extend(value.as_deref());
                sels
            }
            _ => Vec::new(),
        }
    }

    /// Resolve the raw value, or `None` when the markup is not there
    pub fn locate(&self, scope: &Scope<'_>, ctx: &PageContext) -> Option<String> {
        match self {
            Locator::Text { selector, nth } => select_in(scope.element, selector)
                .get(*nth)
                .map(|el| element_text(*el)),
            Locator::Attr {
                selector,
                attr,
                nth,
            } => select_in(scope.element, selector)
                .get(*nth)
                .and_then(|el| el.value().attr(attr))
                .map(str::to_string),
            Locator::OwnText => Some(element_text(scope.element)),
            Locator::OwnAttr { attr } => scope.element.value().attr(attr).map(str::to_string),
            Locator::ContainerAttr { attr } => scope
                .container
                .and_then(|c| c.value().attr(attr))
                .map(str::to_string),
            Locator::ContainerText { selector } => scope
                .container
                .and_then(|c| select_in(c, selector).into_iter().next())
                .map(element_text),
            Locator::Section => Some(scope.section.to_string()),
            Locator::Labeled {
                rows,
                label,
                text,
                value,
            } => locate_labeled(scope, rows, label, text, value.as_deref()),
            Locator::TableTotal { table, side, stat } => {
                let table = find_table(scope.page, table, *side, ctx)?;
                let cell = format!("tfoot td[data-stat='{}']", stat);
                select_in(table, &cell).into_iter().next().map(element_text)
            }
            Locator::TableRows { table, side } => {
                let table = find_table(scope.page, table, *side, ctx)?;
                let rows = select_in(table, "tbody > tr")
                    .into_iter()
                    .filter(|row| {
                        !row.value()
                            .classes()
                            .any(|c| c == "spacer" || c == "thead")
                    })
                    .count();
                Some(rows.to_string())
            }
        }
    }
}

fn locate_labeled(
    scope: &Scope<'_>,
    rows: &str,
    label: &str,
    text: &str,
    value: Option<&str>,
) -> Option<String> {
    let wanted = text.trim().to_lowercase();
    let row = select_in(scope.element, rows).into_iter().find(|row| {
        select_in(*row, label)
            .first()
            .is_some_and(|l| element_text(*l).to_lowercase() == wanted)
    })?;

    match value {
        Some(css) => select_in(row, css).into_iter().next().map(element_text),
        None => Some(element_text(row)),
    }
}

/// Find a table by id, substituting the side's team id into the id template
fn find_table<'a>(
    page: &'a ParsedPage,
    template: &str,
    side: Option<Side>,
    ctx: &PageContext,
) -> Option<ElementRef<'a>> {
    let id = match side {
        Some(side) => template.replace(TEAM_PLACEHOLDER, &ctx.team(side)?.0),
        None => template.to_string(),
    };
    let sel = selector(&format!("table[id='{}']", id))?;
    page.document().select(&sel).next()
}
