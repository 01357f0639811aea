//! Fetched pages and their parsed document trees

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};

/// Raw markup of one fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    url: String,
    markup: String,
    fetched_at: DateTime<Utc>,
}

impl Page {
    /// Wrap markup fetched just now
    pub fn new(url: impl Into<String>, markup: impl Into<String>) -> Self {
        Self::fetched_at(url, markup, Utc::now())
    }

    pub fn fetched_at(
        url: impl Into<String>,
        markup: impl Into<String>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Page {
            url: url.into(),
            markup: markup.into(),
            fetched_at,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Build the queryable tree. The tree is not `Send`; parse on the thread that uses it.
    pub fn parse(&self) -> ParsedPage {
        ParsedPage::parse(&self.url, &self.markup)
    }
}

/// A parsed document plus the URL it came from
pub struct ParsedPage {
    url: String,
    document: Html,
}

impl ParsedPage {
    pub fn parse(url: &str, markup: &str) -> Self {
        ParsedPage {
            url: url.to_string(),
            document: Html::parse_document(markup),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.document.root_element()
    }

    /// All elements matching `css`; empty when the selector does not parse
    pub fn select_all(&self, css: &str) -> Vec<ElementRef<'_>> {
        match selector(css) {
            Some(sel) => self.document.select(&sel).collect(),
            None => Vec::new(),
        }
    }

    pub fn count(&self, css: &str) -> usize {
        self.select_all(css).len()
    }

    pub fn exists(&self, css: &str) -> bool {
        match selector(css) {
            Some(sel) => self.document.select(&sel).next().is_some(),
            None => false,
        }
    }
}

/// Parse a CSS selector, logging and discarding invalid ones
pub fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            log::debug!("Invalid selector {:?}: {}", css, e);
            None
        }
    }
}

/// Elements below `element` matching `css`
pub fn select_in<'a>(element: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match selector(css) {
        Some(sel) => element.select(&sel).collect(),
        None => Vec::new(),
    }
}

/// Text content of an element with whitespace runs collapsed to single spaces
pub fn element_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
