//! Page ingestion
//!
//! Fetching match-report pages, parsing them, and classifying their layout.

pub mod fetcher;
pub mod links;
pub mod page;
pub mod variant;

#[cfg(test)]
pub(crate) mod fixtures;

pub use fetcher::{FileFetcher, HttpFetcher, PageFetcher};
pub use page::{Page, ParsedPage};
pub use variant::{classify, Variant};
