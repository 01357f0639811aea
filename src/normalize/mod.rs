//! Normalization rules
//!
//! Locators, coercions and the registry that maps each page variant's markup onto the
//! canonical schemas.

pub mod coerce;
pub mod context;
pub mod locator;
pub mod registry;
pub mod rule;
mod standard;

pub use coerce::Coercion;
pub use context::PageContext;
pub use locator::{Locator, Scope};
pub use registry::NormalizationRegistry;
pub use rule::{Absence, ItemScope, Layout, NormalizationRule, Resolution};
