//! The normalization registry
//!
//! One layout per (entity, variant) pair, plus the page identity rules. Read-only after
//! construction and shared by reference between getters and threads. Supporting a new
//! page layout means adding a layout here (in code or in a TOML overlay), never a branch
//! in a getter.

use crate::data::page::selector;
use crate::data::variant::Variant;
use crate::model::EntityType;
use crate::normalize::context::IDENTITY_FIELDS;
use crate::normalize::rule::{Layout, NormalizationRule};
use crate::normalize::standard;
use crate::{Result, ScrapeError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Rules shared by all getters, keyed by entity type and variant
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationRegistry {
    identity: Vec<NormalizationRule>,
    layouts: BTreeMap<(EntityType, Variant), Layout>,
}

/// On-disk form of a registry or of an overlay
#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    identity: Vec<NormalizationRule>,
    #[serde(default)]
    layouts: Vec<Layout>,
}

impl Default for NormalizationRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl NormalizationRegistry {
    /// The layouts of the current and legacy match-report pages
    pub fn standard() -> Self {
        let layouts = standard::layouts()
            .into_iter()
            .map(|l| ((l.entity, l.variant), l))
            .collect();
        NormalizationRegistry {
            identity: standard::identity_rules(),
            layouts,
        }
    }

    /// Build and validate a registry
    pub fn new(identity: Vec<NormalizationRule>, layouts: Vec<Layout>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for layout in layouts {
            let key = (layout.entity, layout.variant);
            if map.insert(key, layout).is_some() {
                return Err(ScrapeError::Registry(format!(
                    "duplicate layout for {} / {}",
                    key.0, key.1
                )));
            }
        }
        let registry = NormalizationRegistry {
            identity,
            layouts: map,
        };
        registry.validate()?;
        Ok(registry)
    }

    /// Parse a complete registry from TOML
    pub fn from_toml(text: &str) -> Result<Self> {
        let file: RegistryFile = toml::from_str(text)
            .map_err(|e| ScrapeError::Registry(format!("failed to parse rules: {}", e)))?;
        Self::new(file.identity, file.layouts)
    }

    /// Merge a TOML overlay: its layouts replace same-keyed ones, and its identity
    /// rules, when present, replace the identity rules.
    pub fn with_overrides(mut self, text: &str) -> Result<Self> {
        let file: RegistryFile = toml::from_str(text)
            .map_err(|e| ScrapeError::Registry(format!("failed to parse rules: {}", e)))?;
        if !file.identity.is_empty() {
            self.identity = file.identity;
        }
        for layout in file.layouts {
            log::info!("Overriding layout {} / {}", layout.entity, layout.variant);
            self.layouts.insert((layout.entity, layout.variant), layout);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn load_overrides<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        self.with_overrides(&text)
    }

    pub fn to_toml(&self) -> Result<String> {
        let file = RegistryFile {
            identity: self.identity.clone(),
            layouts: self.layouts.values().cloned().collect(),
        };
        toml::to_string_pretty(&file)
            .map_err(|e| ScrapeError::Registry(format!("failed to serialize rules: {}", e)))
    }

    /// Rules that resolve the match id and the two team ids of a page
    pub fn identity(&self) -> &[NormalizationRule] {
        &self.identity
    }

    pub fn layout_for(&self, entity: EntityType, variant: Variant) -> Option<&Layout> {
        self.layouts.get(&(entity, variant))
    }

    /// Ordered rules for an (entity, variant) pair; empty when no layout is registered
    pub fn rules_for(&self, entity: EntityType, variant: Variant) -> &[NormalizationRule] {
        self.layout_for(entity, variant)
            .map(|l| l.rules.as_slice())
            .unwrap_or(&[])
    }

    pub fn layouts(&self) -> impl Iterator<Item = &Layout> {
        self.layouts.values()
    }

    fn validate(&self) -> Result<()> {
        for rule in &self.identity {
            if !IDENTITY_FIELDS.contains(&rule.field.as_str()) {
                return Err(ScrapeError::Registry(format!(
                    "identity rule targets unknown field {}",
                    rule.field
                )));
            }
            check_selectors(rule)?;
        }

        for layout in self.layouts.values() {
            let what = format!("{} / {}", layout.entity, layout.variant);
            if !layout.variant.applies_to(layout.entity) {
                return Err(ScrapeError::Registry(format!(
                    "variant does not apply to entity: {}",
                    what
                )));
            }
            if let Some(items) = &layout.items {
                let mut css = vec![items.container.as_str(), items.item.as_str()];
                css.extend(items.separator.as_deref());
                for sel in css {
                    if selector(sel).is_none() {
                        return Err(ScrapeError::Registry(format!(
                            "{}: invalid item selector {:?}",
                            what, sel
                        )));
                    }
                }
            }
            for rule in &layout.rules {
                if layout.entity.field_index(&rule.field).is_none() {
                    return Err(ScrapeError::Registry(format!(
                        "{}: {} is not a canonical field",
                        what, rule.field
                    )));
                }
                check_selectors(rule)?;
            }
        }
        Ok(())
    }
}

fn check_selectors(rule: &NormalizationRule) -> Result<()> {
    for sel in rule.locator.selectors() {
        if selector(sel).is_none() {
            return Err(ScrapeError::Registry(format!(
                "rule for {}: invalid selector {:?}",
                rule.field, sel
            )));
        }
    }
    Ok(())
}
