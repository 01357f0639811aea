//! Normalization rules and the per-variant layouts that group them

use crate::data::variant::Variant;
use crate::model::{EntityType, FieldValue, ReasonCode};
use crate::normalize::coerce::Coercion;
use crate::normalize::context::PageContext;
use crate::normalize::locator::{Locator, Scope};
use serde::{Deserialize, Serialize};

/// What to record when no rule locates a field. Markup that is present but
/// malformed is never defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Absence {
    /// Leave the field missing; the record becomes incomplete
    #[default]
    Missing,
    /// The field does not apply to this item
    Null,
    Default(FieldValue),
}

/// Outcome of one rule against one scope
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The locator found nothing; the absence policy applies
    Absent,
    /// The locator found markup the coercion rejected; the field stays missing
    Malformed(String),
    Value(FieldValue),
}

/// Maps one canonical field to a locator and a coercion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationRule {
    pub field: String,
    pub locator: Locator,
    pub coercion: Coercion,
    #[serde(default)]
    pub absence: Absence,
    /// Identifier fields are never defaulted; an unresolved one drops the record
    #[serde(default)]
    pub identifier: bool,
}

impl NormalizationRule {
    pub fn new(field: &str, locator: Locator, coercion: Coercion) -> Self {
        NormalizationRule {
            field: field.to_string(),
            locator,
            coercion,
            absence: Absence::Missing,
            identifier: false,
        }
    }

    pub fn identifier(mut self) -> Self {
        self.identifier = true;
        self
    }

    pub fn or_null(mut self) -> Self {
        self.absence = Absence::Null;
        self
    }

    pub fn or_default(mut self, value: FieldValue) -> Self {
        self.absence = Absence::Default(value);
        self
    }

    pub fn resolve(&self, scope: &Scope<'_>, ctx: &PageContext) -> Resolution {
        let Some(raw) = self.locator.locate(scope, ctx) else {
            return Resolution::Absent;
        };
        match self.coercion.apply(&raw, ctx) {
            Some(value) => Resolution::Value(value),
            None => {
                log::debug!(
                    "{}: field {} malformed: {:?}",
                    scope.page.url(),
                    self.field,
                    raw
                );
                Resolution::Malformed(raw)
            }
        }
    }

    /// Value recorded when no rule located the field
    pub fn fallback(&self) -> Option<FieldValue> {
        match &self.absence {
            Absence::Missing => None,
            Absence::Null => Some(FieldValue::Null),
            Absence::Default(value) => Some(value.clone()),
        }
    }
}

/// How per-item records are found: every `item` inside every `container`.
/// Items containing a `separator` match are section breaks, not records; separators
/// before the first record (a header row) do not open a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemScope {
    pub container: String,
    pub item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
}

/// All rules for one (entity, variant) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub entity: EntityType,
    pub variant: Variant,
    /// Without an item scope the layout yields one page-level record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<ItemScope>,
    /// Reason attached to every record of this layout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<ReasonCode>,
    #[serde(default)]
    pub rules: Vec<NormalizationRule>,
}

impl Layout {
    pub fn page(entity: EntityType, variant: Variant, rules: Vec<NormalizationRule>) -> Self {
        Layout {
            entity,
            variant,
            items: None,
            reason: None,
            rules,
        }
    }

    pub fn items(
        entity: EntityType,
        variant: Variant,
        container: &str,
        item: &str,
        separator: Option<&str>,
        rules: Vec<NormalizationRule>,
    ) -> Self {
        Layout {
            entity,
            variant,
            items: Some(ItemScope {
                container: container.to_string(),
                item: item.to_string(),
                separator: separator.map(str::to_string),
            }),
            reason: None,
            rules,
        }
    }

    pub fn with_reason(mut self, reason: ReasonCode) -> Self {
        self.reason = Some(reason);
        self
    }

    /// Canonical fields some rule of this layout can populate
    pub fn covered_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self.rules.iter().map(|r| r.field.as_str()).collect();
        fields.sort_unstable();
        fields.dedup();
        fields
    }
}
