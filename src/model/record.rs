//! Canonical records
//!
//! A `CanonicalRecord` can only be produced through `RecordBuilder::build`, which is where
//! the completeness invariant lives: `complete` is true exactly when no schema field is
//! missing.

use crate::data::variant::Variant;
use crate::model::EntityType;
use crate::{MatchId, PlayerId, TeamId};
use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A normalized field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Text(String),
    /// Resolved as "not applicable"; does not count as missing
    Null,
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Null => Ok(()),
        }
    }
}

/// Why a record is incomplete, when the cause is known rather than an extraction gap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    /// The source has not published a lineup for this match
    SquadNotPublished,
    /// The page matched none of the known layouts for this entity
    UnknownLayout,
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReasonCode::SquadNotPublished => write!(f, "SQUAD_NOT_PUBLISHED"),
            ReasonCode::UnknownLayout => write!(f, "UNKNOWN_LAYOUT"),
        }
    }
}

/// One normalized record of a single entity type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    entity: EntityType,
    match_id: MatchId,
    variant: Variant,
    #[serde(serialize_with = "serialize_fields")]
    fields: Vec<(&'static str, Option<FieldValue>)>,
    complete: bool,
    missing: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<ReasonCode>,
}

fn serialize_fields<S: Serializer>(
    fields: &[(&'static str, Option<FieldValue>)],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(fields.len()))?;
    for (name, value) in fields {
        map.serialize_entry(name, value)?;
    }
    map.end()
}

impl CanonicalRecord {
    pub fn entity(&self) -> EntityType {
        self.entity
    }

    pub fn match_id(&self) -> &MatchId {
        &self.match_id
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn complete(&self) -> bool {
        self.complete
    }

    /// Names of schema fields that could not be resolved
    pub fn missing(&self) -> &[&'static str] {
        &self.missing
    }

    pub fn reason(&self) -> Option<ReasonCode> {
        self.reason
    }

    /// Field names in schema order
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    pub fn fields(&self) -> &[(&'static str, Option<FieldValue>)] {
        &self.fields
    }

    /// Value of a field; `None` when missing or not in the schema
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .and_then(|(_, value)| value.as_ref())
    }

    pub fn team_id(&self) -> Option<TeamId> {
        self.get("team_id")
            .and_then(FieldValue::as_text)
            .map(|s| TeamId(s.to_string()))
    }

    pub fn player_id(&self) -> Option<PlayerId> {
        self.get("player_id")
            .and_then(FieldValue::as_text)
            .map(|s| PlayerId(s.to_string()))
    }
}

/// Accumulates field values for one record before it is sealed
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    entity: EntityType,
    match_id: MatchId,
    variant: Variant,
    values: Vec<Option<FieldValue>>,
    reason: Option<ReasonCode>,
}

impl RecordBuilder {
    pub fn new(entity: EntityType, match_id: MatchId, variant: Variant) -> Self {
        RecordBuilder {
            entity,
            match_id,
            variant,
            values: vec![None; entity.schema().len()],
            reason: None,
        }
    }

    pub fn entity(&self) -> EntityType {
        self.entity
    }

    /// Set a field; returns false when the name is not part of the schema
    pub fn set(&mut self, field: &str, value: FieldValue) -> bool {
        match self.entity.field_index(field) {
            Some(idx) => {
                self.values[idx] = Some(value);
                true
            }
            None => false,
        }
    }

    /// Mark a field unresolved again
    pub fn clear(&mut self, field: &str) {
        if let Some(idx) = self.entity.field_index(field) {
            self.values[idx] = None;
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.entity
            .field_index(field)
            .and_then(|idx| self.values[idx].as_ref())
    }

    pub fn is_set(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn reason(mut self, reason: ReasonCode) -> Self {
        self.reason = Some(reason);
        self
    }

    pub fn build(self) -> CanonicalRecord {
        let schema = self.entity.schema();
        let missing: Vec<&'static str> = schema
            .iter()
            .zip(&self.values)
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();
        let fields = schema.iter().copied().zip(self.values).collect();

        CanonicalRecord {
            entity: self.entity,
            match_id: self.match_id,
            variant: self.variant,
            fields,
            complete: missing.is_empty(),
            missing,
            reason: self.reason,
        }
    }
}
