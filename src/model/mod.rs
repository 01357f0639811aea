//! Canonical record model
//!
//! Entity types, their fixed schemas, and the records getters emit.

pub mod entity;
pub mod record;

pub use entity::EntityType;
pub use record::{CanonicalRecord, FieldValue, ReasonCode, RecordBuilder};
