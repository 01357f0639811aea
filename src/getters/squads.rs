//! Lineups

use crate::getters::Getter;
use crate::model::EntityType;

/// One record per lineup row, starters then bench. Pages without a published lineup
/// yield a single placeholder record.
#[derive(Debug, Default, Clone, Copy)]
pub struct SquadsGetter;

impl Getter for SquadsGetter {
    fn entity(&self) -> EntityType {
        EntityType::Squads
    }
}
