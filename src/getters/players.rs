//! Per-player match statistics

use crate::getters::Getter;
use crate::model::EntityType;

/// One record per row of each team's summary stat table
#[derive(Debug, Default, Clone, Copy)]
pub struct PlayerGetter;

impl Getter for PlayerGetter {
    fn entity(&self) -> EntityType {
        EntityType::Players
    }
}
