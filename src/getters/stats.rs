//! Team statistics

use crate::getters::Getter;
use crate::model::EntityType;

/// One record per match, read from the stat tables' footer totals
#[derive(Debug, Default, Clone, Copy)]
pub struct StatsGetter;

impl Getter for StatsGetter {
    fn entity(&self) -> EntityType {
        EntityType::Stats
    }
}
