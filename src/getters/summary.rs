//! Scoreline, expected goals and managers

use crate::getters::Getter;
use crate::model::EntityType;

#[derive(Debug, Default, Clone, Copy)]
pub struct MatchSummaryGetter;

impl Getter for MatchSummaryGetter {
    fn entity(&self) -> EntityType {
        EntityType::MatchSummary
    }
}
