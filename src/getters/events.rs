//! Match events (goals, cards, substitutions)

use crate::getters::Getter;
use crate::model::{EntityType, FieldValue, RecordBuilder};

/// One record per timeline event. Goals with an assisting player and substitutions
/// also yield a record for the second player involved.
#[derive(Debug, Default, Clone, Copy)]
pub struct EventsGetter;

/// Event types that name a second player, and the event recorded for that player
const SECOND_PLAYER_EVENTS: &[(&str, &str)] = &[("goal", "assist"), ("substitute_in", "substitute_out")];

impl Getter for EventsGetter {
    fn entity(&self) -> EntityType {
        EntityType::Events
    }

    fn expand(&self, record: RecordBuilder) -> Vec<RecordBuilder> {
        let paired = record
            .get("event_type")
            .and_then(FieldValue::as_text)
            .and_then(|kind| {
                SECOND_PLAYER_EVENTS
                    .iter()
                    .find(|(event, _)| *event == kind)
                    .map(|(_, paired)| *paired)
            });
        // a malformed second-player link still names a second player
        let has_second = ["related_player_id", "related_player_name"]
            .iter()
            .any(|field| record.get(field).is_some_and(|v| *v != FieldValue::Null));

        match paired {
            Some(paired) if has_second => {
                let mut second = record.clone();
                second.set("event_type", FieldValue::Text(paired.to_string()));
                swap_into(&record, &mut second, "related_player_id", "player_id");
                swap_into(&record, &mut second, "related_player_name", "player_name");
                swap_into(&record, &mut second, "player_id", "related_player_id");
                swap_into(&record, &mut second, "player_name", "related_player_name");
                vec![record, second]
            }
            _ => vec![record],
        }
    }
}

/// Copy `from` of the original record into `to` of the paired one; unresolved stays
/// unresolved
fn swap_into(original: &RecordBuilder, paired: &mut RecordBuilder, from: &str, to: &str) {
    match original.get(from) {
        Some(value) => {
            paired.set(to, value.clone());
        }
        None => paired.clear(to),
    }
}
