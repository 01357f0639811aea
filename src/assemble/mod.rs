//! Composite record sets
//!
//! Stitches the per-entity records of one match together. Records are kept exactly as
//! the getters produced them; the assembler only adds a player cross-reference index
//! and warnings about records that do not agree with each other.

use crate::model::{CanonicalRecord, EntityType, FieldValue};
use crate::{MatchId, PlayerId, TeamId};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Entity types whose team assignment of a player must agree. Event team ids are not
/// compared: an own goal is credited to the opponent's side.
const ROSTER_ENTITIES: &[EntityType] = &[EntityType::Squads, EntityType::Players];

/// Where one player appears in a match
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayerRefs {
    pub teams: BTreeSet<TeamId>,
    pub entities: BTreeSet<EntityType>,
}

/// Cross-record inconsistencies
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssemblyWarning {
    /// A record carries another match's id
    ForeignMatch { entity: EntityType, match_id: MatchId },
    /// The same player is listed for different teams
    TeamConflict {
        player_id: PlayerId,
        teams: Vec<TeamId>,
    },
    /// A record's team is neither side of the match summary
    UnknownTeam { entity: EntityType, team_id: TeamId },
}

impl fmt::Display for AssemblyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssemblyWarning::ForeignMatch { entity, match_id } => {
                write!(f, "{} record belongs to {}", entity, match_id)
            }
            AssemblyWarning::TeamConflict { player_id, teams } => {
                let teams: Vec<String> = teams.iter().map(|t| t.to_string()).collect();
                write!(f, "{} listed for {}", player_id, teams.join(", "))
            }
            AssemblyWarning::UnknownTeam { entity, team_id } => {
                write!(f, "{} record names {}, not a side of this match", entity, team_id)
            }
        }
    }
}

/// All records of one match plus cross-references
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeRecordSet {
    pub match_id: MatchId,
    pub records: BTreeMap<EntityType, Vec<CanonicalRecord>>,
    pub players: BTreeMap<PlayerId, PlayerRefs>,
    pub warnings: Vec<AssemblyWarning>,
}

impl CompositeRecordSet {
    pub fn records_of(&self, entity: EntityType) -> &[CanonicalRecord] {
        self.records.get(&entity).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn record_count(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RecordAssembler;

impl RecordAssembler {
    /// Combine the records of one match. Deterministic: the same input always gives
    /// the same composite, warnings included.
    pub fn assemble(
        &self,
        match_id: &MatchId,
        records: BTreeMap<EntityType, Vec<CanonicalRecord>>,
    ) -> CompositeRecordSet {
        let mut warnings = BTreeSet::new();
        let mut players: BTreeMap<PlayerId, PlayerRefs> = BTreeMap::new();
        let mut roster: BTreeMap<PlayerId, BTreeSet<TeamId>> = BTreeMap::new();
        let sides = match_sides(&records);

        for (entity, list) in &records {
            for record in list {
                if record.match_id() != match_id {
                    warnings.insert(AssemblyWarning::ForeignMatch {
                        entity: *entity,
                        match_id: record.match_id().clone(),
                    });
                    continue;
                }

                let team = record.team_id();
                if let (Some(team), Some(sides)) = (&team, &sides) {
                    if !sides.contains(team) {
                        warnings.insert(AssemblyWarning::UnknownTeam {
                            entity: *entity,
                            team_id: team.clone(),
                        });
                    }
                }

                for player in mentioned_players(record) {
                    let refs = players.entry(player.clone()).or_default();
                    refs.entities.insert(*entity);
                    if let Some(team) = &team {
                        refs.teams.insert(team.clone());
                    }
                }

                if ROSTER_ENTITIES.contains(entity) {
                    if let (Some(player), Some(team)) = (record.player_id(), &team) {
                        roster.entry(player).or_default().insert(team.clone());
                    }
                }
            }
        }

        for (player_id, teams) in roster {
            if teams.len() > 1 {
                warnings.insert(AssemblyWarning::TeamConflict {
                    player_id,
                    teams: teams.into_iter().collect(),
                });
            }
        }

        let warnings: Vec<AssemblyWarning> = warnings.into_iter().collect();
        for warning in &warnings {
            log::warn!("{}: {}", match_id, warning);
        }

        CompositeRecordSet {
            match_id: match_id.clone(),
            records,
            players,
            warnings,
        }
    }
}

/// The two team ids of the match summary, when both are known
fn match_sides(records: &BTreeMap<EntityType, Vec<CanonicalRecord>>) -> Option<[TeamId; 2]> {
    let summary = records.get(&EntityType::MatchSummary)?.first()?;
    let team = |field: &str| {
        summary
            .get(field)
            .and_then(FieldValue::as_text)
            .map(|id| TeamId(id.to_string()))
    };
    Some([team("home_team_id")?, team("away_team_id")?])
}

/// Player ids a record refers to, including the second player of an event
fn mentioned_players(record: &CanonicalRecord) -> Vec<PlayerId> {
    ["player_id", "related_player_id"]
        .iter()
        .filter_map(|field| record.get(field).and_then(FieldValue::as_text))
        .map(|id| PlayerId(id.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::variant::{SquadVariant, Variant};
    use crate::model::RecordBuilder;

    fn match_id() -> MatchId {
        MatchId("cc5b4244".to_string())
    }

    fn roster_record(entity: EntityType, variant: Variant, player: &str, team: &str) -> CanonicalRecord {
        let mut builder = RecordBuilder::new(entity, match_id(), variant);
        builder.set("player_id", FieldValue::Text(player.to_string()));
        builder.set("team_id", FieldValue::Text(team.to_string()));
        builder.build()
    }

    fn summary(home: &str, away: &str) -> CanonicalRecord {
        let mut builder = RecordBuilder::new(EntityType::MatchSummary, match_id(), Variant::Standard);
        builder.set("home_team_id", FieldValue::Text(home.to_string()));
        builder.set("away_team_id", FieldValue::Text(away.to_string()));
        builder.build()
    }

    fn conflicting_input() -> BTreeMap<EntityType, Vec<CanonicalRecord>> {
        let squad = Variant::Squad(SquadVariant::Present);
        BTreeMap::from([
            (
                EntityType::Squads,
                vec![
                    roster_record(EntityType::Squads, squad, "p1", "t1"),
                    roster_record(EntityType::Squads, squad, "p2", "t2"),
                ],
            ),
            (
                EntityType::Players,
                vec![
                    roster_record(EntityType::Players, Variant::Standard, "p1", "t2"),
                    roster_record(EntityType::Players, Variant::Standard, "p2", "t2"),
                ],
            ),
            (EntityType::MatchSummary, vec![summary("t1", "t2")]),
        ])
    }

    #[test]
    fn test_team_conflict_warns_once_and_keeps_records() {
        let input = conflicting_input();
        let composite = RecordAssembler.assemble(&match_id(), input.clone());

        assert_eq!(
            composite.warnings,
            vec![AssemblyWarning::TeamConflict {
                player_id: PlayerId("p1".to_string()),
                teams: vec![TeamId("t1".to_string()), TeamId("t2".to_string())],
            }]
        );
        assert_eq!(composite.records, input);
        assert_eq!(composite.record_count(), 5);

        let p1 = &composite.players[&PlayerId("p1".to_string())];
        assert_eq!(p1.teams.len(), 2);
        assert_eq!(
            p1.entities,
            BTreeSet::from([EntityType::Squads, EntityType::Players])
        );
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let first = RecordAssembler.assemble(&match_id(), conflicting_input());
        let second = RecordAssembler.assemble(&match_id(), conflicting_input());
        assert_eq!(first, second);
    }

    #[test]
    fn test_foreign_and_unknown_team_records() {
        let mut other = RecordBuilder::new(EntityType::Players, MatchId("zzz".to_string()), Variant::Standard);
        other.set("player_id", FieldValue::Text("p9".to_string()));
        let input = BTreeMap::from([
            (
                EntityType::Players,
                vec![
                    roster_record(EntityType::Players, Variant::Standard, "p3", "t9"),
                    other.build(),
                ],
            ),
            (EntityType::MatchSummary, vec![summary("t1", "t2")]),
        ]);

        let composite = RecordAssembler.assemble(&match_id(), input);
        assert_eq!(
            composite.warnings,
            vec![
                AssemblyWarning::ForeignMatch {
                    entity: EntityType::Players,
                    match_id: MatchId("zzz".to_string()),
                },
                AssemblyWarning::UnknownTeam {
                    entity: EntityType::Players,
                    team_id: TeamId("t9".to_string()),
                },
            ]
        );
        assert!(!composite.players.contains_key(&PlayerId("p9".to_string())));
        assert_eq!(composite.records_of(EntityType::Players).len(), 2);
        assert!(composite.records_of(EntityType::Events).is_empty());
    }
}
