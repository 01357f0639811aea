//! Match metadata: date, competition, venue, officials

use crate::getters::Getter;
use crate::model::EntityType;

#[derive(Debug, Default, Clone, Copy)]
pub struct MatchInfoGetter;

impl Getter for MatchInfoGetter {
    fn entity(&self) -> EntityType {
        EntityType::MatchInfo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::data::page::ParsedPage;
    use crate::data::variant::classify;
    use crate::model::{CanonicalRecord, FieldValue};
    use crate::normalize::NormalizationRegistry;
    use chrono::NaiveDate;

    fn text<'a>(record: &'a CanonicalRecord, field: &str) -> Option<&'a str> {
        record.get(field).and_then(FieldValue::as_text)
    }

    #[test]
    fn test_match_info() {
        let page = ParsedPage::parse("u", &fixtures::full_report());
        let extraction = MatchInfoGetter.extract(
            &page,
            classify(EntityType::MatchInfo, &page),
            &NormalizationRegistry::standard(),
        );
        let record = &extraction.records[0];

        assert!(record.complete(), "missing: {:?}", record.missing());
        assert_eq!(
            record.get("date"),
            Some(&FieldValue::Date(NaiveDate::from_ymd_opt(2023, 8, 11).unwrap()))
        );
        assert_eq!(text(record, "kickoff"), Some("20:00"));
        assert_eq!(text(record, "competition"), Some("Premier League"));
        assert_eq!(text(record, "round"), Some("Matchweek 1"));
        assert_eq!(text(record, "venue"), Some("Turf Moor, Burnley"));
        assert_eq!(record.get("attendance"), Some(&FieldValue::Int(21572)));
        assert_eq!(text(record, "referee"), Some("Anthony Taylor"));
    }

    #[test]
    fn test_legacy_match_info_is_partial() {
        let page = ParsedPage::parse("u", &fixtures::legacy_report());
        let extraction = MatchInfoGetter.extract(
            &page,
            classify(EntityType::MatchInfo, &page),
            &NormalizationRegistry::standard(),
        );
        let record = &extraction.records[0];

        assert_eq!(record.missing(), &["attendance", "referee"]);
        assert_eq!(text(record, "venue"), Some("Ewood Park"));
    }
}
