//! Per-entity getters
//!
//! Every getter runs the same rule-driven extraction against the registry; getters only
//! differ in the entity type they produce and, for events, in how one resolved item
//! expands into records. Layout differences live in the registry, not here.

pub mod events;
pub mod match_info;
pub mod players;
pub mod squads;
pub mod stats;
pub mod summary;

pub use events::EventsGetter;
pub use match_info::MatchInfoGetter;
pub use players::PlayerGetter;
pub use squads::SquadsGetter;
pub use stats::StatsGetter;
pub use summary::MatchSummaryGetter;

use crate::data::page::{select_in, ParsedPage};
use crate::data::variant::Variant;
use crate::model::{CanonicalRecord, EntityType, RecordBuilder, ReasonCode};
use crate::normalize::context::PageContext;
use crate::normalize::locator::Scope;
use crate::normalize::registry::NormalizationRegistry;
use crate::normalize::rule::{Layout, Resolution};
use serde::Serialize;
use std::fmt;

/// Why an item or a whole page produced no record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticReason {
    /// No match id on the page; nothing was extracted
    MissingMatchId,
    /// The `item`-th item had no value for identifier `field` and was dropped
    MissingIdentifier { field: String, item: usize },
}

/// A dropped record, reported beside the records that were produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub entity: EntityType,
    pub url: String,
    pub reason: DiagnosticReason,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            DiagnosticReason::MissingMatchId => {
                write!(f, "{}: {}: no match id", self.url, self.entity)
            }
            DiagnosticReason::MissingIdentifier { field, item } => write!(
                f,
                "{}: {} item {} dropped, no {}",
                self.url, self.entity, item, field
            ),
        }
    }
}

/// Output of one getter on one page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extraction {
    pub entity: EntityType,
    pub variant: Variant,
    pub records: Vec<CanonicalRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Extraction {
    fn new(entity: EntityType, variant: Variant) -> Self {
        Extraction {
            entity,
            variant,
            records: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Number of records with at least one missing field
    pub fn incomplete(&self) -> usize {
        self.records.iter().filter(|r| !r.complete()).count()
    }

    fn diagnose(&mut self, page: &ParsedPage, reason: DiagnosticReason) {
        let diagnostic = Diagnostic {
            entity: self.entity,
            url: page.url().to_string(),
            reason,
        };
        log::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

/// Produces canonical records of one entity type from a parsed page
pub trait Getter: Send + Sync {
    fn entity(&self) -> EntityType;

    /// Records produced by one resolved item; most items yield exactly one
    fn expand(&self, record: RecordBuilder) -> Vec<RecordBuilder> {
        vec![record]
    }

    fn extract(
        &self,
        page: &ParsedPage,
        variant: Variant,
        registry: &NormalizationRegistry,
    ) -> Extraction {
        extract_with(self.entity(), |b| self.expand(b), page, variant, registry)
    }
}

/// Rule-driven extraction shared by every getter
pub fn extract_with<F>(
    entity: EntityType,
    expand: F,
    page: &ParsedPage,
    variant: Variant,
    registry: &NormalizationRegistry,
) -> Extraction
where
    F: Fn(RecordBuilder) -> Vec<RecordBuilder>,
{
    let variant = if variant.applies_to(entity) {
        variant
    } else {
        log::warn!(
            "{}: variant {} does not apply to {}",
            page.url(),
            variant,
            entity
        );
        Variant::Unknown
    };

    let Some(ctx) = PageContext::resolve(page, registry) else {
        let mut extraction = Extraction::new(entity, variant);
        extraction.diagnose(page, DiagnosticReason::MissingMatchId);
        return extraction;
    };

    // a variant without a layout is handled as an unknown layout
    let layout = registry
        .layout_for(entity, variant)
        .map(|layout| (variant, layout))
        .or_else(|| {
            registry
                .layout_for(entity, Variant::Unknown)
                .map(|layout| (Variant::Unknown, layout))
        });

    let Some((variant, layout)) = layout else {
        let mut extraction = Extraction::new(entity, Variant::Unknown);
        let record = RecordBuilder::new(entity, ctx.match_id.clone(), Variant::Unknown)
            .reason(ReasonCode::UnknownLayout)
            .build();
        log::info!(
            "{}: {} matched no known layout (classified {})",
            page.url(),
            entity,
            variant
        );
        extraction.records.push(record);
        return extraction;
    };

    let mut extraction = Extraction::new(entity, variant);
    let mut builders = Vec::new();

    match &layout.items {
        None => match fill(layout, variant, &Scope::page(page), &ctx) {
            Ok(builder) => builders.push(builder),
            Err(field) => extraction.diagnose(
                page,
                DiagnosticReason::MissingIdentifier {
                    field: field.to_string(),
                    item: 0,
                },
            ),
        },
        Some(items) => {
            let mut index = 0;
            for container in page.select_all(&items.container) {
                let mut section = 0;
                let mut opened = false;
                for item in select_in(container, &items.item) {
                    if let Some(separator) = &items.separator {
                        if !select_in(item, separator).is_empty() {
                            // separators ahead of the first item head the container
                            if opened {
                                section += 1;
                            }
                            continue;
                        }
                    }
                    opened = true;

                    let scope = Scope {
                        page,
                        element: item,
                        container: Some(container),
                        section,
                    };
                    match fill(layout, variant, &scope, &ctx) {
                        Ok(builder) => builders.push(builder),
                        Err(field) => extraction.diagnose(
                            page,
                            DiagnosticReason::MissingIdentifier {
                                field: field.to_string(),
                                item: index,
                            },
                        ),
                    }
                    index += 1;
                }
            }
        }
    }

    for builder in builders {
        for record in expand(builder) {
            let record = match layout.reason {
                Some(reason) => record.reason(reason),
                None => record,
            };
            extraction.records.push(record.build());
        }
    }

    log::info!(
        "{}: {} ({}): {} records, {} incomplete, {} dropped",
        page.url(),
        entity,
        variant,
        extraction.records.len(),
        extraction.incomplete(),
        extraction.diagnostics.len()
    );
    extraction
}

/// Resolve every rule of the layout for one item. Returns the unresolved identifier
/// field when the item has to be dropped.
fn fill<'l>(
    layout: &'l Layout,
    variant: Variant,
    scope: &Scope<'_>,
    ctx: &PageContext,
) -> std::result::Result<RecordBuilder, &'l str> {
    let mut builder = RecordBuilder::new(layout.entity, ctx.match_id.clone(), variant);
    let mut malformed: Vec<&str> = Vec::new();

    // first rule that resolves wins
    for rule in &layout.rules {
        if builder.is_set(&rule.field) {
            continue;
        }
        match rule.resolve(scope, ctx) {
            Resolution::Value(value) => {
                builder.set(&rule.field, value);
            }
            Resolution::Malformed(_) => malformed.push(rule.field.as_str()),
            Resolution::Absent => {}
        }
    }

    for rule in &layout.rules {
        if builder.is_set(&rule.field) {
            continue;
        }
        if rule.identifier {
            return Err(rule.field.as_str());
        }
        if malformed.contains(&rule.field.as_str()) {
            continue;
        }
        if let Some(value) = rule.fallback() {
            builder.set(&rule.field, value);
        }
    }

    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::data::variant::{classify, SquadVariant, StatsVariant};
    use crate::model::FieldValue;
    use crate::normalize::coerce::Coercion;
    use crate::normalize::locator::Locator;
    use crate::normalize::rule::NormalizationRule;
    use crate::pipeline::getter_for;

    #[test]
    fn test_missing_match_id_yields_diagnostics_only() {
        let page = ParsedPage::parse("u", &fixtures::report_without_match_id());
        let registry = NormalizationRegistry::standard();

        for entity in EntityType::ALL {
            let variant = classify(entity, &page);
            let extraction = getter_for(entity).extract(&page, variant, &registry);
            assert!(extraction.records.is_empty(), "{} produced records", entity);
            assert_eq!(
                extraction.diagnostics,
                vec![Diagnostic {
                    entity,
                    url: "u".to_string(),
                    reason: DiagnosticReason::MissingMatchId,
                }]
            );
        }
    }

    #[test]
    fn test_extract_is_idempotent() {
        let page = ParsedPage::parse("u", &fixtures::full_report());
        let registry = NormalizationRegistry::standard();

        for entity in EntityType::ALL {
            let getter = getter_for(entity);
            let variant = classify(entity, &page);
            let first = getter.extract(&page, variant, &registry);
            let second = getter.extract(&page, variant, &registry);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_schema_is_stable_across_variants() {
        let full = ParsedPage::parse("u", &fixtures::full_report());
        let legacy = ParsedPage::parse("u", &fixtures::legacy_report());
        let garbage = ParsedPage::parse("u", "<html><body><p>nothing here</p></body></html>");
        let registry = NormalizationRegistry::standard();

        for entity in EntityType::ALL {
            let getter = getter_for(entity);
            for page in [&full, &legacy] {
                for variant in [classify(entity, page), Variant::Unknown] {
                    for record in getter.extract(page, variant, &registry).records {
                        assert!(record.field_names().eq(entity.schema().iter().copied()));
                        assert_eq!(record.complete(), record.missing().is_empty());
                    }
                }
            }
            // never panics on garbage
            let _ = getter.extract(&garbage, classify(entity, &garbage), &registry);
        }
    }

    #[test]
    fn test_foreign_variant_is_treated_as_unknown() {
        let page = ParsedPage::parse("u", &fixtures::full_report());
        let registry = NormalizationRegistry::standard();

        let extraction = getter_for(EntityType::Events).extract(
            &page,
            Variant::Stats(StatsVariant::Full17),
            &registry,
        );
        assert_eq!(extraction.variant, Variant::Unknown);
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].reason(), Some(ReasonCode::UnknownLayout));
        assert_eq!(extraction.records[0].missing(), EntityType::Events.schema());
    }

    #[test]
    fn test_unknown_layout_can_be_supplied_by_overlay() {
        let page = ParsedPage::parse("u", &fixtures::full_report());
        let overlay = r#"
            [[layouts]]
            entity = "match_info"
            variant = "unknown"

            [[layouts.rules]]
            field = "venue"
            locator = { kind = "labeled", rows = "div.scorebox_meta > div", label = "small", text = "Venue", value = "small:nth-of-type(2)" }
            coercion = { kind = "text" }
        "#;
        let registry = NormalizationRegistry::standard()
            .with_overrides(overlay)
            .unwrap();

        let extraction =
            getter_for(EntityType::MatchInfo).extract(&page, Variant::Unknown, &registry);
        assert_eq!(extraction.records.len(), 1);
        let record = &extraction.records[0];
        assert_eq!(record.variant(), Variant::Unknown);
        assert_eq!(record.reason(), None);
        assert_eq!(
            record.get("venue"),
            Some(&FieldValue::Text("Turf Moor, Burnley".to_string()))
        );
        assert!(!record.complete());
    }

    #[test]
    fn test_unresolved_identifier_drops_item() {
        let html = format!(
            r#"<link rel="canonical" href="https://fbref.com/en/matches/{}/x">
               <div class="scorebox"><div><strong><a href="/en/squads/{}/A">A</a></strong></div></div>
               <div class="lineup" id="a"><table><tbody>
                 <tr><td>1</td><td><a href="/en/players/p1/One">One</a></td></tr>
                 <tr><td>2</td><td>Unlinked Player</td></tr>
               </tbody></table></div>"#,
            fixtures::MATCH_ID,
            fixtures::HOME
        );
        let page = ParsedPage::parse("u", &html);
        let registry = NormalizationRegistry::standard();

        let extraction = getter_for(EntityType::Squads).extract(
            &page,
            Variant::Squad(SquadVariant::Present),
            &registry,
        );
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(
            extraction.diagnostics[0].reason,
            DiagnosticReason::MissingIdentifier {
                field: "player_id".to_string(),
                item: 1,
            }
        );
    }

    #[test]
    fn test_first_resolving_rule_wins() {
        let page = ParsedPage::parse(
            "u",
            r#"<link rel="canonical" href="https://fbref.com/en/matches/m1/x">
               <div class="venue">Anfield</div><div class="ground">Old Trafford</div>"#,
        );
        let layout = Layout::page(
            EntityType::MatchInfo,
            Variant::Standard,
            vec![
                NormalizationRule::new("venue", Locator::text("div.stadium"), Coercion::Text),
                NormalizationRule::new("venue", Locator::text("div.venue"), Coercion::Text),
                NormalizationRule::new("venue", Locator::text("div.ground"), Coercion::Text),
                NormalizationRule::new("attendance", Locator::text("div.crowd"), Coercion::Integer)
                    .or_default(FieldValue::Int(0)),
            ],
        );
        let standard = NormalizationRegistry::standard();
        let registry = NormalizationRegistry::new(standard.identity().to_vec(), vec![layout]).unwrap();

        let extraction = extract_with(
            EntityType::MatchInfo,
            |b| vec![b],
            &page,
            Variant::Standard,
            &registry,
        );
        let record = &extraction.records[0];
        assert_eq!(record.get("venue"), Some(&FieldValue::Text("Anfield".to_string())));
        assert_eq!(record.get("attendance"), Some(&FieldValue::Int(0)));
        assert!(!record.missing().contains(&"attendance"));
    }

    #[test]
    fn test_malformed_value_is_not_defaulted() {
        let page = ParsedPage::parse(
            "u",
            r#"<link rel="canonical" href="https://fbref.com/en/matches/m1/x">
               <div class="crowd">sold out</div>"#,
        );
        let layout = Layout::page(
            EntityType::MatchInfo,
            Variant::Standard,
            vec![
                NormalizationRule::new("attendance", Locator::text("div.crowd"), Coercion::Integer)
                    .or_default(FieldValue::Int(0)),
                NormalizationRule::new("referee", Locator::text("div.official"), Coercion::Text)
                    .or_default(FieldValue::Text("unknown".to_string())),
            ],
        );
        let standard = NormalizationRegistry::standard();
        let registry = NormalizationRegistry::new(standard.identity().to_vec(), vec![layout]).unwrap();

        let extraction = extract_with(
            EntityType::MatchInfo,
            |b| vec![b],
            &page,
            Variant::Standard,
            &registry,
        );
        let record = &extraction.records[0];
        assert_eq!(record.get("attendance"), None);
        assert!(record.missing().contains(&"attendance"));
        assert_eq!(record.get("referee"), Some(&FieldValue::Text("unknown".to_string())));
        assert!(!record.complete());
    }
}
