//! Enrichers: steps that annotate converted engine input with the record's
//! parallel-language metadata.
//!
//! Each enricher runs inside its own failure boundary. An error or a panic is
//! logged, the item is restored to its state before that enricher ran, and
//! the remaining enrichers still run.

use cne_codec::{CreatorOption, MetadataRecord, NAMESPACE_PREFIX};
use cne_names::{CreatorRole, EngineQuirks, TargetRendering, build_variant, compute_override};
use cne_style::Slot;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{error, trace, warn};

use crate::engine_item::{EngineItem, NameMulti};
use crate::error::EnrichError;
use crate::host::{HostRecord, align_creators};
use crate::preset::FieldPreset;

/// What an enricher sees besides the item itself.
pub struct EnrichContext<'a> {
    /// Decoded from the host record's free-text field.
    pub metadata: &'a MetadataRecord,
    pub record: &'a dyn HostRecord,
    pub quirks: &'a EngineQuirks,
    pub field_preset: FieldPreset,
}

pub trait Enricher {
    /// Used in log messages and for unregistering.
    fn name(&self) -> &str;

    /// Whether the enricher only runs for records that carry metadata lines.
    fn needs_metadata(&self) -> bool {
        true
    }

    fn enrich(&self, item: &mut EngineItem, ctx: &EnrichContext<'_>) -> Result<(), EnrichError>;
}

/// Run one enricher in a failure boundary. Returns the failure, if any,
/// after logging it.
pub fn run_isolated(
    enricher: &dyn Enricher,
    item: &mut EngineItem,
    ctx: &EnrichContext<'_>,
) -> Option<EnrichError> {
    let snapshot = item.clone();
    let outcome = catch_unwind(AssertUnwindSafe(|| enricher.enrich(item, ctx)));

    let failure = match outcome {
        Ok(Ok(())) => {
            trace!(enricher = enricher.name(), "enricher finished");
            return None;
        }
        Ok(Err(err)) => {
            warn!(enricher = enricher.name(), "enricher failed, skipping: {}", err);
            err
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(enricher = enricher.name(), "enricher panicked, skipping: {}", message);
            EnrichError::Panicked {
                enricher: enricher.name().to_string(),
                message,
            }
        }
    };

    *item = snapshot;
    Some(failure)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Attaches language-tag overrides and per-slot name variants.
///
/// Creators with override data get one variant per slot:
/// `orig` the original-script name, `translit` the natural romanization
/// ("Du Weisheng") and `translat` the style-punctuated romanization
/// ("Du, W."). Creators without data get the native tag on their main name
/// and are otherwise left alone. Runs for every record, so a record with no
/// metadata lines at all has every name tagged native.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreatorEnricher;

impl CreatorEnricher {
    fn name_multi(
        role: CreatorRole,
        family_tag: &str,
        creator: Option<&cne_codec::CreatorVariant>,
        quirks: &EngineQuirks,
    ) -> NameMulti {
        let Some(creator) = creator.filter(|c| c.has_romanized() || c.has_original()) else {
            return NameMulti {
                main: compute_override(role, family_tag, false, TargetRendering::Original, quirks),
                variants: Default::default(),
            };
        };

        let force_comma = creator.option(CreatorOption::ForceComma).unwrap_or(false);
        let spaced = creator
            .option(CreatorOption::OriginalSpacing)
            .unwrap_or(false);
        let mut multi = NameMulti::default();

        if creator.has_original() {
            let target = if spaced {
                TargetRendering::OriginalSpaced
            } else {
                TargetRendering::Original
            };
            multi.variants.insert(
                Slot::Orig,
                build_variant(
                    compute_override(role, family_tag, true, target, quirks),
                    creator.last_original.as_deref().unwrap_or_default(),
                    creator.first_original.as_deref(),
                    false,
                ),
            );
        }

        if creator.has_romanized() {
            let family = creator.last_romanized.as_deref().unwrap_or_default();
            let given = creator.first_romanized.as_deref();
            for (slot, target) in [
                (Slot::Translit, TargetRendering::RomanizedNatural),
                (Slot::Translat, TargetRendering::RomanizedPunctuated),
            ] {
                multi.variants.insert(
                    slot,
                    build_variant(
                        compute_override(role, family_tag, true, target, quirks),
                        family,
                        given,
                        force_comma,
                    ),
                );
            }
        }

        multi
    }
}

impl Enricher for CreatorEnricher {
    fn name(&self) -> &str {
        "creator-variants"
    }

    fn needs_metadata(&self) -> bool {
        false
    }

    fn enrich(&self, item: &mut EngineItem, ctx: &EnrichContext<'_>) -> Result<(), EnrichError> {
        let family_tag = ctx
            .quirks
            .family_tag(ctx.metadata.original_language.as_deref());

        for (index, slot) in align_creators(ctx.record).into_iter().enumerate() {
            let Some((variable, position)) = slot else {
                continue;
            };
            let Some(name) = item
                .names_mut(variable)
                .and_then(|names| names.get_mut(position))
            else {
                trace!(%variable, position, "converted item has no name at this position");
                continue;
            };

            let role = CreatorRole::from_variable(variable.as_str());
            name.multi = Some(Self::name_multi(
                role,
                &family_tag,
                ctx.metadata.creator(index),
                ctx.quirks,
            ));
        }

        Ok(())
    }
}

/// Injects field variants as `cne-<field>` (preset-formatted) and
/// `cne-<field>-<variant>` properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldEnricher;

impl Enricher for FieldEnricher {
    fn name(&self) -> &str {
        "field-variants"
    }

    fn enrich(&self, item: &mut EngineItem, ctx: &EnrichContext<'_>) -> Result<(), EnrichError> {
        for (field, variants) in &ctx.metadata.fields {
            if let Some(combined) = ctx.field_preset.render(*field, variants) {
                item.other.insert(
                    format!("{}{}", NAMESPACE_PREFIX, field),
                    serde_json::to_value(combined)?,
                );
            }
            for kind in cne_codec::VariantKind::ALL {
                if let Some(value) = variants.get(kind) {
                    item.other.insert(
                        format!("{}{}-{}", NAMESPACE_PREFIX, field, kind),
                        serde_json::to_value(value)?,
                    );
                }
            }
        }
        Ok(())
    }
}

/// Removes encoded metadata lines from the item's note so they never print.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteEnricher;

impl Enricher for NoteEnricher {
    fn name(&self) -> &str {
        "note-strip"
    }

    fn enrich(&self, item: &mut EngineItem, _ctx: &EnrichContext<'_>) -> Result<(), EnrichError> {
        if let Some(note) = item.note.as_deref()
            && cne_codec::has_metadata(note)
        {
            let stripped = cne_codec::strip(note);
            item.note = Some(stripped).filter(|s| !s.trim().is_empty());
        }
        Ok(())
    }
}

/// Sets the item language from the record when the host left it empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageEnricher;

impl Enricher for LanguageEnricher {
    fn name(&self) -> &str {
        "record-language"
    }

    fn enrich(&self, item: &mut EngineItem, ctx: &EnrichContext<'_>) -> Result<(), EnrichError> {
        let empty = item.language.as_deref().is_none_or(|l| l.trim().is_empty());
        if empty && let Some(language) = &ctx.metadata.original_language {
            item.language = Some(language.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_item::{EngineName, NameVariable};
    use crate::host::{ConversionArgs, Creator, Record, convert_record};

    fn record(extra: &str, creators: Vec<Creator>) -> Record {
        let mut record = Record::new("book");
        record.set_field("extra", extra);
        record.creators = creators;
        record
    }

    fn run(enricher: &dyn Enricher, record: &Record) -> EngineItem {
        let metadata = cne_codec::parse(record.field("extra").unwrap_or_default());
        let quirks = EngineQuirks::default();
        let ctx = EnrichContext {
            metadata: &metadata,
            record,
            quirks: &quirks,
            field_preset: FieldPreset::default(),
        };
        let mut item = convert_record(record, &ConversionArgs::default());
        assert!(run_isolated(enricher, &mut item, &ctx).is_none());
        item
    }

    #[test]
    fn test_creator_variants() {
        let record = record(
            "cne-creator-0-last-original: 杜\n\
             cne-creator-0-first-original: 伟生\n\
             cne-creator-0-last-romanized: Du\n\
             cne-creator-0-first-romanized: Weisheng\n\
             cne-original-language: zh-CN",
            vec![Creator::person("author", "杜", "伟生")],
        );
        let item = run(&CreatorEnricher, &record);

        let multi = item.get_names(NameVariable::Author).unwrap()[0]
            .multi
            .clone()
            .unwrap();
        assert_eq!(multi.main, None);
        assert_eq!(multi.variants[&Slot::Orig].language_override, None);
        assert_eq!(
            multi.variants[&Slot::Translit].language_override.as_deref(),
            Some("ja")
        );
        assert_eq!(
            multi.variants[&Slot::Translat].language_override.as_deref(),
            Some("en")
        );
        assert_eq!(multi.variants[&Slot::Translat].family, "Du");
    }

    #[test]
    fn test_creator_without_data_gets_native_tag_only() {
        let record = record(
            "cne-creator-1-last-romanized: Lin",
            vec![
                Creator::person("author", "Smith", "John"),
                Creator::person("editor", "Lin", "Shu"),
            ],
        );
        let item = run(&CreatorEnricher, &record);

        let author = &item.get_names(NameVariable::Author).unwrap()[0];
        assert_eq!(author.family.as_deref(), Some("Smith"));
        assert_eq!(author.given.as_deref(), Some("John"));
        assert_eq!(
            author.multi,
            Some(NameMulti {
                main: Some("en".to_string()),
                variants: Default::default(),
            })
        );

        // Container role: punctuated variant carries the family tag.
        let editor = &item.get_names(NameVariable::Editor).unwrap()[0];
        let multi = editor.multi.as_ref().unwrap();
        assert_eq!(
            multi.variants[&Slot::Translat].language_override.as_deref(),
            Some("zh")
        );
    }

    #[test]
    fn test_options_flow_into_variants() {
        let record = record(
            "cne-creator-0-last-original: 杜\n\
             cne-creator-0-first-original: 伟生\n\
             cne-creator-0-last-romanized: Du\n\
             cne-creator-0-original-spacing: yes\n\
             cne-creator-0-force-comma: true",
            vec![Creator::person("author", "Du", "")],
        );
        let item = run(&CreatorEnricher, &record);
        let multi = item.get_names(NameVariable::Author).unwrap()[0]
            .multi
            .clone()
            .unwrap();

        assert_eq!(
            multi.variants[&Slot::Orig].language_override.as_deref(),
            Some("en")
        );
        assert_eq!(multi.variants[&Slot::Orig].family, "杜");
        assert_eq!(multi.variants[&Slot::Translit].family, "Du,");
    }

    #[test]
    fn test_field_variants() {
        let record = record(
            "cne-title-original: 紅樓夢\n\
             cne-title-romanized: Hongloumeng\n\
             cne-title-english: Dream of the Red Chamber",
            vec![],
        );
        let item = run(&FieldEnricher, &record);

        insta::assert_snapshot!(
            serde_json::to_string_pretty(&item.other).unwrap(),
            @r#"
        {
          "cne-title": "<i>Hongloumeng</i> 紅樓夢 [Dream of the Red Chamber]",
          "cne-title-english": "Dream of the Red Chamber",
          "cne-title-original": "紅樓夢",
          "cne-title-romanized": "Hongloumeng"
        }
        "#
        );
    }

    #[test]
    fn test_note_strip() {
        let record = record("Original date: 1791\ncne-title-romanized: Hongloumeng", vec![]);
        let item = run(&NoteEnricher, &record);
        assert_eq!(item.note.as_deref(), Some("Original date: 1791"));

        let record = record_only_metadata();
        let item = run(&NoteEnricher, &record);
        assert_eq!(item.note, None);
    }

    fn record_only_metadata() -> Record {
        record("cne-title-romanized: Hongloumeng", vec![])
    }

    #[test]
    fn test_language_from_record() {
        let item = run(&LanguageEnricher, &record("cne-original-language: zh", vec![]));
        assert_eq!(item.language.as_deref(), Some("zh"));

        let mut with_language = record("cne-original-language: zh", vec![]);
        with_language.set_field("language", "ja");
        let item = run(&LanguageEnricher, &with_language);
        assert_eq!(item.language.as_deref(), Some("ja"));
    }

    struct Failing;

    impl Enricher for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn enrich(
            &self,
            item: &mut EngineItem,
            _ctx: &EnrichContext<'_>,
        ) -> Result<(), EnrichError> {
            item.title = Some("half-done".to_string());
            Err(EnrichError::failed("failing", "no luck"))
        }
    }

    struct Panicking;

    impl Enricher for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }

        fn enrich(
            &self,
            item: &mut EngineItem,
            _ctx: &EnrichContext<'_>,
        ) -> Result<(), EnrichError> {
            item.push_name(NameVariable::Author, EngineName::literal("garbage"));
            panic!("boom");
        }
    }

    #[test]
    fn test_failures_restore_item() {
        let record = record("", vec![]);
        let metadata = MetadataRecord::new();
        let quirks = EngineQuirks::default();
        let ctx = EnrichContext {
            metadata: &metadata,
            record: &record,
            quirks: &quirks,
            field_preset: FieldPreset::default(),
        };
        let original = convert_record(&record, &ConversionArgs::default());

        let mut item = original.clone();
        let err = run_isolated(&Failing, &mut item, &ctx).unwrap();
        assert!(matches!(err, EnrichError::Failed { .. }));
        assert_eq!(item, original);

        let err = run_isolated(&Panicking, &mut item, &ctx).unwrap();
        assert_eq!(err.to_string(), "enricher 'panicking' panicked: boom");
        assert_eq!(item, original);
    }
}
