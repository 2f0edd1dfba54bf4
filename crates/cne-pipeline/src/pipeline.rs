//! The enrichment pipeline: decode a record's metadata and run the
//! registered enrichers over its converted engine input.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};

use crate::enrich::{
    CreatorEnricher, EnrichContext, Enricher, FieldEnricher, LanguageEnricher, NoteEnricher,
    run_isolated,
};
use crate::engine_item::EngineItem;
use crate::error::EnrichError;
use crate::host::{ConversionArgs, ConvertFn, HostRecord};
use crate::settings::Settings;

pub struct EnrichmentPipeline {
    settings: Settings,
    // Mutated only by register/unregister, never while enrichers run.
    enrichers: RefCell<Vec<Rc<dyn Enricher>>>,
}

impl EnrichmentPipeline {
    /// A pipeline with the built-in enrichers, in order: creator variants,
    /// field variants, note stripping, record language.
    pub fn new(settings: Settings) -> Self {
        let pipeline = Self::empty(settings);
        pipeline.register(Rc::new(CreatorEnricher));
        pipeline.register(Rc::new(FieldEnricher));
        pipeline.register(Rc::new(NoteEnricher));
        pipeline.register(Rc::new(LanguageEnricher));
        pipeline
    }

    /// A pipeline with no enrichers.
    pub fn empty(settings: Settings) -> Self {
        Self {
            settings,
            enrichers: RefCell::new(Vec::new()),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Append an enricher. Enrichers run in registration order.
    pub fn register(&self, enricher: Rc<dyn Enricher>) {
        debug!(enricher = enricher.name(), "registering enricher");
        self.enrichers.borrow_mut().push(enricher);
    }

    /// Remove every enricher called `name`. Returns false when there was none.
    pub fn unregister(&self, name: &str) -> bool {
        let mut enrichers = self.enrichers.borrow_mut();
        let before = enrichers.len();
        enrichers.retain(|e| e.name() != name);
        before != enrichers.len()
    }

    pub fn enricher_names(&self) -> Vec<String> {
        self.enrichers
            .borrow()
            .iter()
            .map(|e| e.name().to_string())
            .collect()
    }

    /// Annotate `item`, converted from `record`, in place. The record is not
    /// modified. Returns the failures of individual enrichers, which have
    /// already been logged.
    ///
    /// Enrichers that need metadata are skipped when the free-text field has
    /// no metadata lines; the others see an empty record.
    pub fn enrich(&self, record: &dyn HostRecord, item: &mut EngineItem) -> Vec<EnrichError> {
        let extra = record.field(&self.settings.extra_field).unwrap_or_default();
        let has_metadata = cne_codec::has_metadata(extra);
        if !has_metadata {
            debug!(id = %item.id, "no parallel-language metadata");
        }

        let metadata = cne_codec::parse(extra);
        let ctx = EnrichContext {
            metadata: &metadata,
            record,
            quirks: &self.settings.engine,
            field_preset: self.settings.field_preset,
        };

        let enrichers: Vec<Rc<dyn Enricher>> = self
            .enrichers
            .borrow()
            .iter()
            .filter(|enricher| has_metadata || !enricher.needs_metadata())
            .cloned()
            .collect();
        let failures: Vec<EnrichError> = enrichers
            .iter()
            .filter_map(|enricher| run_isolated(enricher.as_ref(), item, &ctx))
            .collect();

        if !failures.is_empty() {
            info!(
                id = %item.id,
                failed = failures.len(),
                total = enrichers.len(),
                "item enriched with failures"
            );
        }
        failures
    }

    /// Call the host's conversion function, then enrich its output.
    pub fn convert(
        &self,
        original: &ConvertFn,
        record: &dyn HostRecord,
        args: &ConversionArgs,
    ) -> EngineItem {
        let mut item = original(record, args);
        self.enrich(record, &mut item);
        item
    }
}

impl Default for EnrichmentPipeline {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_item::{NameMulti, NameVariable};
    use crate::host::{Creator, Record, convert_record};
    use std::cell::Cell;

    struct Counting {
        name: &'static str,
        calls: Rc<Cell<usize>>,
    }

    impl Enricher for Counting {
        fn name(&self) -> &str {
            self.name
        }

        fn enrich(
            &self,
            _item: &mut EngineItem,
            _ctx: &EnrichContext<'_>,
        ) -> Result<(), EnrichError> {
            self.calls.set(self.calls.get() + 1);
            Ok(())
        }
    }

    fn record_with_metadata() -> Record {
        let mut record = Record::new("book");
        record.set_field("title", "Hongloumeng");
        record.set_field(
            "extra",
            "cne-title-original: 紅樓夢\ncne-creator-0-last-romanized: Cao",
        );
        record.creators = vec![Creator::person("author", "曹", "雪芹")];
        record
    }

    #[test]
    fn test_builtin_order() {
        let pipeline = EnrichmentPipeline::default();
        assert_eq!(
            pipeline.enricher_names(),
            vec!["creator-variants", "field-variants", "note-strip", "record-language"]
        );
    }

    #[test]
    fn test_enrich_leaves_record_untouched() {
        let record = record_with_metadata();
        let before = record.clone();
        let pipeline = EnrichmentPipeline::default();

        let item = pipeline.convert(&convert_record, &record, &ConversionArgs::default());

        assert_eq!(record, before);
        assert_eq!(item.get_variable("cne-title-original").as_deref(), Some("紅樓夢"));
        assert_eq!(item.note, None);
        let author = &item.get_names(NameVariable::Author).unwrap()[0];
        assert!(author.multi.is_some());
    }

    #[test]
    fn test_no_metadata_tags_names_native() {
        let mut record = Record::new("book");
        record.set_field("extra", "Original date: 1791");
        record.set_field("language", "zh");
        record.creators = vec![Creator::person("author", "Smith", "John")];

        let pipeline = EnrichmentPipeline::default();
        let plain = pipeline.convert(&convert_record, &record, &ConversionArgs::default());

        let mut expected = convert_record(&record, &ConversionArgs::default());
        expected.author.as_mut().unwrap()[0].multi = Some(NameMulti {
            main: Some("en".to_string()),
            variants: Default::default(),
        });
        assert_eq!(plain, expected);

        // An unrelated field variant does not change how creators are tagged.
        record.set_field("extra", "Original date: 1791\ncne-title-romanized: Hongloumeng");
        let annotated = pipeline.convert(&convert_record, &record, &ConversionArgs::default());
        assert_eq!(
            annotated.get_names(NameVariable::Author).unwrap()[0].multi,
            plain.get_names(NameVariable::Author).unwrap()[0].multi
        );
    }

    #[test]
    fn test_metadata_enrichers_skip_records_without_metadata() {
        let calls = Rc::new(Cell::new(0));
        let pipeline = EnrichmentPipeline::empty(Settings::default());
        pipeline.register(Rc::new(Counting {
            name: "counting",
            calls: Rc::clone(&calls),
        }));

        let mut record = Record::new("book");
        record.set_field("extra", "Original date: 1791");
        let mut item = convert_record(&record, &ConversionArgs::default());
        assert!(pipeline.enrich(&record, &mut item).is_empty());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_custom_extra_field() {
        let mut record = Record::new("book");
        record.set_field("annotation", "cne-title-romanized: Hongloumeng");

        let settings = Settings {
            extra_field: "annotation".to_string(),
            ..Settings::default()
        };
        let pipeline = EnrichmentPipeline::new(settings);
        let item = pipeline.convert(&convert_record, &record, &ConversionArgs::default());
        assert_eq!(
            item.get_variable("cne-title-romanized").as_deref(),
            Some("Hongloumeng")
        );
    }

    #[test]
    fn test_register_and_unregister() {
        let calls = Rc::new(Cell::new(0));
        let pipeline = EnrichmentPipeline::empty(Settings::default());
        pipeline.register(Rc::new(Counting {
            name: "counting",
            calls: Rc::clone(&calls),
        }));

        let record = record_with_metadata();
        let mut item = convert_record(&record, &ConversionArgs::default());
        assert!(pipeline.enrich(&record, &mut item).is_empty());
        assert_eq!(calls.get(), 1);

        assert!(pipeline.unregister("counting"));
        assert!(!pipeline.unregister("counting"));
        pipeline.enrich(&record, &mut item);
        assert_eq!(calls.get(), 1);
    }
}
