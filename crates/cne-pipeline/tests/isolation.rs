//! A failing enricher must not stop the others or the host's conversion.

use std::cell::RefCell;
use std::rc::Rc;

use cne_pipeline::{
    ConversionArgs, CreatorEnricher, Creator, EnrichContext, EnrichError, Enricher,
    EnrichmentPipeline, EngineItem, FieldEnricher, Hooks, Host, HostRecord, NameVariable, Record, Settings,
};

struct Exploding;

impl Enricher for Exploding {
    fn name(&self) -> &str {
        "exploding"
    }

    fn enrich(&self, item: &mut EngineItem, _ctx: &EnrichContext<'_>) -> Result<(), EnrichError> {
        item.title = None;
        panic!("unexpected item shape");
    }
}

struct Refusing;

impl Enricher for Refusing {
    fn name(&self) -> &str {
        "refusing"
    }

    fn enrich(&self, _item: &mut EngineItem, _ctx: &EnrichContext<'_>) -> Result<(), EnrichError> {
        Err(EnrichError::failed("refusing", "not today"))
    }
}

/// Records the order enrichers ran in.
struct Tracing {
    label: &'static str,
    log: Rc<RefCell<Vec<&'static str>>>,
}

impl Enricher for Tracing {
    fn name(&self) -> &str {
        self.label
    }

    fn enrich(&self, _item: &mut EngineItem, _ctx: &EnrichContext<'_>) -> Result<(), EnrichError> {
        self.log.borrow_mut().push(self.label);
        Ok(())
    }
}

fn record() -> Record {
    let mut record = Record::new("book");
    record.set_field("title", "Hongloumeng");
    record.set_field(
        "extra",
        "cne-title-original: 紅樓夢\n\
         cne-creator-0-last-romanized: Cao\n\
         cne-creator-0-first-romanized: Xueqin",
    );
    record.creators = vec![Creator::person("author", "曹", "雪芹")];
    record
}

#[test]
fn test_failures_are_isolated() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let pipeline = EnrichmentPipeline::empty(Settings::default());
    pipeline.register(Rc::new(Tracing {
        label: "first",
        log: Rc::clone(&log),
    }));
    pipeline.register(Rc::new(Exploding));
    pipeline.register(Rc::new(CreatorEnricher));
    pipeline.register(Rc::new(Refusing));
    pipeline.register(Rc::new(FieldEnricher));
    pipeline.register(Rc::new(Tracing {
        label: "last",
        log: Rc::clone(&log),
    }));

    let mut host = Host::reference(Settings::default().engine);
    let mut hooks = Hooks::new(Rc::new(pipeline));
    hooks.install(&mut host);

    let item = host
        .convert_record(&record(), &ConversionArgs::default())
        .unwrap();

    assert_eq!(*log.borrow(), vec!["first", "last"]);
    // The panicking enricher's partial change was rolled back.
    assert_eq!(item.title.as_deref(), Some("Hongloumeng"));
    assert!(
        item.get_names(NameVariable::Author).unwrap()[0]
            .multi
            .is_some()
    );
    assert_eq!(item.get_variable("cne-title-original").as_deref(), Some("紅樓夢"));
}

#[test]
fn test_failures_are_reported_to_direct_callers() {
    let pipeline = EnrichmentPipeline::empty(Settings::default());
    pipeline.register(Rc::new(Refusing));
    pipeline.register(Rc::new(Exploding));

    let record = record();
    let mut item = cne_pipeline::convert_record(&record, &ConversionArgs::default());
    let failures = pipeline.enrich(&record, &mut item);

    assert_eq!(failures.len(), 2);
    assert!(matches!(failures[0], EnrichError::Failed { .. }));
    assert!(matches!(failures[1], EnrichError::Panicked { .. }));
}
