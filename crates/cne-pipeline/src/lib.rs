//! Parallel-language enrichment of citation engine input.
//!
//! The pipeline hooks into two host extension points:
//!
//! - record conversion: the record's encoded metadata is decoded and every
//!   converted name gets language-tag overrides and per-slot variants, while
//!   field variants are injected as `cne-*` properties;
//! - engine construction: the style's name configuration is resolved once per
//!   engine instance and applied to it.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use cne_pipeline::{
//!     ConversionArgs, Creator, EnrichmentPipeline, Hooks, Host, HostRecord, NameVariable, Record, Settings,
//! };
//!
//! let settings = Settings::default();
//! let mut host = Host::reference(settings.engine.clone());
//! let mut hooks = Hooks::new(Rc::new(EnrichmentPipeline::new(settings)));
//! hooks.install(&mut host);
//!
//! let mut record = Record::new("book");
//! record.creators = vec![Creator::person("author", "杜", "伟生")];
//! record.set_field(
//!     "extra",
//!     "cne-creator-0-last-romanized: Du\ncne-creator-0-first-romanized: Weisheng",
//! );
//!
//! let item = host.convert_record(&record, &ConversionArgs::default()).unwrap();
//! let author = &item.get_names(NameVariable::Author).unwrap()[0];
//! assert!(author.multi.is_some());
//! ```

pub mod configurator;
pub mod engine_item;
pub mod engine_model;
pub mod enrich;
pub mod error;
pub mod hooks;
pub mod host;
pub mod patch;
pub mod pipeline;
pub mod preset;
pub mod settings;

pub use configurator::{CitationEngine, EngineConfigurator, EnrichmentState, NamePreferences};
pub use engine_item::{EngineItem, EngineName, NameMulti, NameVariable};
pub use engine_model::{FormattingBucket, ModelEngine, NameStyle};
pub use enrich::{
    CreatorEnricher, EnrichContext, Enricher, FieldEnricher, LanguageEnricher, NoteEnricher,
};
pub use error::{EnrichError, PatchError};
pub use hooks::{HookState, Hooks};
pub use host::{
    ConversionArgs, Creator, EngineArgs, Host, HostRecord, Record, StyleSource, convert_record,
};
pub use patch::ExtensionPoint;
pub use pipeline::EnrichmentPipeline;
pub use preset::FieldPreset;
pub use settings::{Settings, SettingsError};
