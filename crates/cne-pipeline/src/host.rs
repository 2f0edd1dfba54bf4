//! The host application as seen by the pipeline.
//!
//! A host owns bibliographic records, converts them into engine input and
//! constructs citation engines per style. The two functions are exposed as
//! [`ExtensionPoint`]s so the pipeline can wrap them. [`Host::reference`]
//! builds a host with a Zotero-like record conversion and the reference
//! engine model, which the CLI and the tests use.

use cne_names::EngineQuirks;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::configurator::CitationEngine;
use crate::engine_item::{EngineItem, EngineName, NameVariable};
use crate::engine_model::ModelEngine;
use crate::patch::ExtensionPoint;

/// Read/write access to one host record.
pub trait HostRecord {
    fn item_type(&self) -> &str;

    fn field(&self, name: &str) -> Option<&str>;

    fn set_field(&mut self, name: &str, value: &str);

    /// All creators, in the order the stored metadata indexes them.
    fn creators(&self) -> &[Creator];

    /// The name variable a creator type converts to. `None` when the
    /// conversion drops creators of that type.
    fn creator_variable(&self, creator_type: &str) -> Option<NameVariable> {
        creator_variable(creator_type)
    }
}

/// One creator of a host record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub creator_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Single-field name (institutions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Creator {
    pub fn person(creator_type: &str, last_name: &str, first_name: &str) -> Self {
        Self {
            creator_type: creator_type.to_string(),
            last_name: Some(last_name.to_string()),
            first_name: Some(first_name.to_string()),
            name: None,
        }
    }
}

/// A Zotero-like record: item type, creators and string fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub item_type: String,
    #[serde(default)]
    pub creators: Vec<Creator>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new(item_type: &str) -> Self {
        Self {
            item_type: item_type.to_string(),
            ..Default::default()
        }
    }
}

impl HostRecord for Record {
    fn item_type(&self) -> &str {
        &self.item_type
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn set_field(&mut self, name: &str, value: &str) {
        if value.is_empty() {
            self.fields.remove(name);
        } else {
            self.fields.insert(name.to_string(), value.to_string());
        }
    }

    fn creators(&self) -> &[Creator] {
        &self.creators
    }
}

/// Default mapping of host creator types to name variables.
pub fn creator_variable(creator_type: &str) -> Option<NameVariable> {
    match creator_type {
        "author" | "artist" | "cartographer" | "inventor" | "presenter" | "programmer" => {
            Some(NameVariable::Author)
        }
        "editor" => Some(NameVariable::Editor),
        "translator" => Some(NameVariable::Translator),
        "seriesEditor" => Some(NameVariable::CollectionEditor),
        "bookAuthor" => Some(NameVariable::ContainerAuthor),
        "director" => Some(NameVariable::Director),
        "interviewer" => Some(NameVariable::Interviewer),
        "recipient" => Some(NameVariable::Recipient),
        "reviewedAuthor" => Some(NameVariable::ReviewedAuthor),
        "composer" => Some(NameVariable::Composer),
        _ => None,
    }
}

/// Where each host creator lands in the converted item: its variable and
/// position within that variable. Index-aligned with [`HostRecord::creators`].
pub fn align_creators(record: &dyn HostRecord) -> Vec<Option<(NameVariable, usize)>> {
    let mut counts: BTreeMap<NameVariable, usize> = BTreeMap::new();
    record
        .creators()
        .iter()
        .map(|creator| {
            let variable = record.creator_variable(&creator.creator_type)?;
            let position = counts.entry(variable).or_insert(0);
            let slot = (variable, *position);
            *position += 1;
            Some(slot)
        })
        .collect()
}

/// Extra arguments passed through to the conversion function untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionArgs {
    pub options: BTreeMap<String, serde_json::Value>,
}

/// Extra arguments passed through to the engine factory untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineArgs {
    pub locale: Option<String>,
    pub options: BTreeMap<String, serde_json::Value>,
}

/// A style the host builds an engine for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSource {
    pub id: String,
    pub xml: String,
}

pub type ConvertFn = dyn Fn(&dyn HostRecord, &ConversionArgs) -> EngineItem;
pub type EngineFactoryFn = dyn Fn(&StyleSource, &EngineArgs) -> Box<dyn CitationEngine>;

/// The host's two extension points.
#[derive(Debug)]
pub struct Host {
    pub convert: ExtensionPoint<ConvertFn>,
    pub engine_factory: ExtensionPoint<EngineFactoryFn>,
}

impl Host {
    pub fn new(convert: Rc<ConvertFn>, engine_factory: Rc<EngineFactoryFn>) -> Self {
        Self {
            convert: ExtensionPoint::new("convert", convert),
            engine_factory: ExtensionPoint::new("engine-factory", engine_factory),
        }
    }

    /// A host with [`convert_record`] and the reference engine model.
    pub fn reference(quirks: EngineQuirks) -> Self {
        Self::new(
            Rc::new(convert_record),
            Rc::new(move |style: &StyleSource, _args: &EngineArgs| {
                Box::new(ModelEngine::new(&style.xml, quirks.clone())) as Box<dyn CitationEngine>
            }),
        )
    }

    /// Convert a record with whatever function is currently installed.
    pub fn convert_record(
        &self,
        record: &dyn HostRecord,
        args: &ConversionArgs,
    ) -> Option<EngineItem> {
        self.convert.get().map(|convert| convert(record, args))
    }

    /// Build an engine with whatever factory is currently installed.
    pub fn create_engine(
        &self,
        style: &StyleSource,
        args: &EngineArgs,
    ) -> Option<Box<dyn CitationEngine>> {
        self.engine_factory.get().map(|factory| factory(style, args))
    }
}

/// Zotero-like conversion of a record into engine input.
pub fn convert_record(record: &dyn HostRecord, _args: &ConversionArgs) -> EngineItem {
    let text = |name: &str| record.field(name).map(str::to_string);

    let mut item = EngineItem {
        id: record.field("key").unwrap_or_default().to_string(),
        item_type: csl_type(record.item_type()).to_string(),
        title: text("title"),
        container_title: text("publicationTitle").or_else(|| text("bookTitle")),
        collection_title: text("series"),
        publisher: text("publisher"),
        language: text("language"),
        note: text("extra"),
        ..Default::default()
    };

    if let Some(date) = record.field("date") {
        item.other
            .insert("issued".to_string(), serde_json::json!({ "raw": date }));
    }

    for creator in record.creators() {
        let Some(variable) = record.creator_variable(&creator.creator_type) else {
            continue;
        };
        let name = match &creator.name {
            Some(single) => EngineName::literal(single),
            None => EngineName::new(
                creator.last_name.as_deref().unwrap_or_default(),
                creator.first_name.as_deref().unwrap_or_default(),
            ),
        };
        item.push_name(variable, name);
    }

    item
}

fn csl_type(item_type: &str) -> &'static str {
    match item_type {
        "book" => "book",
        "bookSection" => "chapter",
        "journalArticle" => "article-journal",
        "magazineArticle" => "article-magazine",
        "newspaperArticle" => "article-newspaper",
        "thesis" => "thesis",
        "film" => "motion_picture",
        "interview" => "interview",
        "letter" => "personal_communication",
        "conferencePaper" => "paper-conference",
        "report" => "report",
        "webpage" => "webpage",
        _ => "document",
    }
}
