//! Citation engine input in CSL-JSON form.
//!
//! This is the structure the host's conversion function produces and the
//! enrichers annotate. Name-bearing variables are explicit fields so the
//! pipeline never has to guess which properties hold names.

use cne_names::NameVariant;
use cne_style::Slot;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One bibliographic item as the citation engine reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineItem {
    /// CSL-JSON allows both string and integer IDs, so we accept both.
    #[serde(deserialize_with = "deserialize_string_or_int", default)]
    pub id: String,

    #[serde(rename = "type", default)]
    pub item_type: String,

    // Text variables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "container-title", skip_serializing_if = "Option::is_none")]
    pub container_title: Option<String>,
    #[serde(rename = "collection-title", skip_serializing_if = "Option::is_none")]
    pub collection_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    // Name variables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Vec<EngineName>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<Vec<EngineName>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translator: Option<Vec<EngineName>>,
    #[serde(rename = "container-author", skip_serializing_if = "Option::is_none")]
    pub container_author: Option<Vec<EngineName>>,
    #[serde(rename = "collection-editor", skip_serializing_if = "Option::is_none")]
    pub collection_editor: Option<Vec<EngineName>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<Vec<EngineName>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interviewer: Option<Vec<EngineName>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Vec<EngineName>>,
    #[serde(rename = "reviewed-author", skip_serializing_if = "Option::is_none")]
    pub reviewed_author: Option<Vec<EngineName>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composer: Option<Vec<EngineName>>,

    /// Dates, numbers and injected variant properties.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

/// Deserialize a value that can be either a string or an integer into a String.
fn deserialize_string_or_int<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: serde_json::Value = Deserialize::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        _ => Err(Error::custom("expected string or number for id")),
    }
}

/// A name in CSL-JSON format, with optional parallel renderings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineName {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub given: Option<String>,

    /// Suffix (e.g., "Jr.", "III").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    /// Institutional or single-field names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi: Option<NameMulti>,
}

impl EngineName {
    pub fn new(family: &str, given: &str) -> Self {
        Self {
            family: Some(family.to_string()).filter(|s| !s.is_empty()),
            given: Some(given.to_string()).filter(|s| !s.is_empty()),
            ..Default::default()
        }
    }

    pub fn literal(name: &str) -> Self {
        Self {
            literal: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn is_literal(&self) -> bool {
        self.literal.is_some()
    }
}

/// Parallel renderings of one name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameMulti {
    /// Language tag for the main name, overriding the item's language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,

    /// Alternate renderings keyed by the slot that selects them.
    #[serde(rename = "_key", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variants: BTreeMap<Slot, NameVariant>,
}

/// The name-bearing variables of an [`EngineItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NameVariable {
    Author,
    Editor,
    Translator,
    ContainerAuthor,
    CollectionEditor,
    Director,
    Interviewer,
    Recipient,
    ReviewedAuthor,
    Composer,
}

impl NameVariable {
    pub const ALL: [NameVariable; 10] = [
        NameVariable::Author,
        NameVariable::Editor,
        NameVariable::Translator,
        NameVariable::ContainerAuthor,
        NameVariable::CollectionEditor,
        NameVariable::Director,
        NameVariable::Interviewer,
        NameVariable::Recipient,
        NameVariable::ReviewedAuthor,
        NameVariable::Composer,
    ];

    /// The CSL variable name.
    pub fn as_str(self) -> &'static str {
        match self {
            NameVariable::Author => "author",
            NameVariable::Editor => "editor",
            NameVariable::Translator => "translator",
            NameVariable::ContainerAuthor => "container-author",
            NameVariable::CollectionEditor => "collection-editor",
            NameVariable::Director => "director",
            NameVariable::Interviewer => "interviewer",
            NameVariable::Recipient => "recipient",
            NameVariable::ReviewedAuthor => "reviewed-author",
            NameVariable::Composer => "composer",
        }
    }

    pub fn from_name(name: &str) -> Option<NameVariable> {
        NameVariable::ALL.into_iter().find(|v| v.as_str() == name)
    }
}

impl fmt::Display for NameVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EngineItem {
    /// Get a name variable.
    pub fn get_names(&self, variable: NameVariable) -> Option<&Vec<EngineName>> {
        match variable {
            NameVariable::Author => self.author.as_ref(),
            NameVariable::Editor => self.editor.as_ref(),
            NameVariable::Translator => self.translator.as_ref(),
            NameVariable::ContainerAuthor => self.container_author.as_ref(),
            NameVariable::CollectionEditor => self.collection_editor.as_ref(),
            NameVariable::Director => self.director.as_ref(),
            NameVariable::Interviewer => self.interviewer.as_ref(),
            NameVariable::Recipient => self.recipient.as_ref(),
            NameVariable::ReviewedAuthor => self.reviewed_author.as_ref(),
            NameVariable::Composer => self.composer.as_ref(),
        }
    }

    /// Get a name variable for in-place annotation.
    pub fn names_mut(&mut self, variable: NameVariable) -> Option<&mut Vec<EngineName>> {
        self.names_slot(variable).as_mut()
    }

    /// Append a name, creating the variable if needed.
    pub fn push_name(&mut self, variable: NameVariable, name: EngineName) {
        self.names_slot(variable).get_or_insert_with(Vec::new).push(name);
    }

    fn names_slot(&mut self, variable: NameVariable) -> &mut Option<Vec<EngineName>> {
        match variable {
            NameVariable::Author => &mut self.author,
            NameVariable::Editor => &mut self.editor,
            NameVariable::Translator => &mut self.translator,
            NameVariable::ContainerAuthor => &mut self.container_author,
            NameVariable::CollectionEditor => &mut self.collection_editor,
            NameVariable::Director => &mut self.director,
            NameVariable::Interviewer => &mut self.interviewer,
            NameVariable::Recipient => &mut self.recipient,
            NameVariable::ReviewedAuthor => &mut self.reviewed_author,
            NameVariable::Composer => &mut self.composer,
        }
    }

    /// Get a text variable by name, including injected properties.
    pub fn get_variable(&self, name: &str) -> Option<String> {
        match name {
            "title" => self.title.clone(),
            "container-title" => self.container_title.clone(),
            "collection-title" => self.collection_title.clone(),
            "publisher" => self.publisher.clone(),
            "language" => self.language.clone(),
            "note" => self.note.clone(),
            _ => self
                .other
                .get(name)
                .and_then(|v| v.as_str().map(|s| s.to_string())),
        }
    }
}
