//! Decoded form of the parallel-language metadata of one bibliographic item.
//!
//! A [`MetadataRecord`] is a derived view: it is rebuilt from the host's
//! free-text field on every read and never cached. The setters keep the
//! "absent, not empty" invariant: assigning an empty or whitespace-only value
//! removes the variant, and a field whose last variant is removed disappears
//! from the map.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::codec::MAX_CREATOR_INDEX;

/// A field that can carry parallel-language variants.
///
/// The declaration order is the canonical serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldName {
    Title,
    ContainerTitle,
    Publisher,
    Journal,
    Series,
}

impl FieldName {
    /// All field names in canonical order.
    pub const ALL: [FieldName; 5] = [
        FieldName::Title,
        FieldName::ContainerTitle,
        FieldName::Publisher,
        FieldName::Journal,
        FieldName::Series,
    ];

    /// The wire spelling of this field.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::Title => "title",
            FieldName::ContainerTitle => "container-title",
            FieldName::Publisher => "publisher",
            FieldName::Journal => "journal",
            FieldName::Series => "series",
        }
    }

    /// Look up a field by its wire spelling, ignoring ASCII case.
    pub fn from_key(key: &str) -> Option<FieldName> {
        FieldName::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One alternate rendering of a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariantKind {
    /// Original script.
    Original,
    /// Romanized (transliterated) form.
    Romanized,
    /// Shortened romanized form.
    RomanizedShort,
    /// English translation.
    English,
}

impl VariantKind {
    /// All variant kinds in canonical order.
    pub const ALL: [VariantKind; 4] = [
        VariantKind::Original,
        VariantKind::Romanized,
        VariantKind::RomanizedShort,
        VariantKind::English,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VariantKind::Original => "original",
            VariantKind::Romanized => "romanized",
            VariantKind::RomanizedShort => "romanized-short",
            VariantKind::English => "english",
        }
    }

    pub fn from_key(key: &str) -> Option<VariantKind> {
        VariantKind::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The variants recorded for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FieldVariants {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub romanized: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub romanized_short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
}

impl FieldVariants {
    pub fn get(&self, kind: VariantKind) -> Option<&str> {
        self.slot(kind).as_deref()
    }

    /// Set a variant. Empty values clear it.
    pub fn set(&mut self, kind: VariantKind, value: &str) {
        *self.slot_mut(kind) = non_empty(value);
    }

    /// True when no variant is set.
    pub fn is_empty(&self) -> bool {
        VariantKind::ALL.iter().all(|k| self.slot(*k).is_none())
    }

    fn slot(&self, kind: VariantKind) -> &Option<String> {
        match kind {
            VariantKind::Original => &self.original,
            VariantKind::Romanized => &self.romanized,
            VariantKind::RomanizedShort => &self.romanized_short,
            VariantKind::English => &self.english,
        }
    }

    fn slot_mut(&mut self, kind: VariantKind) -> &mut Option<String> {
        match kind {
            VariantKind::Original => &mut self.original,
            VariantKind::Romanized => &mut self.romanized,
            VariantKind::RomanizedShort => &mut self.romanized_short,
            VariantKind::English => &mut self.english,
        }
    }
}

/// Which half of a personal name a creator line addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamePart {
    Last,
    First,
}

impl NamePart {
    pub fn as_str(self) -> &'static str {
        match self {
            NamePart::Last => "last",
            NamePart::First => "first",
        }
    }
}

/// Script of a creator name part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameScript {
    Romanized,
    Original,
}

impl NameScript {
    pub fn as_str(self) -> &'static str {
        match self {
            NameScript::Romanized => "romanized",
            NameScript::Original => "original",
        }
    }
}

/// Boolean per-creator rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreatorOption {
    /// Separate original-script family and given names with a space.
    OriginalSpacing,
    /// Force a comma after the romanized family name.
    ForceComma,
}

impl CreatorOption {
    pub fn as_str(self) -> &'static str {
        match self {
            CreatorOption::OriginalSpacing => "original-spacing",
            CreatorOption::ForceComma => "force-comma",
        }
    }
}

/// Override data for one creator of the host record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CreatorVariant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_romanized: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_romanized: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_original: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_original: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_spacing: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_comma: Option<bool>,
}

impl CreatorVariant {
    /// Name parts in canonical order.
    pub const NAME_PARTS: [(NamePart, NameScript); 4] = [
        (NamePart::Last, NameScript::Romanized),
        (NamePart::First, NameScript::Romanized),
        (NamePart::Last, NameScript::Original),
        (NamePart::First, NameScript::Original),
    ];

    /// Options in canonical order.
    pub const OPTIONS: [CreatorOption; 2] =
        [CreatorOption::OriginalSpacing, CreatorOption::ForceComma];

    pub fn name_part(&self, part: NamePart, script: NameScript) -> Option<&str> {
        match (part, script) {
            (NamePart::Last, NameScript::Romanized) => self.last_romanized.as_deref(),
            (NamePart::First, NameScript::Romanized) => self.first_romanized.as_deref(),
            (NamePart::Last, NameScript::Original) => self.last_original.as_deref(),
            (NamePart::First, NameScript::Original) => self.first_original.as_deref(),
        }
    }

    /// Set a name part. Empty values clear it.
    pub fn set_name_part(&mut self, part: NamePart, script: NameScript, value: &str) {
        let value = non_empty(value);
        match (part, script) {
            (NamePart::Last, NameScript::Romanized) => self.last_romanized = value,
            (NamePart::First, NameScript::Romanized) => self.first_romanized = value,
            (NamePart::Last, NameScript::Original) => self.last_original = value,
            (NamePart::First, NameScript::Original) => self.first_original = value,
        }
    }

    pub fn option(&self, option: CreatorOption) -> Option<bool> {
        match option {
            CreatorOption::OriginalSpacing => self.original_spacing,
            CreatorOption::ForceComma => self.force_comma,
        }
    }

    pub fn set_option(&mut self, option: CreatorOption, value: bool) {
        match option {
            CreatorOption::OriginalSpacing => self.original_spacing = Some(value),
            CreatorOption::ForceComma => self.force_comma = Some(value),
        }
    }

    /// True when any romanized name part is present.
    pub fn has_romanized(&self) -> bool {
        self.last_romanized.is_some() || self.first_romanized.is_some()
    }

    /// True when any original-script name part is present.
    pub fn has_original(&self) -> bool {
        self.last_original.is_some() || self.first_original.is_some()
    }

    /// True when nothing at all is recorded for this creator.
    pub fn is_empty(&self) -> bool {
        !self.has_romanized()
            && !self.has_original()
            && self.original_spacing.is_none()
            && self.force_comma.is_none()
    }
}

/// Parallel-language metadata of one bibliographic item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MetadataRecord {
    #[serde(default)]
    pub fields: BTreeMap<FieldName, FieldVariants>,
    /// Index-aligned with the host's creator list. `None` is a gap.
    #[serde(default)]
    pub creators: Vec<Option<CreatorVariant>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
}

impl MetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
            && self.original_language.is_none()
            && self.creators.iter().all(|c| c.is_none())
    }

    pub fn field(&self, name: FieldName) -> Option<&FieldVariants> {
        self.fields.get(&name)
    }

    /// Set one variant of a field, creating or removing the field entry as needed.
    pub fn set_field_variant(&mut self, name: FieldName, kind: VariantKind, value: &str) {
        let entry = self.fields.entry(name).or_default();
        entry.set(kind, value);
        if entry.is_empty() {
            self.fields.remove(&name);
        }
    }

    pub fn set_original_language(&mut self, value: &str) {
        self.original_language = non_empty(value);
    }

    /// The override data for the creator at `index`, if any.
    pub fn creator(&self, index: usize) -> Option<&CreatorVariant> {
        self.creators.get(index).and_then(Option::as_ref)
    }

    /// Replace the creator at `index`, growing the list with gaps when needed.
    ///
    /// An empty variant is stored as a gap. Returns false, leaving the record
    /// unchanged, when `index` is above [`MAX_CREATOR_INDEX`].
    pub fn set_creator(&mut self, index: usize, creator: Option<CreatorVariant>) -> bool {
        if index > MAX_CREATOR_INDEX {
            return false;
        }
        if self.creators.len() <= index {
            self.creators.resize(index + 1, None);
        }
        self.creators[index] = creator.filter(|c| !c.is_empty());
        true
    }

    /// Mutable access to the creator at `index`, inserting an empty entry.
    /// `None` when `index` is above [`MAX_CREATOR_INDEX`].
    ///
    /// Callers that may leave the entry empty should finish with
    /// [`MetadataRecord::collapse_empty_creators`].
    pub fn creator_entry(&mut self, index: usize) -> Option<&mut CreatorVariant> {
        if index > MAX_CREATOR_INDEX {
            return None;
        }
        if self.creators.len() <= index {
            self.creators.resize(index + 1, None);
        }
        Some(self.creators[index].get_or_insert_with(CreatorVariant::default))
    }

    /// Turn creators with no data into gaps. The list length is kept.
    pub fn collapse_empty_creators(&mut self) {
        for slot in &mut self.creators {
            if slot.as_ref().is_some_and(CreatorVariant::is_empty) {
                *slot = None;
            }
        }
    }

    /// Bring the record into its canonical shape: no empty fields, empty
    /// creators become gaps, trailing gaps and creators above
    /// [`MAX_CREATOR_INDEX`] are dropped, blank strings are absent.
    pub fn normalize(&mut self) {
        self.original_language = self.original_language.as_deref().and_then(non_empty);
        for variants in self.fields.values_mut() {
            for kind in VariantKind::ALL {
                let value = variants.get(kind).map(str::to_string);
                variants.set(kind, value.as_deref().unwrap_or(""));
            }
        }
        self.fields.retain(|_, v| !v.is_empty());
        for creator in self.creators.iter_mut().flatten() {
            for (part, script) in CreatorVariant::NAME_PARTS {
                let value = creator.name_part(part, script).map(str::to_string);
                creator.set_name_part(part, script, value.as_deref().unwrap_or(""));
            }
        }
        self.creators.truncate(MAX_CREATOR_INDEX + 1);
        self.collapse_empty_creators();
        while matches!(self.creators.last(), Some(None)) {
            self.creators.pop();
        }
    }
}

/// Trim a value; blank values become `None`.
fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_variant_removes_field() {
        let mut record = MetadataRecord::new();
        record.set_field_variant(FieldName::Title, VariantKind::Original, "論語");
        assert!(record.field(FieldName::Title).is_some());

        record.set_field_variant(FieldName::Title, VariantKind::Original, "   ");
        assert!(record.field(FieldName::Title).is_none());
        assert!(record.is_empty());
    }

    #[test]
    fn test_set_creator_grows_with_gaps() {
        let mut record = MetadataRecord::new();
        let creator = CreatorVariant {
            last_romanized: Some("Du".to_string()),
            ..Default::default()
        };
        record.set_creator(2, Some(creator));

        assert_eq!(record.creators.len(), 3);
        assert!(record.creators[0].is_none());
        assert!(record.creators[1].is_none());
        assert_eq!(record.creator(2).unwrap().last_romanized.as_deref(), Some("Du"));
    }

    #[test]
    fn test_set_creator_stores_empty_as_gap() {
        let mut record = MetadataRecord::new();
        record.set_creator(0, Some(CreatorVariant::default()));
        assert_eq!(record.creators, vec![None]);
    }

    #[test]
    fn test_normalize_trims_trailing_gaps() {
        let mut record = MetadataRecord::new();
        record.creator_entry(0).unwrap().last_original = Some("杜".to_string());
        record.creator_entry(3).unwrap();
        record.original_language = Some("  ".to_string());

        record.normalize();

        assert_eq!(record.creators.len(), 1);
        assert!(record.original_language.is_none());
    }

    #[test]
    fn test_field_name_lookup_ignores_case() {
        assert_eq!(FieldName::from_key("Container-Title"), Some(FieldName::ContainerTitle));
        assert_eq!(VariantKind::from_key("ROMANIZED-SHORT"), Some(VariantKind::RomanizedShort));
        assert_eq!(FieldName::from_key("abstract"), None);
    }

    #[test]
    fn test_record_json_shape() {
        let mut record = MetadataRecord::new();
        record.set_field_variant(FieldName::ContainerTitle, VariantKind::Romanized, "Wenwu");
        record.set_creator(
            1,
            Some(CreatorVariant {
                force_comma: Some(true),
                ..Default::default()
            }),
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["fields"]["container-title"]["romanized"], "Wenwu");
        assert!(json["creators"][0].is_null());
        assert_eq!(json["creators"][1]["force-comma"], true);

        let back: MetadataRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
