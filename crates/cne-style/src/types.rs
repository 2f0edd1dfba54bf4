//! Configuration carried by a style.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A rendering choice a style can request for a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    /// Original script.
    Orig,
    /// Romanization.
    Translit,
    /// Translation; for names, the style-punctuated romanization.
    Translat,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Orig, Slot::Translit, Slot::Translat];

    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Orig => "orig",
            Slot::Translit => "translit",
            Slot::Translat => "translat",
        }
    }

    /// Look up a slot by name, ignoring ASCII case and surrounding whitespace.
    pub fn from_key(key: &str) -> Option<Slot> {
        let key = key.trim();
        Slot::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order of romanized CJK names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameOrder {
    #[default]
    FamilyFirst,
    GivenFirst,
}

impl NameOrder {
    pub const VALUES: [(&'static str, NameOrder); 2] = [
        ("family-first", NameOrder::FamilyFirst),
        ("given-first", NameOrder::GivenFirst),
    ];
}

/// Separator between the parts of a romanized CJK name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameSeparator {
    #[default]
    Space,
    Comma,
}

impl NameSeparator {
    pub const VALUES: [(&'static str, NameSeparator); 2] = [
        ("space", NameSeparator::Space),
        ("comma", NameSeparator::Comma),
    ];
}

/// How romanized names from CJK scripts are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RomanizedNameFormatting {
    pub order: NameOrder,
    pub separator: NameSeparator,
}

/// The `nameFormatting` block of a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NameFormatting {
    #[serde(
        rename = "romanizedCJK",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub romanized_cjk: Option<RomanizedNameFormatting>,
}

impl NameFormatting {
    pub fn is_empty(&self) -> bool {
        self.romanized_cjk.is_none()
    }
}

/// The resolved configuration of one style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Ordered name slots to render, one to three of them.
    pub persons: Vec<Slot>,
    #[serde(
        rename = "nameFormatting",
        default,
        skip_serializing_if = "NameFormatting::is_empty"
    )]
    pub name_formatting: NameFormatting,
}

/// Romanized names only.
impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            persons: vec![Slot::Translit],
            name_formatting: NameFormatting::default(),
        }
    }
}

impl StyleConfig {
    /// The most slots a style may request.
    pub const MAX_SLOTS: usize = 3;

    pub fn with_persons(persons: Vec<Slot>) -> Self {
        Self {
            persons,
            ..Self::default()
        }
    }
}
