//! Field presets: how the variants of a title-like field are combined into
//! the single `cne-<field>` property a style prints.

use cne_codec::{FieldName, FieldVariants, VariantKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A user-selectable ordering of field variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldPreset {
    /// *Hongloumeng* 紅樓夢 [Dream of the Red Chamber]
    #[default]
    RomanizedOriginalEnglish,
    /// *Hongloumeng* [Dream of the Red Chamber]
    RomanizedEnglish,
    /// 紅樓夢 *Hongloumeng* [Dream of the Red Chamber]
    OriginalRomanizedEnglish,
    RomanizedOnly,
    OriginalOnly,
}

/// One part of a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetEntry {
    pub variant: VariantKind,
    pub emphasis: bool,
}

const fn entry(variant: VariantKind, emphasis: bool) -> PresetEntry {
    PresetEntry { variant, emphasis }
}

const ROMANIZED_ORIGINAL_ENGLISH: &[PresetEntry] = &[
    entry(VariantKind::Romanized, true),
    entry(VariantKind::Original, false),
    entry(VariantKind::English, false),
];
const ROMANIZED_ENGLISH: &[PresetEntry] = &[
    entry(VariantKind::Romanized, true),
    entry(VariantKind::English, false),
];
const ORIGINAL_ROMANIZED_ENGLISH: &[PresetEntry] = &[
    entry(VariantKind::Original, false),
    entry(VariantKind::Romanized, true),
    entry(VariantKind::English, false),
];
const ROMANIZED_ONLY: &[PresetEntry] = &[entry(VariantKind::Romanized, true)];
const ORIGINAL_ONLY: &[PresetEntry] = &[entry(VariantKind::Original, false)];

impl FieldPreset {
    pub const ALL: [FieldPreset; 5] = [
        FieldPreset::RomanizedOriginalEnglish,
        FieldPreset::RomanizedEnglish,
        FieldPreset::OriginalRomanizedEnglish,
        FieldPreset::RomanizedOnly,
        FieldPreset::OriginalOnly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldPreset::RomanizedOriginalEnglish => "romanized-original-english",
            FieldPreset::RomanizedEnglish => "romanized-english",
            FieldPreset::OriginalRomanizedEnglish => "original-romanized-english",
            FieldPreset::RomanizedOnly => "romanized-only",
            FieldPreset::OriginalOnly => "original-only",
        }
    }

    pub fn from_key(key: &str) -> Option<FieldPreset> {
        let key = key.trim();
        FieldPreset::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(key))
    }

    pub fn entries(self) -> &'static [PresetEntry] {
        match self {
            FieldPreset::RomanizedOriginalEnglish => ROMANIZED_ORIGINAL_ENGLISH,
            FieldPreset::RomanizedEnglish => ROMANIZED_ENGLISH,
            FieldPreset::OriginalRomanizedEnglish => ORIGINAL_ROMANIZED_ENGLISH,
            FieldPreset::RomanizedOnly => ROMANIZED_ONLY,
            FieldPreset::OriginalOnly => ORIGINAL_ONLY,
        }
    }

    /// Combine the variants of `field`. `None` when no listed variant is set.
    ///
    /// Publisher names are never emphasized.
    pub fn render(self, field: FieldName, variants: &FieldVariants) -> Option<String> {
        let parts: Vec<String> = self
            .entries()
            .iter()
            .filter_map(|e| {
                let value = variants.get(e.variant)?;
                Some(if e.variant == VariantKind::English {
                    format!("[{}]", value)
                } else if e.emphasis && field != FieldName::Publisher {
                    format!("<i>{}</i>", value)
                } else {
                    value.to_string()
                })
            })
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

impl fmt::Display for FieldPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
