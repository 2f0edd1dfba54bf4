//! The citation engine's language-classification behavior, as knobs.

use serde::{Deserialize, Serialize};

/// Language tags that select the engine's name-formatting buckets.
///
/// The engine formats a romanized name by looking at its language tag:
/// - the native tag gives romanesque treatment, where the style's inversion
///   and initialization attributes decide ordering and punctuation;
/// - the downgrade tag gives family-first order with full given names and no
///   punctuation;
/// - any other tag gives family-first order, initialized per style, without a
///   comma.
///
/// Only one language family triggers the downgrade in the engine. With
/// `compensate_downgrade` on, the strategy uses that family for every
/// non-native script so natural ordering looks the same for all of them.
/// Turn it off for engines that downgrade every non-native family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EngineQuirks {
    pub native_tag: String,
    pub downgrade_tag: String,
    /// Used when a record declares no original language.
    pub default_family_tag: String,
    pub compensate_downgrade: bool,
}

impl Default for EngineQuirks {
    fn default() -> Self {
        Self {
            native_tag: "en".to_string(),
            downgrade_tag: "ja".to_string(),
            default_family_tag: "zh".to_string(),
            compensate_downgrade: true,
        }
    }
}

impl EngineQuirks {
    /// The family tag for a record, falling back to `default_family_tag`.
    pub fn family_tag(&self, original_language: Option<&str>) -> String {
        original_language
            .map(language_family)
            .filter(|family| !family.is_empty())
            .unwrap_or_else(|| self.default_family_tag.clone())
    }

    /// True when `tag` belongs to the native language family.
    pub fn is_native(&self, tag: &str) -> bool {
        language_family(tag) == language_family(&self.native_tag)
    }

    /// True when `tag` belongs to the family the engine downgrades.
    pub fn is_downgrade(&self, tag: &str) -> bool {
        language_family(tag) == language_family(&self.downgrade_tag)
    }
}

/// The primary language subtag, lowercased: `zh-Hans-CN` → `zh`.
pub fn language_family(tag: &str) -> String {
    tag.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}
