//! Language-tag overrides that land each name in the wanted formatting bucket.
//!
//! The engine cannot be told "print this name family-first without a comma".
//! It decides ordering and punctuation from the name's script and language
//! tag, so the strategy picks the tag that produces the wanted output. The
//! tags are formatting-bucket selectors, not statements about the language of
//! the name.

use serde::{Deserialize, Serialize};

use crate::quirks::EngineQuirks;
use crate::role::CreatorRole;

/// Which rendering of a creator is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetRendering {
    /// The original-script name, as the record's language would render it.
    Original,
    /// The original-script name with family and given separated by a space.
    OriginalSpaced,
    /// Romanized, family-first, full given name, no punctuation ("Du Weisheng").
    RomanizedNatural,
    /// Romanized, ordering and punctuation controlled by the style ("Du, W.").
    RomanizedPunctuated,
}

/// One alternate rendering of a name, ready for the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameVariant {
    pub family: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given: Option<String>,
    /// Language tag the engine should use instead of the item's language.
    #[serde(rename = "lang", default, skip_serializing_if = "Option::is_none")]
    pub language_override: Option<String>,
}

/// Pick the language tag for one rendering of one creator.
///
/// `family_tag` is the record's language family (see
/// [`EngineQuirks::family_tag`]). `None` means "inherit the record's language".
pub fn compute_override(
    role: CreatorRole,
    family_tag: &str,
    has_variant_data: bool,
    target: TargetRendering,
    quirks: &EngineQuirks,
) -> Option<String> {
    // Names without override data are rendered in direct order, whatever the
    // record's declared language is.
    if !has_variant_data {
        return Some(quirks.native_tag.clone());
    }

    match target {
        TargetRendering::Original => None,
        // Under the native tag the engine separates non-Latin family and given names.
        TargetRendering::OriginalSpaced => Some(quirks.native_tag.clone()),
        TargetRendering::RomanizedNatural => {
            // The engine only downgrades one family to unpunctuated
            // family-first order. Borrowing that family's tag gives every
            // non-native script the same output.
            if quirks.compensate_downgrade {
                Some(quirks.downgrade_tag.clone())
            } else {
                Some(family_tag.to_string())
            }
        }
        TargetRendering::RomanizedPunctuated => match role {
            // Container roles rarely carry name-as-sort-order in styles, so the
            // family tag forces family-first order.
            CreatorRole::Container => Some(family_tag.to_string()),
            // The native tag hands punctuation to the style's inversion attributes.
            CreatorRole::Primary => Some(quirks.native_tag.clone()),
        },
    }
}

/// Build a name variant.
///
/// With `force_comma` the comma is appended to the family name as literal
/// text. The engine's own comma logic differs per bucket; a literal comma
/// prints the same in all of them.
pub fn build_variant(
    language_override: Option<String>,
    family: &str,
    given: Option<&str>,
    force_comma: bool,
) -> NameVariant {
    let family = family.trim();
    let family = if force_comma && !family.is_empty() && !family.ends_with(',') {
        format!("{},", family)
    } else {
        family.to_string()
    };

    NameVariant {
        family,
        given: given
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string),
        language_override,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quirks() -> EngineQuirks {
        EngineQuirks::default()
    }

    #[test]
    fn test_no_variant_data_is_native_for_every_target() {
        for target in [
            TargetRendering::Original,
            TargetRendering::OriginalSpaced,
            TargetRendering::RomanizedNatural,
            TargetRendering::RomanizedPunctuated,
        ] {
            assert_eq!(
                compute_override(CreatorRole::Container, "zh", false, target, &quirks()),
                Some("en".to_string())
            );
        }
    }

    #[test]
    fn test_original_inherits() {
        assert_eq!(
            compute_override(
                CreatorRole::Primary,
                "zh",
                true,
                TargetRendering::Original,
                &quirks()
            ),
            None
        );
    }

    #[test]
    fn test_natural_uses_downgrade_family_for_all_scripts() {
        for family in ["zh", "ko", "ja"] {
            assert_eq!(
                compute_override(
                    CreatorRole::Primary,
                    family,
                    true,
                    TargetRendering::RomanizedNatural,
                    &quirks()
                ),
                Some("ja".to_string())
            );
        }
    }

    #[test]
    fn test_natural_without_compensation_keeps_family() {
        let quirks = EngineQuirks {
            compensate_downgrade: false,
            ..EngineQuirks::default()
        };
        assert_eq!(
            compute_override(
                CreatorRole::Primary,
                "ko",
                true,
                TargetRendering::RomanizedNatural,
                &quirks
            ),
            Some("ko".to_string())
        );
    }

    #[test]
    fn test_punctuated_depends_on_role() {
        assert_eq!(
            compute_override(
                CreatorRole::Container,
                "zh",
                true,
                TargetRendering::RomanizedPunctuated,
                &quirks()
            ),
            Some("zh".to_string())
        );
        assert_eq!(
            compute_override(
                CreatorRole::Primary,
                "zh",
                true,
                TargetRendering::RomanizedPunctuated,
                &quirks()
            ),
            Some("en".to_string())
        );
    }

    #[test]
    fn test_build_variant_force_comma() {
        let variant = build_variant(Some("ja".to_string()), "Du", Some("Weisheng"), true);
        assert_eq!(variant.family, "Du,");
        assert_eq!(variant.given.as_deref(), Some("Weisheng"));
        assert_eq!(variant.language_override.as_deref(), Some("ja"));

        // Never doubled.
        let again = build_variant(None, "Du,", None, true);
        assert_eq!(again.family, "Du,");
    }

    #[test]
    fn test_variant_json_shape() {
        let variant = build_variant(Some("zh".to_string()), "Lin", Some(" "), false);
        let json = serde_json::to_value(&variant).unwrap();
        assert_eq!(json, serde_json::json!({"family": "Lin", "lang": "zh"}));
    }
}
