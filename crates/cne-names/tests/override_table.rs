//! The override decision table, checked against custom engine quirks.

use cne_names::{
    CreatorRole, EngineQuirks, TargetRendering, build_variant, compute_override, language_family,
};
use proptest::prelude::*;

const TARGETS: [TargetRendering; 4] = [
    TargetRendering::Original,
    TargetRendering::OriginalSpaced,
    TargetRendering::RomanizedNatural,
    TargetRendering::RomanizedPunctuated,
];

fn korean_engine() -> EngineQuirks {
    EngineQuirks {
        native_tag: "de".to_string(),
        downgrade_tag: "ko".to_string(),
        default_family_tag: "ja".to_string(),
        compensate_downgrade: true,
    }
}

#[test]
fn test_table_follows_configured_tags() {
    let quirks = korean_engine();
    let family = quirks.family_tag(None);
    assert_eq!(family, "ja");

    let cell = |role, target| compute_override(role, &family, true, target, &quirks);

    for role in [CreatorRole::Primary, CreatorRole::Container] {
        assert_eq!(cell(role, TargetRendering::Original), None);
        assert_eq!(cell(role, TargetRendering::OriginalSpaced).as_deref(), Some("de"));
        assert_eq!(cell(role, TargetRendering::RomanizedNatural).as_deref(), Some("ko"));
    }
    assert_eq!(
        cell(CreatorRole::Primary, TargetRendering::RomanizedPunctuated).as_deref(),
        Some("de")
    );
    assert_eq!(
        cell(CreatorRole::Container, TargetRendering::RomanizedPunctuated).as_deref(),
        Some("ja")
    );
}

#[test]
fn test_roles_from_engine_variables() {
    let quirks = EngineQuirks::default();
    let punctuated = |variable: &str| {
        compute_override(
            CreatorRole::from_variable(variable),
            "zh",
            true,
            TargetRendering::RomanizedPunctuated,
            &quirks,
        )
    };
    assert_eq!(punctuated("author").as_deref(), Some("en"));
    assert_eq!(punctuated("container-author").as_deref(), Some("zh"));
    assert_eq!(punctuated("collection-editor").as_deref(), Some("zh"));
    assert_eq!(punctuated("reviewed-author").as_deref(), Some("en"));
}

#[test]
fn test_variant_for_original_spacing() {
    let quirks = EngineQuirks::default();
    let tag = compute_override(
        CreatorRole::Primary,
        "zh",
        true,
        TargetRendering::OriginalSpaced,
        &quirks,
    );
    let variant = build_variant(tag, " 杜 ", Some("伟生"), false);
    assert_eq!(variant.family, "杜");
    assert_eq!(variant.given.as_deref(), Some("伟生"));
    assert!(quirks.is_native(variant.language_override.as_deref().unwrap()));
}

proptest! {
    #[test]
    fn prop_no_variant_data_is_always_native(
        family in "[a-z]{2,3}",
        container in any::<bool>(),
        target_index in 0usize..4,
    ) {
        let role = if container { CreatorRole::Container } else { CreatorRole::Primary };
        let quirks = EngineQuirks::default();
        prop_assert_eq!(
            compute_override(role, &family, false, TARGETS[target_index], &quirks),
            Some(quirks.native_tag.clone())
        );
    }

    #[test]
    fn prop_family_tag_is_primary_subtag(
        primary in "[a-zA-Z]{2,3}",
        rest in "(-[A-Za-z0-9]{2,4}){0,2}",
    ) {
        let quirks = EngineQuirks::default();
        let tag = format!("{}{}", primary, rest);
        prop_assert_eq!(quirks.family_tag(Some(&tag)), primary.to_ascii_lowercase());
        prop_assert_eq!(language_family(&tag), primary.to_ascii_lowercase());
    }

    #[test]
    fn prop_force_comma_appends_exactly_one(family in "[A-Za-z]{1,12}") {
        let variant = build_variant(None, &family, None, true);
        prop_assert_eq!(variant.family, format!("{},", family));
    }
}
