//! Line classification, decoding and encoding of the `cne-` micro-format.
//!
//! The host stores free text in a single field. Lines that start with the
//! namespace prefix belong to this codec; everything else is foreign content
//! that must survive an edit untouched:
//!
//! ```text
//! Original date: 1984
//! cne-original-language: zh
//! cne-title-original: 中国古代书籍史
//! cne-title-romanized: Zhongguo gudai shuji shi
//! cne-creator-0-last-original: 杜
//! cne-creator-0-first-original: 伟生
//! cne-creator-0-last-romanized: Du
//! cne-creator-0-first-romanized: Weisheng
//! cne-creator-0-force-comma: true
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::{
    CreatorOption, CreatorVariant, FieldName, MetadataRecord, NamePart, NameScript, VariantKind,
};

/// The namespace prefix that marks a line as belonging to this codec.
pub const NAMESPACE_PREFIX: &str = "cne-";

/// Highest creator index the codec reads or writes. Lines with larger indices
/// are foreign content, and records never render them.
pub const MAX_CREATOR_INDEX: usize = 255;

/// `cne-<field>-<variant>: value`. Captures field, variant, value.
static FIELD_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*cne-(title|container-title|publisher|journal|series)-(original|romanized-short|romanized|english)\s*:(.*)$",
    )
    .unwrap()
});

/// `cne-original-language: value`.
static LANGUAGE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*cne-original-language\s*:(.*)$").unwrap());

/// `cne-creator-<n>-<last|first>-<romanized|original>: value`.
static CREATOR_NAME_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*cne-creator-([0-9]+)-(last|first)-(romanized|original)\s*:(.*)$")
        .unwrap()
});

/// `cne-creator-<n>-<option>: bool`. Unrecognized values leave the line foreign.
static CREATOR_OPTION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*cne-creator-([0-9]+)-(original-spacing|force-comma)\s*:\s*(true|false|yes|no|1|0)\s*$",
    )
    .unwrap()
});

/// What a single line of the free-text field encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    FieldVariant {
        field: FieldName,
        variant: VariantKind,
        value: &'a str,
    },
    Language {
        value: &'a str,
    },
    CreatorName {
        index: usize,
        part: NamePart,
        script: NameScript,
        value: &'a str,
    },
    CreatorOption {
        index: usize,
        option: CreatorOption,
        value: bool,
    },
    /// Not ours; preserved verbatim.
    Foreign,
}

impl LineKind<'_> {
    pub fn is_foreign(&self) -> bool {
        matches!(self, LineKind::Foreign)
    }
}

/// Classify one line. Patterns are tried in a fixed order: field variant,
/// language, creator name, creator option.
pub fn classify_line(line: &str) -> LineKind<'_> {
    if let Some(caps) = FIELD_LINE.captures(line) {
        let field = caps.get(1).and_then(|m| FieldName::from_key(m.as_str()));
        let variant = caps.get(2).and_then(|m| VariantKind::from_key(m.as_str()));
        if let (Some(field), Some(variant), Some(value)) = (field, variant, caps.get(3)) {
            return LineKind::FieldVariant {
                field,
                variant,
                value: value.as_str().trim(),
            };
        }
    }

    if let Some(value) = LANGUAGE_LINE.captures(line).and_then(|caps| caps.get(1)) {
        return LineKind::Language {
            value: value.as_str().trim(),
        };
    }

    if let Some(caps) = CREATOR_NAME_LINE.captures(line) {
        let index = caps.get(1).and_then(|m| parse_index(m.as_str()));
        let part = caps.get(2).map(|m| {
            if m.as_str().eq_ignore_ascii_case("last") {
                NamePart::Last
            } else {
                NamePart::First
            }
        });
        let script = caps.get(3).map(|m| {
            if m.as_str().eq_ignore_ascii_case("original") {
                NameScript::Original
            } else {
                NameScript::Romanized
            }
        });
        if let (Some(index), Some(part), Some(script), Some(value)) =
            (index, part, script, caps.get(4))
        {
            return LineKind::CreatorName {
                index,
                part,
                script,
                value: value.as_str().trim(),
            };
        }
    }

    if let Some(caps) = CREATOR_OPTION_LINE.captures(line) {
        let index = caps.get(1).and_then(|m| parse_index(m.as_str()));
        let option = caps.get(2).map(|m| {
            if m.as_str().eq_ignore_ascii_case("force-comma") {
                CreatorOption::ForceComma
            } else {
                CreatorOption::OriginalSpacing
            }
        });
        let value = caps.get(3).map(|m| parse_bool(m.as_str()));
        if let (Some(index), Some(option), Some(value)) = (index, option, value) {
            return LineKind::CreatorOption {
                index,
                option,
                value,
            };
        }
    }

    LineKind::Foreign
}

fn parse_index(digits: &str) -> Option<usize> {
    digits
        .parse::<usize>()
        .ok()
        .filter(|index| *index <= MAX_CREATOR_INDEX)
}

/// Only called on values the option pattern already accepted.
fn parse_bool(value: &str) -> bool {
    let value = value.to_ascii_lowercase();
    matches!(value.as_str(), "true" | "yes" | "1")
}

/// Decode the metadata embedded in `text`.
///
/// Foreign lines are ignored. Keys match case-insensitively, values are
/// trimmed, and a repeated key keeps its last value. The creator list has
/// length `max(index) + 1`; indices without data are gaps.
pub fn parse(text: &str) -> MetadataRecord {
    let mut record = MetadataRecord::new();

    for line in text.lines() {
        match classify_line(line) {
            LineKind::FieldVariant {
                field,
                variant,
                value,
            } => record.set_field_variant(field, variant, value),
            LineKind::Language { value } => record.set_original_language(value),
            LineKind::CreatorName {
                index,
                part,
                script,
                value,
            } => {
                if let Some(creator) = record.creator_entry(index) {
                    creator.set_name_part(part, script, value);
                }
            }
            LineKind::CreatorOption {
                index,
                option,
                value,
            } => {
                if let Some(creator) = record.creator_entry(index) {
                    creator.set_option(option, value);
                }
            }
            LineKind::Foreign => {}
        }
    }

    record.collapse_empty_creators();
    record
}

/// Re-encode `record` into `text`.
///
/// Every recognized line is removed from `text`; the remaining lines keep
/// their order, and the record's lines are appended in canonical order
/// (language, fields, creators). Blank lines and empty values are dropped.
pub fn serialize(text: &str, record: &MetadataRecord) -> String {
    let mut lines: Vec<String> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| classify_line(line).is_foreign())
        .map(str::to_string)
        .collect();

    lines.extend(render_lines(record));
    lines.join("\n")
}

/// True when any line of `text` belongs to the codec.
pub fn has_metadata(text: &str) -> bool {
    text.lines().any(|line| !classify_line(line).is_foreign())
}

/// Remove every codec line from `text`.
pub fn strip(text: &str) -> String {
    serialize(text, &MetadataRecord::new())
}

/// Render the record's own lines in canonical order.
pub fn render_lines(record: &MetadataRecord) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(language) = record.original_language.as_deref().and_then(wire_value) {
        lines.push(format!("{}original-language: {}", NAMESPACE_PREFIX, language));
    }

    // BTreeMap iteration follows FieldName's declaration order.
    for (field, variants) in &record.fields {
        for kind in VariantKind::ALL {
            if let Some(value) = variants.get(kind).and_then(wire_value) {
                lines.push(format!("{}{}-{}: {}", NAMESPACE_PREFIX, field, kind, value));
            }
        }
    }

    for (index, creator) in record
        .creators
        .iter()
        .enumerate()
        .take(MAX_CREATOR_INDEX + 1)
    {
        if let Some(creator) = creator {
            render_creator(index, creator, &mut lines);
        }
    }

    lines
}

fn render_creator(index: usize, creator: &CreatorVariant, lines: &mut Vec<String>) {
    for (part, script) in CreatorVariant::NAME_PARTS {
        if let Some(value) = creator.name_part(part, script).and_then(wire_value) {
            lines.push(format!(
                "{}creator-{}-{}-{}: {}",
                NAMESPACE_PREFIX,
                index,
                part.as_str(),
                script.as_str(),
                value
            ));
        }
    }
    for option in CreatorVariant::OPTIONS {
        if let Some(value) = creator.option(option) {
            lines.push(format!(
                "{}creator-{}-{}: {}",
                NAMESPACE_PREFIX,
                index,
                option.as_str(),
                value
            ));
        }
    }
}

/// A value as written on the wire: single line, trimmed, never empty.
fn wire_value(value: &str) -> Option<String> {
    let single_line = value.replace(['\r', '\n'], " ");
    let trimmed = single_line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
