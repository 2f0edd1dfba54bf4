//! A model of the host engine's name formatting.
//!
//! The engine sorts every name into a formatting bucket from its script and
//! language tag:
//!
//! | bucket        | selected by                         | "Du" / "Weisheng"         |
//! |---------------|-------------------------------------|---------------------------|
//! | static        | non-Latin script                    | 杜伟生                    |
//! | static spaced | non-Latin script, native tag        | 杜 伟生                   |
//! | romanesque    | Latin script, native or no tag      | style decides: "Du, W."   |
//! | downgraded    | Latin script, downgrade tag         | "Du Weisheng"             |
//! | family-first  | Latin script, any other tag         | "Du W."                   |
//!
//! [`ModelEngine`] applies these rules together with the active slot list so
//! that the effect of the pipeline's overrides can be checked without the
//! real engine.

use cne_names::EngineQuirks;
use cne_style::{NameOrder, NameSeparator, RomanizedNameFormatting, Slot};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::configurator::{CitationEngine, EnrichmentState, NamePreferences};
use crate::engine_item::{EngineItem, EngineName, NameVariable};

/// The `<name>` attributes of a style that affect personal names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameStyle {
    /// `name-as-sort-order` is set: romanesque names print family first.
    pub name_as_sort_order: bool,
    pub initialize_with: Option<String>,
    pub sort_separator: String,
    /// Between names of one variable.
    pub delimiter: String,
}

impl Default for NameStyle {
    fn default() -> Self {
        Self {
            name_as_sort_order: false,
            initialize_with: None,
            sort_separator: ", ".to_string(),
            delimiter: ", ".to_string(),
        }
    }
}

impl NameStyle {
    /// Read the first `<name>` element outside `<info>`.
    ///
    /// Styles that cannot be read get the defaults.
    pub fn from_style_xml(style_xml: &str) -> NameStyle {
        let mut reader = Reader::from_str(style_xml);
        let mut in_info = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) if e.local_name().as_ref() == b"info" => in_info = true,
                Ok(Event::End(e)) if e.local_name().as_ref() == b"info" => in_info = false,
                Ok(Event::Start(e) | Event::Empty(e))
                    if !in_info && e.local_name().as_ref() == b"name" =>
                {
                    return Self::from_element(&e);
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => {
                    debug!("unreadable style, using default name style: {}", err);
                    break;
                }
            }
        }

        NameStyle::default()
    }

    fn from_element(element: &BytesStart<'_>) -> NameStyle {
        let mut style = NameStyle::default();
        for attr in element.attributes().flatten() {
            let Ok(value) = attr.unescape_value() else {
                continue;
            };
            match attr.key.as_ref() {
                b"name-as-sort-order" => style.name_as_sort_order = true,
                b"initialize-with" => style.initialize_with = Some(value.into_owned()),
                b"sort-separator" => style.sort_separator = value.into_owned(),
                b"delimiter" => style.delimiter = value.into_owned(),
                _ => {}
            }
        }
        style
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormattingBucket {
    Static,
    StaticSpaced,
    Romanesque,
    Downgraded,
    FamilyFirst,
}

/// True when every letter of `text` is Latin.
pub fn is_romanesque(text: &str) -> bool {
    text.chars().filter(|c| c.is_alphabetic()).all(|c| {
        let code = c as u32;
        code < 0x0250 || (0x1E00..0x1F00).contains(&code)
    })
}

/// The bucket the engine puts a name in.
pub fn formatting_bucket(
    name_text: &str,
    language: Option<&str>,
    quirks: &EngineQuirks,
) -> FormattingBucket {
    let native = language.is_some_and(|tag| quirks.is_native(tag));

    if !is_romanesque(name_text) {
        return if native {
            FormattingBucket::StaticSpaced
        } else {
            FormattingBucket::Static
        };
    }

    match language {
        None => FormattingBucket::Romanesque,
        Some(_) if native => FormattingBucket::Romanesque,
        Some(tag) if quirks.is_downgrade(tag) => FormattingBucket::Downgraded,
        Some(_) => FormattingBucket::FamilyFirst,
    }
}

/// Initialize a given name (e.g., "John William" -> "J. W.").
fn initialize_name(given: &str, initialize_with: &str) -> String {
    given
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .map(|c| format!("{}{}", c.to_uppercase(), initialize_with))
        .collect::<Vec<_>>()
        .join("")
        .trim()
        .to_string()
}

/// Format one family/given pair in a bucket.
pub fn format_in_bucket(
    family: &str,
    given: &str,
    bucket: FormattingBucket,
    style: &NameStyle,
    romanized_cjk: Option<&RomanizedNameFormatting>,
) -> String {
    let initialized = || match &style.initialize_with {
        Some(init) => initialize_name(given, init),
        None => given.to_string(),
    };

    let formatted = match bucket {
        FormattingBucket::Static => format!("{}{}", family, given),
        FormattingBucket::StaticSpaced => join_non_empty(family, " ", given),
        FormattingBucket::Romanesque => {
            if style.name_as_sort_order {
                join_non_empty(family, &style.sort_separator, &initialized())
            } else {
                join_non_empty(&initialized(), " ", family)
            }
        }
        FormattingBucket::Downgraded => {
            let formatting = romanized_cjk.copied().unwrap_or_default();
            let separator = match formatting.separator {
                NameSeparator::Space => " ",
                NameSeparator::Comma => ", ",
            };
            match formatting.order {
                NameOrder::FamilyFirst => join_non_empty(family, separator, given),
                NameOrder::GivenFirst => join_non_empty(given, separator, family),
            }
        }
        FormattingBucket::FamilyFirst => join_non_empty(family, " ", &initialized()),
    };

    tidy_commas(&formatted)
}

fn join_non_empty(first: &str, separator: &str, second: &str) -> String {
    match (first.is_empty(), second.is_empty()) {
        (false, false) => format!("{}{}{}", first, separator, second),
        (false, true) => first.to_string(),
        (true, _) => second.to_string(),
    }
}

/// A literal comma on the family name meets the style's own separator in the
/// romanesque bucket; print it once.
fn tidy_commas(formatted: &str) -> String {
    let mut out = formatted.to_string();
    while out.contains(",,") {
        out = out.replace(",,", ",");
    }
    out.trim_end_matches(',').trim().to_string()
}

/// Reference implementation of [`CitationEngine`].
#[derive(Debug, Clone)]
pub struct ModelEngine {
    style_xml: String,
    name_style: NameStyle,
    quirks: EngineQuirks,
    preferences: NamePreferences,
    preference_calls: usize,
    state: EnrichmentState,
}

impl ModelEngine {
    pub fn new(style_xml: &str, quirks: EngineQuirks) -> Self {
        Self {
            style_xml: style_xml.to_string(),
            name_style: NameStyle::from_style_xml(style_xml),
            quirks,
            preferences: NamePreferences::default(),
            preference_calls: 0,
            state: EnrichmentState::default(),
        }
    }

    pub fn name_style(&self) -> &NameStyle {
        &self.name_style
    }

    pub fn preferences(&self) -> &NamePreferences {
        &self.preferences
    }

    /// How many times preferences were set on this engine.
    pub fn preference_calls(&self) -> usize {
        self.preference_calls
    }

    /// Render one name with every active slot, joined by a space.
    pub fn render_name(&self, name: &EngineName, item_language: Option<&str>) -> String {
        if let Some(literal) = &name.literal {
            return literal.clone();
        }

        let mut rendered: Vec<String> = Vec::new();
        for slot in &self.preferences.persons {
            let variant = name.multi.as_ref().and_then(|m| m.variants.get(slot));
            let text = match variant {
                Some(v) => self.render_parts(
                    &v.family,
                    v.given.as_deref().unwrap_or_default(),
                    v.language_override.as_deref().or(item_language),
                ),
                None if *slot == Slot::Orig => self.render_main(name, item_language),
                None => continue,
            };
            if !text.is_empty() && !rendered.contains(&text) {
                rendered.push(text);
            }
        }

        if rendered.is_empty() {
            self.render_main(name, item_language)
        } else {
            rendered.join(" ")
        }
    }

    fn render_main(&self, name: &EngineName, item_language: Option<&str>) -> String {
        let language = name
            .multi
            .as_ref()
            .and_then(|m| m.main.as_deref())
            .or(item_language);
        self.render_parts(
            name.family.as_deref().unwrap_or_default(),
            name.given.as_deref().unwrap_or_default(),
            language,
        )
    }

    fn render_parts(&self, family: &str, given: &str, language: Option<&str>) -> String {
        let bucket = formatting_bucket(&format!("{}{}", family, given), language, &self.quirks);
        format_in_bucket(
            family,
            given,
            bucket,
            &self.name_style,
            self.preferences.romanized_cjk.as_ref(),
        )
    }
}

impl CitationEngine for ModelEngine {
    fn style_xml(&self) -> &str {
        &self.style_xml
    }

    fn set_name_preferences(&mut self, preferences: &NamePreferences) {
        self.preference_calls += 1;
        self.preferences = preferences.clone();
    }

    fn enrichment_state_mut(&mut self) -> &mut EnrichmentState {
        &mut self.state
    }

    fn format_names(&self, item: &EngineItem, variable: NameVariable) -> Option<String> {
        let names = item.get_names(variable)?;
        Some(
            names
                .iter()
                .map(|name| self.render_name(name, item.language.as_deref()))
                .collect::<Vec<_>>()
                .join(&self.name_style.delimiter),
        )
    }
}
