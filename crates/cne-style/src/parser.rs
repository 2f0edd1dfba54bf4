//! Directive grammars.
//!
//! Structured form (processing instruction), JSON:
//!
//! ```json
//! {
//!   "persons": ["orig", "translit"],
//!   "nameFormatting": { "romanizedCJK": { "order": "family-first", "separator": "space" } }
//! }
//! ```
//!
//! Legacy form (summary marker), whitespace-separated assignments:
//!
//! ```text
//! persons=orig,translit
//! ```

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::types::{
    NameFormatting, NameOrder, NameSeparator, RomanizedNameFormatting, Slot, StyleConfig,
};

/// Parse the JSON directive of a processing instruction.
pub fn parse_json_directive(text: &str) -> Result<StyleConfig> {
    let value: Value = serde_json::from_str(text).map_err(|e| Error::InvalidJson {
        message: e.to_string(),
    })?;
    let root = expect_object("(directive)", &value)?;

    let mut config = StyleConfig::default();
    for (key, value) in root {
        match key.as_str() {
            "persons" => {
                let items = expect_array(key, value)?;
                let mut names = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    match item {
                        Value::String(s) => names.push(s.as_str()),
                        other => {
                            return Err(Error::WrongType {
                                key: format!("persons[{}]", i),
                                expected: "a string".to_string(),
                                found: json_type(other).to_string(),
                            });
                        }
                    }
                }
                config.persons = parse_slots("persons", &names)?;
            }
            "nameFormatting" => {
                config.name_formatting = parse_name_formatting(value)?;
            }
            other => {
                return Err(Error::UnknownKey {
                    key: other.to_string(),
                    context: "the style directive".to_string(),
                });
            }
        }
    }

    Ok(config)
}

fn parse_name_formatting(value: &Value) -> Result<NameFormatting> {
    let map = expect_object("nameFormatting", value)?;
    let mut formatting = NameFormatting::default();

    for (key, value) in map {
        match key.as_str() {
            "romanizedCJK" => {
                formatting.romanized_cjk = Some(parse_romanized_cjk(value)?);
            }
            other => {
                return Err(Error::UnknownKey {
                    key: format!("nameFormatting.{}", other),
                    context: "the style directive".to_string(),
                });
            }
        }
    }

    Ok(formatting)
}

fn parse_romanized_cjk(value: &Value) -> Result<RomanizedNameFormatting> {
    const PATH: &str = "nameFormatting.romanizedCJK";
    let map = expect_object(PATH, value)?;
    let mut formatting = RomanizedNameFormatting::default();

    for (key, value) in map {
        let path = format!("{}.{}", PATH, key);
        match key.as_str() {
            "order" => formatting.order = parse_enum(&path, value, &NameOrder::VALUES)?,
            "separator" => {
                formatting.separator = parse_enum(&path, value, &NameSeparator::VALUES)?
            }
            _ => {
                return Err(Error::UnknownKey {
                    key: path,
                    context: "the style directive".to_string(),
                });
            }
        }
    }

    Ok(formatting)
}

fn parse_enum<T: Copy>(key: &str, value: &Value, vocabulary: &[(&str, T)]) -> Result<T> {
    let Value::String(s) = value else {
        return Err(Error::WrongType {
            key: key.to_string(),
            expected: "a string".to_string(),
            found: json_type(value).to_string(),
        });
    };

    vocabulary
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(s.trim()))
        .map(|(_, v)| *v)
        .ok_or_else(|| Error::UnknownValue {
            key: key.to_string(),
            value: s.clone(),
            expected: vocabulary
                .iter()
                .map(|(name, _)| format!("\"{}\"", name))
                .collect::<Vec<_>>()
                .join(" or "),
        })
}

/// Parse the legacy `field=slot,slot` directive of a summary marker.
pub fn parse_legacy_directive(text: &str) -> Result<StyleConfig> {
    let mut tokens = text.split_whitespace().peekable();
    if tokens.peek().is_none() {
        return Err(Error::EmptyDirective);
    }

    let mut config = StyleConfig::default();
    for token in tokens {
        let Some((key, values)) = token.split_once('=') else {
            return Err(Error::MalformedLegacyToken {
                token: token.to_string(),
            });
        };

        if key.eq_ignore_ascii_case("persons") {
            let names: Vec<&str> = values.split(',').filter(|v| !v.trim().is_empty()).collect();
            config.persons = parse_slots("persons", &names)?;
        } else {
            return Err(Error::UnknownKey {
                key: key.to_string(),
                context: "the legacy style directive".to_string(),
            });
        }
    }

    Ok(config)
}

/// Validate a slot list: 1 to 3 distinct known slots.
fn parse_slots(key: &str, names: &[&str]) -> Result<Vec<Slot>> {
    if names.is_empty() {
        return Err(Error::EmptySlots {
            key: key.to_string(),
        });
    }
    if names.len() > StyleConfig::MAX_SLOTS {
        return Err(Error::TooManySlots {
            key: key.to_string(),
            count: names.len(),
        });
    }

    let mut slots = Vec::with_capacity(names.len());
    for name in names {
        let slot = Slot::from_key(name).ok_or_else(|| Error::UnknownSlot {
            key: key.to_string(),
            value: name.to_string(),
        })?;
        if slots.contains(&slot) {
            return Err(Error::DuplicateSlot {
                key: key.to_string(),
                slot,
            });
        }
        slots.push(slot);
    }

    Ok(slots)
}

fn expect_object<'a>(key: &str, value: &'a Value) -> Result<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| Error::WrongType {
        key: key.to_string(),
        expected: "an object".to_string(),
        found: json_type(value).to_string(),
    })
}

fn expect_array<'a>(key: &str, value: &'a Value) -> Result<&'a Vec<Value>> {
    value.as_array().ok_or_else(|| Error::WrongType {
        key: key.to_string(),
        expected: "an array".to_string(),
        found: json_type(value).to_string(),
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
