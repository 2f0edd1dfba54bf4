//! Errors for malformed style directives.
//!
//! A broken directive is a style bug, so it is reported with a stable code
//! instead of being ignored.

use std::fmt;

use crate::types::Slot;

/// Result type alias for cne-style operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a style's directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The style itself is not well-formed XML.
    XmlSyntax {
        message: String,
        /// Byte offset where the error occurred.
        position: Option<u64>,
    },

    /// The processing instruction does not hold valid JSON.
    InvalidJson { message: String },

    /// A key the directive grammar does not know.
    UnknownKey { key: String, context: String },

    /// A value of the wrong JSON type.
    WrongType {
        key: String,
        expected: String,
        found: String,
    },

    /// A slot name outside `orig`, `translit`, `translat`.
    UnknownSlot { key: String, value: String },

    /// More than [`StyleConfig::MAX_SLOTS`](crate::StyleConfig::MAX_SLOTS) slots.
    TooManySlots { key: String, count: usize },

    /// An empty slot list.
    EmptySlots { key: String },

    /// The same slot listed twice.
    DuplicateSlot { key: String, slot: Slot },

    /// An enum value outside its vocabulary.
    UnknownValue {
        key: String,
        value: String,
        expected: String,
    },

    /// A legacy token that is not `field=slot,slot`.
    MalformedLegacyToken { token: String },

    /// A directive marker with nothing after it.
    EmptyDirective,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::XmlSyntax { message, position } => {
                write!(f, "XML syntax error in style: {}", message)?;
                if let Some(pos) = position {
                    write!(f, " at byte {}", pos)?;
                }
                Ok(())
            }
            Error::InvalidJson { message } => {
                write!(f, "Invalid JSON in style directive: {}", message)
            }
            Error::UnknownKey { key, context } => {
                write!(f, "Unknown key '{}' in {}", key, context)
            }
            Error::WrongType {
                key,
                expected,
                found,
            } => {
                write!(f, "Key '{}' must be {}, found {}", key, expected, found)
            }
            Error::UnknownSlot { key, value } => {
                write!(f, "Unknown slot '{}' in '{}'", value, key)
            }
            Error::TooManySlots { key, count } => {
                write!(
                    f,
                    "'{}' lists {} slots, at most {} are allowed",
                    key,
                    count,
                    crate::StyleConfig::MAX_SLOTS
                )
            }
            Error::EmptySlots { key } => write!(f, "'{}' must list at least one slot", key),
            Error::DuplicateSlot { key, slot } => {
                write!(f, "Slot '{}' is listed twice in '{}'", slot, key)
            }
            Error::UnknownValue {
                key,
                value,
                expected,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for '{}': expected {}",
                    value, key, expected
                )
            }
            Error::MalformedLegacyToken { token } => {
                write!(f, "Malformed directive token '{}': expected field=slot,slot", token)
            }
            Error::EmptyDirective => {
                write!(f, "Style directive marker is not followed by any setting")
            }
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Stable diagnostic code (subsystem 3: style directives).
    pub fn code(&self) -> &'static str {
        match self {
            Error::XmlSyntax { .. } => "CNE-3-1",
            Error::InvalidJson { .. } => "CNE-3-2",
            Error::UnknownKey { .. } => "CNE-3-3",
            Error::WrongType { .. } => "CNE-3-4",
            Error::UnknownSlot { .. } => "CNE-3-5",
            Error::TooManySlots { .. } => "CNE-3-6",
            Error::EmptySlots { .. } => "CNE-3-7",
            Error::DuplicateSlot { .. } => "CNE-3-8",
            Error::UnknownValue { .. } => "CNE-3-9",
            Error::MalformedLegacyToken { .. } => "CNE-3-10",
            Error::EmptyDirective => "CNE-3-11",
        }
    }

    /// A suggestion for fixing the directive, when there is an obvious one.
    pub fn hint(&self) -> Option<String> {
        match self {
            Error::UnknownSlot { .. } | Error::EmptySlots { .. } => Some(format!(
                "Use one of: {}?",
                Slot::ALL.map(Slot::as_str).join(", ")
            )),
            Error::TooManySlots { .. } | Error::DuplicateSlot { .. } => {
                Some("List each of orig, translit, translat at most once?".to_string())
            }
            Error::UnknownKey { .. } => {
                Some("Supported keys are 'persons' and 'nameFormatting.romanizedCJK'?".to_string())
            }
            Error::MalformedLegacyToken { .. } | Error::EmptyDirective => {
                Some("Write the directive as 'cne-config: persons=orig,translit'?".to_string())
            }
            _ => None,
        }
    }

    /// One-line report: `[code] message (hint)`.
    pub fn to_report(&self) -> String {
        match self.hint() {
            Some(hint) => format!("[{}] {} ({})", self.code(), self, hint),
            None => format!("[{}] {}", self.code(), self),
        }
    }
}
