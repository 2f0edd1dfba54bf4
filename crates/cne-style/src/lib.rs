//! Per-style configuration for parallel-language name rendering.
//!
//! A CSL style opts into original-script, romanized or translated names by
//! embedding a small directive in its `<info>` block. This crate finds that
//! directive and validates it into a [`StyleConfig`].
//!
//! # Example
//!
//! ```rust
//! use cne_style::{Slot, extract};
//!
//! let csl = r#"<?xml version="1.0" encoding="utf-8"?>
//! <style xmlns="http://purl.org/net/xbiblio/csl" class="in-text" version="1.0">
//!   <info>
//!     <title>Parallel names</title>
//!     <?cne-config {"persons": ["orig", "translit"]}?>
//!   </info>
//!   <citation><layout><names variable="author"/></layout></citation>
//! </style>"#;
//!
//! let config = extract(csl).unwrap().unwrap();
//! assert_eq!(config.persons, vec![Slot::Orig, Slot::Translit]);
//! ```
//!
//! # Errors
//!
//! Malformed directives are errors with a stable `CNE-3-*` code:
//!
//! ```rust
//! use cne_style::extract;
//!
//! let csl = r#"<style><info><?cne-config {"persons": ["bogus"]}?></info></style>"#;
//! let err = extract(csl).unwrap_err();
//! assert_eq!(err.code(), "CNE-3-5");
//! ```

pub mod directive;
pub mod error;
pub mod parser;
pub mod types;

pub use directive::{Directive, DirectiveSource, find_directive};
pub use error::{Error, Result};
pub use parser::{parse_json_directive, parse_legacy_directive};
pub use types::{
    NameFormatting, NameOrder, NameSeparator, RomanizedNameFormatting, Slot, StyleConfig,
};

/// Read the configuration of a style.
///
/// Returns `Ok(None)` when the style carries no directive.
pub fn extract(style_xml: &str) -> Result<Option<StyleConfig>> {
    let Some(directive) = find_directive(style_xml)? else {
        return Ok(None);
    };

    let config = match directive.source {
        DirectiveSource::ProcessingInstruction => parse_json_directive(&directive.text)?,
        DirectiveSource::Summary => parse_legacy_directive(&directive.text)?,
    };
    Ok(Some(config))
}

/// The configuration used when a style has no directive.
pub fn default_config() -> StyleConfig {
    StyleConfig::default()
}

/// Read the configuration of a style, falling back to [`default_config`].
///
/// The error, if any, is returned alongside so the caller can report it.
pub fn extract_or_default(style_xml: &str) -> (StyleConfig, Option<Error>) {
    match extract(style_xml) {
        Ok(Some(config)) => (config, None),
        Ok(None) => (default_config(), None),
        Err(err) => (default_config(), Some(err)),
    }
}
