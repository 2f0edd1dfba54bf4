//! Locate the configuration directive inside a CSL style.
//!
//! Two locations are supported, checked in this order:
//!
//! ```xml
//! <info>
//!   <?cne-config {"persons": ["orig", "translit"]}?>
//!   <summary>Older styles: cne-config: persons=orig,translit</summary>
//! </info>
//! ```
//!
//! Only the `<info>` block is inspected. The rest of the style is scanned for
//! well-formedness but otherwise ignored.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::{Error, Result};

/// Target of the processing instruction.
pub const PI_TARGET: &str = "cne-config";

/// Marker that introduces a directive inside `<summary>`.
pub const SUMMARY_MARKER: &str = "cne-config:";

/// Where a directive was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveSource {
    ProcessingInstruction,
    Summary,
}

/// The raw text of a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub source: DirectiveSource,
    pub text: String,
}

/// Find the directive in a style, preferring the processing instruction.
pub fn find_directive(style_xml: &str) -> Result<Option<Directive>> {
    let mut reader = Reader::from_str(style_xml);
    reader.config_mut().trim_text_start = false;
    reader.config_mut().trim_text_end = false;

    let mut stack: Vec<String> = Vec::new();
    let mut summary = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                stack.push(local_name(e.name().as_ref()));
            }
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(Event::PI(e)) => {
                if in_info(&stack) {
                    let target = String::from_utf8_lossy(e.target()).to_string();
                    if target.eq_ignore_ascii_case(PI_TARGET) {
                        let content = String::from_utf8_lossy(e.content()).trim().to_string();
                        return Ok(Some(Directive {
                            source: DirectiveSource::ProcessingInstruction,
                            text: content,
                        }));
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if in_summary(&stack) {
                    let text = e.unescape().map_err(|err| Error::XmlSyntax {
                        message: format!("Invalid text content: {}", err),
                        position: Some(reader.buffer_position()),
                    })?;
                    summary.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if in_summary(&stack) {
                    summary.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::Eof) => break,
            // Empty elements, comments, declarations and doctypes carry no directive.
            Ok(_) => {}
            Err(e) => {
                return Err(Error::XmlSyntax {
                    message: e.to_string(),
                    position: Some(reader.error_position()),
                });
            }
        }
    }

    Ok(summary_directive(&summary))
}

/// Extract the legacy directive: the rest of the marker's line.
fn summary_directive(summary: &str) -> Option<Directive> {
    // ASCII lowercasing keeps byte offsets aligned with the original text.
    let start = summary.to_ascii_lowercase().find(SUMMARY_MARKER)? + SUMMARY_MARKER.len();
    let rest = &summary[start..];
    let line = rest.lines().next().unwrap_or_default();
    Some(Directive {
        source: DirectiveSource::Summary,
        text: line.trim().to_string(),
    })
}

fn local_name(raw: &[u8]) -> String {
    let full = String::from_utf8_lossy(raw);
    full.split(':').next_back().unwrap_or(&full).to_string()
}

fn in_info(stack: &[String]) -> bool {
    stack.iter().any(|name| name == "info")
}

fn in_summary(stack: &[String]) -> bool {
    in_info(stack) && stack.last().is_some_and(|name| name == "summary")
}
