//! Codec for parallel-language bibliographic metadata.
//!
//! Citation managers give every item a single free-text field that users fill
//! with arbitrary annotations. This crate embeds structured metadata (original
//! script, romanization, translation of titles and creator names) inside that
//! field as namespaced `cne-` lines, and decodes it back into a
//! [`MetadataRecord`]. Foreign lines are never touched.
//!
//! # Example
//!
//! ```rust
//! use cne_codec::{FieldName, parse, serialize};
//!
//! let extra = "Original date: 1984\ncne-title-romanized: Zhongguo gudai shuji shi";
//! let mut record = parse(extra);
//! assert_eq!(
//!     record.field(FieldName::Title).unwrap().romanized.as_deref(),
//!     Some("Zhongguo gudai shuji shi")
//! );
//!
//! record.set_original_language("zh");
//! let updated = serialize(extra, &record);
//! assert_eq!(
//!     updated,
//!     "Original date: 1984\ncne-original-language: zh\ncne-title-romanized: Zhongguo gudai shuji shi"
//! );
//! ```
//!
//! The record is a derived view. Always decode it from the current text
//! instead of holding on to an earlier decode.

pub mod codec;
pub mod record;

pub use codec::{
    LineKind, MAX_CREATOR_INDEX, NAMESPACE_PREFIX, classify_line, has_metadata, parse,
    render_lines, serialize, strip,
};
pub use record::{
    CreatorOption, CreatorVariant, FieldName, FieldVariants, MetadataRecord, NamePart,
    NameScript, VariantKind,
};
