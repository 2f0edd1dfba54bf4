//! Name-ordering control for parallel-language creators.
//!
//! A citation engine decides between "Du Weisheng", "Du, W." and "Weisheng
//! Du" from the characters of a name and its language tag. This crate chooses
//! the language tag (and, where needed, literal punctuation) for each rendering
//! of each creator so that the engine produces the intended output.
//!
//! # Example
//!
//! ```rust
//! use cne_names::{CreatorRole, EngineQuirks, TargetRendering, build_variant, compute_override};
//!
//! let quirks = EngineQuirks::default();
//! let role = CreatorRole::from_variable("editor");
//! let tag = compute_override(role, "zh", true, TargetRendering::RomanizedPunctuated, &quirks);
//! assert_eq!(tag.as_deref(), Some("zh"));
//!
//! let variant = build_variant(tag, "Lin", Some("Shufen"), false);
//! assert_eq!(variant.family, "Lin");
//! ```

pub mod quirks;
pub mod role;
pub mod strategy;

pub use quirks::{EngineQuirks, language_family};
pub use role::CreatorRole;
pub use strategy::{NameVariant, TargetRendering, build_variant, compute_override};
