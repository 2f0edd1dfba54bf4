//! Command implementations for the cne CLI
//!
//! Each command reads its inputs, delegates to the library crates and
//! writes its result to stdout.

pub mod enrich;
pub mod parse;
pub mod serialize;
pub mod strip;
pub mod style_config;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Read a whole file, or stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}
