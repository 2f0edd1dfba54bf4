//! `cne parse`

use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use super::read_input;

pub fn execute(input: Option<PathBuf>) -> Result<()> {
    let text = read_input(input.as_deref())?;
    let record = cne_codec::parse(&text);
    debug!(
        fields = record.fields.len(),
        creators = record.creators.len(),
        "decoded metadata"
    );
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
