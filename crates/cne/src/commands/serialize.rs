//! `cne serialize`
//!
//! Foreign lines of the input are kept in order; the namespaced lines are
//! replaced by the ones encoding the given record.

use std::path::PathBuf;

use anyhow::{Context, Result};
use cne_codec::MetadataRecord;
use tracing::debug;

use super::read_input;

#[derive(Debug)]
pub struct SerializeArgs {
    pub record: PathBuf,
    pub input: Option<PathBuf>,
}

pub fn execute(args: SerializeArgs) -> Result<()> {
    let json = std::fs::read_to_string(&args.record)
        .with_context(|| format!("Failed to read {}", args.record.display()))?;
    let record: MetadataRecord = serde_json::from_str(&json)
        .with_context(|| format!("Invalid metadata record in {}", args.record.display()))?;

    let text = read_input(args.input.as_deref())?;
    debug!(lines = text.lines().count(), "rewriting field");

    let output = cne_codec::serialize(&text, &record);
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}
