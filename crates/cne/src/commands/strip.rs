//! `cne strip`

use std::path::PathBuf;

use anyhow::Result;

use super::read_input;

pub fn execute(input: Option<PathBuf>) -> Result<()> {
    let text = read_input(input.as_deref())?;
    let stripped = cne_codec::strip(&text);
    if !stripped.is_empty() {
        println!("{}", stripped);
    }
    Ok(())
}
