//! `cne style-config`

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::info;

pub fn execute(style: PathBuf) -> Result<()> {
    let xml = std::fs::read_to_string(&style)
        .with_context(|| format!("Failed to read {}", style.display()))?;

    let config = match cne_style::extract(&xml) {
        Ok(Some(config)) => config,
        Ok(None) => {
            info!(style = %style.display(), "no name configuration, using defaults");
            cne_style::default_config()
        }
        Err(err) => bail!("{}", err.to_report()),
    };

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
