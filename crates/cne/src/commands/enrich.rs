//! `cne enrich`
//!
//! Runs a record through the reference host with the hooks installed and
//! prints the engine input. With `--preview` the output is an object
//! holding the item and, per name variable, the names as the reference
//! engine formats them under the given style.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use cne_pipeline::{
    ConversionArgs, EngineArgs, EnrichmentPipeline, Hooks, Host, NameVariable, Record, Settings,
    StyleSource,
};
use tracing::{debug, info};

#[derive(Debug)]
pub struct EnrichArgs {
    pub record: PathBuf,
    pub style: Option<PathBuf>,
    pub settings: Option<PathBuf>,
    pub preview: bool,
}

pub fn execute(args: EnrichArgs) -> Result<()> {
    let settings = match &args.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };

    let json = std::fs::read_to_string(&args.record)
        .with_context(|| format!("Failed to read {}", args.record.display()))?;
    let record: Record = serde_json::from_str(&json)
        .with_context(|| format!("Invalid record in {}", args.record.display()))?;

    let mut host = Host::reference(settings.engine.clone());
    let mut hooks = Hooks::new(Rc::new(EnrichmentPipeline::new(settings)));
    if !hooks.install(&mut host) {
        bail!("Could not install enrichment hooks");
    }

    let Some(item) = host.convert_record(&record, &ConversionArgs::default()) else {
        bail!("The host provides no record conversion");
    };
    debug!(id = %item.id, "record converted");

    if !args.preview {
        println!("{}", serde_json::to_string_pretty(&item)?);
        return Ok(());
    }

    let Some(style_path) = &args.style else {
        bail!("--preview needs --style");
    };
    let style = StyleSource {
        id: style_path.display().to_string(),
        xml: std::fs::read_to_string(style_path)
            .with_context(|| format!("Failed to read {}", style_path.display()))?,
    };
    let Some(engine) = host.create_engine(&style, &EngineArgs::default()) else {
        bail!("The host provides no engine factory");
    };

    let names: BTreeMap<&str, String> = NameVariable::ALL
        .iter()
        .filter_map(|&variable| {
            engine
                .format_names(&item, variable)
                .map(|text| (variable.as_str(), text))
        })
        .collect();
    info!(style = %style.id, variables = names.len(), "names formatted");

    let output = serde_json::json!({ "item": item, "names": names });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
