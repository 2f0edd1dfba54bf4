//! Applying a style's name configuration to a citation engine.

use cne_style::{RomanizedNameFormatting, Slot, StyleConfig};
use tracing::{debug, warn};

use crate::engine_item::{EngineItem, NameVariable};

/// What the engine is told about name rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePreferences {
    /// Slots rendered for every name, in order.
    pub persons: Vec<Slot>,
    pub romanized_cjk: Option<RomanizedNameFormatting>,
}

impl From<&StyleConfig> for NamePreferences {
    fn from(config: &StyleConfig) -> Self {
        Self {
            persons: config.persons.clone(),
            romanized_cjk: config.name_formatting.romanized_cjk,
        }
    }
}

impl Default for NamePreferences {
    fn default() -> Self {
        Self::from(&cne_style::default_config())
    }
}

/// Per-engine bookkeeping. Lives on the engine instance so that engines for
/// different styles never share configuration.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentState {
    config: Option<StyleConfig>,
}

impl EnrichmentState {
    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// The configuration applied to this engine, once configured.
    pub fn config(&self) -> Option<&StyleConfig> {
        self.config.as_ref()
    }
}

/// The host's citation engine.
pub trait CitationEngine {
    /// Source of the style this engine was built for.
    fn style_xml(&self) -> &str;

    /// Set the active name-rendering slots. Calling it again with the same
    /// preferences has no further effect.
    fn set_name_preferences(&mut self, preferences: &NamePreferences);

    fn enrichment_state_mut(&mut self) -> &mut EnrichmentState;

    /// Render one name variable of an item. `None` when the item has none.
    fn format_names(&self, item: &EngineItem, variable: NameVariable) -> Option<String>;
}

/// Resolves a style's configuration and applies it to engines.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfigurator;

impl EngineConfigurator {
    pub fn new() -> Self {
        Self
    }

    /// Configure `engine` unless it already is. Returns true when the
    /// preferences were applied by this call.
    ///
    /// A malformed directive is logged and the default configuration is used.
    pub fn configure(&self, engine: &mut dyn CitationEngine) -> bool {
        if engine.enrichment_state_mut().is_configured() {
            debug!("engine already configured");
            return false;
        }

        let (config, error) = cne_style::extract_or_default(engine.style_xml());
        if let Some(err) = error {
            warn!(code = err.code(), "ignoring style directive: {}", err.to_report());
        }

        debug!(persons = ?config.persons, "applying name preferences");
        engine.set_name_preferences(&NamePreferences::from(&config));
        engine.enrichment_state_mut().config = Some(config);
        true
    }
}
