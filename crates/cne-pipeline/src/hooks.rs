//! Installing the pipeline into a host.
//!
//! [`Hooks`] wraps the host's record conversion with the
//! [`EnrichmentPipeline`] and its engine factory with the
//! [`EngineConfigurator`]. It is a small state machine:
//!
//! ```text
//! Uninstalled --install--> Installed --remove--> Removed --install--> Installed
//! ```
//!
//! Installing twice, removing when nothing is installed, and extension
//! points the host does not provide are logged and otherwise ignored.

use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::configurator::{CitationEngine, EngineConfigurator};
use crate::error::PatchError;
use crate::host::{
    ConversionArgs, ConvertFn, EngineArgs, EngineFactoryFn, Host, HostRecord, StyleSource,
};
use crate::pipeline::EnrichmentPipeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookState {
    Uninstalled,
    Installed,
    Removed,
}

pub struct Hooks {
    state: HookState,
    pipeline: Rc<EnrichmentPipeline>,
    configurator: EngineConfigurator,
    // Which points this instance wrapped; only those are restored on removal.
    owns_convert: bool,
    owns_engine_factory: bool,
}

impl Hooks {
    pub fn new(pipeline: Rc<EnrichmentPipeline>) -> Self {
        Self {
            state: HookState::Uninstalled,
            pipeline,
            configurator: EngineConfigurator::new(),
            owns_convert: false,
            owns_engine_factory: false,
        }
    }

    pub fn state(&self) -> HookState {
        self.state
    }

    pub fn is_installed(&self) -> bool {
        self.state == HookState::Installed
    }

    pub fn pipeline(&self) -> &Rc<EnrichmentPipeline> {
        &self.pipeline
    }

    /// Wrap the host's extension points. Returns true when this call
    /// installed at least one of them.
    pub fn install(&mut self, host: &mut Host) -> bool {
        if self.is_installed() {
            debug!("hooks already installed");
            return false;
        }

        let pipeline = Rc::clone(&self.pipeline);
        let convert = host.convert.patch(move |original: Rc<ConvertFn>| {
            Rc::new(move |record: &dyn HostRecord, args: &ConversionArgs| {
                pipeline.convert(original.as_ref(), record, args)
            }) as Rc<ConvertFn>
        });
        self.owns_convert = log_patch(host.convert.name(), convert);

        let configurator = self.configurator;
        let factory = host
            .engine_factory
            .patch(move |original: Rc<EngineFactoryFn>| {
                Rc::new(move |style: &StyleSource, args: &EngineArgs| {
                    let mut engine: Box<dyn CitationEngine> = original(style, args);
                    configurator.configure(engine.as_mut());
                    engine
                }) as Rc<EngineFactoryFn>
            });
        self.owns_engine_factory = log_patch(host.engine_factory.name(), factory);

        if self.owns_convert || self.owns_engine_factory {
            self.state = HookState::Installed;
            info!(
                convert = self.owns_convert,
                engine_factory = self.owns_engine_factory,
                "hooks installed"
            );
            true
        } else {
            false
        }
    }

    /// Restore the functions this instance wrapped. Returns true when hooks
    /// were installed.
    pub fn remove(&mut self, host: &mut Host) -> bool {
        if !self.is_installed() {
            debug!(state = ?self.state, "hooks not installed, nothing to remove");
            return false;
        }

        if std::mem::take(&mut self.owns_convert)
            && let Err(err) = host.convert.unpatch()
        {
            warn!("{}", err);
        }
        if std::mem::take(&mut self.owns_engine_factory)
            && let Err(err) = host.engine_factory.unpatch()
        {
            warn!("{}", err);
        }

        self.state = HookState::Removed;
        info!("hooks removed");
        true
    }
}

/// Log a patch outcome. True when the point was wrapped.
fn log_patch(name: &str, result: Result<(), PatchError>) -> bool {
    match result {
        Ok(()) => true,
        Err(err @ PatchError::Missing { .. }) => {
            warn!(point = name, "{}, enrichment disabled for it", err);
            false
        }
        Err(err) => {
            debug!(point = name, "{}", err);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Creator, Record};
    use crate::patch::ExtensionPoint;
    use crate::settings::Settings;
    use cne_names::EngineQuirks;

    fn record() -> Record {
        let mut record = Record::new("book");
        record.set_field("extra", "cne-title-romanized: Hongloumeng");
        record.creators = vec![Creator::person("author", "Cao", "Xueqin")];
        record
    }

    fn hooks() -> Hooks {
        Hooks::new(Rc::new(EnrichmentPipeline::new(Settings::default())))
    }

    fn style() -> StyleSource {
        StyleSource {
            id: "test".to_string(),
            xml: r#"<style><info><?cne-config {"persons":["orig"]}?></info></style>"#.to_string(),
        }
    }

    #[test]
    fn test_install_wraps_both_points() {
        let mut host = Host::reference(EngineQuirks::default());
        let mut hooks = hooks();

        assert!(hooks.install(&mut host));
        assert_eq!(hooks.state(), HookState::Installed);

        let item = host
            .convert_record(&record(), &ConversionArgs::default())
            .unwrap();
        assert_eq!(
            item.get_variable("cne-title-romanized").as_deref(),
            Some("Hongloumeng")
        );

        let mut engine = host.create_engine(&style(), &EngineArgs::default()).unwrap();
        assert!(engine.enrichment_state_mut().is_configured());
    }

    #[test]
    fn test_install_is_idempotent() {
        let mut host = Host::reference(EngineQuirks::default());
        let mut hooks = hooks();
        assert!(hooks.install(&mut host));
        assert!(!hooks.install(&mut host));

        // A second instance, as after a reload, does not stack.
        let mut reloaded = Hooks::new(Rc::clone(hooks.pipeline()));
        assert!(!reloaded.install(&mut host));
        assert_eq!(reloaded.state(), HookState::Uninstalled);
    }

    #[test]
    fn test_remove_restores_originals() {
        let mut host = Host::reference(EngineQuirks::default());
        let original = host.convert.get().unwrap();
        let mut hooks = hooks();

        assert!(!hooks.remove(&mut host));
        hooks.install(&mut host);
        assert!(hooks.remove(&mut host));
        assert_eq!(hooks.state(), HookState::Removed);
        assert!(Rc::ptr_eq(&original, &host.convert.get().unwrap()));
        assert!(!host.engine_factory.is_patched());

        let item = host
            .convert_record(&record(), &ConversionArgs::default())
            .unwrap();
        assert!(item.other.is_empty());

        // Removed -> Installed.
        assert!(hooks.install(&mut host));
        assert!(hooks.is_installed());
    }

    #[test]
    fn test_missing_point_is_tolerated() {
        let reference = Host::reference(EngineQuirks::default());
        let mut host = Host {
            convert: ExtensionPoint::missing("convert"),
            engine_factory: reference.engine_factory,
        };
        let mut hooks = hooks();

        assert!(hooks.install(&mut host));
        assert!(!host.convert.is_available());
        assert!(host.engine_factory.is_patched());
        assert!(hooks.remove(&mut host));
        assert!(!host.engine_factory.is_patched());
    }
}
