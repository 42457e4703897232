//! Shared screen context
//!
//! One explicit context object owned by the router and lent to every screen
//! handler. There is no module-level settings cache; the store inside the
//! context is the only holder of loaded settings.

use crate::probe::EnvProbe;
use crate::proc::ProcessRunner;
use crate::prompt::Prompt;
use crate::settings::SettingsStore;
use crate::verify::BootVerifier;

pub struct Ctx {
    pub settings: SettingsStore,
    pub runner: ProcessRunner,
    pub probe: EnvProbe,
    pub prompt: Box<dyn Prompt>,
}

impl Ctx {
    pub fn new(settings: SettingsStore, prompt: Box<dyn Prompt>) -> Self {
        let runner = ProcessRunner::new();
        Self {
            settings,
            runner,
            probe: EnvProbe::new(runner),
            prompt,
        }
    }

    /// Boot verifier wired to this context's probe and runner.
    pub fn verifier(&self) -> BootVerifier {
        BootVerifier::new(self.probe, self.runner)
    }
}
