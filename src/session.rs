use crate::builder;
use crate::config::ProviderConfig;
use crate::confirm::Workflow;
use crate::console::Console;
use crate::git;
use crate::prompt;
use crate::provider::{Candidate, Gateway, ProviderError};
use crate::ui::{self, StepIndicator};
use anyhow::Result;
use std::path::Path;

/// one run's worth of generation state: the diff, the provider and its client
pub struct Session<'a, G: Gateway, S: StepIndicator> {
    root: &'a Path,
    diff: &'a str,
    provider: &'a ProviderConfig,
    gateway: G,
    indicator: S,
    debug_prompt: bool,
}

impl<'a, G: Gateway, S: StepIndicator> Session<'a, G, S> {
    pub fn new(
        root: &'a Path,
        diff: &'a str,
        provider: &'a ProviderConfig,
        gateway: G,
        indicator: S,
    ) -> Self {
        Self {
            root,
            diff,
            provider,
            gateway,
            indicator,
            debug_prompt: false,
        }
    }

    /// echo every compiled prompt before it is sent
    pub fn with_debug_prompt(mut self, debug_prompt: bool) -> Self {
        self.debug_prompt = debug_prompt;
        self
    }
}

impl<G: Gateway, S: StepIndicator> Workflow for Session<'_, G, S> {
    fn generate(&mut self, console: &mut dyn Console) -> Result<Option<Candidate>> {
        let Some(config) = builder::build(console, self.provider)? else {
            return Ok(None);
        };

        self.indicator.start(if config.is_preset {
            "crafting prompt with preset config"
        } else {
            "crafting prompt with user preferences"
        });
        let prompt = prompt::compile(&config, self.diff);
        self.indicator.complete();

        if self.debug_prompt {
            console.status("compiled prompt:");
            for line in prompt.lines() {
                console.info(&format!("> {line}"));
            }
        }

        self.indicator.start(&format!(
            "calling {} ({}) with temperature {}",
            self.provider.provider, self.provider.model, self.provider.temperature
        ));
        let result = self.gateway.complete(&prompt);
        match &result {
            Ok(_) => self.indicator.complete(),
            Err(e) => {
                self.indicator.fail(&e.to_string());
                report_failure(console, e);
            }
        }

        Ok(Some(Candidate::from(result)))
    }

    fn commit(&mut self, message: &str) -> Result<bool> {
        git::commit(self.root, message)
    }

    fn edit(&mut self, message: &str) -> Result<String> {
        ui::edit_with(&ui::resolve_editor(), message)
    }
}

fn report_failure(console: &mut dyn Console, e: &ProviderError) {
    tracing::warn!(error = %e, "model call failed");

    if let ProviderError::Status {
        status, details, ..
    } = e
    {
        console.error(&format!("model API returned status {status}"));
        match details {
            Some(body) => {
                let body = serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
                for line in body.lines() {
                    console.error(line);
                }
            }
            None => console.error("failed to parse error body"),
        }
    }
}
