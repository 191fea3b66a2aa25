//! Linter plugins.
//!
//! A plugin bundles a set of linters with an optional configuration file that
//! is merged underneath the user's configuration. Plugins are registered with
//! a [`PluginRegistry`] by the host application and activated by name through
//! the `linter_plugins` configuration key or the `--plugin` flag.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::LintrapError;
use crate::linter::LinterRegistry;

/// A collection of linters and configuration shipped together.
pub trait LinterPlugin: Send + Sync {
    /// Name used to activate the plugin.
    fn name(&self) -> &str;

    /// Registers the plugin's linters.
    fn register_linters(&self, registry: &mut LinterRegistry) -> Result<(), LintrapError>;

    /// Path of the configuration file that ships with this plugin.
    ///
    /// The file does not need to exist; a missing file contributes nothing.
    fn config_file_path(&self) -> Option<PathBuf> {
        None
    }
}

/// Plugins available to an application, keyed by name.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn LinterPlugin>>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plugin. Names must be unique.
    pub fn register(&mut self, plugin: impl LinterPlugin + 'static) -> Result<(), LintrapError> {
        self.register_shared(Arc::new(plugin))
    }

    /// Adds a plugin that is already shared.
    pub fn register_shared(&mut self, plugin: Arc<dyn LinterPlugin>) -> Result<(), LintrapError> {
        if self.plugins.iter().any(|p| p.name() == plugin.name()) {
            return Err(LintrapError::LinterLoad(format!(
                "Linter plugin '{}' is already registered",
                plugin.name()
            )));
        }
        self.plugins.push(plugin);
        Ok(())
    }

    /// Looks up a plugin by name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn LinterPlugin>, LintrapError> {
        self.plugins
            .iter()
            .find(|p| p.name() == name)
            .cloned()
            .ok_or_else(|| {
                LintrapError::LinterLoad(format!(
                    "Unable to load linter plugin '{}': no plugin with that name is available",
                    name
                ))
            })
    }

    /// Names of all registered plugins.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(|p| p.name())
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
