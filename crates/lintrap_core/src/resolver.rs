//! Configuration resolution.
//!
//! Merges a configuration with every configuration it extends, either through
//! `extends` entries or through the packaged configuration of a linter plugin.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{Configuration, EXTENDS_KEY, LINTER_PLUGINS_KEY};
use crate::error::LintrapError;
use crate::plugin::PluginRegistry;

/// Resolves configurations to their final, merged representation.
pub struct ConfigurationResolver<'a> {
    plugins: &'a PluginRegistry,
    loaded_plugins: Vec<String>,
}

impl<'a> ConfigurationResolver<'a> {
    /// Creates a resolver that looks plugins up in `plugins`.
    pub fn new(plugins: &'a PluginRegistry) -> Self {
        Self {
            plugins,
            loaded_plugins: Vec::new(),
        }
    }

    /// Resolves `conf`, returning one configuration with every extended
    /// configuration merged underneath it.
    ///
    /// Parents are merged in declaration order (`extends` entries first, then
    /// plugins), so later entries win over earlier ones and `conf` wins over
    /// all of them. The `extends` and `linter_plugins` keys are removed from
    /// the result. `extra_plugins` are treated as if they were listed in the
    /// `linter_plugins` of `conf` itself.
    pub fn resolve(
        &mut self,
        conf: Configuration,
        extra_plugins: &[String],
    ) -> Result<Configuration, LintrapError> {
        let mut chain = Vec::new();
        if let Some(path) = conf.path() {
            chain.push(canonical(path));
        }
        self.resolve_with_chain(conf, extra_plugins, &mut chain)
    }

    /// Names of the plugins activated while resolving, in activation order.
    pub fn loaded_plugins(&self) -> &[String] {
        &self.loaded_plugins
    }

    fn resolve_with_chain(
        &mut self,
        mut conf: Configuration,
        extra_plugins: &[String],
        chain: &mut Vec<PathBuf>,
    ) -> Result<Configuration, LintrapError> {
        let extends = conf.string_list(EXTENDS_KEY)?;
        let mut plugin_names = conf.string_list(LINTER_PLUGINS_KEY)?;
        plugin_names.extend(extra_plugins.iter().cloned());
        conf.remove(EXTENDS_KEY);
        conf.remove(LINTER_PLUGINS_KEY);

        let mut parents = Vec::new();

        for extend_path in &extends {
            let config_path = conf.base_dir().join(extend_path);
            debug!("Resolving extended configuration {}", config_path.display());
            parents.push(self.resolve_file(&config_path, chain)?);
        }

        for name in &plugin_names {
            let plugin = self.plugins.get(name)?;
            if !self.loaded_plugins.contains(name) {
                self.loaded_plugins.push(name.clone());
            }

            if let Some(config_path) = plugin.config_file_path().filter(|p| p.is_file()) {
                debug!(
                    "Resolving configuration of plugin '{}' at {}",
                    name,
                    config_path.display()
                );
                parents.push(self.resolve_file(&config_path, chain)?);
            }
        }

        let mut parents = parents.into_iter();
        match parents.next() {
            None => Ok(conf),
            Some(first) => {
                let ancestor = parents.fold(first, |merged, parent| merged.merge(&parent));
                Ok(ancestor.merge(&conf))
            }
        }
    }

    fn resolve_file(
        &mut self,
        path: &Path,
        chain: &mut Vec<PathBuf>,
    ) -> Result<Configuration, LintrapError> {
        let loaded = Configuration::from_file(path)?;
        let key = canonical(path);

        if chain.contains(&key) {
            let mut cycle = chain.clone();
            cycle.push(key);
            return Err(LintrapError::ExtendsCycle(cycle));
        }

        chain.push(key);
        let resolved = self.resolve_with_chain(loaded, &[], chain);
        chain.pop();
        resolved
    }
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
