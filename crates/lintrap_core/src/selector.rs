//! Linter selection.
//!
//! Decides which linters run at all (configuration plus command line
//! inclusion/exclusion) and which of those apply to a given file (each
//! linter's own `include` / `exclude` patterns).

use std::path::Path;
use std::sync::Arc;

use globset::GlobSet;
use tracing::debug;

use crate::config::Configuration;
use crate::error::LintrapError;
use crate::file_finder::{build_globset, glob_matches};
use crate::linter::{LinterConfig, LinterDescriptor, LinterInstance, LinterRegistry};
use crate::options::RunOptions;

struct EnabledLinter {
    descriptor: Arc<LinterDescriptor>,
    config: LinterConfig,
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl EnabledLinter {
    fn new(descriptor: Arc<LinterDescriptor>, config: &Configuration) -> Result<Self, LintrapError> {
        let linter_config = descriptor.validate(&config.for_linter(descriptor.name()))?;
        let include = match linter_config.include() {
            Some(patterns) => Some(
                build_globset(patterns)
                    .map_err(|e| {
                        LintrapError::linter_config(format!(
                            "Invalid `include` for linter {}: {}",
                            descriptor.name(),
                            e
                        ))
                    })?
                    .unwrap_or_else(GlobSet::empty),
            ),
            None => None,
        };
        let exclude = build_globset(linter_config.exclude()).map_err(|e| {
            LintrapError::linter_config(format!(
                "Invalid `exclude` for linter {}: {}",
                descriptor.name(),
                e
            ))
        })?;

        Ok(Self {
            descriptor,
            config: linter_config,
            include,
            exclude,
        })
    }

    fn applies_to(&self, path: &Path) -> bool {
        if let Some(include) = &self.include
            && !glob_matches(include, path)
        {
            return false;
        }
        !self
            .exclude
            .as_ref()
            .is_some_and(|globs| glob_matches(globs, path))
    }
}

/// Chooses the linters to run against each file.
pub struct LinterSelector {
    enabled: Vec<EnabledLinter>,
}

impl LinterSelector {
    /// Computes the enabled linters and validates their configuration.
    ///
    /// Fails with [`LintrapError::NoSuchLinter`] for unknown linter names,
    /// [`LintrapError::NoLinters`] when nothing would run, and
    /// [`LintrapError::LinterConfiguration`] for invalid linter options.
    pub fn new(
        registry: &LinterRegistry,
        config: &Configuration,
        options: &RunOptions,
    ) -> Result<Self, LintrapError> {
        let explicitly_included = lookup(registry, &options.included_linters)?;
        let excluded = lookup(registry, &options.excluded_linters)?;

        let included = if explicitly_included.is_empty() {
            registry
                .iter()
                .filter(|descriptor| is_enabled(config, descriptor.name()))
                .cloned()
                .collect()
        } else {
            explicitly_included.clone()
        };

        let mut selected: Vec<Arc<LinterDescriptor>> = Vec::new();
        for descriptor in &included {
            let is_excluded = excluded.iter().any(|e| e.name() == descriptor.name());
            let is_duplicate = selected.iter().any(|s| s.name() == descriptor.name());
            if !is_excluded && !is_duplicate {
                selected.push(Arc::clone(descriptor));
            }
        }

        if selected.is_empty() {
            let message = if !explicitly_included.is_empty() {
                "All specified linters were explicitly excluded!"
            } else if included.is_empty() {
                "All linters are disabled. Enable some in your configuration!"
            } else {
                "All enabled linters were explicitly excluded!"
            };
            return Err(LintrapError::NoLinters(message.to_string()));
        }

        let enabled = selected
            .into_iter()
            .map(|descriptor| EnabledLinter::new(descriptor, config))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Enabled linters: {}",
            enabled
                .iter()
                .map(|linter| linter.descriptor.name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self { enabled })
    }

    /// Canonical names of the enabled linters, in selection order.
    pub fn enabled_linters(&self) -> Vec<&str> {
        self.enabled
            .iter()
            .map(|linter| linter.descriptor.name())
            .collect()
    }

    /// Creates instances of the enabled linters that apply to `path`.
    ///
    /// A linter is skipped when it has `include` patterns and none match, or
    /// when any of its `exclude` patterns match. Patterns match `path` as
    /// given or relative to the working directory.
    pub fn linters_for_file(&self, path: &Path) -> Result<Vec<LinterInstance>, LintrapError> {
        self.enabled
            .iter()
            .filter(|linter| linter.applies_to(path))
            .map(|linter| linter.descriptor.instantiate(linter.config.clone()))
            .collect()
    }
}

fn lookup(
    registry: &LinterRegistry,
    names: &[String],
) -> Result<Vec<Arc<LinterDescriptor>>, LintrapError> {
    names
        .iter()
        .map(|name| {
            registry
                .get(name)
                .cloned()
                .ok_or_else(|| LintrapError::NoSuchLinter(name.clone()))
        })
        .collect()
}

fn is_enabled(config: &Configuration, linter_name: &str) -> bool {
    config
        .for_linter(linter_name)
        .get("enabled")
        .and_then(|enabled| enabled.as_bool())
        .unwrap_or(false)
}
