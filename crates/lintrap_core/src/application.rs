//! Description of a linting tool built on lintrap.
//!
//! An [`Application`] names the tool, lists the configuration files and file
//! extensions it understands, and owns the registries of linters, plugins and
//! formatters together with the parser used to load documents.

use std::env;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Configuration;
use crate::document::{DocumentParser, PlainTextParser};
use crate::error::LintrapError;
use crate::formatters::{Destination, FormatterContext, FormatterForwarder, FormatterLoader};
use crate::linter::{LinterDescriptor, LinterRegistry};
use crate::options::RunOptions;
use crate::plugin::{LinterPlugin, PluginRegistry};
use crate::report::SeverityTable;
use crate::resolver::ConfigurationResolver;

/// A linting tool.
pub struct Application {
    name: String,
    executable_name: String,
    version: String,
    configuration_file_names: Vec<String>,
    file_extensions: Vec<String>,
    base_configuration: Configuration,
    home_url: Option<String>,
    issues_url: Option<String>,
    linters: LinterRegistry,
    plugins: PluginRegistry,
    activated_plugins: Vec<String>,
    formatters: FormatterLoader,
    document_parser: Arc<dyn DocumentParser>,
}

impl Application {
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::default()
    }

    /// Proper name of the tool.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn executable_name(&self) -> &str {
        &self.executable_name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Configuration file names, in order of precedence.
    pub fn configuration_file_names(&self) -> &[String] {
        &self.configuration_file_names
    }

    /// Extensions of the files the tool lints when searching directories.
    pub fn file_extensions(&self) -> &[String] {
        &self.file_extensions
    }

    /// Configuration every loaded configuration is merged on top of.
    pub fn base_configuration(&self) -> &Configuration {
        &self.base_configuration
    }

    pub fn home_url(&self) -> Option<&str> {
        self.home_url.as_deref()
    }

    pub fn issues_url(&self) -> Option<&str> {
        self.issues_url.as_deref()
    }

    /// Linters known to the application, including those of activated
    /// plugins.
    pub fn linters(&self) -> &LinterRegistry {
        &self.linters
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    pub fn formatters(&self) -> &FormatterLoader {
        &self.formatters
    }

    pub fn document_parser(&self) -> &dyn DocumentParser {
        self.document_parser.as_ref()
    }

    /// Loads the effective configuration for a run, searching from the
    /// current directory.
    pub fn load_configuration(
        &mut self,
        options: &RunOptions,
    ) -> Result<Configuration, LintrapError> {
        let working_directory = env::current_dir()?;
        self.load_configuration_from(options, &working_directory)
    }

    /// Loads the effective configuration for a run.
    ///
    /// Uses `options.config_file` when given, otherwise the first
    /// configuration file found in `working_directory` or its ancestors,
    /// otherwise an empty configuration. The result is resolved, the linters
    /// of every activated plugin are registered, and it is merged on top of
    /// the base configuration.
    pub fn load_configuration_from(
        &mut self,
        options: &RunOptions,
        working_directory: &Path,
    ) -> Result<Configuration, LintrapError> {
        let config = match &options.config_file {
            Some(path) => Configuration::from_file(path)?,
            None => match Configuration::discover(working_directory, &self.configuration_file_names)
            {
                Some(path) => {
                    info!("Using configuration {}", path.display());
                    Configuration::from_file(path)?
                }
                None => {
                    debug!("No configuration file found, using defaults");
                    Configuration::new()
                }
            },
        };

        let mut resolver = ConfigurationResolver::new(&self.plugins);
        let config = resolver.resolve(config, &options.linter_plugins)?;
        let loaded_plugins = resolver.loaded_plugins().to_vec();

        for name in loaded_plugins {
            if self.activated_plugins.contains(&name) {
                continue;
            }
            let plugin = self.plugins.get(&name)?;
            plugin.register_linters(&mut self.linters)?;
            debug!("Activated linter plugin '{}'", name);
            self.activated_plugins.push(name);
        }

        Ok(self.base_configuration.merge(&config))
    }

    /// Creates the formatters requested by `requested`, or the default one.
    pub fn load_formatters(
        &self,
        requested: &[(String, Destination)],
        config: &Configuration,
        debug: bool,
    ) -> Result<FormatterForwarder, LintrapError> {
        let context = FormatterContext {
            application_name: self.name.clone(),
            version: self.version.clone(),
            severities: SeverityTable::from_config(config),
            debug,
        };
        self.formatters.load(requested, &context)
    }
}

/// Builder for [`Application`].
#[derive(Default)]
pub struct ApplicationBuilder {
    name: Option<String>,
    executable_name: Option<String>,
    version: Option<String>,
    configuration_file_names: Option<Vec<String>>,
    file_extensions: Option<Vec<String>>,
    base_configuration: Option<Configuration>,
    home_url: Option<String>,
    issues_url: Option<String>,
    linters: Vec<LinterDescriptor>,
    plugins: Vec<Arc<dyn LinterPlugin>>,
    formatters: Option<FormatterLoader>,
    document_parser: Option<Arc<dyn DocumentParser>>,
}

impl ApplicationBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn executable_name(mut self, executable_name: impl Into<String>) -> Self {
        self.executable_name = Some(executable_name.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn configuration_file_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.configuration_file_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn file_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }

    pub fn base_configuration(mut self, config: Configuration) -> Self {
        self.base_configuration = Some(config);
        self
    }

    pub fn home_url(mut self, url: impl Into<String>) -> Self {
        self.home_url = Some(url.into());
        self
    }

    pub fn issues_url(mut self, url: impl Into<String>) -> Self {
        self.issues_url = Some(url.into());
        self
    }

    /// Registers a built-in linter.
    pub fn linter(mut self, descriptor: LinterDescriptor) -> Self {
        self.linters.push(descriptor);
        self
    }

    /// Makes a plugin available for activation.
    pub fn plugin(mut self, plugin: impl LinterPlugin + 'static) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    /// Replaces the set of formatters.
    pub fn formatters(mut self, formatters: FormatterLoader) -> Self {
        self.formatters = Some(formatters);
        self
    }

    /// Sets the parser used for documents. Defaults to [`PlainTextParser`].
    pub fn document_parser(mut self, parser: impl DocumentParser + 'static) -> Self {
        self.document_parser = Some(Arc::new(parser));
        self
    }

    /// Validates the description.
    ///
    /// Fails with [`LintrapError::ApplicationConfiguration`] when a required
    /// attribute is missing, or with a registration error for duplicate
    /// linters or plugins.
    pub fn build(self) -> Result<Application, LintrapError> {
        let mut linters = LinterRegistry::new();
        for descriptor in self.linters {
            linters.register(descriptor)?;
        }

        let mut plugins = PluginRegistry::new();
        for plugin in self.plugins {
            plugins.register_shared(plugin)?;
        }

        Ok(Application {
            name: required("name", self.name)?,
            executable_name: required("executable_name", self.executable_name)?,
            version: required("version", self.version)?,
            configuration_file_names: required(
                "configuration_file_names",
                self.configuration_file_names,
            )?,
            file_extensions: required("file_extensions", self.file_extensions)?,
            base_configuration: self.base_configuration.unwrap_or_default(),
            home_url: self.home_url,
            issues_url: self.issues_url,
            linters,
            plugins,
            activated_plugins: Vec::new(),
            formatters: self.formatters.unwrap_or_default(),
            document_parser: self
                .document_parser
                .unwrap_or_else(|| Arc::new(PlainTextParser)),
        })
    }
}

fn required<T>(attribute: &str, value: Option<T>) -> Result<T, LintrapError> {
    value.ok_or_else(|| {
        LintrapError::ApplicationConfiguration(format!("`{}` must be defined", attribute))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Behavior, scripted};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn builder() -> ApplicationBuilder {
        Application::builder()
            .name("Lintrap")
            .executable_name("lintrap")
            .version("1.0.0")
            .configuration_file_names([".lintrap.yaml", ".lintrap.json"])
            .file_extensions(["txt"])
    }

    struct BundledPlugin {
        config: PathBuf,
    }

    impl LinterPlugin for BundledPlugin {
        fn name(&self) -> &str {
            "bundled"
        }

        fn register_linters(&self, registry: &mut LinterRegistry) -> Result<(), LintrapError> {
            registry.register(scripted("Bundled::Check", Behavior::ReportFirstLine))
        }

        fn config_file_path(&self) -> Option<PathBuf> {
            Some(self.config.clone())
        }
    }

    #[rstest]
    #[case::name(Application::builder().executable_name("x").version("1").configuration_file_names(["a"]).file_extensions(["b"]), "name")]
    #[case::version(Application::builder().name("X").executable_name("x").configuration_file_names(["a"]).file_extensions(["b"]), "version")]
    #[case::extensions(Application::builder().name("X").executable_name("x").version("1").configuration_file_names(["a"]), "file_extensions")]
    fn test_missing_attributes(#[case] builder: ApplicationBuilder, #[case] attribute: &str) {
        match builder.build() {
            Err(LintrapError::ApplicationConfiguration(message)) => {
                assert_eq!(message, format!("`{}` must be defined", attribute));
            }
            Err(other) => panic!("Expected ApplicationConfiguration, got {}", other),
            Ok(_) => panic!("Expected ApplicationConfiguration, got an application"),
        }
    }

    #[test]
    fn test_build_registers_linters() {
        let app = builder()
            .linter(scripted("Alpha", Behavior::ReportFirstLine))
            .build()
            .unwrap();

        assert_eq!(app.linters().names(), vec!["Alpha"]);
        assert_eq!(app.document_parser().name(), "text");
        assert_eq!(app.formatters().names(), vec!["Checkstyle", "Default", "Json"]);
    }

    #[test]
    fn test_duplicate_linters_are_rejected() {
        let result = builder()
            .linter(scripted("Alpha", Behavior::ReportFirstLine))
            .linter(scripted("Alpha", Behavior::ReportEachLine))
            .build();
        assert!(matches!(result, Err(LintrapError::LinterLoad(_))));
    }

    #[test]
    fn test_load_configuration_without_file_uses_base() {
        let dir = tempdir().unwrap();
        let mut app = builder()
            .base_configuration(Configuration::from_value(json!({ "a": 1 })).unwrap())
            .build()
            .unwrap();

        let config = app
            .load_configuration_from(&RunOptions::default(), dir.path())
            .unwrap();

        assert_eq!(config, Configuration::from_value(json!({ "a": 1 })).unwrap());
    }

    #[test]
    fn test_load_configuration_discovers_file_and_merges_over_base() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".lintrap.json"), r#"{ "b": 2, "a": 3 }"#).unwrap();
        let nested = dir.path().join("nested/deeper");
        fs::create_dir_all(&nested).unwrap();

        let mut app = builder()
            .base_configuration(Configuration::from_value(json!({ "a": 1, "c": 0 })).unwrap())
            .build()
            .unwrap();

        let config = app
            .load_configuration_from(&RunOptions::default(), &nested)
            .unwrap();

        assert_eq!(
            config,
            Configuration::from_value(json!({ "a": 3, "c": 0, "b": 2 })).unwrap()
        );
    }

    #[test]
    fn test_explicit_config_file_must_exist() {
        let dir = tempdir().unwrap();
        let mut app = builder().build().unwrap();
        let options = RunOptions {
            config_file: Some(dir.path().join("missing.yaml")),
            ..Default::default()
        };

        let result = app.load_configuration_from(&options, dir.path());
        assert!(matches!(result, Err(LintrapError::NoConfigurationFile(_))));
    }

    #[test]
    fn test_plugins_register_linters_once() {
        let dir = tempdir().unwrap();
        let plugin_config = dir.path().join("bundled.yaml");
        fs::write(
            &plugin_config,
            "linters:\n  Bundled::Check:\n    enabled: true\n",
        )
        .unwrap();

        let mut app = builder()
            .plugin(BundledPlugin {
                config: plugin_config,
            })
            .build()
            .unwrap();
        let options = RunOptions {
            linter_plugins: vec!["bundled".to_string()],
            ..Default::default()
        };

        let config = app.load_configuration_from(&options, dir.path()).unwrap();
        app.load_configuration_from(&options, dir.path()).unwrap();

        assert_eq!(app.linters().names(), vec!["Bundled::Check"]);
        assert_eq!(
            config.for_linter("Bundled::Check").get("enabled"),
            Some(&json!(true))
        );
    }
}
