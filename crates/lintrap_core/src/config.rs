//! Layered configuration.
//!
//! A [`Configuration`] is an ordered tree of JSON-like values. Configurations
//! are combined with [`Configuration::merge`], which merges nested maps
//! recursively and replaces every other kind of value.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::LintrapError;
use crate::severity::Severity;

/// Key listing configuration files this configuration extends.
pub const EXTENDS_KEY: &str = "extends";
/// Key listing linter plugins whose configuration should be merged in.
pub const LINTER_PLUGINS_KEY: &str = "linter_plugins";

/// Stores runtime configuration for an application.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Configuration {
    values: Map<String, Value>,

    /// File this configuration was loaded from, if any. Relative `extends`
    /// entries are resolved against its directory.
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl PartialEq for Configuration {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Configuration {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration from a map of values.
    pub fn from_map(values: Map<String, Value>) -> Self {
        Self { values, path: None }
    }

    /// Creates a configuration from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, LintrapError> {
        match value {
            Value::Object(values) => Ok(Self::from_map(values)),
            Value::Null => Ok(Self::new()),
            other => Err(LintrapError::ConfigurationParse {
                path: PathBuf::new(),
                message: format!("expected a map at the top level, found {}", type_name(&other)),
            }),
        }
    }

    /// Loads a configuration file.
    ///
    /// `.yaml` and `.yml` files are parsed as YAML; everything else as JSONC.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LintrapError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LintrapError::NoConfigurationFile(format!(
                "Unable to load configuration from '{}': {}",
                path.display(),
                e
            ))
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        );
        let parsed = if is_yaml {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        };

        let mut config = parsed.map_err(|e| match e {
            LintrapError::ConfigurationParse { message, .. } => LintrapError::ConfigurationParse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;
        config.path = Some(path.to_path_buf());

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parses a configuration from JSON (comments and trailing commas allowed).
    pub fn from_json(json: &str) -> Result<Self, LintrapError> {
        let value = jsonc_parser::parse_to_serde_value(json, &Default::default())
            .map_err(|e| parse_error(e.to_string()))?
            .unwrap_or(Value::Null);
        Self::from_value(value)
    }

    /// Parses a configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, LintrapError> {
        if yaml.trim().is_empty() {
            return Ok(Self::new());
        }
        let value: Value = serde_yaml::from_str(yaml).map_err(|e| parse_error(e.to_string()))?;
        Self::from_value(value)
    }

    /// Searches `start` and each of its ancestors for the first existing file
    /// named in `file_names`, in order of precedence.
    pub fn discover(start: impl AsRef<Path>, file_names: &[String]) -> Option<PathBuf> {
        start
            .as_ref()
            .ancestors()
            .flat_map(|dir| file_names.iter().map(move |name| dir.join(name)))
            .find(|candidate| candidate.is_file())
    }

    /// Returns the file this configuration was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Sets the file this configuration is considered to come from.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Directory against which relative paths in this configuration resolve.
    pub fn base_dir(&self) -> &Path {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new(""))
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns whether `key` is set.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Sets `key` to `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Removes `key` and returns its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.shift_remove(key)
    }

    /// Returns the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Returns a string value, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Returns a list of strings stored under `key`.
    ///
    /// A single string is treated as a one-element list and a missing key as
    /// an empty list.
    pub fn string_list(&self, key: &str) -> Result<Vec<String>, LintrapError> {
        string_list(key, self.get(key))
    }

    /// Returns the severity stored under `key`, or `default`.
    pub fn severity(&self, key: &str, default: Severity) -> Severity {
        self.get_str(key).map(Severity::from).unwrap_or(default)
    }

    /// Merges `other` on top of this configuration.
    ///
    /// Nested maps present in both are merged recursively; every other value
    /// in `other` replaces the value in `self`. The result carries the path of
    /// `other` when it has one.
    pub fn merge(&self, other: &Configuration) -> Configuration {
        let mut values = self.values.clone();
        deep_merge(&mut values, &other.values);
        Configuration {
            values,
            path: other.path.clone().or_else(|| self.path.clone()),
        }
    }

    /// Returns the configuration for the linter with the given canonical
    /// name, with `severity` defaulted from `default_severity`.
    pub fn for_linter(&self, linter_name: &str) -> Map<String, Value> {
        let mut conf = self
            .get("linters")
            .and_then(|linters| linters.get(linter_name))
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        if conf.get("severity").is_none_or(Value::is_null) {
            let default = self
                .get("default_severity")
                .cloned()
                .unwrap_or_else(|| Value::String(Severity::Error.to_string()));
            conf.insert("severity".to_string(), default);
        }

        conf
    }
}

impl From<Map<String, Value>> for Configuration {
    fn from(values: Map<String, Value>) -> Self {
        Self::from_map(values)
    }
}

fn deep_merge(base: &mut Map<String, Value>, overrides: &Map<String, Value>) {
    for (key, value) in overrides {
        match (base.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                deep_merge(existing, incoming);
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

pub(crate) fn string_list(key: &str, value: Option<&Value>) -> Result<Vec<String>, LintrapError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(vec![s.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    LintrapError::linter_config(format!(
                        "`{}` must contain only strings, but found {}",
                        key,
                        type_name(item)
                    ))
                })
            })
            .collect(),
        Some(other) => Err(LintrapError::linter_config(format!(
            "`{}` must be a string or a list of strings, but was {}",
            key,
            type_name(other)
        ))),
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "map",
    }
}

fn parse_error(message: String) -> LintrapError {
    LintrapError::ConfigurationParse {
        path: PathBuf::new(),
        message,
    }
}
