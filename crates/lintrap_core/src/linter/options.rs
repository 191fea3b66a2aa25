//! Linter option schemas and validated linter configuration.

use serde_json::{Map, Value};

use crate::config::{string_list, type_name};
use crate::error::LintrapError;
use crate::severity::Severity;

/// Options every linter accepts in addition to its own schema.
pub const BUILT_IN_OPTIONS: [&str; 4] = ["enabled", "severity", "include", "exclude"];

/// Type of a declared linter option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    Boolean,
    Integer,
    /// Any number, including integers.
    Float,
    String,
    Array,
    Map,
    /// Any value, including null.
    Any,
}

impl OptionType {
    /// Returns whether `value` is acceptable for this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            OptionType::Boolean => value.is_boolean(),
            OptionType::Integer => value.is_i64() || value.is_u64(),
            OptionType::Float => value.is_number(),
            OptionType::String => value.is_string(),
            OptionType::Array => value.is_array(),
            OptionType::Map => value.is_object(),
            OptionType::Any => true,
        }
    }

    /// Name used in error messages and documentation.
    pub fn name(&self) -> &'static str {
        match self {
            OptionType::Boolean => "boolean",
            OptionType::Integer => "integer",
            OptionType::Float => "float",
            OptionType::String => "string",
            OptionType::Array => "array",
            OptionType::Map => "map",
            OptionType::Any => "any",
        }
    }
}

/// Declaration of a single linter option.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    pub kind: OptionType,
    pub default: Option<Value>,
    pub description: String,
}

impl OptionSpec {
    /// Declares an option of the given type with no default.
    pub fn new(kind: OptionType) -> Self {
        Self {
            kind,
            default: None,
            description: String::new(),
        }
    }

    /// Sets the value used when the configuration omits this option.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the description shown in documentation.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Ordered set of options declared by a linter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionSchema {
    options: Vec<(String, OptionSpec)>,
}

impl OptionSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an option.
    ///
    /// Redeclaring an option or shadowing a built-in option is an
    /// [`LintrapError::InvalidOptionSpecification`].
    pub fn add(
        &mut self,
        linter_name: &str,
        name: impl Into<String>,
        spec: OptionSpec,
    ) -> Result<(), LintrapError> {
        let name = name.into();

        if BUILT_IN_OPTIONS.contains(&name.as_str()) {
            return Err(LintrapError::InvalidOptionSpecification(format!(
                "Option `{}` on linter {} conflicts with a built-in option",
                name, linter_name
            )));
        }
        if self.get(&name).is_some() {
            return Err(LintrapError::InvalidOptionSpecification(format!(
                "Option `{}` is declared more than once on linter {}",
                name, linter_name
            )));
        }
        if let Some(default) = &spec.default
            && !spec.kind.accepts(default)
        {
            return Err(LintrapError::InvalidOptionSpecification(format!(
                "Default value for option `{}` on linter {} must be of type {}, but was {}",
                name,
                linter_name,
                spec.kind.name(),
                type_name(default)
            )));
        }

        self.options.push((name, spec));
        Ok(())
    }

    /// Looks up an option declaration.
    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        self.options
            .iter()
            .find(|(option, _)| option == name)
            .map(|(_, spec)| spec)
    }

    /// Iterates declarations in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionSpec)> {
        self.options.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Validates raw configuration against this schema and the built-in
    /// options, filling in defaults.
    pub fn validate(
        &self,
        linter_name: &str,
        raw: &Map<String, Value>,
    ) -> Result<LinterConfig, LintrapError> {
        let unknown: Vec<&str> = raw
            .keys()
            .map(String::as_str)
            .filter(|key| !BUILT_IN_OPTIONS.contains(key) && self.get(key).is_none())
            .collect();

        if !unknown.is_empty() {
            let available: Vec<&str> = BUILT_IN_OPTIONS
                .iter()
                .copied()
                .chain(self.options.iter().map(|(name, _)| name.as_str()))
                .collect();
            return Err(LintrapError::linter_config(format!(
                "Unknown configuration {} for {}: {}\nAvailable options: {}",
                if unknown.len() == 1 { "option" } else { "options" },
                linter_name,
                unknown.join(", "),
                available.join(", ")
            )));
        }

        let mut options = Map::new();
        for (name, spec) in &self.options {
            let value = raw
                .get(name)
                .or(spec.default.as_ref())
                .cloned()
                .unwrap_or(Value::Null);

            if !spec.kind.accepts(&value) {
                return Err(LintrapError::linter_config(format!(
                    "Option `{}` for linter {} must be of type {}, but was {} ({})",
                    name,
                    linter_name,
                    spec.kind.name(),
                    type_name(&value),
                    value
                )));
            }
            options.insert(name.clone(), value);
        }

        let enabled = match raw.get("enabled") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(enabled)) => *enabled,
            Some(other) => {
                return Err(LintrapError::linter_config(format!(
                    "Option `enabled` for linter {} must be of type boolean, but was {}",
                    linter_name,
                    type_name(other)
                )));
            }
        };

        let severity = match raw.get("severity") {
            None | Some(Value::Null) => Severity::Error,
            Some(Value::String(name)) => Severity::from(name.as_str()),
            Some(other) => {
                return Err(LintrapError::linter_config(format!(
                    "Option `severity` for linter {} must be of type string, but was {}",
                    linter_name,
                    type_name(other)
                )));
            }
        };

        let include = match raw.get("include") {
            None | Some(Value::Null) => None,
            value => Some(string_list("include", value)?),
        };
        let exclude = string_list("exclude", raw.get("exclude"))?;

        Ok(LinterConfig {
            linter_name: linter_name.to_string(),
            enabled,
            severity,
            include,
            exclude,
            options,
        })
    }
}

/// Validated configuration of one linter instance.
#[derive(Debug, Clone, PartialEq)]
pub struct LinterConfig {
    linter_name: String,
    enabled: bool,
    severity: Severity,
    include: Option<Vec<String>>,
    exclude: Vec<String>,
    options: Map<String, Value>,
}

impl LinterConfig {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Severity given to lints this linter reports.
    pub fn severity(&self) -> &Severity {
        &self.severity
    }

    /// Glob patterns a file must match for the linter to run, if configured.
    pub fn include(&self) -> Option<&[String]> {
        self.include.as_deref()
    }

    /// Glob patterns that prevent the linter from running on a file.
    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    /// Returns a declared option's value (after defaults were applied).
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, LintrapError> {
        self.typed(name, Value::as_bool, OptionType::Boolean)
    }

    pub fn get_i64(&self, name: &str) -> Result<i64, LintrapError> {
        self.typed(name, Value::as_i64, OptionType::Integer)
    }

    pub fn get_u64(&self, name: &str) -> Result<u64, LintrapError> {
        self.typed(name, Value::as_u64, OptionType::Integer)
    }

    pub fn get_f64(&self, name: &str) -> Result<f64, LintrapError> {
        self.typed(name, Value::as_f64, OptionType::Float)
    }

    pub fn get_str(&self, name: &str) -> Result<&str, LintrapError> {
        self.typed(name, Value::as_str, OptionType::String)
    }

    pub fn get_string_list(&self, name: &str) -> Result<Vec<String>, LintrapError> {
        self.require(name)?;
        string_list(name, self.get(name))
    }

    fn require(&self, name: &str) -> Result<&Value, LintrapError> {
        self.get(name).ok_or_else(|| {
            LintrapError::linter_config(format!(
                "Linter {} does not declare an option named `{}`",
                self.linter_name, name
            ))
        })
    }

    fn typed<'a, T>(
        &'a self,
        name: &str,
        extract: impl FnOnce(&'a Value) -> Option<T>,
        expected: OptionType,
    ) -> Result<T, LintrapError> {
        let value = self.require(name)?;
        extract(value).ok_or_else(|| {
            LintrapError::linter_config(format!(
                "Option `{}` for linter {} must be of type {}, but was {}",
                name,
                self.linter_name,
                expected.name(),
                type_name(value)
            ))
        })
    }
}
