//! Registry of the linters an application knows about.

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::{Linter, LinterConfig, LinterInstance, OptionSchema, OptionSpec};
use crate::error::LintrapError;

/// Constructs a linter from its validated configuration.
pub type LinterFactory =
    Arc<dyn Fn(&LinterConfig) -> Result<Box<dyn Linter>, LintrapError> + Send + Sync>;

/// Returns the canonical linter name for a type: its name without the module
/// path or generic arguments.
pub fn canonical_name_of<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
}

/// Everything the framework needs to know about one kind of linter.
#[derive(Clone)]
pub struct LinterDescriptor {
    name: String,
    description: String,
    schema: OptionSchema,
    factory: LinterFactory,
}

impl LinterDescriptor {
    /// Starts describing a linter with an explicit canonical name.
    ///
    /// Namespaced names such as `Custom::Foo` are allowed.
    pub fn builder(name: impl Into<String>) -> LinterDescriptorBuilder {
        LinterDescriptorBuilder {
            name: name.into(),
            description: String::new(),
            options: Vec::new(),
        }
    }

    /// Starts describing linter type `T`, named after the type.
    pub fn builder_for<T: Linter + 'static>() -> LinterDescriptorBuilder {
        Self::builder(canonical_name_of::<T>())
    }

    /// Canonical name used in configuration and on the command line.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn schema(&self) -> &OptionSchema {
        &self.schema
    }

    /// Validates `raw` configuration against this linter's options.
    pub fn validate(&self, raw: &Map<String, Value>) -> Result<LinterConfig, LintrapError> {
        self.schema.validate(&self.name, raw)
    }

    /// Creates a fresh linter instance.
    pub fn instantiate(&self, config: LinterConfig) -> Result<LinterInstance, LintrapError> {
        let linter = (self.factory)(&config)?;
        Ok(LinterInstance::new(self.name.clone(), config, linter))
    }
}

impl fmt::Debug for LinterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinterDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Builder for [`LinterDescriptor`].
///
/// # Example
///
/// ```rust,ignore
/// let descriptor = LinterDescriptor::builder("LineLength")
///     .description("Checks that lines are not too long")
///     .option("max", OptionSpec::new(OptionType::Integer).default_value(80))
///     .build(|config| Ok(Box::new(LineLength { max: config.get_u64("max")? })))?;
/// ```
pub struct LinterDescriptorBuilder {
    name: String,
    description: String,
    options: Vec<(String, OptionSpec)>,
}

impl LinterDescriptorBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declares an option. Declarations are checked in [`Self::build`].
    pub fn option(mut self, name: impl Into<String>, spec: OptionSpec) -> Self {
        self.options.push((name.into(), spec));
        self
    }

    /// Finishes the descriptor.
    ///
    /// Fails with [`LintrapError::InvalidOptionSpecification`] when an option
    /// is declared twice or shadows a built-in option.
    pub fn build<F>(self, factory: F) -> Result<LinterDescriptor, LintrapError>
    where
        F: Fn(&LinterConfig) -> Result<Box<dyn Linter>, LintrapError> + Send + Sync + 'static,
    {
        if self.name.is_empty() {
            return Err(LintrapError::InvalidOptionSpecification(
                "Linter name must not be empty".to_string(),
            ));
        }

        let mut schema = OptionSchema::new();
        for (name, spec) in self.options {
            schema.add(&self.name, name, spec)?;
        }

        Ok(LinterDescriptor {
            name: self.name,
            description: self.description,
            schema,
            factory: Arc::new(factory),
        })
    }
}

/// All linters available to an application, in registration order.
#[derive(Debug, Clone, Default)]
pub struct LinterRegistry {
    linters: Vec<Arc<LinterDescriptor>>,
}

impl LinterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a linter. Canonical names must be unique.
    pub fn register(&mut self, descriptor: LinterDescriptor) -> Result<(), LintrapError> {
        if self.contains(descriptor.name()) {
            return Err(LintrapError::LinterLoad(format!(
                "Linter {} is already registered",
                descriptor.name()
            )));
        }
        self.linters.push(Arc::new(descriptor));
        Ok(())
    }

    /// Looks up a linter by canonical name.
    pub fn get(&self, name: &str) -> Option<&Arc<LinterDescriptor>> {
        self.linters.iter().find(|d| d.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates registered linters in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<LinterDescriptor>> {
        self.linters.iter()
    }

    /// Canonical names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.linters.iter().map(|d| d.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.linters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.linters.is_empty()
    }
}
