use crate::config::Config;
use crate::mock::Mock;
use std::collections::BTreeMap;

/// Builds a [`Mock`] with a name, optional operation signatures and config.
///
/// Declared signatures make arity mistakes fail at declaration time. A sealed
/// mock also rejects operations that were never declared.
pub struct MockBuilder {
    name: String,
    config: Option<Config>,
    signatures: BTreeMap<String, usize>,
    sealed: bool,
}

impl Default for MockBuilder {
    fn default() -> Self {
        Self::new("Mock")
    }
}

impl MockBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: None,
            signatures: BTreeMap::new(),
            sealed: false,
        }
    }

    /// Use `config` instead of the process-wide configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Declare an operation and its parameter count. Only the count is
    /// checked; matcher types are not compared with parameter types.
    pub fn operation(mut self, name: &str, arity: usize) -> Self {
        self.signatures.insert(name.to_string(), arity);
        self
    }

    pub fn sealed(mut self) -> Self {
        self.sealed = true;
        self
    }

    pub fn build(self) -> Mock {
        let config = self.config.unwrap_or_else(|| Config::global().clone());
        Mock::from_parts(self.name, config, self.signatures, self.sealed)
    }
}
