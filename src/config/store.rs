//! Section/key lookup over configuration values.

use std::collections::HashMap;

/// Process-wide configuration store, addressed by section and key
/// (`app.secret_key` is `get("app", "secret_key")`).
pub trait ConfigStore: Send + Sync {
    fn get(&self, section: &str, key: &str) -> Option<String>;
}

/// In-memory configuration store.
#[derive(Clone, Debug, Default)]
pub struct MemoryConfig {
    values: HashMap<(String, String), String>,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, builder style.
    pub fn with(mut self, section: &str, key: &str, value: impl Into<String>) -> Self {
        self.set(section, key, value);
        self
    }

    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.values
            .insert((section.to_string(), key.to_string()), value.into());
    }
}

impl ConfigStore for MemoryConfig {
    fn get(&self, section: &str, key: &str) -> Option<String> {
        self.values
            .get(&(section.to_string(), key.to_string()))
            .cloned()
    }
}
