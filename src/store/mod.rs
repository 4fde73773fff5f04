mod settings;

pub use settings::{Locale, Settings};

use std::collections::HashMap;

/// Keys under which the editor persists its state. The transport is up to the
/// host (browser localStorage, a config file, ...); the core only requires
/// get/set semantics.
pub mod keys {
    pub const PROJECTS: &str = "pixeora-projects";
    pub const LANGUAGE: &str = "pixeora-language";
    pub const SAVED_COLORS: &str = "pixeora-colors";
}

/// Minimal persistence transport: string keys to string values. Supplied by
/// the host at construction time; the core never touches storage on its own.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

/// In-memory store, used in tests and by hosts without persistence
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}
