//! Tracking of loaded service modules

use std::collections::HashSet;
use tracing::debug;

/// "Is a module with this name currently loaded" queries
pub trait ModuleRegistry: Send + Sync {
    fn is_loaded(&self, name: &str) -> bool;
}

/// The set of modules loaded into this process, by exact name
/// (e.g. `nickserv/main`)
#[derive(Debug, Default, Clone)]
pub struct LoadedModules {
    names: HashSet<String>,
}

impl LoadedModules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a module as loaded
    pub fn load(&mut self, name: &str) {
        debug!("Module {} loaded", name);
        self.names.insert(name.to_string());
    }

    /// Mark a module as unloaded
    pub fn unload(&mut self, name: &str) {
        if self.names.remove(name) {
            debug!("Module {} unloaded", name);
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for LoadedModules {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }
}

impl ModuleRegistry for LoadedModules {
    fn is_loaded(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}
