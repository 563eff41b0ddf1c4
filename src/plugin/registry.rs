//! Static plugin registry.

use super::{Handler, HandlerKind, MyRecognizer, PluginHost};
use crate::error::AssetError;
use serde::Serialize;
use tracing::{info, warn};

/// One registrable handler.
#[derive(Clone, Copy)]
pub struct PluginEntry {
    pub name: &'static str,
    pub kind: HandlerKind,
    pub construct: fn() -> Handler,
}

impl std::fmt::Debug for PluginEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginEntry")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Outcome of loading the registry into a host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub registered: Vec<String>,
    pub rejected: Vec<String>,
}

/// Ordered capability name -> constructor mapping.
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    entries: Vec<PluginEntry>,
}

impl PluginRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every handler shipped with the crate.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.entries.push(PluginEntry {
            name: "MyRecognizer",
            kind: HandlerKind::Recognition,
            construct: || Handler::Recognition(Box::new(MyRecognizer)),
        });
        registry
    }

    /// Add an entry; a second entry with the same name and kind is rejected.
    pub fn register(&mut self, entry: PluginEntry) -> Result<(), AssetError> {
        if self.get(entry.name, entry.kind).is_some() {
            return Err(AssetError::ConfigError(format!(
                "Plugin {} ({}) is already registered",
                entry.name, entry.kind
            )));
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn get(&self, name: &str, kind: HandlerKind) -> Option<&PluginEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name == name && entry.kind == kind)
    }

    pub fn list_all(&self) -> &[PluginEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Instantiate every entry and register it with `host`, once each.
    pub fn load_into<H: PluginHost + ?Sized>(&self, host: &mut H) -> LoadReport {
        let mut report = LoadReport::default();
        for entry in &self.entries {
            let handler = (entry.construct)();
            if host.register_named_handler(entry.name, handler) {
                info!(name = entry.name, kind = %entry.kind, "Plugin registered");
                report.registered.push(entry.name.to_string());
            } else {
                warn!(name = entry.name, kind = %entry.kind, "Host rejected plugin");
                report.rejected.push(entry.name.to_string());
            }
        }
        report
    }
}
