//! Help topic registry

use super::HelpError;
use rustserv_core::{OutputSink, SourceInfo};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Help that is generated at request time instead of read from a file
pub trait HelpProvider: Send + Sync {
    /// Write the help text to `sink`
    fn render_help(&self, si: &SourceInfo<'_>, sink: &mut dyn OutputSink);
}

impl<F> HelpProvider for F
where
    F: Fn(&SourceInfo<'_>, &mut dyn OutputSink) + Send + Sync,
{
    fn render_help(&self, si: &SourceInfo<'_>, sink: &mut dyn OutputSink) {
        self(si, sink)
    }
}

/// Wrap a closure as a help provider
pub fn help_handler<F>(f: F) -> Arc<dyn HelpProvider>
where
    F: Fn(&SourceInfo<'_>, &mut dyn OutputSink) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Where the text of a help topic comes from
#[derive(Clone)]
pub enum ContentSource {
    /// A help file, absolute or relative to the share directory
    File(String),
    /// A dynamic handler
    Handler(Arc<dyn HelpProvider>),
}

impl fmt::Debug for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentSource::File(path) => f.debug_tuple("File").field(path).finish(),
            ContentSource::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

/// A registered help topic
#[derive(Debug, Clone)]
pub struct HelpEntry {
    name: String,
    access: Option<String>,
    source: ContentSource,
}

impl HelpEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Access label shown next to the topic in listings
    pub fn access(&self) -> Option<&str> {
        self.access.as_deref()
    }

    pub fn source(&self) -> &ContentSource {
        &self.source
    }
}

/// Help topics of one service, in registration order.
///
/// Lookups are case-insensitive. Duplicate names are accepted; the first
/// one registered wins.
#[derive(Debug, Default, Clone)]
pub struct HelpRegistry {
    entries: Vec<HelpEntry>,
}

impl HelpRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a topic backed by a file or a handler.
    ///
    /// If both are given the handler is used. Returns false, and leaves the
    /// registry untouched, if the topic is empty or neither is given.
    pub fn add_entry(
        &mut self,
        topic: &str,
        file: Option<&str>,
        handler: Option<Arc<dyn HelpProvider>>,
    ) -> bool {
        self.add_entry_with_access(topic, file, handler, None)
    }

    /// Like [`add_entry`](Self::add_entry), with an access label for listings
    pub fn add_entry_with_access(
        &mut self,
        topic: &str,
        file: Option<&str>,
        handler: Option<Arc<dyn HelpProvider>>,
        access: Option<&str>,
    ) -> bool {
        if topic.is_empty() {
            debug!("add_entry(): invalid params: empty topic");
            return false;
        }

        let source = match (handler, file) {
            (Some(handler), _) => ContentSource::Handler(handler),
            (None, Some(file)) => ContentSource::File(file.to_string()),
            (None, None) => {
                debug!("add_entry(): invalid params: {} has neither file nor handler", topic);
                return false;
            }
        };

        self.entries.push(HelpEntry {
            name: topic.to_string(),
            access: access.map(str::to_string),
            source,
        });
        true
    }

    /// First entry whose name matches `topic`, ignoring case
    pub fn find(&self, topic: &str) -> Option<&HelpEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(topic))
    }

    /// Like [`find`](Self::find), but a missing topic is an error the actor can be shown
    pub fn resolve(&self, topic: &str) -> Result<&HelpEntry, HelpError> {
        self.find(topic)
            .ok_or_else(|| HelpError::NotFound(topic.to_string()))
    }

    /// Remove every entry named `topic`. Returns how many were removed.
    pub fn remove_entry(&mut self, topic: &str) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|entry| !entry.name.eq_ignore_ascii_case(topic));
        before - self.entries.len()
    }

    /// Entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = &HelpEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
