//! Help system
//!
//! Services register help topics in a [`HelpRegistry`], each backed by a
//! help file or a [`HelpProvider`]. A [`HelpRenderer`] streams the topic to
//! the actor; help files may contain conditional blocks:
//!
//! ```text
//! #if priv user:auspex
//! Operators may also see hidden information.
//! #endif
//! ```
//!
//! See [`condition`] for the conditions understood by `#if`.

pub mod condition;
pub mod registry;
pub mod render;

pub use condition::ConditionEvaluator;
pub use registry::{help_handler, ContentSource, HelpEntry, HelpProvider, HelpRegistry};
pub use render::{HelpRenderer, NICK_TOKEN};

use rustserv_core::Fault;
use std::path::PathBuf;
use thiserror::Error;

/// Help requests that could not be served
#[derive(Error, Debug)]
pub enum HelpError {
    #[error("No help available for \x02{0}\x02.")]
    NotFound(String),

    #[error("Could not get help file for \x02{topic}\x02.")]
    SourceUnavailable {
        topic: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HelpError {
    /// How the failure is reported to the actor
    pub fn fault(&self) -> Fault {
        match self {
            HelpError::NotFound(_) | HelpError::SourceUnavailable { .. } => Fault::NoSuchTarget,
        }
    }
}

impl From<HelpError> for rustserv_core::Error {
    fn from(e: HelpError) -> Self {
        rustserv_core::Error::Service(e.to_string())
    }
}
