//! Rust IRC Services Core
//! 
//! This crate provides the types shared by every service: configuration,
//! the requesting actor, privilege and module queries, server features
//! and output sinks.

pub mod config;
pub mod error;
pub mod features;
pub mod module;
pub mod output;
pub mod privs;
pub mod source;

pub use config::{Config, HelpEntryConfig, ServiceConfig};
pub use error::{Error, Result};
pub use features::{AuthMode, ServerFeatures};
pub use module::{LoadedModules, ModuleRegistry};
pub use output::{Fault, NoticeWriter, OutputSink, Reply, Transcript};
pub use privs::{CapabilityContext, PrivilegeTable};
pub use source::{Actor, ServiceIdentity, SourceInfo};

/// Re-exports for convenience
pub use serde::{Deserialize, Serialize};
pub use tracing::{debug, error, info, warn};
