//! Rust IRC Services
//! 
//! This crate provides the services framework and the help system used by
//! every service.

pub mod framework;
pub mod help;
pub mod help_service;

pub use framework::{Service, ServiceManager, ServiceResult};
pub use help::{ConditionEvaluator, HelpEntry, HelpError, HelpProvider, HelpRegistry, HelpRenderer};
pub use help_service::HelpService;
