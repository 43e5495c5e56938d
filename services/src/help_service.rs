//! A service that answers `HELP`

use crate::help::{help_handler, HelpRegistry, HelpRenderer};
use crate::{Service, ServiceResult};
use rustserv_core::{Actor, Fault, OutputSink, Result, ServiceConfig, ServiceIdentity, SourceInfo};
use async_trait::async_trait;
use std::sync::Arc;

/// Topic registered for every service with a description
pub const ABOUT_TOPIC: &str = "ABOUT";

/// Service pseudo-client with a help registry
pub struct HelpService {
    identity: ServiceIdentity,
    description: String,
    registry: HelpRegistry,
    renderer: Arc<HelpRenderer>,
}

impl HelpService {
    /// Create a service with no help topics
    pub fn new(identity: ServiceIdentity, description: &str, renderer: Arc<HelpRenderer>) -> Self {
        Self {
            identity,
            description: description.to_string(),
            registry: HelpRegistry::new(),
            renderer,
        }
    }

    /// Create a service and register its configured help topics.
    ///
    /// Services with a description also get an [`ABOUT_TOPIC`] topic.
    pub fn from_config(config: &ServiceConfig, renderer: Arc<HelpRenderer>) -> Self {
        let mut service = Self::new(config.identity(), &config.description, renderer);

        for entry in &config.help {
            service.registry.add_entry_with_access(
                &entry.topic,
                Some(&entry.file),
                None,
                entry.access.as_deref(),
            );
        }

        if !config.description.is_empty() {
            let description = config.description.clone();
            service.registry.add_entry(
                ABOUT_TOPIC,
                None,
                Some(help_handler(move |si, sink| {
                    sink.success(&format!("\x02{}\x02: {}", si.service.disp, description));
                })),
            );
        }

        service
    }

    pub fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }

    pub fn registry(&self) -> &HelpRegistry {
        &self.registry
    }

    /// Topics are added and removed as the service's modules load and unload
    pub fn registry_mut(&mut self) -> &mut HelpRegistry {
        &mut self.registry
    }

    /// Handle HELP command
    fn handle_help(&self, actor: &Actor, params: &[String], sink: &mut dyn OutputSink) {
        let si = SourceInfo::new(actor, &self.identity);

        if params.is_empty() {
            self.send_topic_list(&si, sink);
        } else {
            self.renderer.display(&self.registry, &si, &params.join(" "), sink);
        }
    }

    /// Send the list of topics in registration order
    fn send_topic_list(&self, si: &SourceInfo<'_>, sink: &mut dyn OutputSink) {
        sink.success(&format!("***** \x02{} Help\x02 *****", self.identity.nick));
        sink.success(&format!("\x02{}\x02 knows the following topics:", self.identity.disp));
        sink.success(" ");

        for entry in self.registry.iter() {
            match entry.access() {
                Some(access) => sink.success(&format!("\x02{:<15}\x02 ({})", entry.name(), access)),
                None => sink.success(&format!("\x02{}\x02", entry.name())),
            }
        }

        sink.success(" ");
        sink.success(&format!(
            "For more information on a topic, type: \x02/msg {} HELP <topic>\x02",
            si.service.disp
        ));
        sink.success("***** \x02End of Help\x02 *****");
    }
}

#[async_trait]
impl Service for HelpService {
    fn name(&self) -> &str {
        &self.identity.nick
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn init(&mut self) -> Result<()> {
        tracing::info!("{} initialized with {} help topics", self.identity.nick, self.registry.len());
        Ok(())
    }

    async fn cleanup(&mut self) -> Result<()> {
        tracing::info!("{} cleaned up", self.identity.nick);
        Ok(())
    }

    async fn handle_command(
        &mut self,
        actor: &Actor,
        command: &str,
        params: &[String],
        sink: &mut dyn OutputSink,
    ) -> Result<ServiceResult> {
        if command.eq_ignore_ascii_case("HELP") {
            self.handle_help(actor, params, sink);
        } else {
            sink.fail(
                Fault::BadParams,
                &format!("Invalid command. Use \x02/msg {} HELP\x02 for a command listing.", self.identity.disp),
            );
        }
        Ok(ServiceResult::Handled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustserv_core::{Config, HelpEntryConfig, Transcript};

    fn service() -> HelpService {
        let config = ServiceConfig {
            nick: "ChanServ".to_string(),
            disp: Some("CS".to_string()),
            description: "Channel registration".to_string(),
            help: vec![
                HelpEntryConfig::new("REGISTER", "help/cservice/register", None),
                HelpEntryConfig::new("CLOSE", "help/cservice/close", Some("chan:admin")),
            ],
        };
        let renderer = Arc::new(HelpRenderer::from_config(&Config::default()));
        HelpService::from_config(&config, renderer)
    }

    #[test]
    fn test_topics_from_config() {
        let service = service();
        let names: Vec<&str> = service.registry().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["REGISTER", "CLOSE", ABOUT_TOPIC]);
        assert_eq!(service.identity().disp, "CS");
    }

    #[tokio::test]
    async fn test_topic_list() {
        let mut service = service();
        let mut transcript = Transcript::new();
        let result = service
            .handle_command(&Actor::new("alice"), "HELP", &[], &mut transcript)
            .await
            .unwrap();

        assert_eq!(result, ServiceResult::Handled);
        let lines = transcript.lines();
        assert_eq!(lines.first(), Some(&"***** \x02ChanServ Help\x02 *****"));
        assert!(lines.contains(&"\x02REGISTER\x02"));
        assert!(lines.contains(&"\x02CLOSE          \x02 (chan:admin)"));
        assert!(lines.iter().any(|l| l.contains("/msg CS HELP <topic>")));
        assert_eq!(lines.last(), Some(&"***** \x02End of Help\x02 *****"));
    }

    #[tokio::test]
    async fn test_about_topic() {
        let mut service = service();
        let mut transcript = Transcript::new();
        service
            .handle_command(&Actor::new("alice"), "HELP", &["about".to_string()], &mut transcript)
            .await
            .unwrap();

        assert_eq!(
            transcript.lines(),
            vec![
                "***** \x02ChanServ Help\x02 *****",
                "\x02CS\x02: Channel registration",
                "***** \x02End of Help\x02 *****",
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let mut service = service();
        let mut transcript = Transcript::new();
        service
            .handle_command(&Actor::new("alice"), "REGISTER", &[], &mut transcript)
            .await
            .unwrap();

        let failures = transcript.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, Fault::BadParams);
    }

    #[tokio::test]
    async fn test_removed_topic_is_not_found() {
        let mut service = service();
        assert_eq!(service.registry_mut().remove_entry("close"), 1);

        let mut transcript = Transcript::new();
        service
            .handle_command(&Actor::new("alice"), "HELP", &["CLOSE".to_string()], &mut transcript)
            .await
            .unwrap();

        assert_eq!(
            transcript.failures(),
            vec![(Fault::NoSuchTarget, "No help available for \x02CLOSE\x02.")]
        );
    }
}
