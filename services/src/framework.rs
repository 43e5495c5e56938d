//! Services framework

use crate::help::HelpRenderer;
use crate::HelpService;
use rustserv_core::{Actor, Config, Error, OutputSink, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Service trait that all services must implement
#[async_trait]
pub trait Service: Send + Sync {
    /// Service nick
    fn name(&self) -> &str;
    
    /// Service version
    fn version(&self) -> &str;
    
    /// Service description
    fn description(&self) -> &str;
    
    /// Initialize the service
    async fn init(&mut self) -> Result<()>;
    
    /// Cleanup the service
    async fn cleanup(&mut self) -> Result<()>;
    
    /// Handle a command sent to the service by an actor
    async fn handle_command(
        &mut self,
        actor: &Actor,
        command: &str,
        params: &[String],
        sink: &mut dyn OutputSink,
    ) -> Result<ServiceResult>;
}

/// Result of service command handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceResult {
    /// Command was handled (successfully or with a reported failure)
    Handled,
    /// Command is not known to the service
    NotHandled,
    /// Command could not be delivered
    Rejected(String),
}

/// Service manager for loading services and routing commands to them
#[derive(Default)]
pub struct ServiceManager {
    /// lowercased nick -> service
    services: HashMap<String, Box<dyn Service>>,
    /// nicks in load order
    order: Vec<String>,
}

impl ServiceManager {
    /// Create a new service manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a [`HelpService`] for every configured service
    pub async fn from_config(config: &Config) -> Result<Self> {
        let renderer = Arc::new(HelpRenderer::from_config(config));
        let mut manager = Self::new();
        
        for service_config in &config.services {
            let service = HelpService::from_config(service_config, Arc::clone(&renderer));
            manager.load_service(Box::new(service)).await?;
        }
        
        Ok(manager)
    }
    
    /// Load a service
    pub async fn load_service(&mut self, mut service: Box<dyn Service>) -> Result<()> {
        let key = service.name().to_lowercase();
        if self.services.contains_key(&key) {
            return Err(Error::Service(format!("Service {} is already loaded", service.name())));
        }
        
        service.init().await?;
        tracing::info!("Loaded service {} {}", service.name(), service.version());
        
        self.order.push(service.name().to_string());
        self.services.insert(key, service);
        
        Ok(())
    }
    
    /// Unload a service
    pub async fn unload_service(&mut self, name: &str) -> Result<()> {
        if let Some(mut service) = self.services.remove(&name.to_lowercase()) {
            service.cleanup().await?;
            self.order.retain(|n| !n.eq_ignore_ascii_case(name));
            tracing::info!("Unloaded service {}", service.name());
        }
        
        Ok(())
    }
    
    /// Get a service by nick, case-insensitively
    pub fn get_service(&self, name: &str) -> Option<&dyn Service> {
        self.services.get(&name.to_lowercase()).map(|s| s.as_ref())
    }
    
    /// Get all loaded services, in load order
    pub fn get_loaded_services(&self) -> Vec<&str> {
        self.order.iter().map(|n| n.as_str()).collect()
    }
    
    /// Route a command line (`COMMAND [params...]`) to the service `target`
    pub async fn dispatch(
        &mut self,
        target: &str,
        actor: &Actor,
        line: &str,
        sink: &mut dyn OutputSink,
    ) -> Result<ServiceResult> {
        let service = match self.services.get_mut(&target.to_lowercase()) {
            Some(service) => service,
            None => return Ok(ServiceResult::Rejected(format!("No such service {}", target))),
        };
        
        let mut words = line.split_whitespace();
        let command = match words.next() {
            Some(command) => command.to_uppercase(),
            None => return Ok(ServiceResult::Rejected("No command given".to_string())),
        };
        let params: Vec<String> = words.map(str::to_string).collect();
        
        match service.handle_command(actor, &command, &params, sink).await {
            Ok(result) => Ok(result),
            Err(e) => {
                tracing::error!("Error in service {}: {}", service.name(), e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustserv_core::Transcript;

    struct EchoService;

    #[async_trait]
    impl Service for EchoService {
        fn name(&self) -> &str {
            "Echo"
        }

        fn version(&self) -> &str {
            "1.0.0"
        }

        fn description(&self) -> &str {
            "Repeats commands back"
        }

        async fn init(&mut self) -> Result<()> {
            Ok(())
        }

        async fn cleanup(&mut self) -> Result<()> {
            Ok(())
        }

        async fn handle_command(
            &mut self,
            _actor: &Actor,
            command: &str,
            params: &[String],
            sink: &mut dyn OutputSink,
        ) -> Result<ServiceResult> {
            if command == "FAIL" {
                return Err(Error::Service("failed on purpose".to_string()));
            }
            sink.success(&format!("{} {}", command, params.join(",")));
            Ok(ServiceResult::Handled)
        }
    }

    #[tokio::test]
    async fn test_dispatch_to_service() {
        let mut manager = ServiceManager::new();
        manager.load_service(Box::new(EchoService)).await.unwrap();

        let actor = Actor::new("alice");
        let mut transcript = Transcript::new();
        let result = manager.dispatch("ECHO", &actor, "say  hello world", &mut transcript).await.unwrap();

        assert_eq!(result, ServiceResult::Handled);
        assert_eq!(transcript.lines(), vec!["SAY hello,world"]);
    }

    #[tokio::test]
    async fn test_dispatch_rejections() {
        let mut manager = ServiceManager::new();
        manager.load_service(Box::new(EchoService)).await.unwrap();

        let actor = Actor::new("alice");
        let mut transcript = Transcript::new();

        let result = manager.dispatch("Nobody", &actor, "HELP", &mut transcript).await.unwrap();
        assert!(matches!(result, ServiceResult::Rejected(_)));

        let result = manager.dispatch("echo", &actor, "   ", &mut transcript).await.unwrap();
        assert!(matches!(result, ServiceResult::Rejected(_)));

        assert!(manager.dispatch("echo", &actor, "fail", &mut transcript).await.is_err());
        assert!(transcript.is_empty());
    }

    #[tokio::test]
    async fn test_load_and_unload() {
        let mut manager = ServiceManager::new();
        manager.load_service(Box::new(EchoService)).await.unwrap();
        assert!(manager.load_service(Box::new(EchoService)).await.is_err());
        assert_eq!(manager.get_loaded_services(), vec!["Echo"]);
        assert_eq!(manager.get_service("echo").unwrap().description(), "Repeats commands back");

        manager.unload_service("ECHO").await.unwrap();
        assert!(manager.get_service("echo").is_none());
        assert!(manager.get_loaded_services().is_empty());
    }

    #[tokio::test]
    async fn test_from_config() {
        let manager = ServiceManager::from_config(&Config::default()).await.unwrap();
        assert_eq!(manager.get_loaded_services(), vec!["NickServ", "ChanServ"]);
    }
}
