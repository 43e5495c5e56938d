//! Configuration management

use crate::{AuthMode, Error, Result, ServerFeatures, ServiceIdentity};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Services configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File locations
    pub paths: PathsConfig,
    /// Capabilities of the linked ircd
    pub protocol: ProtocolConfig,
    /// Registration verification
    pub auth: AuthConfig,
    /// NickServ behaviour
    pub nickserv: NickServConfig,
    /// Loaded modules
    pub modules: ModulesConfig,
    /// Operator classes
    #[serde(rename = "operclass")]
    pub operclasses: Vec<OperClassConfig>,
    /// Operators
    #[serde(rename = "operator")]
    pub operators: Vec<OperatorConfig>,
    /// Service pseudo-clients and their help topics
    #[serde(rename = "service")]
    pub services: Vec<ServiceConfig>,
}

/// File locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root that relative help file paths are resolved against
    pub share_dir: String,
}

/// Protocol features of the ircd
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Channel mode +h is available
    pub uses_halfops: bool,
    /// Channel mode +q is available
    pub uses_owner: bool,
    /// Channel mode +a is available
    pub uses_protect: bool,
}

/// Registration verification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub mode: AuthMode,
}

/// NickServ behaviour
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NickServConfig {
    /// Accounts do not own nicknames; NickServ acts as UserServ
    pub no_nick_ownership: bool,
}

/// Loaded modules
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulesConfig {
    /// Module names, e.g. `nickserv/main`
    pub loaded: Vec<String>,
}

/// A named set of privileges
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperClassConfig {
    pub name: String,
    #[serde(default)]
    pub privs: Vec<String>,
}

/// An account granted an operclass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorConfig {
    pub account: String,
    pub operclass: String,
}

/// A service pseudo-client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Nickname on the network
    pub nick: String,
    /// Display name; defaults to the nickname
    #[serde(default)]
    pub disp: Option<String>,
    /// One-line description
    #[serde(default)]
    pub description: String,
    /// Help topics, in listing order
    #[serde(default)]
    pub help: Vec<HelpEntryConfig>,
}

impl ServiceConfig {
    /// Nick and display name of this service
    pub fn identity(&self) -> ServiceIdentity {
        let disp = self.disp.as_deref().unwrap_or(&self.nick);
        ServiceIdentity::new(&self.nick, disp)
    }
}

/// A help topic backed by a file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpEntryConfig {
    /// Topic name, matched case-insensitively
    pub topic: String,
    /// Path, absolute or relative to `paths.share_dir`
    pub file: String,
    /// Access label shown in topic listings
    #[serde(default)]
    pub access: Option<String>,
}

impl Config {
    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;
        
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
        
        Ok(config)
    }
    
    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        
        std::fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;
        
        Ok(())
    }
    
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.paths.share_dir.is_empty() {
            return Err(Error::Config("Share directory cannot be empty".to_string()));
        }
        
        let mut seen_services = HashSet::new();
        for service in &self.services {
            if service.nick.is_empty() {
                return Err(Error::Config("Service nick cannot be empty".to_string()));
            }
            
            if !seen_services.insert(service.nick.to_lowercase()) {
                return Err(Error::Config(format!("Duplicate service {} in configuration", service.nick)));
            }
            
            for entry in &service.help {
                if entry.topic.is_empty() {
                    return Err(Error::Config(format!("Help entry of {} has an empty topic", service.nick)));
                }
                if entry.file.is_empty() {
                    return Err(Error::Config(format!("Help topic {} of {} has no file", entry.topic, service.nick)));
                }
            }
        }
        
        let classes: HashSet<&str> = self.operclasses.iter().map(|c| c.name.as_str()).collect();
        for oper in &self.operators {
            if !classes.contains(oper.operclass.as_str()) {
                return Err(Error::Config(format!(
                    "Operator {} references unknown operclass {}",
                    oper.account, oper.operclass
                )));
            }
        }
        
        Ok(())
    }

    /// Server feature flags derived from `[protocol]` and `[auth]`
    pub fn features(&self) -> ServerFeatures {
        ServerFeatures {
            uses_halfops: self.protocol.uses_halfops,
            uses_owner: self.protocol.uses_owner,
            uses_protect: self.protocol.uses_protect,
            auth: self.auth.mode,
        }
    }

    /// Look up a service by nick, case-insensitively
    pub fn service(&self, nick: &str) -> Option<&ServiceConfig> {
        self.services.iter().find(|s| s.nick.eq_ignore_ascii_case(nick))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            protocol: ProtocolConfig::default(),
            auth: AuthConfig::default(),
            nickserv: NickServConfig::default(),
            modules: ModulesConfig {
                loaded: vec!["nickserv/main".to_string(), "chanserv/main".to_string()],
            },
            operclasses: vec![OperClassConfig {
                name: "sra".to_string(),
                privs: vec![
                    "user:auspex".to_string(),
                    "chan:auspex".to_string(),
                    "general:admin".to_string(),
                ],
            }],
            operators: Vec::new(),
            services: vec![
                ServiceConfig {
                    nick: "NickServ".to_string(),
                    disp: None,
                    description: "Nickname registration".to_string(),
                    help: vec![
                        HelpEntryConfig::new("REGISTER", "help/nickserv/register", None),
                        HelpEntryConfig::new("IDENTIFY", "help/nickserv/identify", None),
                        HelpEntryConfig::new("DROP", "help/nickserv/drop", None),
                        HelpEntryConfig::new("INFO", "help/nickserv/info", None),
                    ],
                },
                ServiceConfig {
                    nick: "ChanServ".to_string(),
                    disp: None,
                    description: "Channel registration".to_string(),
                    help: vec![
                        HelpEntryConfig::new("REGISTER", "help/cservice/register", None),
                        HelpEntryConfig::new("FLAGS", "help/cservice/flags", None),
                        HelpEntryConfig::new("CLOSE", "help/cservice/close", Some("chan:admin")),
                    ],
                },
            ],
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            share_dir: "/usr/share/rustserv".to_string(),
        }
    }
}

impl HelpEntryConfig {
    pub fn new(topic: &str, file: &str, access: Option<&str>) -> Self {
        Self {
            topic: topic.to_string(),
            file: file.to_string(),
            access: access.map(str::to_string),
        }
    }
}
