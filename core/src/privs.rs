//! Operator privileges

use crate::{Actor, Config};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Actor-scoped privilege queries
pub trait CapabilityContext: Send + Sync {
    /// Whether the actor holds at least one privilege
    fn has_any_privs(&self, actor: &Actor) -> bool;

    /// Whether the actor holds the named privilege
    fn has_priv(&self, actor: &Actor, privilege: &str) -> bool;
}

/// Privileges granted through operclasses, keyed by account name
#[derive(Debug, Default, Clone)]
pub struct PrivilegeTable {
    /// operclass name -> privileges
    classes: HashMap<String, HashSet<String>>,
    /// lowercased account -> operclass name
    operators: HashMap<String, String>,
}

impl PrivilegeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from the `[[operclass]]` and `[[operator]]` sections
    pub fn from_config(config: &Config) -> Self {
        let mut table = Self::new();
        for class in &config.operclasses {
            table.add_operclass(&class.name, class.privs.iter().map(String::as_str));
        }
        for oper in &config.operators {
            table.add_operator(&oper.account, &oper.operclass);
        }
        table
    }

    /// Define (or redefine) an operclass
    pub fn add_operclass<'a>(&mut self, name: &str, privs: impl IntoIterator<Item = &'a str>) {
        let privs = privs.into_iter().map(str::to_string).collect();
        self.classes.insert(name.to_string(), privs);
    }

    /// Grant an operclass to an account
    pub fn add_operator(&mut self, account: &str, operclass: &str) {
        if !self.classes.contains_key(operclass) {
            warn!("Operator {} references unknown operclass {}", account, operclass);
        }
        self.operators.insert(account.to_lowercase(), operclass.to_string());
    }

    /// Privileges held by an actor; empty when not logged in or not an operator
    fn privs_of(&self, actor: &Actor) -> Option<&HashSet<String>> {
        let account = actor.account.as_ref()?;
        let class = self.operators.get(&account.to_lowercase())?;
        self.classes.get(class)
    }
}

impl CapabilityContext for PrivilegeTable {
    fn has_any_privs(&self, actor: &Actor) -> bool {
        self.privs_of(actor).map_or(false, |privs| !privs.is_empty())
    }

    fn has_priv(&self, actor: &Actor, privilege: &str) -> bool {
        self.privs_of(actor).map_or(false, |privs| privs.contains(privilege))
    }
}
