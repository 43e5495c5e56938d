//! Who is asking, and which service they are asking

/// The session a command came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Current nickname
    pub nick: String,
    /// Account the session is logged in to, if any
    pub account: Option<String>,
}

impl Actor {
    /// An actor that is not logged in
    pub fn new(nick: &str) -> Self {
        Self {
            nick: nick.to_string(),
            account: None,
        }
    }

    /// An actor logged in to `account`
    pub fn with_account(nick: &str, account: &str) -> Self {
        Self {
            nick: nick.to_string(),
            account: Some(account.to_string()),
        }
    }
}

/// A service pseudo-client as seen on the network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    /// Nickname the service is introduced with
    pub nick: String,
    /// Name used in text shown to users, e.g. in `/msg <disp> HELP`
    pub disp: String,
}

impl ServiceIdentity {
    pub fn new(nick: &str, disp: &str) -> Self {
        Self {
            nick: nick.to_string(),
            disp: disp.to_string(),
        }
    }
}

/// Origin of a command: the requesting actor and the service addressed
#[derive(Debug, Clone, Copy)]
pub struct SourceInfo<'a> {
    pub actor: &'a Actor,
    pub service: &'a ServiceIdentity,
}

impl<'a> SourceInfo<'a> {
    pub fn new(actor: &'a Actor, service: &'a ServiceIdentity) -> Self {
        Self { actor, service }
    }
}
