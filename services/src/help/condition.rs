//! Conditions for `#if` directives in help files
//!
//! A condition is a keyword, optionally followed by an argument and
//! optionally preceded by any number of `!`:
//!
//! ```text
//! halfops | owner | protect | anyprivs | auth
//! priv <privilege>
//! module <module name>
//! ```
//!
//! Unknown keywords and missing arguments evaluate to false, so a typo in a
//! help file hides a block rather than revealing it.

use rustserv_core::{Actor, CapabilityContext, ModuleRegistry, ServerFeatures};
use std::sync::Arc;
use tracing::debug;

/// Evaluates help file conditions against the running server and an actor
#[derive(Clone)]
pub struct ConditionEvaluator {
    features: ServerFeatures,
    privileges: Arc<dyn CapabilityContext>,
    modules: Arc<dyn ModuleRegistry>,
}

impl ConditionEvaluator {
    pub fn new(
        features: ServerFeatures,
        privileges: Arc<dyn CapabilityContext>,
        modules: Arc<dyn ModuleRegistry>,
    ) -> Self {
        Self {
            features,
            privileges,
            modules,
        }
    }

    pub fn features(&self) -> &ServerFeatures {
        &self.features
    }

    /// Evaluate `condition` for `actor`. Never fails.
    pub fn evaluate(&self, actor: &Actor, condition: &str) -> bool {
        let mut condition = condition.trim_start_matches(is_blank);
        let mut negated = false;
        while let Some(rest) = condition.strip_prefix('!') {
            negated = !negated;
            condition = rest.trim_start_matches(is_blank);
        }

        self.evaluate_term(actor, condition) != negated
    }

    fn evaluate_term(&self, actor: &Actor, condition: &str) -> bool {
        let (keyword, rest) = split_word(condition);
        match keyword {
            "halfops" => self.features.uses_halfops,
            "owner" => self.features.uses_owner,
            "protect" => self.features.uses_protect,
            "anyprivs" => self.privileges.has_any_privs(actor),
            "priv" => {
                let (privilege, _) = split_word(rest);
                !privilege.is_empty() && self.privileges.has_priv(actor, privilege)
            }
            "module" => {
                let (module, _) = split_word(rest);
                !module.is_empty() && self.modules.is_loaded(module)
            }
            "auth" => self.features.auth_enabled(),
            _ => {
                debug!("Unknown help condition {:?}", keyword);
                false
            }
        }
    }
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Split off the first word; the remainder has leading blanks removed
fn split_word(s: &str) -> (&str, &str) {
    match s.find(is_blank) {
        Some(at) => (&s[..at], s[at + 1..].trim_start_matches(is_blank)),
        None => (s, ""),
    }
}
