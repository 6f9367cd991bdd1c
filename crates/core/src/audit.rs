//! Audit metadata stamped on every mutation.

use std::fmt;

use crate::types::Timestamp;

/// Name recorded when no principal is supplied.
pub const SYSTEM_ACTOR: &str = "System";

/// The principal performing a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Actor {
    /// No authenticated principal; recorded as [`SYSTEM_ACTOR`].
    #[default]
    System,
    /// A named principal, e.g. the user forwarded by an authenticating proxy.
    User(String),
}

impl Actor {
    /// Build an actor from an optional principal name.
    ///
    /// Blank or missing names fall back to [`Actor::System`].
    pub fn from_principal(name: Option<&str>) -> Self {
        match name.map(str::trim) {
            Some(n) if !n.is_empty() => Actor::User(n.to_string()),
            _ => Actor::System,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Actor::System => SYSTEM_ACTOR,
            Actor::User(name) => name,
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `(updated_by, updated_date_time)` pair written by a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditStamp {
    pub actor: String,
    pub at: Timestamp,
}

impl AuditStamp {
    /// Stamp for `actor` at the current instant.
    pub fn now(actor: &Actor) -> Self {
        Self {
            actor: actor.as_str().to_string(),
            at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_principal_is_system() {
        assert_eq!(Actor::from_principal(None), Actor::System);
        assert_eq!(Actor::from_principal(Some("   ")), Actor::System);
    }

    #[test]
    fn named_principal_is_trimmed() {
        let actor = Actor::from_principal(Some("  jane.doe "));
        assert_eq!(actor, Actor::User("jane.doe".to_string()));
        assert_eq!(actor.to_string(), "jane.doe");
    }

    #[test]
    fn stamp_records_actor_name() {
        let stamp = AuditStamp::now(&Actor::System);
        assert_eq!(stamp.actor, SYSTEM_ACTOR);
    }
}
