//! Scope selection from resource ownership.
//!
//! Request handlers typically know the resource owner (from a lookup) and the
//! caller (from the session); the scope to check depends on whether they are
//! the same principal. Looking either of them up is the caller's job.

use serde::{Deserialize, Serialize};

/// Scope names to request for own vs. foreign resources.
///
/// `own: None` means acting on one's own resource needs the own-resource
/// permission (`action:resource`), e.g. creating a post for yourself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipScopes {
    pub own: Option<String>,
    pub others: String,
}

impl OwnershipScopes {
    pub fn new(own: Option<impl Into<String>>, others: impl Into<String>) -> Self {
        Self {
            own: own.map(Into::into),
            others: others.into(),
        }
    }

    /// `own` names a scope, e.g. reads split into `own` / `others`.
    pub fn scoped(own: impl Into<String>, others: impl Into<String>) -> Self {
        Self {
            own: Some(own.into()),
            others: others.into(),
        }
    }

    /// Own resources use the own-resource permission, foreign ones `others`.
    pub fn own_resource(others: impl Into<String>) -> Self {
        Self {
            own: None,
            others: others.into(),
        }
    }

    /// Scope to pass to [`crate::ArsCodec::verify`].
    pub fn resolve<I: PartialEq + ?Sized>(&self, owner: &I, caller: &I) -> Option<&str> {
        if owner == caller {
            self.own.as_deref()
        } else {
            Some(self.others.as_str())
        }
    }
}
