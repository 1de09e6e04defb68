use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use granular_core::{DomainError, DomainResult, SEPARATOR};

/// Canonical permission string.
///
/// Either the own-resource form `action:resource` or the scoped form
/// `action:resource:scope`. Values are produced by [`crate::ArsCodec`];
/// constructing one by hand with [`Permission::new`] performs no validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0.into_owned()
    }

    /// Split into action, resource and optional scope.
    pub fn parts(&self) -> DomainResult<PermissionParts<'_>> {
        PermissionParts::parse(self.as_str())
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Permission {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.into_string()
    }
}

impl PartialEq<str> for Permission {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Permission {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Borrowed view of a decoded permission string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionParts<'a> {
    pub action: &'a str,
    pub resource: &'a str,
    pub scope: Option<&'a str>,
}

impl<'a> PermissionParts<'a> {
    /// Decode `action:resource` or `action:resource:scope`.
    pub fn parse(value: &'a str) -> DomainResult<Self> {
        let mut segments = value.split(SEPARATOR);
        let action = segments.next().unwrap_or_default();
        let resource = segments
            .next()
            .ok_or_else(|| DomainError::validation(format!("permission '{value}' has no resource")))?;
        let scope = segments.next();

        if segments.next().is_some() {
            return Err(DomainError::validation(format!(
                "permission '{value}' has more than three segments"
            )));
        }
        if action.is_empty() {
            return Err(DomainError::validation(format!("permission '{value}' has an empty action")));
        }
        if resource.is_empty() {
            return Err(DomainError::validation(format!(
                "permission '{value}' has an empty resource"
            )));
        }
        if scope.is_some_and(str::is_empty) {
            return Err(DomainError::validation(format!("permission '{value}' has an empty scope")));
        }

        Ok(Self {
            action,
            resource,
            scope,
        })
    }

    pub fn is_scoped(&self) -> bool {
        self.scope.is_some()
    }
}
