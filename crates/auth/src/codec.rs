//! Action-resource-scope permission codec.
//!
//! One [`ArsCodec`] per protected resource type. It mints canonical permission
//! strings (`action:resource` / `action:resource:scope`), enumerates every
//! string a configuration implies, and checks a caller's held permissions.
//!
//! - No IO
//! - No panics
//! - No mutable state (share freely across request handlers)

use serde::Serialize;
use tracing::warn;

use granular_core::{DomainError, DomainResult, join, validate_segment};

use crate::actions::ActionScopes;
use crate::held::HeldPermissions;
use crate::permissions::{Permission, PermissionParts};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArsCodec {
    resource: String,
    actions: ActionScopes,
}

impl ArsCodec {
    /// Create a codec without validating the configuration.
    ///
    /// Degenerate input (empty scope lists, duplicates, separators in names) is
    /// a caller precondition: it is logged, never rejected. Use
    /// [`ArsCodec::try_new`] to fail loudly instead.
    pub fn new(resource: impl Into<String>, actions: ActionScopes) -> Self {
        let resource = resource.into();
        if let Err(err) = validate_segment("resource", &resource).and_then(|_| actions.validate()) {
            warn!(resource = %resource, error = %err, "degenerate permission configuration");
        }
        Self { resource, actions }
    }

    /// Create a codec, rejecting any configuration that breaks a precondition.
    pub fn try_new(resource: impl Into<String>, actions: ActionScopes) -> DomainResult<Self> {
        let resource = resource.into();
        validate_segment("resource", &resource)?;
        actions.validate()?;
        Ok(Self { resource, actions })
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn actions(&self) -> &ActionScopes {
        &self.actions
    }

    /// Mint the permission string for `action`, optionally narrowed by `scope`.
    ///
    /// An empty scope counts as no scope. Undeclared actions and scopes are
    /// encoded as-is; they simply never match a generated grant.
    pub fn encode(&self, action: &str, scope: Option<&str>) -> Permission {
        let scope = scope.filter(|s| !s.is_empty());
        let encoded = match scope {
            Some(scope) => join([action, self.resource.as_str(), scope]),
            None => join([action, self.resource.as_str()]),
        };
        Permission::new(encoded)
    }

    /// Every scoped permission string, in declared action then scope order.
    ///
    /// With `Some(action)` only that action's strings are returned (empty when
    /// the action is not declared). Own-resource strings are never included.
    pub fn enumerate_all(&self, action: Option<&str>) -> Vec<Permission> {
        match action {
            Some(action) => self
                .actions
                .scopes(action)
                .unwrap_or_default()
                .iter()
                .map(|scope| self.encode(action, Some(scope.as_str())))
                .collect(),
            None => self
                .actions
                .entries()
                .iter()
                .flat_map(|entry| {
                    entry
                        .scopes
                        .iter()
                        .map(move |scope| self.encode(&entry.action, Some(scope.as_str())))
                })
                .collect(),
        }
    }

    /// Own-resource and scoped strings for one declared action.
    pub fn build_variants(&self, action: &str) -> Option<ActionVariants> {
        let scopes = self.actions.scopes(action)?;
        Some(ActionVariants {
            action: action.to_owned(),
            own_resource: self.encode(action, None),
            scoped: scopes
                .iter()
                .map(|scope| ScopedPermission {
                    scope: scope.clone(),
                    permission: self.encode(action, Some(scope.as_str())),
                })
                .collect(),
        })
    }

    /// [`ArsCodec::build_variants`] for every declared action.
    pub fn build(&self) -> Vec<ActionVariants> {
        self.actions
            .actions()
            .filter_map(|action| self.build_variants(action))
            .collect()
    }

    /// Whether `held` contains the permission for `action` with `scope`.
    ///
    /// `None` checks exactly the own-resource string, never "any scope".
    pub fn verify<H>(&self, action: &str, scope: Option<&str>, held: &H) -> bool
    where
        H: HeldPermissions + ?Sized,
    {
        self.first_missing(action, std::iter::once(scope), held).is_none()
    }

    /// Whether `held` contains the permission for `action` with *every* scope.
    ///
    /// An empty `scopes` slice checks the own-resource string.
    pub fn verify_all<S, H>(&self, action: &str, scopes: &[S], held: &H) -> bool
    where
        S: AsRef<str>,
        H: HeldPermissions + ?Sized,
    {
        self.first_missing(action, requested(scopes), held).is_none()
    }

    /// The first requested permission `held` lacks, if any.
    pub(crate) fn first_missing<'s, I, H>(&self, action: &str, scopes: I, held: &H) -> Option<Permission>
    where
        I: IntoIterator<Item = Option<&'s str>>,
        H: HeldPermissions + ?Sized,
    {
        scopes
            .into_iter()
            .map(|scope| self.encode(action, scope))
            .find(|permission| !held.holds(permission.as_str()))
    }

    /// Parse `permission` and check it belongs to this codec's configuration.
    pub fn decode<'a>(&self, permission: &'a str) -> DomainResult<PermissionParts<'a>> {
        let parts = PermissionParts::parse(permission)?;

        if parts.resource != self.resource {
            return Err(DomainError::validation(format!(
                "permission '{permission}' targets resource '{}', expected '{}'",
                parts.resource, self.resource
            )));
        }
        if !self.actions.contains_action(parts.action) {
            return Err(DomainError::not_found(format!(
                "action '{}' on resource '{}'",
                parts.action, self.resource
            )));
        }
        if let Some(scope) = parts.scope {
            if !self.actions.contains_scope(parts.action, scope) {
                return Err(DomainError::not_found(format!(
                    "scope '{scope}' for action '{}' on resource '{}'",
                    parts.action, self.resource
                )));
            }
        }

        Ok(parts)
    }

    /// Declared scopes of `action` that `held` grants, in declared order.
    pub fn granted_scopes<H>(&self, action: &str, held: &H) -> Vec<&str>
    where
        H: HeldPermissions + ?Sized,
    {
        self.actions
            .scopes(action)
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .filter(|&scope| held.holds(self.encode(action, Some(scope)).as_str()))
            .collect()
    }
}

/// Normalise a scope collection: a missing collection is the own-resource check.
pub(crate) fn requested<S: AsRef<str>>(scopes: &[S]) -> Vec<Option<&str>> {
    if scopes.is_empty() {
        vec![None]
    } else {
        scopes.iter().map(|s| Some(s.as_ref())).collect()
    }
}

/// All permission strings for one action, keyed for lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionVariants {
    pub action: String,

    /// `action:resource`, granted when acting on one's own resource.
    pub own_resource: Permission,

    /// `action:resource:scope` for each declared scope, declared order.
    pub scoped: Vec<ScopedPermission>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopedPermission {
    pub scope: String,
    pub permission: Permission,
}

impl ActionVariants {
    pub fn get(&self, scope: &str) -> Option<&Permission> {
        self.scoped
            .iter()
            .find(|s| s.scope == scope)
            .map(|s| &s.permission)
    }

    pub fn own_resource(&self) -> &Permission {
        &self.own_resource
    }
}
