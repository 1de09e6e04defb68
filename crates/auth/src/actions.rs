//! Declared actions and their scopes for one resource.

use std::collections::HashSet;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use granular_core::{DomainError, DomainResult, validate_segment};

/// One declared action with its scopes, in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEntry {
    pub action: String,
    pub scopes: Vec<String>,
}

/// Ordered mapping from action name to its scope names.
///
/// Declared order is iteration order everywhere (enumeration, catalogs,
/// serialization). Preconditions, checked only by [`ActionScopes::validate`]:
/// at least one action, non-empty scope lists, no duplicates and no `:` in
/// any name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionScopes {
    entries: Vec<ActionEntry>,
}

impl ActionScopes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `action` with its scopes (builder style).
    pub fn action<I, S>(mut self, action: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(action, scopes);
        self
    }

    pub fn push<I, S>(&mut self, action: impl Into<String>, scopes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.push(ActionEntry {
            action: action.into(),
            scopes: scopes.into_iter().map(Into::into).collect(),
        });
    }

    pub fn entries(&self) -> &[ActionEntry] {
        &self.entries
    }

    /// Action names in declared order.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.action.as_str())
    }

    /// Scopes declared for `action`, or `None` if the action is not declared.
    ///
    /// The first entry wins when an action was declared twice.
    pub fn scopes(&self, action: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.action == action)
            .map(|e| e.scopes.as_slice())
    }

    pub fn contains_action(&self, action: &str) -> bool {
        self.scopes(action).is_some()
    }

    pub fn contains_scope(&self, action: &str, scope: &str) -> bool {
        self.scopes(action)
            .is_some_and(|scopes| scopes.iter().any(|s| s == scope))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of scoped permissions this configuration implies.
    pub fn scoped_len(&self) -> usize {
        self.entries.iter().map(|e| e.scopes.len()).sum()
    }

    /// Check every construction precondition.
    pub fn validate(&self) -> DomainResult<()> {
        if self.entries.is_empty() {
            return Err(DomainError::invariant("at least one action must be declared"));
        }

        let mut seen_actions = HashSet::new();
        for entry in &self.entries {
            validate_segment("action", &entry.action)?;
            if !seen_actions.insert(entry.action.as_str()) {
                return Err(DomainError::invariant(format!(
                    "action '{}' is declared more than once",
                    entry.action
                )));
            }

            if entry.scopes.is_empty() {
                return Err(DomainError::invariant(format!(
                    "action '{}' must declare at least one scope",
                    entry.action
                )));
            }

            let mut seen_scopes = HashSet::new();
            for scope in &entry.scopes {
                validate_segment("scope", scope)?;
                if !seen_scopes.insert(scope.as_str()) {
                    return Err(DomainError::invariant(format!(
                        "scope '{scope}' is declared more than once for action '{}'",
                        entry.action
                    )));
                }
            }
        }

        Ok(())
    }
}

impl<A, I, S> FromIterator<(A, I)> for ActionScopes
where
    A: Into<String>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (A, I)>>(iter: T) -> Self {
        let mut out = Self::new();
        for (action, scopes) in iter {
            out.push(action, scopes);
        }
        out
    }
}

// Serialized as a JSON object: `{ "read": ["own", "others"] }`. Key order in the
// document is the declared order, so the map is walked by hand instead of going
// through a HashMap.

impl Serialize for ActionScopes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.action, &entry.scopes)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ActionScopes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ActionScopesVisitor;

        impl<'de> Visitor<'de> for ActionScopesVisitor {
            type Value = ActionScopes;

            fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str("a map of action names to scope lists")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                let mut out = ActionScopes::new();
                while let Some((action, scopes)) = access.next_entry::<String, Vec<String>>()? {
                    out.push(action, scopes);
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(ActionScopesVisitor)
    }
}
