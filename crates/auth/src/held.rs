//! Collections of permission strings held by a caller.

use std::collections::{BTreeSet, HashSet};
use std::hash::BuildHasher;

use serde::{Deserialize, Serialize};

/// Membership test over a caller's granted permission strings.
///
/// Order and duplicates are irrelevant. Implemented for the shapes callers
/// usually already have (slices, arrays, `Vec`, sets), plus [`Grants`].
pub trait HeldPermissions {
    fn holds(&self, permission: &str) -> bool;
}

impl<S: AsRef<str>> HeldPermissions for [S] {
    fn holds(&self, permission: &str) -> bool {
        self.iter().any(|p| p.as_ref() == permission)
    }
}

impl<S: AsRef<str>, const N: usize> HeldPermissions for [S; N] {
    fn holds(&self, permission: &str) -> bool {
        self.as_slice().holds(permission)
    }
}

impl<S: AsRef<str>> HeldPermissions for Vec<S> {
    fn holds(&self, permission: &str) -> bool {
        self.as_slice().holds(permission)
    }
}

impl<H: BuildHasher> HeldPermissions for HashSet<String, H> {
    fn holds(&self, permission: &str) -> bool {
        self.contains(permission)
    }
}

impl HeldPermissions for BTreeSet<String> {
    fn holds(&self, permission: &str) -> bool {
        self.contains(permission)
    }
}

impl<T: HeldPermissions + ?Sized> HeldPermissions for &T {
    fn holds(&self, permission: &str) -> bool {
        (**self).holds(permission)
    }
}

/// Hash-backed set of held permissions.
///
/// Build once per request (e.g. from session claims) when several checks will
/// run against the same list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grants(HashSet<String>);

impl Grants {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, permission: impl AsRef<str>) -> bool {
        self.0.insert(permission.as_ref().to_owned())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for Grants {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(|p| p.as_ref().to_owned()).collect())
    }
}

impl<S: AsRef<str>> Extend<S> for Grants {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        self.0.extend(iter.into_iter().map(|p| p.as_ref().to_owned()));
    }
}

impl HeldPermissions for Grants {
    fn holds(&self, permission: &str) -> bool {
        self.0.contains(permission)
    }
}
