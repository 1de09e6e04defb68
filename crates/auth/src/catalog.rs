//! All protected resources of an application, one codec each.
//!
//! Loaded from configuration shaped like
//!
//! ```json
//! { "post": { "create": ["others"], "read": ["own", "others"] } }
//! ```
//!
//! Document order is declared order for resources, actions and scopes.

use std::io::Read;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::info;

use granular_core::{DomainError, DomainResult};

use crate::{ActionScopes, ArsCodec, HeldPermissions, Permission};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog document: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionCatalog {
    codecs: Vec<ArsCodec>,
}

impl PermissionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a codec, rejecting a second codec for the same resource.
    pub fn insert(&mut self, codec: ArsCodec) -> DomainResult<()> {
        if self.get(codec.resource()).is_some() {
            return Err(DomainError::invariant(format!(
                "resource '{}' is declared more than once",
                codec.resource()
            )));
        }
        self.codecs.push(codec);
        Ok(())
    }

    pub fn with(mut self, codec: ArsCodec) -> DomainResult<Self> {
        self.insert(codec)?;
        Ok(self)
    }

    pub fn get(&self, resource: &str) -> Option<&ArsCodec> {
        self.codecs.iter().find(|c| c.resource() == resource)
    }

    pub fn codecs(&self) -> &[ArsCodec] {
        &self.codecs
    }

    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.codecs.iter().map(ArsCodec::resource)
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Every scoped permission of every resource, in declared order.
    ///
    /// Handy for seeding a role that may do everything.
    pub fn enumerate_all(&self) -> Vec<Permission> {
        self.codecs
            .iter()
            .flat_map(|codec| codec.enumerate_all(None))
            .collect()
    }

    /// [`ArsCodec::verify`] on the codec for `resource`; unknown resources never verify.
    pub fn verify<H>(&self, resource: &str, action: &str, scope: Option<&str>, held: &H) -> bool
    where
        H: HeldPermissions + ?Sized,
    {
        self.get(resource)
            .is_some_and(|codec| codec.verify(action, scope, held))
    }

    /// Parse a catalog document, validating every resource strictly.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    fn from_document(document: CatalogDocument) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for (resource, actions) in document.0 {
            catalog.insert(ArsCodec::try_new(resource, actions)?)?;
        }

        info!(
            resources = catalog.len(),
            permissions = catalog.enumerate_all().len(),
            "permission catalog loaded"
        );
        Ok(catalog)
    }
}

/// Resource entries in document order.
struct CatalogDocument(Vec<(String, ActionScopes)>);

impl<'de> Deserialize<'de> for CatalogDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = CatalogDocument;

            fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str("a map of resource names to action maps")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                let mut entries = Vec::new();
                while let Some(entry) = access.next_entry::<String, ActionScopes>()? {
                    entries.push(entry);
                }
                Ok(CatalogDocument(entries))
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "post": { "create": ["others"], "read": ["own", "others"] },
        "comment": { "delete": ["own", "others"] }
    }"#;

    #[test]
    fn loads_resources_in_document_order() {
        let catalog = PermissionCatalog::from_json_str(DOCUMENT).unwrap();
        assert_eq!(catalog.resources().collect::<Vec<_>>(), vec!["post", "comment"]);
        assert_eq!(
            catalog.enumerate_all(),
            vec![
                "create:post:others",
                "read:post:own",
                "read:post:others",
                "delete:comment:own",
                "delete:comment:others",
            ]
        );
    }

    #[test]
    fn from_reader_matches_from_str() {
        let a = PermissionCatalog::from_json_str(DOCUMENT).unwrap();
        let b = PermissionCatalog::from_reader(DOCUMENT.as_bytes()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn verify_routes_to_resource_codec() {
        let catalog = PermissionCatalog::from_json_str(DOCUMENT).unwrap();
        let held = ["read:post:own", "delete:comment:others"];
        assert!(catalog.verify("post", "read", Some("own"), &held));
        assert!(catalog.verify("comment", "delete", Some("others"), &held));
        assert!(!catalog.verify("comment", "delete", Some("own"), &held));
        assert!(!catalog.verify("attachment", "read", Some("own"), &held));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = PermissionCatalog::from_json_str(r#"{"post": ["read"]}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
    }

    #[test]
    fn degenerate_configuration_is_a_domain_error() {
        let err = PermissionCatalog::from_json_str(r#"{"post": {"read": []}}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Domain(DomainError::InvariantViolation(_))));

        let err = PermissionCatalog::from_json_str(r#"{"post": {"read": ["own"]}, "post": {"create": ["own"]}}"#)
            .unwrap_err();
        assert!(matches!(err, CatalogError::Domain(DomainError::InvariantViolation(_))));
    }

    #[test]
    fn builder_rejects_duplicate_resource() {
        let codec = ArsCodec::new("post", ActionScopes::new().action("read", ["own"]));
        let catalog = PermissionCatalog::new().with(codec.clone()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.with(codec).is_err());
    }
}
