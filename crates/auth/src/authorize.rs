use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use granular_core::DomainError;

use crate::codec::requested;
use crate::{ArsCodec, HeldPermissions, Permission};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(Permission),
}

impl From<AuthzError> for DomainError {
    fn from(_: AuthzError) -> Self {
        DomainError::Unauthorized
    }
}

/// Outcome of a permission check, for audit trails and debugging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationExplanation {
    /// Every permission string the check required, in request order.
    pub required: Vec<Permission>,

    /// Required permissions the caller does not hold.
    pub missing: Vec<Permission>,

    pub granted: bool,
}

/// Guard-style wrappers over [`ArsCodec::verify`].
///
/// Same all-of semantics; a denial names the first missing permission so the
/// calling layer can log it and map it to its own "forbidden" response.
impl ArsCodec {
    pub fn authorize<H>(&self, action: &str, scope: Option<&str>, held: &H) -> Result<(), AuthzError>
    where
        H: HeldPermissions + ?Sized,
    {
        self.deny_if_missing(self.first_missing(action, std::iter::once(scope), held))
    }

    pub fn authorize_all<S, H>(&self, action: &str, scopes: &[S], held: &H) -> Result<(), AuthzError>
    where
        S: AsRef<str>,
        H: HeldPermissions + ?Sized,
    {
        self.deny_if_missing(self.first_missing(action, requested(scopes), held))
    }

    /// Explain a multi-scope check without short-circuiting on the first miss.
    pub fn explain<S, H>(&self, action: &str, scopes: &[S], held: &H) -> AuthorizationExplanation
    where
        S: AsRef<str>,
        H: HeldPermissions + ?Sized,
    {
        let required: Vec<Permission> = requested(scopes)
            .into_iter()
            .map(|scope| self.encode(action, scope))
            .collect();
        let missing: Vec<Permission> = required
            .iter()
            .filter(|p| !held.holds(p.as_str()))
            .cloned()
            .collect();

        AuthorizationExplanation {
            granted: missing.is_empty(),
            required,
            missing,
        }
    }

    fn deny_if_missing(&self, missing: Option<Permission>) -> Result<(), AuthzError> {
        match missing {
            None => Ok(()),
            Some(permission) => {
                debug!(resource = %self.resource(), permission = %permission, "permission denied");
                Err(AuthzError::Forbidden(permission))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ActionScopes;

    fn posts() -> ArsCodec {
        ArsCodec::new(
            "post",
            ActionScopes::new()
                .action("create", ["others"])
                .action("read", ["own", "others"]),
        )
    }

    #[test]
    fn authorize_passes_when_held() {
        let codec = posts();
        assert_eq!(codec.authorize("create", None, &["create:post"]), Ok(()));
        assert_eq!(codec.authorize("read", Some("own"), &["read:post:own"]), Ok(()));
    }

    #[test]
    fn authorize_names_missing_permission() {
        let err = posts()
            .authorize("read", Some("others"), &["read:post:own"])
            .unwrap_err();
        assert_eq!(err, AuthzError::Forbidden(Permission::new("read:post:others")));
        assert_eq!(err.to_string(), "forbidden: missing permission 'read:post:others'");
        assert_eq!(DomainError::from(err), DomainError::Unauthorized);
    }

    #[test]
    fn authorize_all_reports_first_missing_in_request_order() {
        let codec = posts();
        let held: [&str; 0] = [];
        let err = codec.authorize_all("read", &["others", "own"], &held).unwrap_err();
        assert_eq!(err, AuthzError::Forbidden(Permission::new("read:post:others")));

        let none: [&str; 0] = [];
        assert_eq!(codec.authorize_all("create", &none, &["create:post"]), Ok(()));
    }

    #[test]
    fn explain_lists_every_missing_permission() {
        let explanation = posts().explain("read", &["own", "others"], &["read:post:own"]);
        assert!(!explanation.granted);
        assert_eq!(explanation.required, vec!["read:post:own", "read:post:others"]);
        assert_eq!(explanation.missing, vec!["read:post:others"]);

        let json = serde_json::to_value(&explanation).unwrap();
        assert_eq!(json["granted"], serde_json::json!(false));
        assert_eq!(json["missing"], serde_json::json!(["read:post:others"]));
    }

    #[test]
    fn explain_agrees_with_verify_all() {
        let codec = posts();
        let held = ["read:post:own", "read:post:others"];
        let explanation = codec.explain("read", &["own", "others"], &held);
        assert_eq!(explanation.granted, codec.verify_all("read", &["own", "others"], &held));
        assert!(explanation.missing.is_empty());
    }
}
