//! `granular-auth` — action/resource/scope permission strings.
//!
//! Mints canonical permission strings and checks held permission lists.
//! This crate is intentionally decoupled from HTTP, sessions and storage: the
//! caller resolves who owns what and who is asking, then asks here.

pub mod actions;
pub mod authorize;
pub mod catalog;
pub mod codec;
pub mod held;
pub mod ownership;
pub mod permissions;

pub use actions::{ActionEntry, ActionScopes};
pub use authorize::{AuthorizationExplanation, AuthzError};
pub use catalog::{CatalogError, PermissionCatalog};
pub use codec::{ActionVariants, ArsCodec, ScopedPermission};
pub use held::{Grants, HeldPermissions};
pub use ownership::OwnershipScopes;
pub use permissions::{Permission, PermissionParts};
