//! Auth-domain identifiers, realm paths, credentials, and authority models.

pub mod authority;
pub mod credential;
pub mod entitlement;
pub mod id;
pub mod realm_path;

pub use authority::*;
pub use credential::*;
pub use entitlement::EntitlementCatalog;
pub use id::*;
pub use realm_path::*;
