//! Directory entities read (and, for identities, written) by the gate.

pub mod identity;
pub mod realm;
pub mod resource;
pub mod role;

pub use identity::*;
pub use realm::*;
pub use resource::*;
pub use role::*;

// self
use crate::{_prelude::*, auth::DomainKey};

/// Tenant partition of the identity store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
	/// Tenant key.
	pub key: DomainKey,
}
impl Domain {
	/// Creates a domain for the provided key.
	pub fn new(key: DomainKey) -> Self {
		Self { key }
	}
}
