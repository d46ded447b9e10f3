//! Read/write contracts the gate needs from the directory, plus reference implementations.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::{Directory, MemoryStore, Partition};

// self
use crate::{
	_prelude::*,
	auth::{DomainKey, IdentityKey, RealmPath, ResourceKey},
	model::{Domain, ExternalResource, Group, Identity, Realm, Role},
};

/// Boxed future returned by every store contract.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Registry of tenant domains.
pub trait DomainStore
where
	Self: Send + Sync,
{
	/// Fetches the domain registered under `key`, if any.
	fn find_domain<'a>(&'a self, key: &'a DomainKey) -> StoreFuture<'a, Option<Domain>>;
}

/// Named configuration values, partitioned per domain.
pub trait ConfigStore
where
	Self: Send + Sync,
{
	/// Fetches every value configured under `key`.
	fn get_values<'a>(
		&'a self,
		domain: &'a DomainKey,
		key: &'a str,
	) -> StoreFuture<'a, Option<Vec<String>>>;

	/// Fetches the first value configured under `key`.
	fn get_string<'a>(
		&'a self,
		domain: &'a DomainKey,
		key: &'a str,
	) -> StoreFuture<'a, Option<String>> {
		Box::pin(async move {
			Ok(self.get_values(domain, key).await?.and_then(|values| values.into_iter().next()))
		})
	}

	/// Fetches the first value configured under `key` as a boolean.
	///
	/// Values other than `true`/`false` (case-insensitive) are treated as absent.
	fn get_bool<'a>(&'a self, domain: &'a DomainKey, key: &'a str) -> StoreFuture<'a, Option<bool>> {
		Box::pin(async move {
			Ok(self.get_string(domain, key).await?.and_then(|value| {
				match value.trim().to_ascii_lowercase().as_str() {
					"true" => Some(true),
					"false" => Some(false),
					_ => None,
				}
			}))
		})
	}
}

/// Identity lookups and the single write the gate performs.
pub trait IdentityStore
where
	Self: Send + Sync,
{
	/// Fetches the identity named `username` in `domain`, if present.
	fn find_by_name<'a>(
		&'a self,
		domain: &'a DomainKey,
		username: &'a str,
	) -> StoreFuture<'a, Option<Identity>>;

	/// Persists (replaces) an identity record.
	fn save(&self, identity: Identity) -> StoreFuture<'_, ()>;

	/// Resources assigned to the identity, in store order.
	fn find_assigned_resources<'a>(
		&'a self,
		identity: &'a Identity,
	) -> StoreFuture<'a, Vec<ExternalResource>>;

	/// Roles effectively assigned to the identity, static and dynamic, deduplicated by key.
	fn find_effective_roles<'a>(&'a self, identity: &'a Identity) -> StoreFuture<'a, Vec<Role>>;
}

/// Realm tree lookups.
pub trait RealmStore
where
	Self: Send + Sync,
{
	/// Realms from the root down to and including `realm`, skipping unregistered paths.
	fn find_ancestors<'a>(
		&'a self,
		domain: &'a DomainKey,
		realm: &'a RealmPath,
	) -> StoreFuture<'a, Vec<Realm>>;
}

/// External resource lookups by key.
pub trait ResourceStore
where
	Self: Send + Sync,
{
	/// Fetches the resource registered under `key`, if any.
	fn find_resource<'a>(
		&'a self,
		domain: &'a DomainKey,
		key: &'a ResourceKey,
	) -> StoreFuture<'a, Option<ExternalResource>>;
}

/// Group ownership lookups.
pub trait GroupStore
where
	Self: Send + Sync,
{
	/// Groups whose user owner is `owner`.
	fn find_owned_by<'a>(
		&'a self,
		domain: &'a DomainKey,
		owner: &'a IdentityKey,
	) -> StoreFuture<'a, Vec<Group>>;
}

/// Error type produced by store implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// The record references a domain the store does not hold.
	#[error("Domain {domain} is not registered in the store.")]
	MissingDomain {
		/// Domain key of the offending record.
		domain: String,
	},
}
