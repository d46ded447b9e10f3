//! JSON-file-backed directory for lightweight deployments and fixtures.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{DomainKey, IdentityKey, RealmPath, ResourceKey},
	model::{Domain, ExternalResource, Group, Identity, Realm, Role},
	store::{
		ConfigStore, DomainStore, GroupStore, IdentityStore, MemoryStore, RealmStore,
		ResourceStore, StoreError, StoreFuture, memory::Directory,
	},
};

/// Serves a [`Directory`] snapshot loaded from disk and rewrites the file after every identity
/// save.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: MemoryStore,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: MemoryStore::from_directory(snapshot) })
	}

	/// Applies `edit` to the directory and persists the result.
	///
	/// Used to seed domains, realms, resources, roles, groups, and identities. The in-memory
	/// directory only changes once the file has been replaced.
	pub fn update<F>(&self, edit: F) -> Result<(), StoreError>
	where
		F: FnOnce(&mut Directory),
	{
		self.commit(|directory| {
			edit(directory);

			Ok(())
		})
	}

	/// Returns a copy of the whole directory.
	pub fn snapshot(&self) -> Directory {
		self.inner.snapshot()
	}

	/// Location of the snapshot file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<Directory, StoreError> {
		if !path.exists() {
			return Ok(Directory::default());
		}

		let metadata = path.metadata().map_err(|e| StoreError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(Directory::default());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;
		let mut deserializer = serde_json::Deserializer::from_slice(&bytes);

		serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
			StoreError::Serialization {
				message: format!("Failed to parse {} at {}: {}", path.display(), e.path(), e.inner()),
			}
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn commit<F>(&self, edit: F) -> Result<(), StoreError>
	where
		F: FnOnce(&mut Directory) -> Result<(), StoreError>,
	{
		let mut guard = self.inner.0.write();
		let mut staged = guard.clone();

		edit(&mut staged)?;
		self.persist_locked(&staged)?;
		*guard = staged;

		Ok(())
	}

	fn persist_locked(&self, directory: &Directory) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(directory).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize directory snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl DomainStore for FileStore {
	fn find_domain<'a>(&'a self, key: &'a DomainKey) -> StoreFuture<'a, Option<Domain>> {
		self.inner.find_domain(key)
	}
}
impl ConfigStore for FileStore {
	fn get_values<'a>(
		&'a self,
		domain: &'a DomainKey,
		key: &'a str,
	) -> StoreFuture<'a, Option<Vec<String>>> {
		self.inner.get_values(domain, key)
	}
}
impl IdentityStore for FileStore {
	fn find_by_name<'a>(
		&'a self,
		domain: &'a DomainKey,
		username: &'a str,
	) -> StoreFuture<'a, Option<Identity>> {
		self.inner.find_by_name(domain, username)
	}

	fn save(&self, identity: Identity) -> StoreFuture<'_, ()> {
		Box::pin(async move { self.commit(|directory| directory.save_identity(identity)) })
	}

	fn find_assigned_resources<'a>(
		&'a self,
		identity: &'a Identity,
	) -> StoreFuture<'a, Vec<ExternalResource>> {
		self.inner.find_assigned_resources(identity)
	}

	fn find_effective_roles<'a>(&'a self, identity: &'a Identity) -> StoreFuture<'a, Vec<Role>> {
		self.inner.find_effective_roles(identity)
	}
}
impl RealmStore for FileStore {
	fn find_ancestors<'a>(
		&'a self,
		domain: &'a DomainKey,
		realm: &'a RealmPath,
	) -> StoreFuture<'a, Vec<Realm>> {
		self.inner.find_ancestors(domain, realm)
	}
}
impl ResourceStore for FileStore {
	fn find_resource<'a>(
		&'a self,
		domain: &'a DomainKey,
		key: &'a ResourceKey,
	) -> StoreFuture<'a, Option<ExternalResource>> {
		self.inner.find_resource(domain, key)
	}
}
impl GroupStore for FileStore {
	fn find_owned_by<'a>(
		&'a self,
		domain: &'a DomainKey,
		owner: &'a IdentityKey,
	) -> StoreFuture<'a, Vec<Group>> {
		self.inner.find_owned_by(domain, owner)
	}
}
