//! Stored identity records and the login bookkeeping applied to them.

// self
use crate::{
	_prelude::*,
	auth::{CipherAlgorithm, DomainKey, IdentityKey, RealmPath, ResourceKey, RoleKey},
};

/// A user record with credential, status, and realm membership.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
	/// Stable key.
	pub key: IdentityKey,
	/// Domain partition the identity lives in.
	pub domain: DomainKey,
	/// Login name, unique per domain.
	pub username: String,
	/// Stored credential digest; `None` never verifies internally.
	#[serde(default)]
	pub password: Option<String>,
	/// Algorithm that produced [`password`](Self::password).
	#[serde(default)]
	pub cipher_algorithm: Option<CipherAlgorithm>,
	/// Workflow status, compared against the configured allow-list.
	#[serde(default)]
	pub status: Option<String>,
	/// Suspended identities never authenticate.
	#[serde(default)]
	pub suspended: bool,
	/// While set, the identity holds only `MUST_CHANGE_PASSWORD`.
	#[serde(default)]
	pub must_change_password: bool,
	/// Consecutive failed login attempts.
	#[serde(default)]
	pub failed_logins: u32,
	/// Instant of the last successful login, when tracked.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub last_login_date: Option<OffsetDateTime>,
	/// Realm the identity belongs to.
	pub realm: RealmPath,
	/// External resources assigned directly to the identity.
	#[serde(default)]
	pub resources: Vec<ResourceKey>,
	/// Statically assigned roles.
	#[serde(default)]
	pub roles: Vec<RoleKey>,
	/// Plain attributes available to provisioning mappings.
	#[serde(default)]
	pub attributes: BTreeMap<String, Vec<String>>,
}
impl Identity {
	/// Creates an unsuspended identity without password or status.
	pub fn new(
		key: IdentityKey,
		domain: DomainKey,
		username: impl Into<String>,
		realm: RealmPath,
	) -> Self {
		Self {
			key,
			domain,
			username: username.into(),
			password: None,
			cipher_algorithm: None,
			status: None,
			suspended: false,
			must_change_password: false,
			failed_logins: 0,
			last_login_date: None,
			realm,
			resources: Vec::new(),
			roles: Vec::new(),
			attributes: BTreeMap::new(),
		}
	}

	/// First value of a plain attribute.
	pub fn attribute(&self, name: &str) -> Option<&str> {
		self.attributes.get(name).and_then(|values| values.first()).map(String::as_str)
	}

	/// Applies the bookkeeping for a successful login; returns whether anything changed.
	pub fn record_success(&mut self, log_last_login: bool, now: OffsetDateTime) -> bool {
		let mut modified = false;

		if log_last_login {
			self.last_login_date = Some(now);
			modified = true;
		}
		if self.failed_logins != 0 {
			self.failed_logins = 0;
			modified = true;
		}

		modified
	}

	/// Applies the bookkeeping for a failed login; always modifies the record.
	pub fn record_failure(&mut self) -> bool {
		self.failed_logins = self.failed_logins.saturating_add(1);

		true
	}
}
impl Debug for Identity {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Identity")
			.field("key", &self.key)
			.field("domain", &self.domain)
			.field("username", &self.username)
			.field("password", &self.password.as_ref().map(|_| "<redacted>"))
			.field("cipher_algorithm", &self.cipher_algorithm)
			.field("status", &self.status)
			.field("suspended", &self.suspended)
			.field("must_change_password", &self.must_change_password)
			.field("failed_logins", &self.failed_logins)
			.field("last_login_date", &self.last_login_date)
			.field("realm", &self.realm)
			.finish()
	}
}
