//! Realm full paths (`/`, `/even`, `/even/two`) and derived pseudo-realms.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, auth::GroupKey};

/// Error returned when a realm path fails validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum RealmPathError {
	/// Paths must start at the root.
	#[error("Realm path must start with `/`: {path}.")]
	NotAbsolute {
		/// Offending path.
		path: String,
	},
	/// Paths cannot contain empty segments or a trailing slash.
	#[error("Realm path contains an empty segment: {path}.")]
	EmptySegment {
		/// Offending path.
		path: String,
	},
	/// Paths cannot contain whitespace.
	#[error("Realm path contains whitespace: {path}.")]
	ContainsWhitespace {
		/// Offending path.
		path: String,
	},
}

/// Validated full path of a realm in the realm tree.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RealmPath(String);
impl RealmPath {
	/// Full path of the root realm.
	pub const ROOT: &'static str = "/";

	/// Validates and wraps a realm path.
	pub fn new(value: impl Into<String>) -> Result<Self, RealmPathError> {
		let path = value.into();

		if !path.starts_with('/') {
			return Err(RealmPathError::NotAbsolute { path });
		}
		if path.chars().any(char::is_whitespace) {
			return Err(RealmPathError::ContainsWhitespace { path });
		}
		if path != Self::ROOT && path[1..].split('/').any(str::is_empty) {
			return Err(RealmPathError::EmptySegment { path });
		}

		Ok(Self(path))
	}

	/// Returns the root realm path.
	pub fn root() -> Self {
		Self(Self::ROOT.to_owned())
	}

	/// Returns `true` for the root realm.
	pub fn is_root(&self) -> bool {
		self.0 == Self::ROOT
	}

	/// Parent path, or `None` for the root.
	pub fn parent(&self) -> Option<Self> {
		if self.is_root() {
			return None;
		}

		match self.0.rfind('/') {
			Some(0) | None => Some(Self::root()),
			Some(idx) => Some(Self(self.0[..idx].to_owned())),
		}
	}

	/// Every path from the root down to (and including) this one.
	pub fn lineage(&self) -> Vec<Self> {
		let mut chain = vec![self.clone()];
		let mut cursor = self.parent();

		while let Some(path) = cursor {
			cursor = path.parent();
			chain.push(path);
		}

		chain.reverse();

		chain
	}

	/// Pseudo-realm scoping the authorities granted to the owner of a group in this realm.
	pub fn group_owner_realm(&self, group: &GroupKey) -> String {
		format!("{}@{group}", self.0)
	}
}
impl Deref for RealmPath {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for RealmPath {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<RealmPath> for String {
	fn from(value: RealmPath) -> Self {
		value.0
	}
}
impl TryFrom<String> for RealmPath {
	type Error = RealmPathError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl FromStr for RealmPath {
	type Err = RealmPathError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for RealmPath {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Realm({})", self.0)
	}
}
impl Display for RealmPath {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
