//! Strongly typed identifiers enforced across the gate domain.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty or whitespace.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (domain, identity, resource, ...).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (domain, identity, resource, ...).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (domain, identity, resource, ...).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { DomainKey, "Key of a tenant domain partitioning the identity store.", "Domain" }
def_id! { IdentityKey, "Stable key of a stored identity.", "Identity" }
def_id! { ResourceKey, "Key of an external resource binding.", "Resource" }
def_id! { RoleKey, "Key of a role.", "Role" }
def_id! { GroupKey, "Key of a group.", "Group" }
def_id! { PolicyKey, "Key of an account policy.", "Policy" }

impl DomainKey {
	/// Key of the master domain every deployment ships with.
	pub const MASTER: &'static str = "Master";

	/// Returns the master domain key.
	pub fn master() -> Self {
		Self(Self::MASTER.to_owned())
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_padding_and_blanks() {
		assert!(DomainKey::new(" Two").is_err(), "Leading whitespace must be rejected.");
		assert!(DomainKey::new("Two ").is_err(), "Trailing whitespace must be rejected.");

		let domain = DomainKey::new("Two").expect("Domain fixture should be considered valid.");

		assert_eq!(domain.as_ref(), "Two");
		assert!(IdentityKey::new("").is_err());
		assert!(ResourceKey::new("resource ldap").is_err());
		assert_eq!(DomainKey::master().as_ref(), DomainKey::MASTER);
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let payload = "\"resource-ldap\"";
		let resource: ResourceKey =
			serde_json::from_str(payload).expect("Resource key should deserialize successfully.");

		assert_eq!(resource.as_ref(), "resource-ldap");
		assert!(serde_json::from_str::<ResourceKey>("\"with space\"").is_err());
		assert!(serde_json::from_str::<ResourceKey>("\" resource-ldap\"").is_err());
	}

	#[test]
	fn unicode_whitespace_and_length_limits() {
		let nbsp = format!("group{}key", '\u{00A0}');

		assert!(GroupKey::new(&nbsp).is_err());

		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		GroupKey::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(IDENTIFIER_MAX_LEN + 1);

		assert!(GroupKey::new(&too_long).is_err());
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: BTreeMap<RoleKey, u8> = BTreeMap::from_iter([(
			RoleKey::new("User-reviewer").expect("Role used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("User-reviewer"), Some(&7));
	}
}
