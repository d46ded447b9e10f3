//! Presented credentials, stored digest algorithms, and internal verification.

// crates.io
use argon2::{
	Argon2,
	password_hash::{
		Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
	},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::Rng;
use sha2::{Digest, Sha256, Sha512};
use subtle::ConstantTimeEq;
// self
use crate::{_prelude::*, error::CredentialError};

const SALT_LEN: usize = 16;

/// Algorithm used to produce an identity's stored password digest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CipherAlgorithm {
	/// Unsalted SHA-256, base64 encoded.
	Sha256,
	/// Unsalted SHA-512, base64 encoded.
	Sha512,
	/// SHA-256 over password‖salt; stored as base64(digest‖salt).
	SaltedSha256,
	/// SHA-512 over password‖salt; stored as base64(digest‖salt).
	SaltedSha512,
	/// Argon2id PHC string.
	Argon2,
}
impl CipherAlgorithm {
	/// Returns a stable label suitable for logs.
	pub const fn as_str(self) -> &'static str {
		match self {
			CipherAlgorithm::Sha256 => "SHA256",
			CipherAlgorithm::Sha512 => "SHA512",
			CipherAlgorithm::SaltedSha256 => "SALTED_SHA256",
			CipherAlgorithm::SaltedSha512 => "SALTED_SHA512",
			CipherAlgorithm::Argon2 => "ARGON2",
		}
	}
}
impl Display for CipherAlgorithm {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Redacted credential wrapper keeping presented passwords out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);
impl Credential {
	/// Wraps a presented credential.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner credential value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Produces a stored digest of this credential with the given algorithm.
	pub fn digest(&self, algorithm: CipherAlgorithm) -> Result<String, CredentialError> {
		let password = self.0.as_bytes();

		match algorithm {
			CipherAlgorithm::Sha256 => Ok(STANDARD.encode(sha_digest::<Sha256>(password, &[]))),
			CipherAlgorithm::Sha512 => Ok(STANDARD.encode(sha_digest::<Sha512>(password, &[]))),
			CipherAlgorithm::SaltedSha256 => Ok(salted_digest::<Sha256>(password, &random_salt())),
			CipherAlgorithm::SaltedSha512 => Ok(salted_digest::<Sha512>(password, &random_salt())),
			CipherAlgorithm::Argon2 => {
				let salt = SaltString::encode_b64(&random_salt())?;

				Ok(Argon2::default().hash_password(password, &salt)?.to_string())
			},
		}
	}

	/// Recomputes the digest with `algorithm` and compares it against `stored`.
	///
	/// A mismatch is `Ok(false)`; only a malformed stored digest is an error.
	pub fn verify(&self, algorithm: CipherAlgorithm, stored: &str) -> Result<bool, CredentialError> {
		let password = self.0.as_bytes();

		match algorithm {
			CipherAlgorithm::Sha256 =>
				Ok(constant_time_eq(&sha_digest::<Sha256>(password, &[]), &STANDARD.decode(stored)?)),
			CipherAlgorithm::Sha512 =>
				Ok(constant_time_eq(&sha_digest::<Sha512>(password, &[]), &STANDARD.decode(stored)?)),
			CipherAlgorithm::SaltedSha256 => verify_salted::<Sha256>(password, stored),
			CipherAlgorithm::SaltedSha512 => verify_salted::<Sha512>(password, stored),
			CipherAlgorithm::Argon2 => {
				let parsed = PasswordHash::new(stored)?;

				match Argon2::default().verify_password(password, &parsed) {
					Ok(()) => Ok(true),
					Err(PasswordHashError::Password) => Ok(false),
					Err(e) => Err(e.into()),
				}
			},
		}
	}
}
impl From<&str> for Credential {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Credential").field(&"<redacted>").finish()
	}
}
impl Display for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

fn sha_digest<D>(password: &[u8], salt: &[u8]) -> Vec<u8>
where
	D: Digest,
{
	let mut hasher = D::new();

	hasher.update(password);
	hasher.update(salt);

	hasher.finalize().to_vec()
}

fn salted_digest<D>(password: &[u8], salt: &[u8]) -> String
where
	D: Digest,
{
	let mut payload = sha_digest::<D>(password, salt);

	payload.extend_from_slice(salt);

	STANDARD.encode(payload)
}

fn verify_salted<D>(password: &[u8], stored: &str) -> Result<bool, CredentialError>
where
	D: Digest,
{
	let decoded = STANDARD.decode(stored)?;

	if decoded.len() <= SALT_LEN {
		return Err(CredentialError::Truncated);
	}

	let (expected, salt) = decoded.split_at(decoded.len() - SALT_LEN);

	Ok(constant_time_eq(&sha_digest::<D>(password, salt), expected))
}

fn random_salt() -> [u8; SALT_LEN] {
	let mut salt = [0_u8; SALT_LEN];

	rand::rng().fill(&mut salt);

	salt
}

fn constant_time_eq(lhs: &[u8], rhs: &[u8]) -> bool {
	lhs.ct_eq(rhs).into()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const ALGORITHMS: [CipherAlgorithm; 5] = [
		CipherAlgorithm::Sha256,
		CipherAlgorithm::Sha512,
		CipherAlgorithm::SaltedSha256,
		CipherAlgorithm::SaltedSha512,
		CipherAlgorithm::Argon2,
	];

	#[test]
	fn credential_formatters_redact() {
		let credential = Credential::new("password123");

		assert_eq!(format!("{credential:?}"), "Credential(\"<redacted>\")");
		assert_eq!(format!("{credential}"), "<redacted>");
	}

	#[test]
	fn every_algorithm_verifies_its_own_digest() {
		let credential = Credential::new("password123");
		let wrong = Credential::new("password321");

		for algorithm in ALGORITHMS {
			let stored = credential.digest(algorithm).expect("Digest should be produced.");

			assert!(credential.verify(algorithm, &stored).expect("Digest should parse."), "{algorithm}");
			assert!(!wrong.verify(algorithm, &stored).expect("Digest should parse."), "{algorithm}");
		}
	}

	#[test]
	fn unsalted_digest_is_deterministic() {
		let credential = Credential::new("password123");

		assert_eq!(
			credential.digest(CipherAlgorithm::Sha256).expect("First digest should succeed."),
			credential.digest(CipherAlgorithm::Sha256).expect("Second digest should succeed.")
		);
		assert_ne!(
			credential.digest(CipherAlgorithm::SaltedSha256).expect("First digest should succeed."),
			credential.digest(CipherAlgorithm::SaltedSha256).expect("Second digest should succeed.")
		);
	}

	#[test]
	fn digest_comparison_requires_equal_length_and_bytes() {
		assert!(constant_time_eq(b"digest", b"digest"));
		assert!(!constant_time_eq(b"digest", b"digesT"));
		assert!(!constant_time_eq(b"digest", b"digest-with-suffix"));
		assert!(!constant_time_eq(b"", b"d"));

		let stored = Credential::new("password123")
			.digest(CipherAlgorithm::Sha512)
			.expect("Digest should be produced.");
		let truncated = STANDARD.encode(&STANDARD.decode(&stored).expect("Digest is base64.")[..32]);

		assert!(
			!Credential::new("password123")
				.verify(CipherAlgorithm::Sha512, &truncated)
				.expect("Truncated digest should still parse.")
		);
	}

	#[test]
	fn malformed_digests_are_errors() {
		let credential = Credential::new("password123");

		assert!(matches!(
			credential.verify(CipherAlgorithm::Sha256, "%%%"),
			Err(CredentialError::Encoding(_))
		));
		assert!(matches!(
			credential.verify(CipherAlgorithm::SaltedSha512, &STANDARD.encode([1_u8; 4])),
			Err(CredentialError::Truncated)
		));
		assert!(matches!(
			credential.verify(CipherAlgorithm::Argon2, "not-a-phc-string"),
			Err(CredentialError::Argon2 { .. })
		));
	}

	#[test]
	fn algorithms_serialize_as_screaming_snake_case() {
		let payload = serde_json::to_string(&CipherAlgorithm::SaltedSha256)
			.expect("Cipher algorithm should serialize.");

		assert_eq!(payload, "\"SALTED_SHA256\"");
	}
}
