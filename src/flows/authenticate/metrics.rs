// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for authentication attempts.
#[derive(Debug, Default)]
pub struct AuthenticationMetrics {
	attempts: AtomicU64,
	success: AtomicU64,
	denial: AtomicU64,
	failure: AtomicU64,
}
impl AuthenticationMetrics {
	/// Returns the total number of authentication attempts.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of attempts that authenticated.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of attempts refused (unknown identity, suspension, status, credential).
	pub fn denials(&self) -> u64 {
		self.denial.load(Ordering::Relaxed)
	}

	/// Returns the number of attempts aborted by a store failure.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_denial(&self) {
		self.denial.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}
}
