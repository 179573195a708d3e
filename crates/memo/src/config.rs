/// Construction options for a memoizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoConfig {
	/// Name attached to this cache's log events.
	pub label: &'static str,
	/// Seed for the cache's key hash function.
	pub seed: u64,
}

impl MemoConfig {
	pub const fn new(label: &'static str) -> Self {
		Self { label, seed: 0 }
	}

	pub const fn with_seed(self, seed: u64) -> Self {
		Self { seed, ..self }
	}
}

impl Default for MemoConfig {
	fn default() -> Self {
		Self::new("memo")
	}
}
