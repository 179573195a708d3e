//! Single-slot container with atomic publication of immutable snapshots.
//!
//! # Mental model
//!
//! * Readers pin an `Arc<T>` and work against that immutable view. They never
//!   coordinate with writers.
//! * Writers derive a replacement from the current snapshot and publish it with
//!   CAS. A failed CAS means another writer won; the writer retries from the
//!   snapshot that beat it.
//!
//! # Concurrency & ordering
//!
//! * Reads are wait-free (`ArcSwap` load).
//! * Writers are lock-free. They contend only at the final CAS, never while the
//!   replacement is being built.
//! * Every value observed by a read was produced by the initial value, a
//!   committed `swap`, or a `store`; never a partially built value.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::trace;

/// Atomic reference to one immutable `T` at a time.
pub struct AtomicCell<T> {
	current: ArcSwap<T>,
}

impl<T> AtomicCell<T> {
	pub fn new(initial: T) -> Self {
		Self {
			current: ArcSwap::from_pointee(initial),
		}
	}

	pub fn from_arc(initial: Arc<T>) -> Self {
		Self {
			current: ArcSwap::new(initial),
		}
	}

	/// Returns the currently published snapshot.
	#[inline]
	pub fn read(&self) -> Arc<T> {
		self.current.load_full()
	}

	/// Runs `f` against the current snapshot without taking a reference count.
	///
	/// Keep `f` short: the snapshot stays pinned for its duration.
	#[inline]
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.current.load())
	}

	/// Replaces the snapshot with `f(current)` using a CAS retry loop.
	///
	/// `f` may run more than once under contention and must be pure. Returns the
	/// snapshot this call published.
	pub fn swap(&self, mut f: impl FnMut(&T) -> T) -> Arc<T> {
		let mut retries: u32 = 0;
		loop {
			let old = self.current.load_full();
			let new = Arc::new(f(&old));

			let prev = self.current.compare_and_swap(&old, new.clone());
			if Arc::ptr_eq(&prev, &old) {
				if retries > 0 {
					trace!(retries, "cell swap committed after contention");
				}
				return new;
			}
			// Lost the race, retry against the winner's snapshot.
			retries += 1;
		}
	}

	/// Unconditionally publishes `value`.
	pub fn store(&self, value: T) {
		self.current.store(Arc::new(value));
	}
}

impl<T: Default> Default for AtomicCell<T> {
	fn default() -> Self {
		Self::new(T::default())
	}
}

impl<T: fmt::Debug> fmt::Debug for AtomicCell<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("AtomicCell").field(&*self.current.load()).finish()
	}
}
