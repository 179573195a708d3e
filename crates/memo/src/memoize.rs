//! Memoized function wrappers.
//!
//! # Role
//!
//! Composes [`Key`], [`PersistentMap`] and [`AtomicCell`] into callables that
//! cache results by argument tuple and can be shared across threads without
//! external locking.
//!
//! # Data flow
//!
//! 1. Probe: load the current snapshot and look the arguments up.
//! 2. Hit: return a clone of the cached value. Nothing else happens.
//! 3. Miss: run the wrapped function outside any lock.
//! 4. Merge: CAS-publish `snapshot.assoc(key, result)` and return the result.
//!
//! # Failure modes & recovery
//!
//! * The wrapped function failing (an `Err` from [`Memoized::try_call`] or a
//!   panic) leaves the cache untouched, so the next identical call runs it again.
//! * Racing misses for one key may each run the function. The last merge wins;
//!   the function is required to be pure, so the values agree.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::cell::AtomicCell;
use crate::config::MemoConfig;
use crate::key::{Args, Key, SeededState};
use crate::map::PersistentMap;

/// Snapshot type published by a memoizer.
pub type MemoMap<A, R> = PersistentMap<Key<A>, R>;

/// A function wrapped with a lock-free result cache.
pub struct Memoized<A: Args, R, F> {
	func: F,
	cache: AtomicCell<MemoMap<A, R>>,
	config: MemoConfig,
}

impl<A: Args, R: Clone, F> Memoized<A, R, F> {
	pub fn new(func: F) -> Self {
		Self::with_config(func, MemoConfig::default())
	}

	pub fn with_config(func: F, config: MemoConfig) -> Self {
		Self {
			func,
			cache: AtomicCell::new(Self::empty_map(&config)),
			config,
		}
	}

	fn empty_map(config: &MemoConfig) -> MemoMap<A, R> {
		PersistentMap::with_hasher(SeededState::new(config.seed))
	}

	pub fn config(&self) -> &MemoConfig {
		&self.config
	}

	/// Returns the cached result for `args` without calling the function.
	pub fn get(&self, args: &A) -> Option<R> {
		self.cache.with(|map| map.find(args).cloned())
	}

	pub fn contains(&self, args: &A) -> bool {
		self.cache.with(|map| map.contains_key(args))
	}

	/// Number of cached argument tuples.
	pub fn len(&self) -> usize {
		self.cache.with(|map| map.len())
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Pins the current cache generation.
	pub fn snapshot(&self) -> Arc<MemoMap<A, R>> {
		self.cache.read()
	}

	/// Drops every cached result.
	pub fn clear(&self) {
		self.cache.store(Self::empty_map(&self.config));
		debug!(label = self.config.label, "memo cache cleared");
	}

	fn commit(&self, args: A, value: &R) {
		let key = Key::new(args);
		let published = self.cache.swap(|map| map.assoc(key.clone(), value.clone()));
		trace!(
			label = self.config.label,
			entries = published.len(),
			"memo result committed"
		);
	}

	/// Returns `func(args)`, serving repeat calls from the cache.
	pub fn call(&self, args: A) -> R
	where
		F: Fn(A) -> R,
	{
		if let Some(hit) = self.get(&args) {
			return hit;
		}
		trace!(label = self.config.label, arity = args.arity(), "memo miss");
		let result = (self.func)(args.clone());
		self.commit(args, &result);
		result
	}

	/// Fallible form of [`Memoized::call`]. Only `Ok` results are cached.
	pub fn try_call<E>(&self, args: A) -> Result<R, E>
	where
		F: Fn(A) -> Result<R, E>,
	{
		if let Some(hit) = self.get(&args) {
			return Ok(hit);
		}
		trace!(label = self.config.label, arity = args.arity(), "memo miss");
		match (self.func)(args.clone()) {
			Ok(result) => {
				self.commit(args, &result);
				Ok(result)
			}
			Err(err) => {
				debug!(label = self.config.label, "memoized function failed, nothing cached");
				Err(err)
			}
		}
	}
}

impl<A: Args, R, F> fmt::Debug for Memoized<A, R, F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Memoized")
			.field("label", &self.config.label)
			.field("entries", &self.cache.with(|map| map.len()))
			.finish_non_exhaustive()
	}
}

/// A memoized function that calls back into its own cache.
///
/// The wrapped function receives a handle to the memoized form of itself, so
/// intermediate results of a recursion are cached along with the final one.
pub struct Recursive<A: Args, R, F> {
	memo: Memoized<A, R, F>,
}

impl<A: Args, R: Clone, F> Recursive<A, R, F>
where
	F: Fn(&dyn Fn(A) -> R, A) -> R,
{
	pub fn new(func: F) -> Self {
		Self::with_config(func, MemoConfig::default())
	}

	pub fn with_config(func: F, config: MemoConfig) -> Self {
		Self {
			memo: Memoized::with_config(func, config),
		}
	}

	pub fn call(&self, args: A) -> R {
		if let Some(hit) = self.memo.get(&args) {
			return hit;
		}
		trace!(label = self.memo.config.label, arity = args.arity(), "memo miss");
		let recurse: &dyn Fn(A) -> R = &|inner: A| self.call(inner);
		let result = (self.memo.func)(recurse, args.clone());
		self.memo.commit(args, &result);
		result
	}

	/// The underlying cache, for inspection.
	pub fn memo(&self) -> &Memoized<A, R, F> {
		&self.memo
	}
}

impl<A: Args, R, F> fmt::Debug for Recursive<A, R, F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Recursive").field(&self.memo).finish()
	}
}

/// Wraps `func` in a thread-safe result cache.
///
/// Each call to `memoize` creates an independent cache owned by the returned
/// closure.
pub fn memoize<A, R, F>(func: F) -> impl Fn(A) -> R + Send + Sync
where
	A: Args,
	R: Clone + Send + Sync,
	F: Fn(A) -> R + Send + Sync,
{
	let memo = Memoized::new(func);
	move |args| memo.call(args)
}

/// Like [`memoize`], but `func` recurses through the cache via its first argument.
pub fn memoize_recursive<A, R, F>(func: F) -> impl Fn(A) -> R + Send + Sync
where
	A: Args,
	R: Clone + Send + Sync,
	F: Fn(&dyn Fn(A) -> R, A) -> R + Send + Sync,
{
	let memo = Recursive::new(func);
	move |args| memo.call(args)
}
