//! Argument tuple keys and the seeded hasher used to index them.
//!
//! # Role
//!
//! A [`Key`] is the lookup identity of one memoized call. Two keys are equal iff
//! their argument tuples have the same arity and are pairwise equal, position by
//! position. Hashing is content-based and seeded so independent caches can use
//! independent hash functions.
//!
//! # Invariants
//!
//! - Equal keys hash equally under every seed.
//! - `Key<A>` hashes exactly like `A`, which makes `Borrow<A>` sound for map probes.
//! - The empty tuple hashes to a value that depends only on the seed.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use rustc_hash::FxHasher;

/// Capability required of a memoized function's argument list.
///
/// Argument types without structural equality or hashing cannot implement this
/// trait, so they are rejected when the memoizer is built rather than compared
/// by identity at runtime.
pub trait Args: Hash + Eq + Clone + Send + Sync + 'static {
	/// Number of positional arguments.
	fn arity(&self) -> usize;
}

impl Args for () {
	fn arity(&self) -> usize {
		0
	}
}

macro_rules! impl_args_scalar {
	($($ty:ty),+ $(,)?) => {
		$(
			impl Args for $ty {
				fn arity(&self) -> usize {
					1
				}
			}
		)+
	};
}

impl_args_scalar!(
	u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, bool, char, String,
	&'static str,
);

macro_rules! impl_args_tuple {
	($len:expr => $($name:ident),+) => {
		impl<$($name),+> Args for ($($name,)+)
		where
			$($name: Hash + Eq + Clone + Send + Sync + 'static,)+
		{
			fn arity(&self) -> usize {
				$len
			}
		}
	};
}

impl_args_tuple!(1 => A1);
impl_args_tuple!(2 => A1, A2);
impl_args_tuple!(3 => A1, A2, A3);
impl_args_tuple!(4 => A1, A2, A3, A4);
impl_args_tuple!(5 => A1, A2, A3, A4, A5);
impl_args_tuple!(6 => A1, A2, A3, A4, A5, A6);
impl_args_tuple!(7 => A1, A2, A3, A4, A5, A6, A7);
impl_args_tuple!(8 => A1, A2, A3, A4, A5, A6, A7, A8);
impl_args_tuple!(9 => A1, A2, A3, A4, A5, A6, A7, A8, A9);
impl_args_tuple!(10 => A1, A2, A3, A4, A5, A6, A7, A8, A9, A10);
impl_args_tuple!(11 => A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11);
impl_args_tuple!(12 => A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11, A12);

/// Seeded [`BuildHasher`] over [`FxHasher`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeededState {
	seed: u64,
}

impl SeededState {
	/// Creates a hasher factory for the given seed.
	pub const fn new(seed: u64) -> Self {
		Self { seed }
	}

	/// Returns the seed.
	pub const fn seed(&self) -> u64 {
		self.seed
	}
}

impl BuildHasher for SeededState {
	type Hasher = FxHasher;

	fn build_hasher(&self) -> FxHasher {
		FxHasher::with_seed(self.seed as usize)
	}
}

/// Cache identity of a single call: the ordered argument tuple.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Key<A: Args> {
	args: A,
}

impl<A: Args> Key<A> {
	/// Wraps an argument tuple.
	pub fn new(args: A) -> Self {
		Self { args }
	}

	/// Returns the wrapped arguments.
	pub fn args(&self) -> &A {
		&self.args
	}

	/// Unwraps the arguments.
	pub fn into_args(self) -> A {
		self.args
	}

	/// Number of positional arguments.
	pub fn arity(&self) -> usize {
		self.args.arity()
	}

	/// Hashes the argument sequence under `seed`.
	pub fn seeded_hash(&self, seed: u64) -> u64 {
		SeededState::new(seed).hash_one(&self.args)
	}

	/// Positional structural equality.
	pub fn equals(&self, other: &Self) -> bool {
		self == other
	}
}

impl<A: Args> Borrow<A> for Key<A> {
	fn borrow(&self) -> &A {
		&self.args
	}
}

impl<A: Args> From<A> for Key<A> {
	fn from(args: A) -> Self {
		Self::new(args)
	}
}

impl<A: Args + fmt::Debug> fmt::Debug for Key<A> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Key").field(&self.args).finish()
	}
}

#[cfg(test)]
mod tests;
