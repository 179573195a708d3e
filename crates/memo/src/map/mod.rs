//! Persistent hash map with structural sharing.
//!
//! # Purpose
//!
//! Provide an immutable associative container that readers can share freely
//! across threads while writers derive new versions cheaply.
//!
//! # Mental model
//!
//! * The map is a hash-array-mapped trie: 32-way branches indexed by successive
//!   5-bit fragments of a 64-bit hash, compressed with a population bitmap.
//! * `assoc` copies only the root-to-leaf path it touches. Every other subtree is
//!   shared by `Arc` with the map it was derived from.
//! * Keys whose full hashes are identical live together in a collision node.
//!
//! # Invariants
//!
//! * A map value is never mutated after construction. `assoc` returns a new map
//!   and leaves `self` and every map sharing structure with it untouched.
//! * `len` counts distinct keys; rebinding an existing key does not change it.
//! * Lookups and inserts hash with the map's own `BuildHasher`, so a map only
//!   ever mixes hashes from a single hash function.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use crate::key::SeededState;

mod iter;
mod node;

pub use iter::Iter;
use node::{Entry, Node};

/// Immutable hash map; `assoc` yields a new version sharing unchanged subtrees.
pub struct PersistentMap<K, V, S = SeededState> {
	root: Arc<Node<K, V>>,
	len: usize,
	hasher: S,
}

impl<K, V, S: Clone> Clone for PersistentMap<K, V, S> {
	fn clone(&self) -> Self {
		Self {
			root: self.root.clone(),
			len: self.len,
			hasher: self.hasher.clone(),
		}
	}
}

impl<K, V> PersistentMap<K, V> {
	/// Creates an empty map with the default seed.
	pub fn new() -> Self {
		Self::with_hasher(SeededState::default())
	}

	/// Returns the canonical zero-entry map.
	pub fn empty() -> Self {
		Self::new()
	}
}

impl<K, V> Default for PersistentMap<K, V> {
	fn default() -> Self {
		Self::new()
	}
}

impl<K, V, S> PersistentMap<K, V, S> {
	/// Creates an empty map that hashes keys with `hasher`.
	pub fn with_hasher(hasher: S) -> Self {
		Self {
			root: Arc::new(Node::empty()),
			len: 0,
			hasher,
		}
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	pub fn hasher(&self) -> &S {
		&self.hasher
	}

	/// Returns true if both maps are the same version.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.root, &other.root)
	}

	/// Iterates over all bindings in trie order.
	pub fn iter(&self) -> Iter<'_, K, V> {
		Iter::new(&self.root, self.len)
	}
}

impl<K, V, S> PersistentMap<K, V, S>
where
	K: Hash + Eq,
	S: BuildHasher + Clone,
{
	/// Looks up the value bound to `key`.
	pub fn find<Q>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		let hash = self.hasher.hash_one(key);
		self.root.find(hash, key).map(|entry| &entry.value)
	}

	pub fn contains_key<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		self.find(key).is_some()
	}

	/// Returns a new map with `key` bound to `value`, overwriting any previous
	/// binding for `key`.
	#[must_use]
	pub fn assoc(&self, key: K, value: V) -> Self {
		let hash = self.hasher.hash_one(&key);
		let entry = Arc::new(Entry { hash, key, value });
		let (root, added) = Node::assoc(&self.root, 0, entry);
		Self {
			root,
			len: self.len + usize::from(added),
			hasher: self.hasher.clone(),
		}
	}
}

impl<K, V, S> FromIterator<(K, V)> for PersistentMap<K, V, S>
where
	K: Hash + Eq,
	S: BuildHasher + Clone + Default,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		iter.into_iter()
			.fold(Self::with_hasher(S::default()), |map, (k, v)| map.assoc(k, v))
	}
}

impl<'a, K, V, S> IntoIterator for &'a PersistentMap<K, V, S> {
	type Item = (&'a K, &'a V);
	type IntoIter = Iter<'a, K, V>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for PersistentMap<K, V, S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}
