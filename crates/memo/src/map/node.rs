//! Trie nodes and the path-copying insert.

use std::borrow::Borrow;
use std::sync::Arc;

/// Hash bits consumed per trie level.
pub(super) const BITS: u32 = 5;
const MASK: u64 = (1 << BITS) - 1;

/// A bound key/value pair with its cached hash.
pub(super) struct Entry<K, V> {
	pub(super) hash: u64,
	pub(super) key: K,
	pub(super) value: V,
}

/// One occupied position inside a branch.
pub(super) enum Slot<K, V> {
	Leaf(Arc<Entry<K, V>>),
	Node(Arc<Node<K, V>>),
}

impl<K, V> Clone for Slot<K, V> {
	fn clone(&self) -> Self {
		match self {
			Slot::Leaf(entry) => Slot::Leaf(entry.clone()),
			Slot::Node(node) => Slot::Node(node.clone()),
		}
	}
}

pub(super) enum Node<K, V> {
	/// Bitmap-compressed 32-way branch. Bit `i` of `bitmap` is set iff the
	/// fragment `i` is occupied; `slots` holds occupied positions in fragment order.
	Branch { bitmap: u32, slots: Vec<Slot<K, V>> },
	/// Entries whose full 64-bit hashes are identical.
	Collision { hash: u64, entries: Vec<Arc<Entry<K, V>>> },
}

#[inline]
fn fragment(hash: u64, shift: u32) -> u32 {
	((hash >> shift) & MASK) as u32
}

#[inline]
fn slot_index(bitmap: u32, bit: u32) -> usize {
	(bitmap & (bit - 1)).count_ones() as usize
}

impl<K, V> Node<K, V> {
	pub(super) fn empty() -> Self {
		Node::Branch {
			bitmap: 0,
			slots: Vec::new(),
		}
	}

	pub(super) fn find<Q>(&self, hash: u64, key: &Q) -> Option<&Entry<K, V>>
	where
		K: Borrow<Q>,
		Q: Eq + ?Sized,
	{
		let mut node = self;
		let mut shift = 0;
		loop {
			match node {
				Node::Branch { bitmap, slots } => {
					let bit: u32 = 1 << fragment(hash, shift);
					if bitmap & bit == 0 {
						return None;
					}
					match &slots[slot_index(*bitmap, bit)] {
						Slot::Leaf(entry) => {
							return (entry.hash == hash && entry.key.borrow() == key)
								.then_some(&**entry);
						}
						Slot::Node(child) => {
							node = &**child;
							shift += BITS;
						}
					}
				}
				Node::Collision {
					hash: shared,
					entries,
				} => {
					if *shared != hash {
						return None;
					}
					return entries
						.iter()
						.find(|entry| entry.key.borrow() == key)
						.map(|entry| &**entry);
				}
			}
		}
	}

	/// Returns a copy of `node` with `entry` bound, plus whether the key was new.
	///
	/// Only the nodes on the path to `entry` are rebuilt; every other subtree is
	/// shared with `node`.
	pub(super) fn assoc(node: &Arc<Self>, shift: u32, entry: Arc<Entry<K, V>>) -> (Arc<Self>, bool)
	where
		K: Eq,
	{
		match &**node {
			Node::Branch { bitmap, slots } => {
				let bit: u32 = 1 << fragment(entry.hash, shift);
				let idx = slot_index(*bitmap, bit);

				if bitmap & bit == 0 {
					let mut next = Vec::with_capacity(slots.len() + 1);
					next.extend_from_slice(&slots[..idx]);
					next.push(Slot::Leaf(entry));
					next.extend_from_slice(&slots[idx..]);
					let branch = Node::Branch {
						bitmap: bitmap | bit,
						slots: next,
					};
					return (Arc::new(branch), true);
				}

				let (replacement, added) = match &slots[idx] {
					Slot::Leaf(existing) if existing.hash == entry.hash => {
						if existing.key == entry.key {
							(Slot::Leaf(entry), false)
						} else {
							let collision = Node::Collision {
								hash: entry.hash,
								entries: vec![existing.clone(), entry],
							};
							(Slot::Node(Arc::new(collision)), true)
						}
					}
					Slot::Leaf(existing) => {
						let existing_hash = existing.hash;
						let entry_hash = entry.hash;
						let split = Node::split(
							shift + BITS,
							Slot::Leaf(existing.clone()),
							existing_hash,
							Slot::Leaf(entry),
							entry_hash,
						);
						(Slot::Node(Arc::new(split)), true)
					}
					Slot::Node(child) => {
						let (child, added) = Node::assoc(child, shift + BITS, entry);
						(Slot::Node(child), added)
					}
				};

				let mut next = slots.clone();
				next[idx] = replacement;
				let branch = Node::Branch {
					bitmap: *bitmap,
					slots: next,
				};
				(Arc::new(branch), added)
			}
			Node::Collision { hash, entries } if *hash == entry.hash => {
				let mut next = entries.clone();
				let added = match next.iter().position(|e| e.key == entry.key) {
					Some(pos) => {
						next[pos] = entry;
						false
					}
					None => {
						next.push(entry);
						true
					}
				};
				let collision = Node::Collision {
					hash: *hash,
					entries: next,
				};
				(Arc::new(collision), added)
			}
			Node::Collision { hash, .. } => {
				let entry_hash = entry.hash;
				let split = Node::split(
					shift,
					Slot::Node(node.clone()),
					*hash,
					Slot::Leaf(entry),
					entry_hash,
				);
				(Arc::new(split), true)
			}
		}
	}

	/// Builds the smallest branch chain at `shift` that separates two slots whose
	/// hashes agree on every fragment below `shift`.
	fn split(shift: u32, a: Slot<K, V>, a_hash: u64, b: Slot<K, V>, b_hash: u64) -> Self {
		debug_assert_ne!(a_hash, b_hash);
		debug_assert!(shift < u64::BITS);

		let fa = fragment(a_hash, shift);
		let fb = fragment(b_hash, shift);
		if fa == fb {
			let child = Node::split(shift + BITS, a, a_hash, b, b_hash);
			return Node::Branch {
				bitmap: 1 << fa,
				slots: vec![Slot::Node(Arc::new(child))],
			};
		}

		let slots = if fa < fb { vec![a, b] } else { vec![b, a] };
		Node::Branch {
			bitmap: (1 << fa) | (1 << fb),
			slots,
		}
	}
}
