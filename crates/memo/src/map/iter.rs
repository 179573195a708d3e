use std::slice;
use std::sync::Arc;

use super::node::{Entry, Node, Slot};

/// Borrowing iterator over a [`super::PersistentMap`].
pub struct Iter<'a, K, V> {
	branches: Vec<slice::Iter<'a, Slot<K, V>>>,
	collision: slice::Iter<'a, Arc<Entry<K, V>>>,
	remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
	pub(super) fn new(root: &'a Node<K, V>, len: usize) -> Self {
		let mut iter = Self {
			branches: Vec::new(),
			collision: slice::Iter::default(),
			remaining: len,
		};
		iter.descend(root);
		iter
	}

	fn descend(&mut self, node: &'a Node<K, V>) {
		match node {
			Node::Branch { slots, .. } => self.branches.push(slots.iter()),
			Node::Collision { entries, .. } => self.collision = entries.iter(),
		}
	}
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
	type Item = (&'a K, &'a V);

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			if let Some(entry) = self.collision.next() {
				self.remaining -= 1;
				return Some((&entry.key, &entry.value));
			}
			let top = self.branches.last_mut()?;
			match top.next() {
				Some(Slot::Leaf(entry)) => {
					self.remaining -= 1;
					return Some((&entry.key, &entry.value));
				}
				Some(Slot::Node(child)) => self.descend(child),
				None => {
					self.branches.pop();
				}
			}
		}
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.remaining, Some(self.remaining))
	}
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
