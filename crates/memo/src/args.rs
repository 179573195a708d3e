//! Heterogeneous argument lists for functions whose arity is only known at runtime.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::ArgError;
use crate::key::Args;

/// Object-safe view of a hashable, comparable argument value.
trait ErasedArg: Any + Send + Sync {
	fn as_any(&self) -> &dyn Any;
	fn eq_erased(&self, other: &dyn ErasedArg) -> bool;
	fn hash_erased(&self, state: &mut dyn Hasher);
	fn fmt_erased(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
	fn type_name(&self) -> &'static str;
}

impl<T> ErasedArg for T
where
	T: Hash + Eq + fmt::Debug + Send + Sync + 'static,
{
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn eq_erased(&self, other: &dyn ErasedArg) -> bool {
		other
			.as_any()
			.downcast_ref::<T>()
			.is_some_and(|other| self == other)
	}

	fn hash_erased(&self, mut state: &mut dyn Hasher) {
		TypeId::of::<T>().hash(&mut state);
		self.hash(&mut state);
	}

	fn fmt_erased(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(self, f)
	}

	fn type_name(&self) -> &'static str {
		type_name::<T>()
	}
}

impl fmt::Debug for dyn ErasedArg {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.fmt_erased(f)
	}
}

/// Ordered list of type-erased argument values.
///
/// Two lists are equal iff they have the same length and each position holds
/// values of the same type that compare equal. Lists nest: an `ArgList` is
/// itself a valid element.
#[derive(Clone, Default)]
pub struct ArgList {
	items: Vec<Arc<dyn ErasedArg>>,
}

impl ArgList {
	/// Creates an empty list.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a value.
	pub fn push<T>(&mut self, value: T)
	where
		T: Hash + Eq + fmt::Debug + Send + Sync + 'static,
	{
		self.items.push(Arc::new(value));
	}

	/// Appends a value, builder style.
	pub fn with<T>(mut self, value: T) -> Self
	where
		T: Hash + Eq + fmt::Debug + Send + Sync + 'static,
	{
		self.push(value);
		self
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Returns the argument at `index` as a `T`.
	pub fn get<T: Any>(&self, index: usize) -> Result<&T, ArgError> {
		let item = self.erased(index).ok_or(ArgError::OutOfRange {
			index,
			len: self.items.len(),
		})?;
		item.as_any()
			.downcast_ref::<T>()
			.ok_or_else(|| ArgError::TypeMismatch {
				index,
				expected: type_name::<T>(),
				found: item.type_name(),
			})
	}

	/// Iterates over the arguments as [`Any`] values.
	pub fn iter(&self) -> impl Iterator<Item = &dyn Any> + '_ {
		self.items.iter().map(|item| (**item).as_any())
	}

	/// Type names of the arguments, in order.
	pub fn type_names(&self) -> Vec<&'static str> {
		self.items.iter().map(|item| (**item).type_name()).collect()
	}

	fn erased(&self, index: usize) -> Option<&dyn ErasedArg> {
		self.items.get(index).map(|item| &**item)
	}
}

impl PartialEq for ArgList {
	fn eq(&self, other: &Self) -> bool {
		self.items.len() == other.items.len()
			&& self
				.items
				.iter()
				.zip(&other.items)
				.all(|(a, b)| (**a).eq_erased(&**b))
	}
}

impl Eq for ArgList {}

impl Hash for ArgList {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.items.len().hash(state);
		for item in &self.items {
			(**item).hash_erased(state);
		}
	}
}

impl fmt::Debug for ArgList {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(&self.items).finish()
	}
}

impl Args for ArgList {
	fn arity(&self) -> usize {
		self.items.len()
	}
}

/// Builds an [`ArgList`] from a comma-separated list of values.
#[macro_export]
macro_rules! arg_list {
	($($arg:expr),* $(,)?) => {
		$crate::ArgList::new()$(.with($arg))*
	};
}
