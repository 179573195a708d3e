/// Typed access failures on an [`crate::ArgList`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgError {
	/// The requested position is past the end of the list.
	#[error("argument index {index} out of range for list of length {len}")]
	OutOfRange { index: usize, len: usize },

	/// The argument at `index` holds a different type.
	#[error("argument {index} has type {found}, expected {expected}")]
	TypeMismatch {
		index: usize,
		expected: &'static str,
		found: &'static str,
	},
}
