//! Lock-free function memoization.
//!
//! Wrapping a pure function produces a callable that caches results by argument
//! tuple. The cache is a persistent hash map published through an atomic cell:
//! readers never block, and writers only contend at the final compare-and-swap.
//!
//! ```
//! use memo::memoize_recursive;
//!
//! let fib = memoize_recursive(|fib: &dyn Fn(u64) -> u64, n: u64| match n {
//! 	0 | 1 => n,
//! 	n => fib(n - 1) + fib(n - 2),
//! });
//! assert_eq!(fib(45), 1_134_903_170);
//! ```

/// Heterogeneous runtime argument lists.
pub mod args;
/// Atomic snapshot cell.
pub mod cell;
/// Memoizer construction options.
pub mod config;
/// Typed argument access errors.
pub mod error;
/// Argument tuple keys and seeded hashing.
pub mod key;
/// Persistent hash-array-mapped trie.
pub mod map;
/// Memoized function wrappers.
pub mod memoize;

pub use args::ArgList;
pub use cell::AtomicCell;
pub use config::MemoConfig;
pub use error::ArgError;
pub use key::{Args, Key, SeededState};
pub use map::PersistentMap;
pub use memoize::{MemoMap, Memoized, Recursive, memoize, memoize_recursive};
