use proptest::prelude::*;

use super::*;
use crate::arg_list;

#[test]
fn equal_tuples_are_equal_keys() {
	let a = Key::new((1u32, String::from("a"), vec![1u8, 2]));
	let b = Key::new((1u32, String::from("a"), vec![1u8, 2]));
	assert!(a.equals(&b));
	assert_eq!(a.seeded_hash(7), b.seeded_hash(7));
}

#[test]
fn argument_order_is_part_of_identity() {
	let ab = Key::new((1u32, 2u32));
	let ba = Key::new((2u32, 1u32));
	assert!(!ab.equals(&ba));
}

#[test]
fn empty_tuple_hash_depends_only_on_seed() {
	let empty = Key::new(());
	assert_eq!(empty.arity(), 0);
	assert_eq!(empty.seeded_hash(3), Key::new(()).seeded_hash(3));
	assert_ne!(empty.seeded_hash(3), empty.seeded_hash(4));
}

#[test]
fn seeded_state_matches_seeded_hash() {
	let key = Key::new((5u64, 'x'));
	let state = SeededState::new(99);
	assert_eq!(state.hash_one(&key), key.seeded_hash(99));
	assert_eq!(state.hash_one(key.args()), key.seeded_hash(99));
}

#[test]
fn arity_reflects_tuple_length() {
	assert_eq!(Key::new(3u8).arity(), 1);
	assert_eq!(Key::new((1u8,)).arity(), 1);
	assert_eq!(Key::new((1u8, 2u16, 3u32, 4u64)).arity(), 4);
	assert_eq!(Key::new(arg_list![1u8, "x", 'c']).arity(), 3);
}

#[test]
fn nested_keys_recurse() {
	let inner = |n: u32| Key::new((n, n + 1));
	let a = Key::new((inner(1u32), vec![inner(2)]));
	let b = Key::new((inner(1u32), vec![inner(2)]));
	let c = Key::new((inner(1u32), vec![inner(3)]));
	assert!(a.equals(&b));
	assert!(!a.equals(&c));
	assert_eq!(a.seeded_hash(0), b.seeded_hash(0));
}

#[test]
fn arg_list_keys_hash_by_content() {
	let a = Key::new(arg_list![1i32, String::from("s")]);
	let b = Key::new(arg_list![1i32, String::from("s")]);
	assert!(a.equals(&b));
	assert_eq!(a.seeded_hash(11), b.seeded_hash(11));
}

proptest! {
	/// Equal keys hash equally under any seed.
	#[test]
	fn prop_hash_consistent_with_eq(x in any::<i64>(), s in ".{0,8}", seed in any::<u64>()) {
		let a = Key::new((x, s.clone()));
		let b = Key::new((x, s));
		prop_assert!(a.equals(&b));
		prop_assert_eq!(a.seeded_hash(seed), b.seeded_hash(seed));
	}

	/// Swapping distinct arguments yields a distinct key.
	#[test]
	fn prop_positional(x in any::<u32>(), y in any::<u32>()) {
		prop_assume!(x != y);
		prop_assert!(!Key::new((x, y)).equals(&Key::new((y, x))));
	}
}
