//! Memoizers shared across threads.

use std::sync::Barrier;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use memo::{MemoConfig, Memoized};

fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_max_level(tracing::Level::TRACE)
		.with_test_writer()
		.try_init();
}

#[test]
fn cold_cache_same_key_from_many_threads() {
	init_tracing();
	const THREADS: usize = 16;

	let calls = AtomicUsize::new(0);
	let memo = Memoized::with_config(
		|(a, b): (u64, u64)| {
			calls.fetch_add(1, Ordering::SeqCst);
			a.pow(2) + b
		},
		MemoConfig::new("cold-start"),
	);
	let barrier = Barrier::new(THREADS);

	let results: Vec<u64> = thread::scope(|s| {
		let handles: Vec<_> = (0..THREADS)
			.map(|_| {
				s.spawn(|| {
					barrier.wait();
					memo.call((12, 3))
				})
			})
			.collect();
		handles.into_iter().map(|h| h.join().unwrap()).collect()
	});

	assert!(results.iter().all(|&r| r == 147));
	let computed = calls.load(Ordering::SeqCst);
	assert!((1..=THREADS).contains(&computed));
	assert_eq!(memo.len(), 1);

	// Converged: no further computation.
	assert_eq!(memo.call((12, 3)), 147);
	assert_eq!(calls.load(Ordering::SeqCst), computed);
}

#[test]
fn racing_writers_lose_no_keys() {
	init_tracing();
	const THREADS: u32 = 8;
	const KEYS: u32 = 256;

	let memo = Memoized::new(|(t, k): (u32, u32)| (u64::from(t) << 32) | u64::from(k));
	let barrier = Barrier::new(THREADS as usize);

	thread::scope(|s| {
		for t in 0..THREADS {
			let memo = &memo;
			let barrier = &barrier;
			s.spawn(move || {
				barrier.wait();
				for k in 0..KEYS {
					assert_eq!(memo.call((t, k)), (u64::from(t) << 32) | u64::from(k));
					// Shared keys contend on the same entries.
					memo.call((THREADS, k % 16));
				}
			});
		}
	});

	assert_eq!(memo.len(), (THREADS * KEYS + 16) as usize);
	let snapshot = memo.snapshot();
	for t in 0..THREADS {
		for k in 0..KEYS {
			assert_eq!(
				snapshot.find(&(t, k)),
				Some(&((u64::from(t) << 32) | u64::from(k)))
			);
		}
	}
}

#[test]
fn readers_keep_their_generation_while_writers_publish() {
	let memo = Memoized::new(|n: u32| n * 2);
	memo.call(1);
	let pinned = memo.snapshot();

	thread::scope(|s| {
		for offset in 0..4 {
			let memo = &memo;
			s.spawn(move || {
				for n in (offset * 100)..(offset * 100 + 100) {
					memo.call(n);
				}
			});
		}
	});

	assert_eq!(pinned.len(), 1);
	assert_eq!(memo.len(), 400);
}
