use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use crate::{OrderedCowMap, SnapshotGuard};

struct Tracked {
	drops: Arc<AtomicUsize>,
}

impl Drop for Tracked {
	fn drop(&mut self) {
		self.drops.fetch_add(1, Ordering::SeqCst);
	}
}

/// Invariant: concurrent writers on distinct keys MUST all be visible afterwards.
pub(crate) fn inv_no_lost_updates() {
	const WRITERS: usize = 8;
	const KEYS_PER_WRITER: usize = 50;

	let map = Arc::new(OrderedCowMap::<usize, usize>::new().with_label("no_lost_updates"));
	let barrier = Arc::new(Barrier::new(WRITERS));

	let handles: Vec<_> = (0..WRITERS)
		.map(|w| {
			let map = Arc::clone(&map);
			let barrier = Arc::clone(&barrier);
			thread::spawn(move || {
				barrier.wait();
				for i in 0..KEYS_PER_WRITER {
					let key = w * KEYS_PER_WRITER + i;
					map.insert(key, key * 10);
				}
			})
		})
		.collect();
	for handle in handles {
		handle.join().unwrap();
	}

	let snap = map.snapshot();
	assert_eq!(snap.len(), WRITERS * KEYS_PER_WRITER);
	for (k, v) in &snap {
		assert_eq!(*v, k * 10);
	}
}

#[cfg_attr(test, test)]
pub(crate) fn test_no_lost_updates() {
	inv_no_lost_updates()
}

/// Invariant: a pinned snapshot MUST stay alive across publications and be freed on last release.
pub(crate) fn inv_snapshot_liveness_across_swap() {
	let drops = Arc::new(AtomicUsize::new(0));
	let map = OrderedCowMap::<u32, Arc<Tracked>>::new();
	map.insert(
		1,
		Arc::new(Tracked {
			drops: Arc::clone(&drops),
		}),
	);

	let pinned = map.snapshot();
	let entry = map.find(&1).unwrap();
	assert_eq!(map.erase(&1), 1);
	assert!(map.is_empty());

	assert_eq!(
		drops.load(Ordering::SeqCst),
		0,
		"value must be kept alive by the pinned snapshot"
	);
	assert_eq!(*entry.key(), 1);
	assert_eq!(pinned.len(), 1);

	drop(pinned);
	assert_eq!(drops.load(Ordering::SeqCst), 0, "entry still pins the snapshot");

	drop(entry);
	assert_eq!(
		drops.load(Ordering::SeqCst),
		1,
		"value must be dropped after last snapshot release"
	);
}

#[cfg_attr(test, test)]
pub(crate) fn test_snapshot_liveness_across_swap() {
	inv_snapshot_liveness_across_swap()
}

/// Invariant: the sequence seen through a snapshot MUST be fixed when the snapshot is taken.
pub(crate) fn inv_iteration_isolation() {
	let map = Arc::new(OrderedCowMap::<u32, u32>::from_inner(BTreeMap::from([
		(1, 2),
		(3, 4),
	])));
	let before = map.snapshot();

	let writers: Vec<_> = (10..14)
		.map(|k| {
			let map = Arc::clone(&map);
			thread::spawn(move || {
				map.insert(k, k);
				map.erase(&1);
			})
		})
		.collect();
	for writer in writers {
		writer.join().unwrap();
	}

	let seen: Vec<_> = before.iter().map(|(k, v)| (*k, *v)).collect();
	assert_eq!(seen, vec![(1, 2), (3, 4)]);

	let keys: BTreeSet<_> = map.snapshot().iter().map(|(k, _)| *k).collect();
	assert_eq!(keys, BTreeSet::from([3, 10, 11, 12, 13]));
}

#[cfg_attr(test, test)]
pub(crate) fn test_iteration_isolation() {
	inv_iteration_isolation()
}

/// Invariant: assigning the value a key already holds MUST NOT publish a snapshot.
pub(crate) fn inv_idempotent_set_value() {
	let map = OrderedCowMap::<u32, u32>::new();
	assert!(map.set_value(2, 3));
	let first = map.snapshot();

	assert!(!map.set_value(2, 3));
	assert!(!map.index(2).set(3));
	assert!(SnapshotGuard::ptr_eq(&first, &map.snapshot()));
	assert_eq!(map.at(&2), Ok(3));
}

#[cfg_attr(test, test)]
pub(crate) fn test_idempotent_set_value() {
	inv_idempotent_set_value()
}

/// Invariant: a no-op erase or clear MUST leave the current snapshot untouched.
pub(crate) fn inv_noop_writes_do_not_publish() {
	let map = OrderedCowMap::<u32, u32>::from_inner(BTreeMap::from([(1, 1)]));
	let before = map.snapshot();

	assert_eq!(map.erase(&42), 0);
	assert_eq!(map.remove(&42), None);
	assert!(SnapshotGuard::ptr_eq(&before, &map.snapshot()));

	let empty = OrderedCowMap::<u32, u32>::new();
	let before = empty.snapshot();
	empty.clear();
	assert!(SnapshotGuard::ptr_eq(&before, &empty.snapshot()));
}

#[cfg_attr(test, test)]
pub(crate) fn test_noop_writes_do_not_publish() {
	inv_noop_writes_do_not_publish()
}
