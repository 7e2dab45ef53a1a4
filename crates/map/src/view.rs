//! Snapshot-pinning read views.
//!
//! Every view owns an `Arc` to the snapshot it was taken from, so positions and
//! borrowed entries stay valid while newer snapshots are published underneath.

use std::fmt;
use std::ops::RangeBounds;
use std::sync::Arc;

use crate::backing::{Backing, OrderedBacking};

/// Pinned, immutable view of one published snapshot.
///
/// This is the iteration handle of a [`CowMap`](crate::CowMap): the sequence it yields
/// is fixed when the guard is taken and never reflects later writes.
pub struct SnapshotGuard<B> {
	pub(crate) snap: Arc<B>,
}

impl<B: Backing> SnapshotGuard<B> {
	pub(crate) fn new(snap: Arc<B>) -> Self {
		Self { snap }
	}

	pub fn len(&self) -> usize {
		self.snap.len()
	}

	pub fn is_empty(&self) -> bool {
		self.snap.is_empty()
	}

	pub fn get(&self, key: &B::Key) -> Option<&B::Value> {
		self.snap.get(key)
	}

	pub fn get_key_value(&self, key: &B::Key) -> Option<(&B::Key, &B::Value)> {
		self.snap.get_key_value(key)
	}

	pub fn contains_key(&self, key: &B::Key) -> bool {
		self.snap.contains_key(key)
	}

	/// Returns the number of entries stored under `key` (0 or 1).
	pub fn count(&self, key: &B::Key) -> usize {
		usize::from(self.snap.contains_key(key))
	}

	/// Returns an owned handle to the entry under `key`, pinned to this snapshot.
	pub fn find(&self, key: &B::Key) -> Option<EntryRef<B>> {
		let (k, v) = self.snap.get_key_value(key)?;
		Some(EntryRef {
			snap: Arc::clone(&self.snap),
			key: k.clone(),
			value: v.clone(),
		})
	}

	/// Returns the entries whose key equals `key`; at most one since keys are unique.
	pub fn equal_range(&self, key: &B::Key) -> impl Iterator<Item = (&B::Key, &B::Value)> + '_ {
		self.snap.get_key_value(key).into_iter()
	}

	pub fn iter(&self) -> B::Iter<'_> {
		self.snap.iter()
	}

	/// Returns the backing structure of this snapshot.
	pub fn as_inner(&self) -> &B {
		&self.snap
	}

	/// Clones the backing structure out of this snapshot.
	pub fn to_inner(&self) -> B {
		B::clone(&self.snap)
	}

	/// Returns true if both guards pin the same published snapshot.
	pub fn ptr_eq(a: &Self, b: &Self) -> bool {
		Arc::ptr_eq(&a.snap, &b.snap)
	}
}

impl<B: OrderedBacking> SnapshotGuard<B> {
	pub fn range<R>(&self, bounds: R) -> B::Range<'_>
	where
		R: RangeBounds<B::Key>,
	{
		self.snap.range(bounds)
	}

	pub fn first_key_value(&self) -> Option<(&B::Key, &B::Value)> {
		self.snap.first_key_value()
	}

	pub fn last_key_value(&self) -> Option<(&B::Key, &B::Value)> {
		self.snap.last_key_value()
	}
}

impl<B> Clone for SnapshotGuard<B> {
	fn clone(&self) -> Self {
		Self {
			snap: Arc::clone(&self.snap),
		}
	}
}

impl<'a, B: Backing> IntoIterator for &'a SnapshotGuard<B> {
	type Item = (&'a B::Key, &'a B::Value);
	type IntoIter = B::Iter<'a>;

	fn into_iter(self) -> Self::IntoIter {
		self.snap.iter()
	}
}

impl<B> fmt::Debug for SnapshotGuard<B>
where
	B: Backing,
	B::Key: fmt::Debug,
	B::Value: fmt::Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.snap.iter()).finish()
	}
}

/// Handle to one entry of a snapshot; keeps that snapshot alive.
pub struct EntryRef<B: Backing> {
	snap: Arc<B>,
	key: B::Key,
	value: B::Value,
}

impl<B: Backing> EntryRef<B> {
	pub fn key(&self) -> &B::Key {
		&self.key
	}

	pub fn value(&self) -> &B::Value {
		&self.value
	}

	/// Returns a guard over the snapshot this entry was found in.
	pub fn snapshot(&self) -> SnapshotGuard<B> {
		SnapshotGuard::new(Arc::clone(&self.snap))
	}
}

impl<B: Backing> Clone for EntryRef<B> {
	fn clone(&self) -> Self {
		Self {
			snap: Arc::clone(&self.snap),
			key: self.key.clone(),
			value: self.value.clone(),
		}
	}
}

impl<B> fmt::Debug for EntryRef<B>
where
	B: Backing,
	B::Key: fmt::Debug,
	B::Value: fmt::Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EntryRef")
			.field("key", &self.key)
			.field("value", &self.value)
			.finish()
	}
}

/// Entries of one snapshot matching a key, pinned to that snapshot.
pub struct EqualRange<B: Backing> {
	snap: Arc<B>,
	key: B::Key,
}

impl<B: Backing> EqualRange<B> {
	pub(crate) fn new(snap: Arc<B>, key: B::Key) -> Self {
		Self { snap, key }
	}

	pub fn iter(&self) -> impl Iterator<Item = (&B::Key, &B::Value)> + '_ {
		self.snap.get_key_value(&self.key).into_iter()
	}

	pub fn len(&self) -> usize {
		usize::from(self.snap.contains_key(&self.key))
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
