//! Copy-on-write container with atomic snapshot publication.
//!
//! # Role
//!
//! Thread-safe map entrypoint. Reads resolve against the currently published snapshot;
//! writes clone it, mutate the clone, and CAS-publish it through
//! [`SnapshotSlot`](snapswap_slot::SnapshotSlot).
//!
//! # Invariants
//!
//! - The slot always holds a valid snapshot after construction.
//! - A published snapshot is never mutated in place.
//! - Concurrent writers never lose an update (see `invariants::test_no_lost_updates`).

use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;
use std::ops::RangeBounds;
use std::sync::Arc;

use snapswap_slot::SnapshotSlot;

use crate::backing::{Backing, OrderedBacking};
use crate::error::MapError;
use crate::proxy::IndexProxy;
use crate::view::{EntryRef, EqualRange, SnapshotGuard};

const DEFAULT_LABEL: &str = "cow_map";

/// Associative container with lock-free reads and optimistic copy-on-write writes.
///
/// `B` is the backing structure held by every snapshot (see [`Backing`]).
///
/// There is deliberately no `swap` between two containers: exchanging two independent
/// slots cannot be done in one atomic step, so a reader could observe one side swapped
/// and the other not.
///
/// ```compile_fail
/// use snapswap_map::OrderedCowMap;
///
/// let a = OrderedCowMap::<u32, u32>::new();
/// let b = OrderedCowMap::<u32, u32>::new();
/// a.swap(&b);
/// ```
pub struct CowMap<B> {
	slot: SnapshotSlot<B>,
}

impl<B: Backing> CowMap<B> {
	/// Creates a container publishing an empty snapshot.
	pub fn new() -> Self {
		Self::from_inner(B::default())
	}

	/// Creates a container publishing `inner` as its first snapshot, without cloning it.
	pub fn from_inner(inner: B) -> Self {
		Self {
			slot: SnapshotSlot::new(inner).with_label(DEFAULT_LABEL),
		}
	}

	/// Sets the label attached to this container's tracing events.
	pub fn with_label(self, label: &'static str) -> Self {
		Self {
			slot: self.slot.with_label(label),
		}
	}

	pub fn label(&self) -> &'static str {
		self.slot.label()
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.slot.peek().len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.slot.peek().is_empty()
	}

	/// Theoretical upper bound on the number of entries.
	pub fn max_size(&self) -> usize {
		B::max_len()
	}

	/// Returns a copy of the value under `key`.
	///
	/// Values are returned by value: a reference could not outlive the snapshot it
	/// was read from. Use [`Self::find`] to keep a borrowed entry alive instead.
	pub fn at(&self, key: &B::Key) -> Result<B::Value, MapError> {
		self.get(key).ok_or(MapError::KeyNotFound)
	}

	pub fn get(&self, key: &B::Key) -> Option<B::Value> {
		self.slot.peek().get(key).cloned()
	}

	pub fn contains_key(&self, key: &B::Key) -> bool {
		self.slot.peek().contains_key(key)
	}

	/// Returns true if the visible snapshot maps `key` to `value`.
	pub fn maps_to(&self, key: &B::Key, value: &B::Value) -> bool
	where
		B::Value: PartialEq,
	{
		self.slot.peek().get(key) == Some(value)
	}

	/// Returns the number of entries stored under `key` (0 or 1).
	pub fn count(&self, key: &B::Key) -> usize {
		usize::from(self.contains_key(key))
	}

	/// Pins the current snapshot for iteration and repeated reads.
	pub fn snapshot(&self) -> SnapshotGuard<B> {
		SnapshotGuard::new(self.slot.load())
	}

	/// Returns the entry under `key`, pinned to the snapshot it was found in.
	pub fn find(&self, key: &B::Key) -> Option<EntryRef<B>> {
		self.snapshot().find(key)
	}

	/// Returns the entries matching `key` in the current snapshot.
	pub fn equal_range(&self, key: &B::Key) -> EqualRange<B> {
		EqualRange::new(self.slot.load(), key.clone())
	}

	/// Returns an indexing proxy for `key`.
	///
	/// The proxy never hands out `&mut` access to stored data; reading and assigning
	/// through it go through [`Self::get_value`] and [`Self::set_value`].
	pub fn index(&self, key: B::Key) -> IndexProxy<'_, B> {
		IndexProxy::new(self, key)
	}

	/// Returns the value under `key`, inserting and publishing `Default::default()` if absent.
	pub fn get_value(&self, key: B::Key) -> B::Value
	where
		B::Value: Default,
	{
		let outcome = self.slot.publish_if(
			|snap| !snap.contains_key(&key),
			|candidate| candidate.get_or_insert_default(key.clone()).clone(),
		);
		match outcome {
			Ok(published) => published.output,
			Err(snap) => snap.get(&key).cloned().unwrap_or_default(),
		}
	}

	/// Maps `key` to `value`, returning true if a new snapshot was published.
	///
	/// Nothing is published when the visible snapshot already holds `key → value`.
	pub fn set_value(&self, key: B::Key, value: B::Value) -> bool
	where
		B::Value: PartialEq,
	{
		let outcome = self.slot.publish_if(
			|snap| snap.get(&key) != Some(&value),
			|candidate| {
				candidate.insert(key.clone(), value.clone());
			},
		);
		if outcome.is_err() {
			tracing::trace!(label = self.label(), "set_value already satisfied; skipped publish");
		}
		outcome.is_ok()
	}

	/// Inserts or updates `key`, returning the value it replaced.
	pub fn insert(&self, key: B::Key, value: B::Value) -> Option<B::Value> {
		self.slot
			.publish_with(|candidate| candidate.insert(key.clone(), value.clone()))
			.output
	}

	/// Inserts every pair from `entries` in a single publication.
	///
	/// Later pairs overwrite earlier ones with the same key. Returns the number of keys
	/// that were not present before.
	pub fn insert_many<I>(&self, entries: I) -> usize
	where
		I: IntoIterator<Item = (B::Key, B::Value)>,
	{
		let entries: Vec<_> = entries.into_iter().collect();
		if entries.is_empty() {
			return 0;
		}

		self.slot
			.publish_with(|candidate| {
				let mut added = 0;
				for (key, value) in &entries {
					if candidate.insert(key.clone(), value.clone()).is_none() {
						added += 1;
					}
				}
				added
			})
			.output
	}

	/// Removes `key`, returning the number of entries removed (0 or 1).
	pub fn erase(&self, key: &B::Key) -> usize {
		usize::from(self.remove(key).is_some())
	}

	/// Removes `key`, returning its value. Nothing is published when `key` is absent.
	pub fn remove(&self, key: &B::Key) -> Option<B::Value> {
		self.slot
			.publish_if(|snap| snap.contains_key(key), |candidate| candidate.remove(key))
			.ok()
			.and_then(|published| published.output)
	}

	/// Removes every entry. Nothing is published when already empty.
	pub fn clear(&self) {
		if self
			.slot
			.publish_if(|snap| !snap.is_empty(), |candidate| candidate.clear())
			.is_err()
		{
			tracing::trace!(label = self.label(), "clear on empty snapshot; skipped publish");
		}
	}

	/// Publishes `inner` as the new snapshot, returning the one it replaced.
	pub fn replace(&self, inner: B) -> SnapshotGuard<B> {
		SnapshotGuard::new(self.slot.swap(Arc::new(inner)))
	}

	/// Publishes `other`'s current snapshot into this container.
	///
	/// This is a point-in-time copy, not a live link: later writes to either container
	/// are not seen by the other.
	pub fn copy_from(&self, other: &Self) {
		self.slot.store(other.slot.load());
	}

	/// Moves the current contents into a new container, leaving this one empty.
	///
	/// The exchange is one atomic step; concurrent readers see either the old contents
	/// or an empty snapshot.
	pub fn take(&self) -> Self {
		let empty = self.slot.peek().empty_like();
		let prev = self.slot.swap(Arc::new(empty));
		Self {
			slot: SnapshotSlot::from_arc(prev).with_label(self.label()),
		}
	}

	/// Consumes the container and returns the backing structure of its current snapshot.
	///
	/// Clones only when a reader still pins that snapshot.
	pub fn into_inner(self) -> B {
		Arc::unwrap_or_clone(self.slot.into_inner())
	}
}

impl<B: OrderedBacking> CowMap<B> {
	/// Returns copies of the entries of the current snapshot within `bounds`, in key order.
	pub fn range<R>(&self, bounds: R) -> Vec<(B::Key, B::Value)>
	where
		R: RangeBounds<B::Key>,
	{
		self.slot
			.peek()
			.range(bounds)
			.map(|(k, v)| (k.clone(), v.clone()))
			.collect()
	}
}

impl<K, V, S> CowMap<HashMap<K, V, S>>
where
	HashMap<K, V, S>: Backing<Key = K, Value = V>,
	S: BuildHasher + Clone,
{
	/// Creates an empty hashed container using `hasher` for every snapshot.
	pub fn with_hasher(hasher: S) -> Self {
		Self::from_inner(HashMap::with_hasher(hasher))
	}

	/// Returns the hasher of the current snapshot.
	pub fn hasher(&self) -> S {
		self.slot.peek().hasher().clone()
	}
}

impl<B: Backing> Default for CowMap<B> {
	fn default() -> Self {
		Self::new()
	}
}

impl<B: Backing> Clone for CowMap<B> {
	/// Point-in-time copy. Snapshots are immutable, so the copy shares the current one
	/// until either side publishes.
	fn clone(&self) -> Self {
		Self {
			slot: SnapshotSlot::from_arc(self.slot.load()).with_label(self.label()),
		}
	}
}

impl<B: Backing> From<B> for CowMap<B> {
	fn from(inner: B) -> Self {
		Self::from_inner(inner)
	}
}

impl<B: Backing> FromIterator<(B::Key, B::Value)> for CowMap<B> {
	fn from_iter<I: IntoIterator<Item = (B::Key, B::Value)>>(iter: I) -> Self {
		let mut inner = B::default();
		for (key, value) in iter {
			inner.insert(key, value);
		}
		Self::from_inner(inner)
	}
}

impl<B: Backing> Extend<(B::Key, B::Value)> for CowMap<B> {
	fn extend<I: IntoIterator<Item = (B::Key, B::Value)>>(&mut self, iter: I) {
		self.insert_many(iter);
	}
}

impl<B> fmt::Debug for CowMap<B>
where
	B: Backing,
	B::Key: fmt::Debug,
	B::Value: fmt::Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CowMap")
			.field("label", &self.label())
			.field("snapshot", &self.snapshot())
			.finish()
	}
}
