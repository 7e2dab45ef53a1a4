//! Collaborator contract for the associative structure stored in each snapshot.
//!
//! A [`CowMap`](crate::CowMap) never searches, inserts or erases by itself; it clones a
//! backing value, asks it to perform the operation, and publishes the result. Any
//! ordered or hashed map with value-semantic `Clone` qualifies.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::ops::RangeBounds;
use std::{collections, mem};

/// Unique-key associative structure usable as a snapshot.
///
/// Keys and values are `Clone` because a writer may re-run its mutation against a fresh
/// clone after losing a publish race.
pub trait Backing: Clone + Default {
	type Key: Clone;
	type Value: Clone;
	type Iter<'a>: Iterator<Item = (&'a Self::Key, &'a Self::Value)>
	where
		Self: 'a;

	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn get_key_value(&self, key: &Self::Key) -> Option<(&Self::Key, &Self::Value)>;

	fn get(&self, key: &Self::Key) -> Option<&Self::Value> {
		self.get_key_value(key).map(|(_, v)| v)
	}

	fn contains_key(&self, key: &Self::Key) -> bool {
		self.get_key_value(key).is_some()
	}

	/// Inserts or updates `key`, returning the value it replaced.
	fn insert(&mut self, key: Self::Key, value: Self::Value) -> Option<Self::Value>;

	/// Returns the value stored under `key`, inserting `Default::default()` first if absent.
	fn get_or_insert_default(&mut self, key: Self::Key) -> &mut Self::Value
	where
		Self::Value: Default;

	fn remove(&mut self, key: &Self::Key) -> Option<Self::Value>;

	fn clear(&mut self);

	/// Returns an empty structure carrying the same construction policy (hasher) as `self`.
	fn empty_like(&self) -> Self {
		let mut empty = self.clone();
		empty.clear();
		empty
	}

	fn iter(&self) -> Self::Iter<'_>;

	/// Theoretical upper bound on the number of entries.
	fn max_len() -> usize {
		isize::MAX as usize / mem::size_of::<(Self::Key, Self::Value)>().max(1)
	}
}

/// Backing structure whose iteration order is the key order.
pub trait OrderedBacking: Backing {
	type Range<'a>: Iterator<Item = (&'a Self::Key, &'a Self::Value)>
	where
		Self: 'a;

	fn range<R>(&self, bounds: R) -> Self::Range<'_>
	where
		R: RangeBounds<Self::Key>;

	fn first_key_value(&self) -> Option<(&Self::Key, &Self::Value)>;

	fn last_key_value(&self) -> Option<(&Self::Key, &Self::Value)>;
}

impl<K, V> Backing for BTreeMap<K, V>
where
	K: Ord + Clone,
	V: Clone,
{
	type Key = K;
	type Value = V;
	type Iter<'a>
		= collections::btree_map::Iter<'a, K, V>
	where
		Self: 'a;

	#[inline]
	fn len(&self) -> usize {
		BTreeMap::len(self)
	}

	#[inline]
	fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
		BTreeMap::get_key_value(self, key)
	}

	fn insert(&mut self, key: K, value: V) -> Option<V> {
		BTreeMap::insert(self, key, value)
	}

	fn get_or_insert_default(&mut self, key: K) -> &mut V
	where
		V: Default,
	{
		self.entry(key).or_default()
	}

	fn remove(&mut self, key: &K) -> Option<V> {
		BTreeMap::remove(self, key)
	}

	fn clear(&mut self) {
		BTreeMap::clear(self);
	}

	fn iter(&self) -> Self::Iter<'_> {
		BTreeMap::iter(self)
	}
}

impl<K, V> OrderedBacking for BTreeMap<K, V>
where
	K: Ord + Clone,
	V: Clone,
{
	type Range<'a>
		= collections::btree_map::Range<'a, K, V>
	where
		Self: 'a;

	fn range<R>(&self, bounds: R) -> Self::Range<'_>
	where
		R: RangeBounds<K>,
	{
		BTreeMap::range(self, bounds)
	}

	fn first_key_value(&self) -> Option<(&K, &V)> {
		BTreeMap::first_key_value(self)
	}

	fn last_key_value(&self) -> Option<(&K, &V)> {
		BTreeMap::last_key_value(self)
	}
}

impl<K, V, S> Backing for HashMap<K, V, S>
where
	K: Eq + Hash + Clone,
	V: Clone,
	S: BuildHasher + Clone + Default,
{
	type Key = K;
	type Value = V;
	type Iter<'a>
		= collections::hash_map::Iter<'a, K, V>
	where
		Self: 'a;

	#[inline]
	fn len(&self) -> usize {
		HashMap::len(self)
	}

	#[inline]
	fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
		HashMap::get_key_value(self, key)
	}

	fn insert(&mut self, key: K, value: V) -> Option<V> {
		HashMap::insert(self, key, value)
	}

	fn get_or_insert_default(&mut self, key: K) -> &mut V
	where
		V: Default,
	{
		self.entry(key).or_default()
	}

	fn remove(&mut self, key: &K) -> Option<V> {
		HashMap::remove(self, key)
	}

	fn clear(&mut self) {
		HashMap::clear(self);
	}

	fn iter(&self) -> Self::Iter<'_> {
		HashMap::iter(self)
	}
}
