//! Single-threaded behavioral equivalence with the plain backing structure.

use std::collections::{BTreeMap, HashMap};
use std::mem;

use proptest::prelude::*;
use snapswap_map::{Backing, CowMap, MapError};

#[derive(Debug, Clone)]
enum Op {
	SetValue(u8, i16),
	GetValue(u8),
	Insert(u8, i16),
	InsertMany(Vec<(u8, i16)>),
	Erase(u8),
	Remove(u8),
	IndexSet(u8, i16),
	IndexGet(u8),
	Replace(Vec<(u8, i16)>),
	Take,
	Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
	prop_oneof![
		4 => (any::<u8>(), any::<i16>()).prop_map(|(k, v)| Op::SetValue(k, v)),
		2 => any::<u8>().prop_map(Op::GetValue),
		2 => (any::<u8>(), any::<i16>()).prop_map(|(k, v)| Op::Insert(k, v)),
		1 => prop::collection::vec((any::<u8>(), any::<i16>()), 0..8).prop_map(Op::InsertMany),
		3 => any::<u8>().prop_map(Op::Erase),
		2 => any::<u8>().prop_map(Op::Remove),
		2 => (any::<u8>(), any::<i16>()).prop_map(|(k, v)| Op::IndexSet(k, v)),
		2 => any::<u8>().prop_map(Op::IndexGet),
		1 => prop::collection::vec((any::<u8>(), any::<i16>()), 0..8).prop_map(Op::Replace),
		1 => Just(Op::Take),
		1 => Just(Op::Clear),
	]
}

/// Applies `ops` to both a container and a plain backing value, checking every result.
fn replay<B>(ops: &[Op]) -> Result<(), TestCaseError>
where
	B: Backing<Key = u8, Value = i16> + PartialEq + std::fmt::Debug,
{
	let map = CowMap::<B>::new();
	let mut model = B::default();

	for op in ops {
		match op.clone() {
			Op::SetValue(k, v) => {
				map.set_value(k, v);
				model.insert(k, v);
			}
			Op::GetValue(k) => {
				let expected = *model.get_or_insert_default(k);
				prop_assert_eq!(map.get_value(k), expected);
			}
			Op::Insert(k, v) => {
				prop_assert_eq!(map.insert(k, v), model.insert(k, v));
			}
			Op::InsertMany(entries) => {
				let mut added = 0;
				for (k, v) in entries.iter().copied() {
					if model.insert(k, v).is_none() {
						added += 1;
					}
				}
				prop_assert_eq!(map.insert_many(entries), added);
			}
			Op::Erase(k) => {
				let expected = usize::from(model.remove(&k).is_some());
				prop_assert_eq!(map.erase(&k), expected);
			}
			Op::Remove(k) => {
				prop_assert_eq!(map.remove(&k), model.remove(&k));
			}
			Op::IndexSet(k, v) => {
				let changed = model.get(&k) != Some(&v);
				prop_assert_eq!(map.index(k).set(v), changed);
				model.insert(k, v);
			}
			Op::IndexGet(k) => {
				let expected = *model.get_or_insert_default(k);
				prop_assert_eq!(map.index(k).get(), expected);
			}
			Op::Replace(entries) => {
				let mut next = B::default();
				for (k, v) in entries {
					next.insert(k, v);
				}
				let prev = map.replace(next.clone());
				prop_assert_eq!(prev.to_inner(), mem::replace(&mut model, next));
			}
			Op::Take => {
				let moved = map.take();
				prop_assert!(map.is_empty());
				prop_assert_eq!(moved.snapshot().to_inner(), mem::take(&mut model));
			}
			Op::Clear => {
				map.clear();
				model.clear();
			}
		}

		prop_assert_eq!(map.len(), model.len());
		prop_assert_eq!(map.is_empty(), model.is_empty());
	}

	prop_assert_eq!(map.snapshot().to_inner(), model.clone());
	for k in 0..=u8::MAX {
		let expected = model.get(&k).copied().ok_or(MapError::KeyNotFound);
		prop_assert_eq!(map.at(&k), expected);
		prop_assert_eq!(map.count(&k), usize::from(model.contains_key(&k)));
	}
	prop_assert_eq!(map.into_inner(), model);
	Ok(())
}

proptest! {
	/// Ordered container matches `BTreeMap` for any operation sequence.
	#[test]
	fn prop_ordered_matches_btree_map(ops in prop::collection::vec(arb_op(), 0..64)) {
		replay::<BTreeMap<u8, i16>>(&ops)?;
	}

	/// Hashed container matches `HashMap` for any operation sequence.
	#[test]
	fn prop_hashed_matches_hash_map(ops in prop::collection::vec(arb_op(), 0..64)) {
		replay::<HashMap<u8, i16>>(&ops)?;
	}

	/// Iteration order of an ordered snapshot is the key order.
	#[test]
	fn prop_ordered_snapshot_iterates_sorted(entries in prop::collection::vec((any::<u8>(), any::<i16>()), 0..64)) {
		let map = CowMap::<BTreeMap<u8, i16>>::new();
		map.insert_many(entries);
		let keys: Vec<u8> = map.snapshot().iter().map(|(k, _)| *k).collect();
		prop_assert!(keys.windows(2).all(|w| w[0] < w[1]));
	}
}
