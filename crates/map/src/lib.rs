//! Copy-on-write associative containers with atomic snapshot publication.
//!
//! # Purpose
//!
//! Share an ordered or hashed map between threads without locks on the read path and
//! without lost updates on the write path.
//!
//! # Mental model
//!
//! * Readers load the current `Arc<B>` snapshot and query it directly.
//! * Writers clone the snapshot, apply one operation to the clone, and CAS-publish it.
//! * Failed CAS means "someone else won first"; the writer retries from the newer snapshot.
//! * Iterators and found entries pin their snapshot, so they never see later writes.
//!
//! # Key types
//!
//! | Type | Meaning | Constraints |
//! |---|---|---|
//! | [`CowMap`] | Container wrapping one atomic snapshot slot | Must publish via CAS to avoid lost updates |
//! | [`Backing`] | Collaborator map stored in each snapshot | Value-semantic `Clone`; unique keys |
//! | [`SnapshotGuard`] | Pinned snapshot; iteration and repeated reads | Keeps its snapshot alive |
//! | [`EntryRef`] | Found entry pinned to its snapshot | Keeps its snapshot alive |
//! | [`IndexProxy`] | `map[key]` stand-in | Reads/assigns through the publish loop only |
//!
//! # Data flow
//!
//! 1. Read path: `get`/`at`/`len`/`snapshot` load the slot and query the snapshot.
//! 2. Gate: `set_value`, `erase`, `remove` and `clear` first check whether the visible
//!    snapshot already satisfies the request; if so nothing is cloned or published.
//! 3. Write path: clone, mutate the private clone, CAS-publish or retry.
//!
//! # Concurrency & ordering
//!
//! * Readers never block and never retry.
//! * Writers are lock-free; an individual writer may retry under sustained contention.
//! * Each operation commits the effect of one call atomically; there are no multi-call
//!   transactions.
//!
//! # Example
//!
//! ```
//! use snapswap_map::{MapError, OrderedCowMap};
//!
//! let map: OrderedCowMap<u32, u32> = [(1, 2), (3, 4)].into_iter().collect();
//! assert_eq!(map.at(&9), Err(MapError::KeyNotFound));
//!
//! let before = map.snapshot();
//! map.index(9).set(10);
//! assert_eq!(map.at(&9), Ok(10));
//! assert_eq!(before.iter().count(), 2);
//! ```

mod backing;
mod error;
mod map;
mod proxy;
mod view;

use std::collections::hash_map::RandomState;
use std::collections::{BTreeMap, HashMap};

pub use backing::{Backing, OrderedBacking};
pub use error::MapError;
pub use map::CowMap;
pub use proxy::IndexProxy;
pub use view::{EntryRef, EqualRange, SnapshotGuard};

/// Copy-on-write map ordered by key.
pub type OrderedCowMap<K, V> = CowMap<BTreeMap<K, V>>;

/// Copy-on-write hash map.
pub type HashCowMap<K, V, S = RandomState> = CowMap<HashMap<K, V, S>>;

/// Copy-on-write hash map using the non-cryptographic Fx hasher.
#[cfg(feature = "fx")]
pub type FxCowMap<K, V> = CowMap<rustc_hash::FxHashMap<K, V>>;

#[cfg(test)]
mod invariants;
