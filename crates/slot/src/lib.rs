//! Atomic snapshot slots shared by the copy-on-write map and the lazy singleton.
//!
//! # Purpose
//!
//! Provide the one piece of mutable shared state both components are built on: an
//! atomically replaceable reference to an immutable value.
//!
//! # Mental model
//!
//! * Readers pin an `Arc<T>` and read the immutable value behind it.
//! * Writers clone the pinned value, mutate the clone, and publish it with CAS.
//! * Failed CAS means "someone else won first"; the writer retries from the latest value.
//! * A superseded value is dropped when its last holder (slot or reader) lets go.
//!
//! # Key types
//!
//! | Type | Meaning | Constraints |
//! |---|---|---|
//! | [`SnapshotSlot`] | Strong slot holding the current snapshot | Never null; published values are never mutated in place |
//! | [`Published`] | Result of a successful publication | Carries the exact `Arc` that was installed |
//! | [`WeakSlot`] | Non-owning slot observing a shared value | Never keeps its value alive |
//!
//! # Concurrency & ordering
//!
//! * Loads are lock-free (`ArcSwap` load + refcount bump).
//! * Publication is lock-free via CAS retry; progress is system-wide, not per writer.
//! * CAS compares reference-counted pointers, so a freed-and-reused address cannot be
//!   mistaken for the expected snapshot while the expected `Arc` is still held.

mod snapshot;
mod weak;

pub use snapshot::{Published, SnapshotSlot};
pub use weak::WeakSlot;
