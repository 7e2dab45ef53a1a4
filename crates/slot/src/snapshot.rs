//! Strong snapshot slot with the copy-modify-CAS publish loop.

use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use arc_swap::{ArcSwap, Guard};

/// Outcome of a successful publication.
#[derive(Debug)]
pub struct Published<T, R> {
	/// Value returned by the mutation, computed against the installed snapshot.
	pub output: R,
	/// The snapshot that was installed by this publication.
	pub snapshot: Arc<T>,
	/// Number of CAS attempts lost to concurrent writers before this one won.
	pub retries: usize,
}

/// Atomic slot holding the current immutable snapshot of a `T`.
pub struct SnapshotSlot<T> {
	label: &'static str,
	cell: ArcSwap<T>,
}

impl<T> SnapshotSlot<T> {
	/// Creates a slot publishing `value` as its first snapshot.
	pub fn new(value: T) -> Self {
		Self::from_arc(Arc::new(value))
	}

	/// Creates a slot publishing an already shared snapshot.
	pub fn from_arc(snap: Arc<T>) -> Self {
		Self {
			label: "snapshot",
			cell: ArcSwap::new(snap),
		}
	}

	/// Sets the label attached to this slot's tracing events.
	pub fn with_label(mut self, label: &'static str) -> Self {
		self.label = label;
		self
	}

	pub fn label(&self) -> &'static str {
		self.label
	}

	/// Returns a strong reference to the current snapshot.
	///
	/// The snapshot stays alive for as long as the returned `Arc` is held, regardless of
	/// later publications.
	#[inline]
	pub fn load(&self) -> Arc<T> {
		self.cell.load_full()
	}

	/// Returns a short-lived read guard to the current snapshot.
	///
	/// Cheaper than [`Self::load`] for one-shot reads; do not hold it across long work.
	#[inline]
	pub fn peek(&self) -> Guard<Arc<T>> {
		self.cell.load()
	}

	/// Unconditionally publishes `snap`.
	pub fn store(&self, snap: Arc<T>) {
		self.cell.store(snap);
	}

	/// Publishes `snap` and returns the snapshot it replaced.
	pub fn swap(&self, snap: Arc<T>) -> Arc<T> {
		self.cell.swap(snap)
	}

	/// Consumes the slot and returns its current snapshot.
	pub fn into_inner(self) -> Arc<T> {
		self.cell.into_inner()
	}
}

impl<T: Clone> SnapshotSlot<T> {
	/// Publishes a mutated clone of the current snapshot.
	///
	/// `mutate` may run more than once: each lost CAS discards the candidate and
	/// re-runs it against a fresh clone of the newer snapshot.
	pub fn publish_with<R>(&self, mutate: impl FnMut(&mut T) -> R) -> Published<T, R> {
		let Ok(published) = self.publish_gated(|_| Ok::<(), Infallible>(()), mutate);
		published
	}

	/// Publishes a mutated clone of the current snapshot when `needs_write` holds for it.
	///
	/// `needs_write` is evaluated against the snapshot of every attempt. When it returns
	/// false nothing is cloned or published and the snapshot that made the write
	/// unnecessary is returned as `Err`.
	pub fn publish_if<R>(
		&self,
		mut needs_write: impl FnMut(&T) -> bool,
		mutate: impl FnMut(&mut T) -> R,
	) -> Result<Published<T, R>, Arc<T>> {
		self.publish_gated(
			|snap| {
				if needs_write(snap) {
					Ok(())
				} else {
					Err(Arc::clone(snap))
				}
			},
			mutate,
		)
	}

	fn publish_gated<R, E>(
		&self,
		mut gate: impl FnMut(&Arc<T>) -> Result<(), E>,
		mut mutate: impl FnMut(&mut T) -> R,
	) -> Result<Published<T, R>, E> {
		let mut expected = self.cell.load_full();
		let mut retries = 0usize;

		loop {
			gate(&expected)?;

			let mut candidate = T::clone(&expected);
			let output = mutate(&mut candidate);
			let candidate = Arc::new(candidate);

			let prev = self.cell.compare_and_swap(&expected, Arc::clone(&candidate));
			if Arc::ptr_eq(&prev, &expected) {
				return Ok(Published {
					output,
					snapshot: candidate,
					retries,
				});
			}

			retries += 1;
			tracing::trace!(label = self.label, retries, "lost publish race; retrying");
			expected = Guard::into_inner(prev);
		}
	}
}

impl<T: Default> Default for SnapshotSlot<T> {
	fn default() -> Self {
		Self::new(T::default())
	}
}

impl<T: fmt::Debug> fmt::Debug for SnapshotSlot<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SnapshotSlot")
			.field("label", &self.label)
			.field("current", &**self.cell.load())
			.finish()
	}
}
