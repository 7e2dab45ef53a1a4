use std::fmt;
use std::sync::{Arc, Weak};

use arc_swap::ArcSwapAny;

/// Atomic slot holding a non-owning reference to a shared value.
///
/// The slot never extends the value's lifetime: once every external `Arc` is dropped,
/// [`Self::upgrade`] starts returning `None`.
pub struct WeakSlot<T> {
	cell: ArcSwapAny<Weak<T>>,
}

impl<T> WeakSlot<T> {
	/// Creates an empty slot.
	pub fn new() -> Self {
		Self {
			cell: ArcSwapAny::new(Weak::new()),
		}
	}

	/// Attempts to obtain a strong reference to the observed value.
	#[inline]
	pub fn upgrade(&self) -> Option<Arc<T>> {
		self.cell.load().upgrade()
	}

	/// Starts observing `strong`.
	pub fn store(&self, strong: &Arc<T>) {
		self.cell.store(Arc::downgrade(strong));
	}

	/// Stops observing the current value, if any.
	pub fn clear(&self) {
		self.cell.store(Weak::new());
	}

	/// Returns true while at least one strong owner of the observed value exists.
	pub fn is_live(&self) -> bool {
		self.cell.load().strong_count() > 0
	}
}

impl<T> Default for WeakSlot<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> fmt::Debug for WeakSlot<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WeakSlot")
			.field("live", &self.is_live())
			.finish()
	}
}
