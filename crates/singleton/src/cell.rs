//! Registry entry for one lazily constructed shared instance.

use std::any::type_name;
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use snapswap_slot::WeakSlot;

/// Holds a weak reference to the current instance of `T` and serializes its construction.
///
/// The cell never owns the instance. It lives exactly as long as some caller holds an
/// `Arc<T>` obtained from the cell; after the last one is dropped the next request
/// constructs a fresh instance.
pub struct SingletonCell<T> {
	instance: WeakSlot<T>,
	init_lock: Mutex<()>,
	constructions: AtomicU64,
}

impl<T> SingletonCell<T> {
	pub fn new() -> Self {
		Self {
			instance: WeakSlot::new(),
			init_lock: Mutex::new(()),
			constructions: AtomicU64::new(0),
		}
	}

	/// Returns the live instance without ever constructing one.
	#[inline]
	pub fn get(&self) -> Option<Arc<T>> {
		self.instance.upgrade()
	}

	/// Returns true while some caller holds the current instance.
	pub fn is_live(&self) -> bool {
		self.instance.is_live()
	}

	/// Number of instances constructed by this cell so far.
	pub fn constructions(&self) -> u64 {
		self.constructions.load(Ordering::Acquire)
	}

	/// Returns the live instance, constructing it with `init` if none exists.
	///
	/// Only the caller that actually constructs runs `init`; when an instance is already
	/// live, `init` is dropped unused and its arguments are ignored.
	pub fn get_or_init(&self, init: impl FnOnce() -> T) -> Arc<T> {
		match self.get_or_try_init(|| Ok::<T, Infallible>(init())) {
			Ok(instance) => instance,
			Err(never) => match never {},
		}
	}

	/// Fallible variant of [`Self::get_or_init`].
	///
	/// A construction error is returned to this caller only. The cell stays empty, so the
	/// next caller attempts construction again.
	pub fn get_or_try_init<E>(
		&self,
		init: impl FnOnce() -> Result<T, E>,
	) -> Result<Arc<T>, E> {
		if let Some(instance) = self.instance.upgrade() {
			return Ok(instance);
		}

		let _guard = self.init_lock.lock();
		if let Some(instance) = self.instance.upgrade() {
			return Ok(instance);
		}

		let instance = Arc::new(init()?);
		self.instance.store(&instance);
		let generation = self.constructions.fetch_add(1, Ordering::AcqRel) + 1;
		tracing::debug!(
			type_name = type_name::<T>(),
			generation,
			"constructed singleton instance"
		);
		Ok(instance)
	}
}

impl<T> Default for SingletonCell<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> fmt::Debug for SingletonCell<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SingletonCell")
			.field("type", &type_name::<T>())
			.field("live", &self.is_live())
			.field("constructions", &self.constructions())
			.finish()
	}
}
