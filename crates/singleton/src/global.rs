use std::sync::Arc;

use crate::cell::SingletonCell;

/// Type with one process-wide registry entry.
///
/// Implement with [`singleton!`](crate::singleton) rather than by hand.
///
/// Construction arguments are first-caller-wins: once an instance is live, arguments
/// passed by later callers are ignored, not applied as a reconfiguration.
pub trait Singleton: Sized + Send + Sync + 'static {
	/// Returns the process-wide registry entry for `Self`.
	fn cell() -> &'static SingletonCell<Self>;

	/// Returns the live instance, default-constructing one if none exists.
	fn instance() -> Arc<Self>
	where
		Self: Default,
	{
		Self::cell().get_or_init(Self::default)
	}

	/// Returns the live instance, constructing one from `args` if none exists.
	fn instance_from<A>(args: A) -> Arc<Self>
	where
		Self: From<A>,
	{
		Self::cell().get_or_init(|| Self::from(args))
	}

	fn instance_with(init: impl FnOnce() -> Self) -> Arc<Self> {
		Self::cell().get_or_init(init)
	}

	fn try_instance_with<E>(init: impl FnOnce() -> Result<Self, E>) -> Result<Arc<Self>, E> {
		Self::cell().get_or_try_init(init)
	}

	/// Returns the live instance, if any, without constructing.
	fn current() -> Option<Arc<Self>> {
		Self::cell().get()
	}
}

/// Registers one or more types as [`Singleton`]s.
///
/// ```
/// use snapswap_singleton::{Singleton, singleton};
///
/// #[derive(Default)]
/// struct Config {
/// 	retries: u32,
/// }
///
/// impl From<u32> for Config {
/// 	fn from(retries: u32) -> Self {
/// 		Self { retries }
/// 	}
/// }
///
/// singleton!(Config);
///
/// let first = Config::instance_from(3);
/// let second = Config::instance_from(9);
/// assert_eq!(second.retries, 3);
///
/// drop((first, second));
/// assert!(Config::current().is_none());
/// ```
#[macro_export]
macro_rules! singleton {
	($($ty:ty),+ $(,)?) => {
		$(
			impl $crate::Singleton for $ty {
				fn cell() -> &'static $crate::SingletonCell<Self> {
					static CELL: ::std::sync::LazyLock<$crate::SingletonCell<$ty>> =
						::std::sync::LazyLock::new($crate::SingletonCell::new);
					&*CELL
				}
			}
		)+
	};
}
